//! Outward views assembled from persisted rows.
//!
//! A shape's representation needs its geometry row; a layout's needs all
//! of its shapes; a template's needs all of its layouts. These are built
//! on demand and never stored. Each public read runs in one read-only
//! `REPEATABLE READ` transaction, so a shape deleted mid-read is either
//! seen whole or not at all.

use serde::Serialize;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uptemplate_core::codec::{encode_shape, ShapeRepresentation};
use uptemplate_core::error::CoreError;
use uptemplate_core::types::DbId;

use crate::error::DbError;
use crate::models::geometry::Geometry;
use crate::models::layout::Layout;
use crate::models::shape::Shape;
use crate::models::template::Template;
use crate::repositories::{GeometryRepo, LayoutRepo, ShapeRepo};

/// A layout row with its shapes in creation order.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutView {
    #[serde(flatten)]
    pub layout: Layout,
    pub shapes: Vec<ShapeRepresentation>,
}

/// A template row with its layouts expanded.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateView {
    #[serde(flatten)]
    pub template: Template,
    pub layouts: Vec<LayoutView>,
}

/// Denormalised read-only projection of a template: canvas and content
/// only, no ownership or bookkeeping columns.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateData {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub layouts: Vec<LayoutData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutData {
    pub id: DbId,
    pub shapes: Vec<ShapeRepresentation>,
}

/// Encode a shape whose geometry has already been loaded.
///
/// Fails with `ReferentialIntegrity` if `geometry` is not the row the
/// shape's `(kind, geometry_id)` points at.
pub fn represent(shape: &Shape, geometry: &Geometry) -> Result<ShapeRepresentation, CoreError> {
    let kind = shape.shape_kind()?;
    if geometry.kind() != kind || geometry.id() != shape.geometry_id {
        return Err(CoreError::ReferentialIntegrity {
            kind: shape.kind,
            geometry_id: shape.geometry_id,
        });
    }
    encode_shape(kind, shape.id, shape.fields()?, geometry.fields())
}

/// Load a shape's geometry and encode the pair.
///
/// Run this on a connection that saw `shape`, inside the same snapshot;
/// otherwise a concurrent delete can remove the geometry in between.
pub async fn represent_shape(
    conn: &mut PgConnection,
    shape: &Shape,
) -> Result<ShapeRepresentation, DbError> {
    let kind = shape.shape_kind()?;
    let geometry = GeometryRepo::find(conn, kind, shape.geometry_id)
        .await?
        .ok_or(CoreError::ReferentialIntegrity {
            kind: shape.kind,
            geometry_id: shape.geometry_id,
        })?;
    Ok(represent(shape, &geometry)?)
}

/// Begin a read-only transaction whose statements all see one snapshot.
async fn snapshot(pool: &PgPool) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

async fn shapes_of(
    conn: &mut PgConnection,
    layout_id: DbId,
) -> Result<Vec<ShapeRepresentation>, DbError> {
    let shapes = ShapeRepo::list_by_layout(&mut *conn, layout_id).await?;
    let mut representations = Vec::with_capacity(shapes.len());
    for shape in &shapes {
        representations.push(represent_shape(&mut *conn, shape).await?);
    }
    Ok(representations)
}

async fn layouts_of(
    conn: &mut PgConnection,
    template_id: DbId,
) -> Result<Vec<LayoutView>, DbError> {
    let layouts = LayoutRepo::list_by_template(&mut *conn, template_id).await?;
    let mut views = Vec::with_capacity(layouts.len());
    for layout in layouts {
        let shapes = shapes_of(&mut *conn, layout.id).await?;
        views.push(LayoutView { layout, shapes });
    }
    Ok(views)
}

/// Representation of one shape of a layout, or `None` if the layout has no
/// shape with that id.
pub async fn shape_in_layout(
    pool: &PgPool,
    layout_id: DbId,
    shape_id: DbId,
) -> Result<Option<ShapeRepresentation>, DbError> {
    let mut tx = snapshot(pool).await?;
    let repr = match ShapeRepo::find_in_layout(&mut *tx, layout_id, shape_id).await? {
        Some(shape) => Some(represent_shape(&mut *tx, &shape).await?),
        None => None,
    };
    tx.commit().await?;
    Ok(repr)
}

/// Representations of every shape in a layout, in creation order.
pub async fn layout_shapes(
    pool: &PgPool,
    layout_id: DbId,
) -> Result<Vec<ShapeRepresentation>, DbError> {
    let mut tx = snapshot(pool).await?;
    let shapes = shapes_of(&mut *tx, layout_id).await?;
    tx.commit().await?;
    Ok(shapes)
}

pub async fn layout_view(pool: &PgPool, layout: Layout) -> Result<LayoutView, DbError> {
    let shapes = layout_shapes(pool, layout.id).await?;
    Ok(LayoutView { layout, shapes })
}

/// Every layout of a template with its shapes, read from one snapshot.
pub async fn template_layouts(
    pool: &PgPool,
    template_id: DbId,
) -> Result<Vec<LayoutView>, DbError> {
    let mut tx = snapshot(pool).await?;
    let layouts = layouts_of(&mut *tx, template_id).await?;
    tx.commit().await?;
    Ok(layouts)
}

pub async fn template_view(pool: &PgPool, template: Template) -> Result<TemplateView, DbError> {
    let layouts = template_layouts(pool, template.id).await?;
    Ok(TemplateView { template, layouts })
}

pub async fn template_data(pool: &PgPool, template: Template) -> Result<TemplateData, DbError> {
    let layouts = template_layouts(pool, template.id)
        .await?
        .into_iter()
        .map(|view| LayoutData {
            id: view.layout.id,
            shapes: view.shapes,
        })
        .collect();
    Ok(TemplateData {
        name: template.name,
        width: template.width,
        height: template.height,
        layouts,
    })
}

//! Integration tests for templates, layouts and the aggregate views.

use serde_json::json;
use sqlx::PgPool;
use uptemplate_core::codec::{decode_create, CreateShapeRequest};
use uptemplate_db::models::template::{CreateTemplate, UpdateTemplate};
use uptemplate_db::representation;
use uptemplate_db::repositories::{LayoutRepo, ShapeRepo, TemplateRepo};

fn new_template(name: &str) -> CreateTemplate {
    CreateTemplate {
        name: name.to_string(),
        width: None,
        height: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_applies_canvas_defaults(pool: PgPool) {
    let template = TemplateRepo::create(&pool, 7, &new_template("Flyer")).await.unwrap();
    assert_eq!(template.owner_id, 7);
    assert_eq!(template.name, "Flyer");
    assert_eq!((template.width, template.height), (800.0, 600.0));

    let custom = TemplateRepo::create(
        &pool,
        7,
        &CreateTemplate {
            name: "Banner".to_string(),
            width: Some(1200.0),
            height: None,
        },
    )
    .await
    .unwrap();
    assert_eq!((custom.width, custom.height), (1200.0, 600.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_by_owner_only_returns_own_templates(pool: PgPool) {
    let a = TemplateRepo::create(&pool, 1, &new_template("a")).await.unwrap();
    TemplateRepo::create(&pool, 2, &new_template("b")).await.unwrap();
    let c = TemplateRepo::create(&pool, 1, &new_template("c")).await.unwrap();

    let ids: Vec<_> = TemplateRepo::list_by_owner(&pool, 1)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, [a.id, c.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_update(pool: PgPool) {
    let template = TemplateRepo::create(&pool, 1, &new_template("old")).await.unwrap();

    let updated = TemplateRepo::update(
        &pool,
        template.id,
        &UpdateTemplate {
            height: Some(300.0),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.name, "old");
    assert_eq!(updated.width, 800.0);
    assert_eq!(updated.height, 300.0);
    assert_eq!(updated.owner_id, 1);

    let missing = TemplateRepo::update(&pool, 999, &UpdateTemplate::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_layouts_scoped_to_template(pool: PgPool) {
    let first = TemplateRepo::create(&pool, 1, &new_template("first")).await.unwrap();
    let second = TemplateRepo::create(&pool, 1, &new_template("second")).await.unwrap();
    let layout = LayoutRepo::create(&pool, first.id).await.unwrap().unwrap();

    assert!(LayoutRepo::find_in_template(&pool, first.id, layout.id).await.unwrap().is_some());
    assert!(LayoutRepo::find_in_template(&pool, second.id, layout.id).await.unwrap().is_none());

    assert!(LayoutRepo::delete(&pool, layout.id).await.unwrap());
    assert!(LayoutRepo::find_by_id(&pool, layout.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_layout_create_on_missing_template_returns_none(pool: PgPool) {
    assert!(LayoutRepo::create(&pool, 999).await.unwrap().is_none());

    // Template deleted while the layout insert waits on its row.
    let template = TemplateRepo::create(&pool, 1, &new_template("gone")).await.unwrap();
    let mut deleting = pool.begin().await.unwrap();
    sqlx::query("DELETE FROM templates WHERE id = $1")
        .bind(template.id)
        .execute(&mut *deleting)
        .await
        .unwrap();

    let create = tokio::spawn({
        let pool = pool.clone();
        async move { LayoutRepo::create(&pool, template.id).await }
    });
    deleting.commit().await.unwrap();

    assert!(create.await.unwrap().unwrap().is_none());
    assert_eq!(LayoutRepo::list_by_template(&pool, template.id).await.unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_template_data_projection(pool: PgPool) {
    let template = TemplateRepo::create(&pool, 1, &new_template("Card")).await.unwrap();
    let first = LayoutRepo::create(&pool, template.id).await.unwrap().unwrap();
    let second = LayoutRepo::create(&pool, template.id).await.unwrap().unwrap();

    let request = CreateShapeRequest {
        kind: "Rect".to_string(),
        config: json!({ "width": 10, "height": 20 }).as_object().cloned().unwrap(),
    };
    let (shape, _) = ShapeRepo::create(&pool, second.id, &decode_create(&request).unwrap())
        .await
        .unwrap();

    let data = representation::template_data(&pool, template.clone()).await.unwrap();
    let value = serde_json::to_value(&data).unwrap();
    assert_eq!(value["name"], "Card");
    assert_eq!(value["width"], 800.0);
    assert_eq!(value["height"], 600.0);
    assert_eq!(value["layouts"][0]["id"], first.id);
    assert_eq!(value["layouts"][0]["shapes"], json!([]));
    assert_eq!(value["layouts"][1]["shapes"][0]["id"], shape.id);
    assert_eq!(value["layouts"][1]["shapes"][0]["type"], "v-rect");
    assert!(value.get("owner_id").is_none());

    let view = representation::template_view(&pool, template).await.unwrap();
    let value = serde_json::to_value(&view).unwrap();
    assert_eq!(value["owner_id"], 1);
    assert_eq!(value["layouts"][1]["template_id"], value["id"]);
    assert_eq!(value["layouts"][1]["shapes"][0]["config"]["width"], 10.0);
}

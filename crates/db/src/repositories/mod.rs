//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. [`GeometryRepo`] is the
//! exception: it only runs inside a shape transaction and takes the
//! connection instead.

pub mod geometry_repo;
pub mod layout_repo;
pub mod media_content_repo;
pub mod shape_repo;
pub mod template_repo;

pub use geometry_repo::GeometryRepo;
pub use layout_repo::LayoutRepo;
pub use media_content_repo::MediaContentRepo;
pub use shape_repo::ShapeRepo;
pub use template_repo::TemplateRepo;

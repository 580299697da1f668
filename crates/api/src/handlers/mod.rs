pub mod layouts;
pub mod media;
pub mod shapes;
pub mod templates;

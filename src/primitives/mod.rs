pub mod camera;
pub mod color;
pub mod mesh;
pub mod vertex;

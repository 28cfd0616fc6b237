/// Window size of the handheld's native display.
pub const RENDER_SIZE: [u32; 2] = [1280, 720];

/// Tunables for the demo. There is no runtime loading; the defaults are the
/// values the demo ships with.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DemoConfig {
    pub title: &'static str,
    pub size: [u32; 2],
    /// Maximum number of vertices recolored per frame.
    pub changes_per_frame: usize,
    /// Degrees around +Y applied per frame while left/right is held.
    pub rotate_step_deg: f32,
    /// X offset applied per frame while left/right is held.
    pub translate_step: f32,
    /// Tint of the filled pass.
    pub base_color: [f32; 3],
    /// Tint of the wireframe pass.
    pub line_color: [f32; 3],
    pub clear_color: [f64; 3],
    pub sphere_radius: f32,
    pub sphere_sectors: u32,
    pub sphere_stacks: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "Chroma Sphere",
            size: RENDER_SIZE,
            changes_per_frame: 4,
            rotate_step_deg: 2.3,
            translate_step: 0.01,
            base_color: [1.0, 1.0, 1.0],
            line_color: [0.0, 0.0, 0.0],
            clear_color: [0.0, 0.0, 0.0],
            sphere_radius: 0.5,
            // 2 * 15 * (9 - 1) = 240 triangles
            sphere_sectors: 15,
            sphere_stacks: 9,
        }
    }
}

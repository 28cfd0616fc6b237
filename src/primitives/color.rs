/// Color the sphere is being recolored toward.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TargetColor {
    #[default]
    Red,
    Green,
    Blue,
}

impl TargetColor {
    pub fn rgb(self) -> [f32; 3] {
        match self {
            TargetColor::Red => [1.0, 0.0, 0.0],
            TargetColor::Green => [0.0, 1.0, 0.0],
            TargetColor::Blue => [0.0, 0.0, 1.0],
        }
    }
}

/// Width and height in millimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// `true` when both sides are positive.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

use serde::{Deserialize, Serialize};

/// RGBA fill color as handed to the rendering side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0, 255]);
    pub const RED: Color = Color([255, 0, 0, 255]);
    pub const CRIMSON: Color = Color([220, 20, 60, 255]);
    pub const GRAY: Color = Color([128, 128, 128, 255]);
    pub const LIGHT_GRAY: Color = Color([211, 211, 211, 255]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color([r, g, b, 255])
    }

    pub fn rgba(&self) -> [u8; 4] {
        self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::GRAY
    }
}

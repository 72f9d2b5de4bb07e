use crate::foundation::error::{BoardcastError, BoardcastResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// 0-based half-move index into a game: "the position after N plies".
///
/// `PlyIndex(0)` is the initial position before any move has been applied.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct PlyIndex(pub usize);

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Validate that both dimensions are non-zero and raster-backend
    /// representable (the CPU surface addresses pixels with `u16`).
    pub fn validate(self) -> BoardcastResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(BoardcastError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(BoardcastError::validation(format!(
                "canvas {}x{} exceeds the raster surface limit of {max}x{max}",
                self.width,
                self.height,
                max = u16::MAX
            )));
        }
        Ok(())
    }
}

/// Straight-alpha RGBA8 color.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, Default,
)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (straight, not premultiplied).
    pub a: u8,
}

impl Rgba8 {
    /// Construct from straight-alpha components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Construct a fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Return the same color with a replaced alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

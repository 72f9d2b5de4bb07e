//! Themes and render options: palettes, sprite sets, sizing and loop settings.

use std::path::PathBuf;

use crate::board::geometry::BoardGeometry;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{BoardcastError, BoardcastResult};

/// Built-in board themes. A theme selects the default palette and the sprite
/// subdirectory under the assets root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Green/cream palette.
    Modern,
    /// Brown wooden palette.
    Wood,
}

impl Theme {
    /// Sprite subdirectory name for this theme.
    pub fn dir_name(self) -> &'static str {
        match self {
            Theme::Modern => "modern",
            Theme::Wood => "wood",
        }
    }

    /// Default `(light, dark, highlight)` palette.
    pub fn palette(self) -> (Rgba8, Rgba8, Rgba8) {
        let highlight = Rgba8::new(255, 255, 52, 128);
        match self {
            Theme::Modern => (
                Rgba8::opaque(238, 238, 210),
                Rgba8::opaque(118, 150, 86),
                highlight,
            ),
            Theme::Wood => (
                Rgba8::opaque(192, 166, 132),
                Rgba8::opaque(131, 95, 66),
                highlight,
            ),
        }
    }
}

/// GIF loop behavior for animated output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopCount {
    /// Loop forever.
    Infinite,
    /// Play the animation `1 + n` times.
    Finite(u16),
}

/// Immutable per-render configuration.
///
/// A value of this struct fully describes how a board is drawn; per-frame
/// state (the highlight set) is passed separately to each render call, so no
/// state leaks between calls.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Board edge length in pixels (the canvas adds padding on top).
    pub size: u32,
    /// Outer padding in pixels, `[top, right, bottom, left]`.
    pub padding: [u32; 4],
    /// Light square color.
    pub light: Rgba8,
    /// Dark square color.
    pub dark: Rgba8,
    /// Translucent last-move highlight color.
    pub highlight: Rgba8,
    /// Draw from Black's point of view.
    pub flipped: bool,
    /// Theme selecting the sprite set (and, via [`RenderOptions::with_theme`],
    /// the palette).
    pub theme: Theme,
    /// Directory containing per-theme sprite subdirectories.
    pub assets_root: PathBuf,
    /// Draw rank/file labels along the board edges.
    pub coordinates: bool,
    /// Tint the from/to squares of the most recent move.
    pub highlight_last_move: bool,
    /// Loop behavior for animated output.
    pub loop_count: LoopCount,
}

impl Default for RenderOptions {
    fn default() -> Self {
        let theme = Theme::Modern;
        let (light, dark, highlight) = theme.palette();
        Self {
            size: 480,
            padding: [0, 0, 0, 0],
            light,
            dark,
            highlight,
            flipped: false,
            theme,
            assets_root: PathBuf::from("assets"),
            coordinates: true,
            highlight_last_move: true,
            loop_count: LoopCount::Infinite,
        }
    }
}

impl RenderOptions {
    /// Switch to `theme` and apply its default palette.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        let (light, dark, highlight) = theme.palette();
        self.theme = theme;
        self.light = light;
        self.dark = dark;
        self.highlight = highlight;
        self
    }

    /// Parse options from a JSON object; absent fields keep their defaults.
    pub fn from_json(json: &str) -> BoardcastResult<Self> {
        let opts: Self = serde_json::from_str(json)
            .map_err(|e| BoardcastError::validation(format!("invalid render options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Geometry derived from size/padding/orientation.
    pub fn geometry(&self) -> BoardGeometry {
        BoardGeometry::new(self.size, self.padding, self.flipped)
    }

    /// Check size constraints.
    pub fn validate(&self) -> BoardcastResult<()> {
        if self.size < 8 {
            return Err(BoardcastError::validation(
                "board size must be at least 8 pixels",
            ));
        }
        self.geometry().canvas().validate()
    }
}

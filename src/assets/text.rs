use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{BoardcastError, BoardcastResult};

/// RGBA8 brush carried through parley label layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct LabelBrush {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for LabelBrush {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Shapes and caches coordinate-label layouts for one font.
///
/// Labels are single glyphs from a tiny alphabet (`a..h`, `1..8`) in at most
/// two colors, so every layout is shaped once and reused for every frame.
pub(crate) struct LabelEngine {
    font_bytes: Vec<u8>,
    font: vello_cpu::peniko::FontData,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<LabelBrush>,
    cache: HashMap<(char, Rgba8), Arc<parley::Layout<LabelBrush>>>,
    size_px: f32,
}

impl LabelEngine {
    /// Build an engine around raw font bytes (a `.ttf`/`.otf` blob).
    pub(crate) fn new(font_bytes: Vec<u8>, size_px: f32) -> BoardcastResult<Self> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(BoardcastError::validation(
                "label size_px must be finite and > 0",
            ));
        }
        let font =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes.clone()), 0);
        Ok(Self {
            font_bytes,
            font,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            cache: HashMap::new(),
            size_px,
        })
    }

    /// The font as a drawable glyph source.
    pub(crate) fn font(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    /// Shaped layout for one label character in one color.
    pub(crate) fn layout_for(
        &mut self,
        label: char,
        color: Rgba8,
    ) -> BoardcastResult<Arc<parley::Layout<LabelBrush>>> {
        if let Some(layout) = self.cache.get(&(label, color)) {
            return Ok(layout.clone());
        }

        let text = label.to_string();
        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(self.font_bytes.clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            BoardcastError::configuration("no font families registered from label font bytes")
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| BoardcastError::configuration("label font family has no name"))?
            .to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.size_px));
        builder.push_default(parley::style::StyleProperty::Brush(LabelBrush::from(color)));

        let mut layout: parley::Layout<LabelBrush> = builder.build(&text);
        layout.break_all_lines(None);

        let layout = Arc::new(layout);
        self.cache.insert((label, color), layout.clone());
        Ok(layout)
    }
}

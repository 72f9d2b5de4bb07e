//! The CPU drawing surface and rendered RGBA frames.

use crate::assets::sprites::SpritePaint;
use crate::assets::text::LabelBrush;
use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{BoardcastError, BoardcastResult};

/// A rendered frame as premultiplied RGBA8 pixels, tightly packed row-major.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes (`width * height * 4`).
    pub data: Vec<u8>,
}

/// Reusable CPU drawing surface for board frames.
///
/// One surface is owned per render session and mutated by exactly one frame
/// at a time: every frame starts with [`BoardSurface::begin_frame`], draws a
/// full scene in z-order, and reads pixels back with
/// [`BoardSurface::finish_frame`]. The backing scene and pixmap are reused
/// across frames, so a long animation allocates no per-frame surfaces.
pub(crate) struct BoardSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
}

impl BoardSurface {
    pub(crate) fn new(canvas: Canvas) -> BoardcastResult<Self> {
        canvas.validate()?;
        let width = canvas.width as u16;
        let height = canvas.height as u16;
        Ok(Self {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            pixmap: vello_cpu::Pixmap::new(width, height),
        })
    }

    pub(crate) fn canvas(&self) -> Canvas {
        Canvas {
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }

    /// Reset the scene for a fresh frame.
    pub(crate) fn begin_frame(&mut self) {
        self.ctx.reset();
        self.ctx
            .set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    /// Fill `rect` with a solid (possibly translucent) color, composited
    /// over everything drawn so far this frame.
    pub(crate) fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
    }

    /// Draw a sprite scaled into `dst`.
    pub(crate) fn draw_sprite(&mut self, paint: &SpritePaint, dst: Rect) {
        let sx = dst.width() / f64::from(paint.width.max(1));
        let sy = dst.height() / f64::from(paint.height.max(1));
        let tr = Affine::translate((dst.x0, dst.y0)) * Affine::scale_non_uniform(sx, sy);
        self.ctx.set_transform(affine_to_cpu(tr));
        self.ctx.set_paint(paint.image.clone());
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(paint.width),
            f64::from(paint.height),
        ));
    }

    /// Draw a shaped label with its layout origin at `origin`.
    pub(crate) fn draw_label(
        &mut self,
        font: &vello_cpu::peniko::FontData,
        layout: &parley::Layout<LabelBrush>,
        origin: Point,
    ) {
        self.ctx
            .set_transform(affine_to_cpu(Affine::translate((origin.x, origin.y))));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Rasterize the scene and copy the pixels out.
    pub(crate) fn finish_frame(&mut self) -> BoardcastResult<FrameRgba> {
        self.ctx.flush();
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.render_to_pixmap(&mut self.pixmap);

        let data = self.pixmap.data_as_u8_slice().to_vec();
        let expected = (self.width as usize) * (self.height as usize) * 4;
        if data.len() != expected {
            return Err(BoardcastError::validation(
                "surface readback size mismatch",
            ));
        }
        Ok(FrameRgba {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data,
        })
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}
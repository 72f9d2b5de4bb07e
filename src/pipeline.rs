use chess::Board;

use crate::assets::sprites::SpriteStore;
use crate::assets::text::LabelEngine;
use crate::board::geometry::BoardGeometry;
use crate::board::theme::RenderOptions;
use crate::encode::gif::GifSink;
use crate::encode::png::png_bytes;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, PlyIndex};
use crate::foundation::error::{BoardcastError, BoardcastResult};
use crate::game::record::GameRecord;
use crate::game::snapshot::{SnapshotStream, snapshot};
use crate::render::frame::{HighlightSet, label_size_px, render_board_frame};
use crate::render::surface::{BoardSurface, FrameRgba};

/// Reusable render session: options, sprite store, label engine and one
/// drawing surface, shared sequentially by every frame of a render call.
///
/// Construction loads all sprite assets eagerly, so configuration errors
/// (missing sprite, missing label font) surface before any frame exists.
pub struct BoardRenderer {
    opts: RenderOptions,
    geom: BoardGeometry,
    sprites: SpriteStore,
    labels: Option<LabelEngine>,
    surface: BoardSurface,
}

impl BoardRenderer {
    /// Build a renderer for `opts`, loading the theme's assets.
    pub fn new(opts: RenderOptions) -> BoardcastResult<Self> {
        opts.validate()?;
        let geom = opts.geometry();
        let sprites = SpriteStore::open(&opts.assets_root, opts.theme)?;

        let labels = if opts.coordinates {
            let font_bytes = sprites.label_font().ok_or_else(|| {
                BoardcastError::configuration(format!(
                    "coordinates are enabled but no 'label.ttf' was found in '{}'",
                    sprites.theme_dir().display()
                ))
            })?;
            Some(LabelEngine::new(font_bytes.to_vec(), label_size_px())?)
        } else {
            None
        };

        let surface = BoardSurface::new(geom.canvas())?;
        Ok(Self {
            opts,
            geom,
            sprites,
            labels,
            surface,
        })
    }

    /// The output canvas size.
    pub fn canvas(&self) -> Canvas {
        self.geom.canvas()
    }

    /// The options this renderer was built with.
    pub fn options(&self) -> &RenderOptions {
        &self.opts
    }

    /// Render an arbitrary position with an explicit highlight set.
    pub fn render_position(
        &mut self,
        board: &Board,
        highlights: &HighlightSet,
    ) -> BoardcastResult<FrameRgba> {
        render_board_frame(
            board,
            highlights,
            &self.geom,
            &self.opts,
            &mut self.sprites,
            self.labels.as_mut(),
            &mut self.surface,
        )?;
        self.surface.finish_frame()
    }

    /// Render the position after `ply` half-moves of `record` (clamped to
    /// the game length), highlighting the producing move when configured.
    pub fn render_ply(&mut self, record: &GameRecord, ply: usize) -> BoardcastResult<FrameRgba> {
        let ply = record.clamp_ply(ply);
        let board = snapshot(record, ply)?;
        let highlights = if self.opts.highlight_last_move && ply > 0 {
            HighlightSet::from_move(Some(record.moves()[ply - 1]))
        } else {
            HighlightSet::empty()
        };
        self.render_position(&board, &highlights)
    }

    /// Sequence frames for ply `0..=end_ply` into `sink`, in strictly
    /// increasing ply order.
    ///
    /// Each step resolves the next snapshot incrementally, renders it onto
    /// the shared surface, and hands the frame to the sink before the next
    /// snapshot is resolved. The first error aborts the whole pass.
    pub fn render_into_sink(
        &mut self,
        record: &GameRecord,
        end_ply: Option<usize>,
        delay_ms: u32,
        sink: &mut dyn FrameSink,
    ) -> BoardcastResult<()> {
        let canvas = self.geom.canvas();
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            delay_ms,
            loop_count: self.opts.loop_count,
        })?;

        for state in SnapshotStream::new(record, end_ply) {
            let state = state?;
            let highlights = if self.opts.highlight_last_move {
                HighlightSet::from_move(state.last_move)
            } else {
                HighlightSet::empty()
            };
            let frame = self.render_position(&state.board, &highlights)?;
            sink.push_frame(PlyIndex(state.ply), &frame)?;
        }

        sink.end()
    }
}

/// Render a single position of a game as PNG bytes.
///
/// `ply = None` renders the final position. Out-of-range plies clamp to the
/// end of the game.
#[tracing::instrument(skip(record, opts), fields(plies = record.len()))]
pub fn render_static(
    record: &GameRecord,
    ply: Option<usize>,
    opts: &RenderOptions,
) -> BoardcastResult<Vec<u8>> {
    let mut renderer = BoardRenderer::new(opts.clone())?;
    let frame = renderer.render_ply(record, ply.unwrap_or(record.len()))?;
    png_bytes(&frame)
}

/// Render a game replay as animated GIF bytes: one frame per ply from the
/// initial position through `end_ply` (`None` = the whole game), with a
/// uniform `delay_ms` between frames.
#[tracing::instrument(skip(record, opts), fields(plies = record.len()))]
pub fn render_animated(
    record: &GameRecord,
    end_ply: Option<usize>,
    delay_ms: u32,
    opts: &RenderOptions,
) -> BoardcastResult<Vec<u8>> {
    let mut renderer = BoardRenderer::new(opts.clone())?;
    let mut sink = GifSink::new();
    renderer.render_into_sink(record, end_ply, delay_ms, &mut sink)?;
    let bytes = sink.into_bytes()?;
    tracing::debug!(bytes = bytes.len(), "gif encode complete");
    Ok(bytes)
}

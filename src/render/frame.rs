//! Board frame painter and highlight sets.

use chess::{Board, ChessMove, Square};

use crate::assets::sprites::SpriteStore;
use crate::assets::text::LabelEngine;
use crate::board::geometry::BoardGeometry;
use crate::board::theme::RenderOptions;
use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::{BoardcastError, BoardcastResult};
use crate::render::surface::BoardSurface;

/// Squares tinted with the highlight color in one frame, typically the
/// from/to of the most recent move.
///
/// Recomputed per frame; never stored across frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HighlightSet {
    squares: [Option<Square>; 2],
}

impl HighlightSet {
    /// No highlighted squares.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Highlight the source and destination of a move, or nothing for
    /// `None` (ply 0).
    pub fn from_move(mv: Option<ChessMove>) -> Self {
        match mv {
            Some(mv) => Self {
                squares: [Some(mv.get_source()), Some(mv.get_dest())],
            },
            None => Self::empty(),
        }
    }

    /// Highlight up to two arbitrary squares.
    pub fn of(squares: &[Square]) -> Self {
        let mut out = Self::empty();
        for (slot, sq) in out.squares.iter_mut().zip(squares.iter()) {
            *slot = Some(*sq);
        }
        out
    }

    /// Whether `sq` is in the set.
    pub fn contains(&self, sq: Square) -> bool {
        self.squares.iter().flatten().any(|&s| s == sq)
    }

    /// Iterate the highlighted squares.
    pub fn iter(&self) -> impl Iterator<Item = Square> + '_ {
        self.squares.iter().flatten().copied()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.squares.iter().all(Option::is_none)
    }
}

// Label offsets from the square corner, in pixels (12px label font).
const LABEL_SIZE_PX: f32 = 12.0;
const RANK_LABEL_INSET: (f64, f64) = (3.0, 4.0);
const FILE_LABEL_INSET: (f64, f64) = (3.0, 2.0);

/// Font size used for the edge coordinate labels.
pub(crate) fn label_size_px() -> f32 {
    LABEL_SIZE_PX
}

/// Draw one complete board frame onto `surface`.
///
/// Draw order is a strict contract:
/// 1. base fill with the light color,
/// 2. dark squares by checkerboard parity,
/// 3. edge coordinate labels,
/// 4. translucent highlight overlays,
/// 5. piece sprites.
pub(crate) fn render_board_frame(
    board: &Board,
    highlights: &HighlightSet,
    geom: &BoardGeometry,
    opts: &RenderOptions,
    sprites: &mut SpriteStore,
    labels: Option<&mut LabelEngine>,
    surface: &mut BoardSurface,
) -> BoardcastResult<()> {
    surface.begin_frame();

    let canvas = geom.canvas();
    surface.fill_rect(
        Rect::new(0.0, 0.0, f64::from(canvas.width), f64::from(canvas.height)),
        opts.light,
    );

    for row in 0..8 {
        for col in 0..8 {
            let sq = geom.square_at(row, col);
            if square_is_dark(sq) {
                surface.fill_rect(geom.rect_for(sq), opts.dark);
            }
        }
    }

    if let Some(labels) = labels {
        draw_edge_labels(geom, opts, labels, surface)?;
    }

    for sq in highlights.iter() {
        surface.fill_rect(geom.rect_for(sq), opts.highlight);
    }

    let cell_px = geom.cell().round().max(1.0) as u32;
    for row in 0..8 {
        for col in 0..8 {
            let sq = geom.square_at(row, col);
            let Some(piece) = board.piece_on(sq) else {
                continue;
            };
            let color = board.color_on(sq).ok_or_else(|| {
                BoardcastError::engine(format!("square {sq} has a piece but no color"))
            })?;
            let paint = sprites.paint(color, piece, cell_px)?;
            surface.draw_sprite(&paint, geom.rect_for(sq));
        }
    }

    Ok(())
}

/// Rank labels down the left edge, file labels along the bottom edge, each
/// in the opposite of its square's shade so the text stays legible on both.
fn draw_edge_labels(
    geom: &BoardGeometry,
    opts: &RenderOptions,
    labels: &mut LabelEngine,
    surface: &mut BoardSurface,
) -> BoardcastResult<()> {
    let cell = geom.cell();

    for row in 0..8 {
        let sq = geom.square_at(row, 0);
        let rect = geom.rect_for(sq);
        let layout = labels.layout_for(geom.rank_label(row), contrast_color(sq, opts))?;
        surface.draw_label(
            labels.font(),
            &layout,
            Point::new(rect.x0 + RANK_LABEL_INSET.0, rect.y0 + RANK_LABEL_INSET.1),
        );
    }

    for col in 0..8 {
        let sq = geom.square_at(7, col);
        let rect = geom.rect_for(sq);
        let layout = labels.layout_for(geom.file_label(col), contrast_color(sq, opts))?;
        let x = rect.x0 + cell - FILE_LABEL_INSET.0 - f64::from(layout.full_width());
        let y = rect.y0 + cell - FILE_LABEL_INSET.1 - f64::from(layout.height());
        surface.draw_label(labels.font(), &layout, Point::new(x, y));
    }

    Ok(())
}

fn square_is_dark(sq: Square) -> bool {
    BoardGeometry::is_dark(sq.get_file().to_index(), sq.get_rank().to_index())
}

fn contrast_color(sq: Square, opts: &RenderOptions) -> Rgba8 {
    if square_is_dark(sq) {
        opts.light
    } else {
        opts.dark
    }
}

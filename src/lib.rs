//! Boardcast renders chess games into images.
//!
//! A game is a validated move history ([`GameRecord`]); the library
//! reconstructs the position at any ply by replaying a prefix of the
//! history, draws it with a themed sprite set on a CPU raster surface, and
//! encodes either a single position as PNG ([`render_static`]) or the whole
//! replay as an animated GIF ([`render_animated`]).
//!
//! Rules, move generation and position bookkeeping come from the `chess`
//! crate; boardcast never re-implements chess logic.
//!
//! ```no_run
//! use boardcast::{GameRecord, RenderOptions, render_animated};
//!
//! let record = GameRecord::from_san(["e4", "e5", "Nf3", "Nc6"])?;
//! let opts = RenderOptions {
//!     assets_root: "assets".into(),
//!     ..RenderOptions::default()
//! };
//! let gif = render_animated(&record, None, 500, &opts)?;
//! # Ok::<(), boardcast::BoardcastError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub use chess;

mod assets;
mod foundation;

pub mod board;
pub mod encode;
pub mod game;
pub(crate) mod pipeline;
pub mod render;

pub use crate::board::geometry::BoardGeometry;
pub use crate::board::theme::{LoopCount, RenderOptions, Theme};
pub use crate::encode::gif::GifSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::foundation::core::{Canvas, PlyIndex, Rgba8};
pub use crate::foundation::error::{BoardcastError, BoardcastResult};
pub use crate::game::record::GameRecord;
pub use crate::game::snapshot::{PlyState, SnapshotStream, snapshot};
pub use crate::pipeline::{BoardRenderer, render_animated, render_static};
pub use crate::render::frame::HighlightSet;
pub use crate::render::surface::FrameRgba;

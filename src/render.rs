//! Frame rendering: the CPU drawing surface and the board frame painter.

pub mod frame;
pub mod surface;

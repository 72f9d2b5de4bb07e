//! Game histories and position-snapshot reconstruction.

pub mod record;
pub mod snapshot;

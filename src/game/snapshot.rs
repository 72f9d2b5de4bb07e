//! Position-snapshot reconstruction by replaying move-history prefixes.

use chess::{Board, ChessMove};

use crate::foundation::error::{BoardcastError, BoardcastResult};
use crate::game::record::GameRecord;

/// Apply one move to a position, rejecting moves the engine considers
/// illegal.
///
/// A silently skipped move would corrupt every later snapshot, so this is
/// the only way positions advance anywhere in the crate.
pub fn apply_move(board: &Board, mv: ChessMove) -> BoardcastResult<Board> {
    if !board.legal(mv) {
        return Err(BoardcastError::engine(format!(
            "move '{mv}' is not legal in position '{board}'"
        )));
    }
    Ok(board.make_move_new(mv))
}

/// Reconstruct the position after `ply` half-moves by replaying the history
/// prefix from the initial position.
///
/// `ply` is clamped into `[0, record.len()]`: requests past the end of the
/// game return the final position instead of failing. Replaying the same
/// prefix always yields an identical position.
pub fn snapshot(record: &GameRecord, ply: usize) -> BoardcastResult<Board> {
    let ply = record.clamp_ply(ply);
    record.moves()[..ply]
        .iter()
        .try_fold(Board::default(), |board, &mv| apply_move(&board, mv))
}

/// Position plus the move that produced it, as yielded by [`SnapshotStream`].
#[derive(Clone, Copy, Debug)]
pub struct PlyState {
    /// Half-move index of this state (0 = initial position).
    pub ply: usize,
    /// The full board state at `ply`.
    pub board: Board,
    /// The move that led to this state; `None` at ply 0.
    pub last_move: Option<ChessMove>,
}

/// Lazy forward pass over the states of a game: yields ply `0..=end`.
///
/// Each step applies a single move to the previous state, which is
/// observationally identical to a full prefix replay per ply but O(N)
/// overall instead of O(N²). The stream is finite, non-restartable, and
/// fuses after the first engine error.
#[derive(Debug)]
pub struct SnapshotStream<'a> {
    moves: &'a [ChessMove],
    board: Board,
    next: usize,
    end: usize,
    failed: bool,
}

impl<'a> SnapshotStream<'a> {
    /// Stream states for ply `0..=end_ply`, clamped to the game length.
    /// `None` means the whole game.
    pub fn new(record: &'a GameRecord, end_ply: Option<usize>) -> Self {
        let end = record.clamp_ply(end_ply.unwrap_or(record.len()));
        Self {
            moves: record.moves(),
            board: Board::default(),
            next: 0,
            end,
            failed: false,
        }
    }

    /// Number of states this stream will yield in total.
    pub fn frame_count(&self) -> usize {
        self.end + 1
    }
}

impl Iterator for SnapshotStream<'_> {
    type Item = BoardcastResult<PlyState>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.next > self.end {
            return None;
        }
        let ply = self.next;
        let last_move = if ply == 0 {
            None
        } else {
            let mv = self.moves[ply - 1];
            match apply_move(&self.board, mv) {
                Ok(board) => {
                    self.board = board;
                    Some(mv)
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        };
        self.next += 1;
        Some(Ok(PlyState {
            ply,
            board: self.board,
            last_move,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed || self.next > self.end {
            return (0, Some(0));
        }
        let remaining = self.end - self.next + 1;
        (remaining, Some(remaining))
    }
}

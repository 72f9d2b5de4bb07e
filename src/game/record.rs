//! Validated chess move histories.

use std::str::FromStr;

use chess::{Board, ChessMove};

use crate::foundation::error::{BoardcastError, BoardcastResult};
use crate::game::snapshot::apply_move;

/// A validated, immutable chess game: the ordered moves played from the
/// standard initial position.
///
/// Every constructor replays the moves through the rules engine, so a
/// `GameRecord` can always be snapshotted at any ply without re-checking
/// legality semantics beyond the engine's own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameRecord {
    moves: Vec<ChessMove>,
}

impl GameRecord {
    /// The empty game (initial position only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from engine moves, validating them by replay.
    pub fn from_moves(moves: Vec<ChessMove>) -> BoardcastResult<Self> {
        let mut board = Board::default();
        for (i, &mv) in moves.iter().enumerate() {
            board = apply_move(&board, mv)
                .map_err(|_| BoardcastError::engine(format!("illegal move '{mv}' at ply {i}")))?;
        }
        Ok(Self { moves })
    }

    /// Parse coordinate-notation moves (`e2e4`, `e7e8q`, ...).
    pub fn from_uci<'a>(tokens: impl IntoIterator<Item = &'a str>) -> BoardcastResult<Self> {
        let mut board = Board::default();
        let mut moves = Vec::new();
        for (i, token) in tokens.into_iter().enumerate() {
            let mv = ChessMove::from_str(token).map_err(|_| {
                BoardcastError::engine(format!("unparseable move '{token}' at ply {i}"))
            })?;
            board = apply_move(&board, mv)
                .map_err(|_| BoardcastError::engine(format!("illegal move '{token}' at ply {i}")))?;
            moves.push(mv);
        }
        Ok(Self { moves })
    }

    /// Parse standard algebraic notation moves (`e4`, `Nf3`, `O-O`, ...).
    ///
    /// SAN is position-dependent, so each token is resolved against the
    /// replayed position.
    pub fn from_san<'a>(tokens: impl IntoIterator<Item = &'a str>) -> BoardcastResult<Self> {
        let mut board = Board::default();
        let mut moves = Vec::new();
        for (i, token) in tokens.into_iter().enumerate() {
            let san = normalize_san(token);
            let mv = ChessMove::from_san(&board, san).map_err(|_| {
                BoardcastError::engine(format!("invalid SAN move '{token}' at ply {i}"))
            })?;
            board = apply_move(&board, mv)
                .map_err(|_| BoardcastError::engine(format!("illegal move '{token}' at ply {i}")))?;
            moves.push(mv);
        }
        Ok(Self { moves })
    }

    /// Parse a PGN game: tag-pair lines are skipped, the movetext is
    /// tokenized (move numbers, comments, NAGs and the result token are
    /// stripped) and the remaining SAN moves are replayed.
    pub fn from_pgn(pgn: &str) -> BoardcastResult<Self> {
        let mut tokens = Vec::new();
        for line in pgn.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('[') {
                continue;
            }
            let line = strip_braced_comments(line);
            for token in line.split_whitespace() {
                if is_movetext_noise(token) {
                    continue;
                }
                // "1.e4" style: the number glues to the move.
                let token = token.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.');
                if !token.is_empty() {
                    tokens.push(token.to_string());
                }
            }
        }
        Self::from_san(tokens.iter().map(String::as_str))
    }

    /// The moves in play order.
    pub fn moves(&self) -> &[ChessMove] {
        &self.moves
    }

    /// Number of plies in the game.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether the game has no moves.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Clamp a requested ply into `[0, len]`.
    ///
    /// Requests past the end of the game resolve to the final position
    /// rather than erroring.
    pub fn clamp_ply(&self, ply: usize) -> usize {
        ply.min(self.moves.len())
    }
}

/// Drop decorations the engine's SAN parser does not expect and accept the
/// zero-style castling spelling.
fn normalize_san(token: &str) -> &str {
    let token = token.trim_end_matches(['+', '#', '!', '?']);
    match token {
        "0-0" => "O-O",
        "0-0-0" => "O-O-O",
        other => other,
    }
}

fn is_movetext_noise(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
        || token.starts_with('$')
        || token.chars().all(|c| c.is_ascii_digit() || c == '.')
}

fn strip_braced_comments(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut depth = 0usize;
    for c in line.chars() {
        match c {
            '{' | '(' => depth += 1,
            '}' | ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::{Piece, Square};

    #[test]
    fn uci_moves_parse_and_replay() {
        let record = GameRecord::from_uci(["e2e4", "e7e5", "g1f3"]).unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record.moves()[0].get_source(), Square::E2);
        assert_eq!(record.moves()[0].get_dest(), Square::E4);
    }

    #[test]
    fn uci_rejects_garbage_and_illegal_moves() {
        assert!(GameRecord::from_uci(["zz9x"]).is_err());
        // e2e5 is not a legal pawn move from the initial position.
        let err = GameRecord::from_uci(["e2e5"]).unwrap_err();
        assert!(err.to_string().contains("ply 0"));
    }

    #[test]
    fn san_moves_resolve_against_the_replayed_position() {
        let record = GameRecord::from_san(["e4", "e5", "Nf3", "Nc6"]).unwrap();
        assert_eq!(record.len(), 4);
        assert_eq!(record.moves()[2].get_dest(), Square::F3);
    }

    #[test]
    fn san_accepts_decorations_and_zero_castling() {
        let record =
            GameRecord::from_san(["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "0-0"]).unwrap();
        assert_eq!(record.len(), 7);
        assert_eq!(record.moves()[6].get_source(), Square::E1);
        assert_eq!(record.moves()[6].get_dest(), Square::G1);

        assert!(GameRecord::from_san(["e4", "d5", "exd5", "Qxd5+"]).is_ok());
    }

    #[test]
    fn pgn_movetext_is_tokenized() {
        let pgn = r#"[Event "Casual Game"]
[Result "1-0"]

1. e4 {king's pawn} e5 2. Nf3 $1 Nc6 3. Bb5 1-0"#;
        let record = GameRecord::from_pgn(pgn).unwrap();
        assert_eq!(record.len(), 5);
        let last = record.moves()[4];
        assert_eq!(last.get_dest(), Square::B5);
    }

    #[test]
    fn pgn_glued_move_numbers_are_stripped() {
        let record = GameRecord::from_pgn("1.e4 e5 2.Nf3").unwrap();
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn from_moves_validates_promotions() {
        // A bare promotion move from the initial position is illegal.
        let mv = ChessMove::new(Square::E2, Square::E8, Some(Piece::Queen));
        assert!(GameRecord::from_moves(vec![mv]).is_err());
    }

    #[test]
    fn clamp_ply_saturates_at_len() {
        let record = GameRecord::from_uci(["e2e4", "e7e5"]).unwrap();
        assert_eq!(record.clamp_ply(0), 0);
        assert_eq!(record.clamp_ply(2), 2);
        assert_eq!(record.clamp_ply(999), 2);
    }
}
//! JSON messages exchanged with the worker
//!
//! Messages are objects tagged by `type`. Bit-sets travel as eight 32-bit
//! numbers; senders that build them with signed shifts may put negative
//! values in the top bit, so both signed and unsigned words are accepted.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Pos, Stone, BOARD_SIZE};
use crate::engine::{DecisionRequest, Difficulty};
use crate::error::EngineError;

/// Messages into the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Inbound {
    FindBestMove { data: FindBestMove },
    NewGame,
    Cancel,
}

/// Payload of `FIND_BEST_MOVE`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindBestMove {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub black_bitboard: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub white_bitboard: Option<Vec<i64>>,
    /// 15 rows of `"black"`, `"white"` or null; used when bit-sets are absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<Vec<Vec<Option<String>>>>,
    pub computer_player: String,
    pub human_player: String,
    pub difficulty: String,
}

impl FindBestMove {
    pub fn from_board(board: &Board, computer: Stone, difficulty: Difficulty) -> Self {
        let words = |stone| board.stones(stone).words().iter().map(|&w| i64::from(w)).collect();
        Self {
            black_bitboard: Some(words(Stone::Black)),
            white_bitboard: Some(words(Stone::White)),
            board: None,
            computer_player: computer.to_string(),
            human_player: computer.opponent().to_string(),
            difficulty: difficulty.to_string(),
        }
    }

    /// Validate the payload into a decision request.
    ///
    /// An unknown difficulty plays the easy path.
    pub fn into_request(self) -> Result<DecisionRequest, EngineError> {
        let board = match (&self.black_bitboard, &self.white_bitboard, &self.board) {
            (Some(black), Some(white), _) => Board::from_words(&decode_words(black)?, &decode_words(white)?)?,
            (_, _, Some(rows)) => decode_grid(rows)?,
            _ => return Err(EngineError::MissingBoard),
        };

        let computer: Stone = self.computer_player.parse()?;
        let human: Stone = self.human_player.parse()?;
        let difficulty = self.difficulty.parse().unwrap_or_else(|_| {
            warn!("unknown difficulty {:?}, playing easy", self.difficulty);
            Difficulty::Easy
        });

        let request = DecisionRequest {
            board,
            computer,
            human,
            difficulty,
        };
        request.validate()?;
        Ok(request)
    }
}

fn decode_words(values: &[i64]) -> Result<Vec<u32>, EngineError> {
    values
        .iter()
        .map(|&value| {
            if (i64::from(i32::MIN)..=i64::from(u32::MAX)).contains(&value) {
                Ok(value as u32)
            } else {
                Err(EngineError::InvalidWord { value })
            }
        })
        .collect()
}

fn decode_grid(rows: &[Vec<Option<String>>]) -> Result<Board, EngineError> {
    let mut cells = Vec::with_capacity(rows.len());
    for (row, line) in rows.iter().enumerate() {
        let mut parsed = Vec::with_capacity(BOARD_SIZE);
        for (col, cell) in line.iter().enumerate() {
            parsed.push(match cell.as_deref() {
                None | Some("") => None,
                Some(value) => Some(value.parse::<Stone>().map_err(|_| EngineError::InvalidCell {
                    row,
                    col,
                    value: value.to_string(),
                })?),
            });
        }
        cells.push(parsed);
    }
    Board::from_rows(&cells)
}

/// Messages out of the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outbound {
    ProgressUpdate {
        progress: u8,
    },
    BestMoveFound {
        #[serde(rename = "move")]
        best_move: Option<Pos>,
    },
}

impl Outbound {
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Inbound {
    pub fn from_json(line: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(line)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_find_best_move() {
        let mut black = vec![0i64; 8];
        black[3] = 1 << 16; // index 112 = (7, 7)
        let msg = json!({
            "type": "FIND_BEST_MOVE",
            "data": {
                "blackBitboard": black,
                "whiteBitboard": [0, 0, 0, 0, 0, 0, 0, 0],
                "computerPlayer": "white",
                "humanPlayer": "black",
                "difficulty": "medium"
            }
        });
        let Inbound::FindBestMove { data } = Inbound::from_json(&msg.to_string()).unwrap() else {
            panic!("expected FIND_BEST_MOVE");
        };
        let request = data.into_request().unwrap();
        assert_eq!(request.computer, Stone::White);
        assert_eq!(request.difficulty, Difficulty::Medium);
        assert_eq!(request.board.get(Pos::new(7, 7)), Some(Stone::Black));
        assert_eq!(request.board.stone_count(), 1);
    }

    #[test]
    fn test_negative_words_accepted() {
        let mut white = vec![0i64; 8];
        white[0] = i64::from(i32::MIN); // bit 31 set by a signed shift
        let data = FindBestMove {
            black_bitboard: Some(vec![0; 8]),
            white_bitboard: Some(white),
            computer_player: "black".into(),
            human_player: "white".into(),
            difficulty: "hard".into(),
            ..FindBestMove::default()
        };
        let request = data.into_request().unwrap();
        assert_eq!(request.board.get(Pos::from_index(31)), Some(Stone::White));
    }

    #[test]
    fn test_out_of_range_word_rejected() {
        let data = FindBestMove {
            black_bitboard: Some(vec![1 << 40, 0, 0, 0, 0, 0, 0, 0]),
            white_bitboard: Some(vec![0; 8]),
            computer_player: "black".into(),
            human_player: "white".into(),
            difficulty: "easy".into(),
            ..FindBestMove::default()
        };
        assert!(matches!(data.into_request(), Err(EngineError::InvalidWord { .. })));
    }

    #[test]
    fn test_missing_bitboards() {
        let data = FindBestMove {
            black_bitboard: Some(vec![0; 8]),
            computer_player: "black".into(),
            human_player: "white".into(),
            difficulty: "easy".into(),
            ..FindBestMove::default()
        };
        assert!(matches!(data.into_request(), Err(EngineError::MissingBoard)));
    }

    #[test]
    fn test_grid_payload() {
        let mut rows = vec![vec![None::<String>; 15]; 15];
        rows[5][5] = Some("white".into());
        rows[6][6] = Some("black".into());
        let data = FindBestMove {
            board: Some(rows.clone()),
            computer_player: "black".into(),
            human_player: "white".into(),
            difficulty: "easy".into(),
            ..FindBestMove::default()
        };
        let board = data.into_request().unwrap().board;
        assert_eq!(board.get(Pos::new(5, 5)), Some(Stone::White));
        assert_eq!(board.get(Pos::new(6, 6)), Some(Stone::Black));

        rows[0][0] = Some("red".into());
        let bad = FindBestMove {
            board: Some(rows),
            computer_player: "black".into(),
            human_player: "white".into(),
            difficulty: "easy".into(),
            ..FindBestMove::default()
        };
        assert!(matches!(
            bad.into_request(),
            Err(EngineError::InvalidCell { row: 0, col: 0, .. })
        ));
    }

    #[test]
    fn test_short_color_names_rejected_on_the_wire() {
        let mut rows = vec![vec![None::<String>; 15]; 15];
        rows[3][4] = Some("x".into());
        let cell = FindBestMove {
            board: Some(rows),
            computer_player: "black".into(),
            human_player: "white".into(),
            difficulty: "easy".into(),
            ..FindBestMove::default()
        };
        assert!(matches!(
            cell.into_request(),
            Err(EngineError::InvalidCell { row: 3, col: 4, .. })
        ));

        let player = FindBestMove {
            black_bitboard: Some(vec![0; 8]),
            white_bitboard: Some(vec![0; 8]),
            computer_player: "b".into(),
            human_player: "white".into(),
            difficulty: "easy".into(),
            ..FindBestMove::default()
        };
        assert!(matches!(player.into_request(), Err(EngineError::InvalidColor(_))));
    }

    #[test]
    fn test_same_colors_rejected() {
        let data = FindBestMove {
            black_bitboard: Some(vec![0; 8]),
            white_bitboard: Some(vec![0; 8]),
            computer_player: "black".into(),
            human_player: "black".into(),
            difficulty: "easy".into(),
            ..FindBestMove::default()
        };
        assert!(matches!(data.into_request(), Err(EngineError::SameColors)));
    }

    #[test]
    fn test_unknown_difficulty_plays_easy() {
        let data = FindBestMove {
            black_bitboard: Some(vec![0; 8]),
            white_bitboard: Some(vec![0; 8]),
            computer_player: "black".into(),
            human_player: "white".into(),
            difficulty: "nightmare".into(),
            ..FindBestMove::default()
        };
        assert_eq!(data.into_request().unwrap().difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_control_messages() {
        assert_eq!(Inbound::from_json(r#"{"type":"NEW_GAME"}"#).unwrap(), Inbound::NewGame);
        assert_eq!(Inbound::from_json(r#"{"type":"CANCEL"}"#).unwrap(), Inbound::Cancel);
        assert!(Inbound::from_json(r#"{"type":"SHUTDOWN"}"#).is_err());
    }

    #[test]
    fn test_outbound_shape() {
        let progress = Outbound::ProgressUpdate { progress: 42 }.to_json().unwrap();
        assert_eq!(progress, r#"{"type":"PROGRESS_UPDATE","progress":42}"#);

        let found = Outbound::BestMoveFound {
            best_move: Some(Pos::new(7, 2)),
        };
        let value: serde_json::Value = serde_json::from_str(&found.to_json().unwrap()).unwrap();
        assert_eq!(value, json!({"type": "BEST_MOVE_FOUND", "move": {"row": 7, "col": 2}}));

        let none = Outbound::BestMoveFound { best_move: None }.to_json().unwrap();
        assert_eq!(none, r#"{"type":"BEST_MOVE_FOUND","move":null}"#);
    }

    #[test]
    fn test_payload_from_board() {
        let mut board = Board::new();
        board.place_stone(Pos::new(14, 14), Stone::White);
        let data = FindBestMove::from_board(&board, Stone::Black, Difficulty::Hard);
        assert_eq!(data.white_bitboard.as_ref().map(|w| w[7]), Some(1));
        let request = data.into_request().unwrap();
        assert_eq!(request.board, board);
        assert_eq!(request.human, Stone::White);
    }
}

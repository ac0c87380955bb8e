use cozy_chess::{Board, Color, Piece, Square};

use crate::record::Decoded;
use crate::DecodeError;

// Feature Layout (73 values):
//
// Squares [0-63]: signed piece code per square, A1 first, H8 last
//   [A1][B1]...[H1][A2]...[H8]
//   0 = empty, +code = white piece, -code = black piece
//
// Side to move [64-65]: one-hot (white, black)
// Castling [66-69]: white short, white long, black short, black long
// En passant [70]: 1 if the position names a target square
// Counters [71-72]: halfmove clock, fullmove counter

pub const NUM_SQUARES: usize = Square::NUM;

const FEN_FIELDS: usize = 6;
const EN_PASSANT_FIELD: usize = 3;
const HALFMOVE_FIELD: usize = 4;
const FULLMOVE_FIELD: usize = 5;
const NO_EN_PASSANT: &str = "-";

/// Mapping from piece type to the magnitude of its code.
/// White pieces use the positive code, black pieces the negated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceCodes {
    pub pawn: i8,
    pub knight: i8,
    pub bishop: i8,
    pub rook: i8,
    pub queen: i8,
    pub king: i8,
}

impl Default for PieceCodes {
    fn default() -> Self {
        Self {
            pawn: 1,
            knight: 2,
            bishop: 3,
            rook: 4,
            queen: 5,
            king: 6,
        }
    }
}

impl PieceCodes {
    #[inline(always)]
    pub fn code(&self, piece: Piece, color: Color) -> i8 {
        let magnitude = match piece {
            Piece::Pawn => self.pawn,
            Piece::Knight => self.knight,
            Piece::Bishop => self.bishop,
            Piece::Rook => self.rook,
            Piece::Queen => self.queen,
            Piece::King => self.king,
        };

        match color {
            Color::White => magnitude,
            Color::Black => -magnitude,
        }
    }
}

/// Numeric description of a single position.
///
/// `Default` is the substitute used for undecodable input: an empty board,
/// no side to move, no castling or en passant, and zeroed counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureVector {
    pub squares: [i8; NUM_SQUARES],
    pub white_to_move: bool,
    pub black_to_move: bool,
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
    pub en_passant: bool,
    pub halfmove_clock: u32,
    pub fullmove_counter: u32,
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            squares: [0; NUM_SQUARES],
            white_to_move: false,
            black_to_move: false,
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
            en_passant: false,
            halfmove_clock: 0,
            fullmove_counter: 0,
        }
    }
}

/// Decodes FEN strings into feature vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionDecoder {
    codes: PieceCodes,
}

impl PositionDecoder {
    pub fn new(codes: PieceCodes) -> Self {
        Self { codes }
    }

    pub fn decode(&self, fen: &str) -> Result<FeatureVector, DecodeError> {
        let fen = fen.trim();

        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != FEN_FIELDS {
            return Err(invalid(
                fen,
                format!("expected {} fields, found {}", FEN_FIELDS, fields.len()),
            ));
        }

        let halfmove_clock = parse_counter(fen, fields[HALFMOVE_FIELD], "halfmove clock")?;
        let fullmove_counter = parse_counter(fen, fields[FULLMOVE_FIELD], "fullmove counter")?;

        // Counters are bounded on the board side, so it only sees placement and state
        let board: Board = format!("{} 0 1", fields[..HALFMOVE_FIELD].join(" "))
            .parse()
            .map_err(|e| invalid(fen, format!("{:?}", e)))?;

        let mut squares = [0i8; NUM_SQUARES];
        for square in Square::ALL {
            if let (Some(piece), Some(color)) = (board.piece_on(square), board.color_on(square)) {
                squares[square as usize] = self.codes.code(piece, color);
            }
        }

        let side = board.side_to_move();
        let white_rights = board.castle_rights(Color::White);
        let black_rights = board.castle_rights(Color::Black);

        Ok(FeatureVector {
            squares,
            white_to_move: side == Color::White,
            black_to_move: side == Color::Black,
            white_kingside: white_rights.short.is_some(),
            white_queenside: white_rights.long.is_some(),
            black_kingside: black_rights.short.is_some(),
            black_queenside: black_rights.long.is_some(),
            // Read from the text: the board may drop a target nobody can capture on
            en_passant: fields[EN_PASSANT_FIELD] != NO_EN_PASSANT,
            halfmove_clock,
            fullmove_counter,
        })
    }

    pub fn decode_or_default(&self, fen: &str) -> Decoded<FeatureVector> {
        Decoded::from_result(self.decode(fen))
    }
}

fn parse_counter(fen: &str, field: &str, name: &str) -> Result<u32, DecodeError> {
    field
        .parse()
        .map_err(|_| invalid(fen, format!("{} '{}' is not a number", name, field)))
}

fn invalid(fen: &str, reason: String) -> DecodeError {
    DecodeError::InvalidPosition {
        fen: fen.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_start_position() {
        let features = PositionDecoder::default().decode(START_FEN).unwrap();

        assert_eq!(&features.squares[0..8], &[4, 2, 3, 5, 6, 3, 2, 4]);
        assert_eq!(&features.squares[8..16], &[1; 8]);
        assert!(features.squares[16..48].iter().all(|&c| c == 0));
        assert_eq!(&features.squares[48..56], &[-1; 8]);
        assert_eq!(&features.squares[56..64], &[-4, -2, -3, -5, -6, -3, -2, -4]);

        assert!(features.white_to_move);
        assert!(!features.black_to_move);
        assert!(features.white_kingside);
        assert!(features.white_queenside);
        assert!(features.black_kingside);
        assert!(features.black_queenside);
        assert!(!features.en_passant);
        assert_eq!(features.halfmove_clock, 0);
        assert_eq!(features.fullmove_counter, 1);
    }

    #[test]
    fn test_black_to_move_with_en_passant() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let features = PositionDecoder::default().decode(fen).unwrap();

        assert!(!features.white_to_move);
        assert!(features.black_to_move);
        assert!(features.en_passant);
        assert_eq!(features.squares[Square::E4 as usize], 1);
        assert_eq!(features.squares[Square::E2 as usize], 0);
    }

    #[test]
    fn test_partial_castling_and_counters() {
        let fen = "r3k2r/8/8/8/8/8/8/4K2R w Kq - 12 40";
        let features = PositionDecoder::default().decode(fen).unwrap();

        assert!(features.white_kingside);
        assert!(!features.white_queenside);
        assert!(!features.black_kingside);
        assert!(features.black_queenside);
        assert_eq!(features.halfmove_clock, 12);
        assert_eq!(features.fullmove_counter, 40);
    }

    #[test]
    fn test_counters_beyond_board_limits() {
        let decoder = PositionDecoder::default();

        let features = decoder.decode("4k3/8/8/8/8/8/8/4K3 w - - 120 90").unwrap();
        assert_eq!(features.halfmove_clock, 120);
        assert_eq!(features.fullmove_counter, 90);
        assert!(features.white_to_move);

        let features = decoder.decode("4k3/8/8/8/8/8/8/4K3 b - - 3 70000").unwrap();
        assert_eq!(features.halfmove_clock, 3);
        assert_eq!(features.fullmove_counter, 70000);
    }

    #[test]
    fn test_repeated_separators() {
        let features = PositionDecoder::default()
            .decode("4k3/8/8/8/8/8/8/4K3 w  -  -  3  7")
            .unwrap();

        assert_eq!(features.halfmove_clock, 3);
        assert_eq!(features.fullmove_counter, 7);
        assert!(!features.en_passant);
        assert_eq!(features.squares[Square::E1 as usize], 6);
    }

    #[test]
    fn test_no_castling_rights() {
        let features = PositionDecoder::default()
            .decode("4k3/8/8/8/8/8/8/4K3 w - - 3 57")
            .unwrap();

        assert!(!features.white_kingside);
        assert!(!features.white_queenside);
        assert!(!features.black_kingside);
        assert!(!features.black_queenside);
        assert_eq!(features.squares[Square::E1 as usize], 6);
        assert_eq!(features.squares[Square::E8 as usize], -6);
    }

    #[test]
    fn test_custom_codes() {
        let codes = PieceCodes {
            queen: 9,
            ..PieceCodes::default()
        };
        let features = PositionDecoder::new(codes).decode(START_FEN).unwrap();

        assert_eq!(features.squares[Square::D1 as usize], 9);
        assert_eq!(features.squares[Square::D8 as usize], -9);
    }

    #[test]
    fn test_invalid_positions() {
        let decoder = PositionDecoder::default();

        for fen in [
            "",
            "not a fen",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 extra",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - zero 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 -1",
        ] {
            assert!(
                matches!(decoder.decode(fen), Err(DecodeError::InvalidPosition { .. })),
                "expected '{}' to be rejected",
                fen
            );
        }
    }

    #[test]
    fn test_default_substitution() {
        let decoded = PositionDecoder::default().decode_or_default("garbage");

        assert!(!decoded.is_valid());
        assert_eq!(*decoded.value(), FeatureVector::default());
        assert!(!decoded.value().white_to_move);
        assert!(!decoded.value().black_to_move);
        assert_eq!(decoded.value().fullmove_counter, 0);
    }
}

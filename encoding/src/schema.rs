use cozy_chess::Square;

pub const EVALUATION_COLUMN: &str = "evaluation";
pub const NORMALIZED_COLUMN: &str = "evaluation_normalized";
pub const FULLMOVE_COLUMN: &str = "fullmove_counter";

const STATE_COLUMNS: [&str; 9] = [
    "is_white_to_move",
    "is_black_to_move",
    "white_kingside_castling",
    "white_queenside_castling",
    "black_kingside_castling",
    "black_queenside_castling",
    "en_passant_available",
    "halfmove_clock",
    FULLMOVE_COLUMN,
];

/// Column layout of a feature table.
///
/// Shared by the writer, the reader and anything downstream so the column
/// list exists in exactly one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Squares a1..h8, position state, then `evaluation`.
    pub fn features() -> Self {
        let mut columns: Vec<String> = Square::ALL.iter().map(|sq| sq.to_string()).collect();
        columns.extend(STATE_COLUMNS.iter().map(|c| c.to_string()));
        columns.push(EVALUATION_COLUMN.to_string());

        Self { columns }
    }

    /// Feature columns followed by `evaluation_normalized`.
    pub fn normalized() -> Self {
        let mut schema = Self::features();
        schema.columns.push(NORMALIZED_COLUMN.to_string());
        schema
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn has_normalized(&self) -> bool {
        self.columns.last().is_some_and(|c| c == NORMALIZED_COLUMN)
    }
}

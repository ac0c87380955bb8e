use std::path::PathBuf;

use encoding::RecordDecoder;

use crate::error::{DatasetError, Result};

pub const DEFAULT_RAW_INPUT: &str = "chessData.csv";
pub const DEFAULT_FEATURES_PATH: &str = "processed_chess_positions.csv";
pub const DEFAULT_NORMALIZED_OUTPUT: &str = "filtered_balanced_normalized_chess_positions.csv";
pub const DEFAULT_UNNORMALIZED_OUTPUT: &str = "filtered_balanced_chess_positions_no_normalize.csv";

pub const DEFAULT_FEN_COLUMN: &str = "FEN";
pub const DEFAULT_EVAL_COLUMN: &str = "Evaluation";
pub const DEFAULT_CHUNK_SIZE: usize = 100_000;

pub const DEFAULT_MIN_MOVE: u32 = 5;
pub const DEFAULT_MAX_MOVE: u32 = 35;
pub const DEFAULT_BIN_WIDTH: i32 = 100;
pub const DEFAULT_PER_BIN_TARGET: usize = 1000;
pub const DEFAULT_SEED: u64 = 42;

/// Settings for turning raw positions into the feature table.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub chunk_size: usize,
    pub fen_column: String,
    pub eval_column: String,
    pub decoder: RecordDecoder,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_RAW_INPUT),
            output: PathBuf::from(DEFAULT_FEATURES_PATH),
            chunk_size: DEFAULT_CHUNK_SIZE,
            fen_column: DEFAULT_FEN_COLUMN.to_string(),
            eval_column: DEFAULT_EVAL_COLUMN.to_string(),
            decoder: RecordDecoder::default(),
        }
    }
}

impl ProcessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(DatasetError::InvalidConfig(
                "chunk size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for filtering, balancing and normalizing the feature table.
#[derive(Debug, Clone)]
pub struct BalanceConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub min_move: u32,
    pub max_move: u32,
    /// Drop centipawn rows with `|evaluation|` above this. Off when `None`.
    pub eval_cap: Option<i32>,
    pub bin_width: i32,
    pub per_bin_target: usize,
    pub seed: u64,
    pub normalize: bool,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_FEATURES_PATH),
            output: PathBuf::from(DEFAULT_NORMALIZED_OUTPUT),
            min_move: DEFAULT_MIN_MOVE,
            max_move: DEFAULT_MAX_MOVE,
            eval_cap: None,
            bin_width: DEFAULT_BIN_WIDTH,
            per_bin_target: DEFAULT_PER_BIN_TARGET,
            seed: DEFAULT_SEED,
            normalize: true,
        }
    }
}

impl BalanceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_move > self.max_move {
            return Err(DatasetError::InvalidConfig(format!(
                "min move {} exceeds max move {}",
                self.min_move, self.max_move
            )));
        }
        if self.bin_width <= 0 {
            return Err(DatasetError::InvalidConfig(format!(
                "bin width must be positive, got {}",
                self.bin_width
            )));
        }
        if self.per_bin_target == 0 {
            return Err(DatasetError::InvalidConfig(
                "per-bin target must be positive".to_string(),
            ));
        }
        if let Some(cap) = self.eval_cap {
            if cap < 0 {
                return Err(DatasetError::InvalidConfig(format!(
                    "evaluation cap must be non-negative, got {}",
                    cap
                )));
            }
        }
        Ok(())
    }
}

mod error;
pub mod evaluation;
pub mod position;
pub mod record;
pub mod schema;

pub use error::DecodeError;
pub use evaluation::{is_mate_score, EvaluationParser, MATE_SCORE};
pub use position::{FeatureVector, PieceCodes, PositionDecoder, NUM_SQUARES};
pub use record::{Decoded, DecodedRecord, FeatureRecord, RecordDecoder};
pub use schema::{Schema, EVALUATION_COLUMN, FULLMOVE_COLUMN, NORMALIZED_COLUMN};

use crate::evaluation::{is_mate_score, EvaluationParser};
use crate::position::{FeatureVector, PositionDecoder};
use crate::DecodeError;

/// Outcome of a recoverable decode: either the real value, or the default
/// that replaced it together with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded<T> {
    Valid(T),
    Defaulted { value: T, error: DecodeError },
}

impl<T: Default> Decoded<T> {
    pub fn from_result(result: Result<T, DecodeError>) -> Self {
        match result {
            Ok(value) => Decoded::Valid(value),
            Err(error) => Decoded::Defaulted {
                value: T::default(),
                error,
            },
        }
    }
}

impl<T> Decoded<T> {
    pub fn value(&self) -> &T {
        match self {
            Decoded::Valid(value) | Decoded::Defaulted { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        self.into_parts().0
    }

    pub fn into_parts(self) -> (T, Option<DecodeError>) {
        match self {
            Decoded::Valid(value) => (value, None),
            Decoded::Defaulted { value, error } => (value, Some(error)),
        }
    }

    pub fn error(&self) -> Option<&DecodeError> {
        match self {
            Decoded::Valid(_) => None,
            Decoded::Defaulted { error, .. } => Some(error),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Decoded::Valid(_))
    }
}

/// One row of the feature table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureRecord {
    pub features: FeatureVector,
    pub evaluation: i32,
}

impl FeatureRecord {
    #[inline(always)]
    pub fn is_mate(&self) -> bool {
        is_mate_score(self.evaluation)
    }
}

#[derive(Debug, Clone)]
pub struct DecodedRecord {
    pub record: FeatureRecord,
    pub diagnostics: Vec<DecodeError>,
}

impl DecodedRecord {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Decodes a raw (FEN, evaluation) pair into a feature record,
/// substituting defaults for whichever half fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordDecoder {
    positions: PositionDecoder,
    evaluations: EvaluationParser,
}

impl RecordDecoder {
    pub fn new(positions: PositionDecoder, evaluations: EvaluationParser) -> Self {
        Self {
            positions,
            evaluations,
        }
    }

    pub fn decode(&self, fen: &str, token: &str) -> DecodedRecord {
        let (features, position_error) = self.positions.decode_or_default(fen).into_parts();
        let (evaluation, evaluation_error) =
            self.evaluations.parse_or_default(token).into_parts();

        DecodedRecord {
            record: FeatureRecord {
                features,
                evaluation,
            },
            diagnostics: position_error.into_iter().chain(evaluation_error).collect(),
        }
    }
}

use crate::record::Decoded;
use crate::DecodeError;

/// Evaluation substituted for a forced mate. The sign names the winning side.
pub const MATE_SCORE: i32 = 20_000;

const MATE_MARKER: char = '#';

#[inline(always)]
pub fn is_mate_score(evaluation: i32) -> bool {
    evaluation == MATE_SCORE || evaluation == -MATE_SCORE
}

/// Parses engine evaluation tokens.
///
/// Accepts centipawn integers (`"123"`, `"+56"`, `"-45"`) and mate tokens
/// (`"#+5"`, `"#-3"`). Mate tokens collapse to `±MATE_SCORE`; the distance
/// is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvaluationParser;

impl EvaluationParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, token: &str) -> Result<i32, DecodeError> {
        let token = token.trim();

        match token.strip_prefix(MATE_MARKER) {
            Some(mate) => parse_mate(mate).ok_or_else(|| unparseable(token)),
            None => token.parse::<i32>().map_err(|_| unparseable(token)),
        }
    }

    pub fn parse_or_default(&self, token: &str) -> Decoded<i32> {
        Decoded::from_result(self.parse(token))
    }
}

fn parse_mate(mate: &str) -> Option<i32> {
    let (sign, distance) = if let Some(rest) = mate.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = mate.strip_prefix('-') {
        (-1, rest)
    } else {
        return None;
    };

    if distance.is_empty() || !distance.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(sign * MATE_SCORE)
}

fn unparseable(token: &str) -> DecodeError {
    DecodeError::UnparseableEvaluation {
        token: token.to_string(),
    }
}

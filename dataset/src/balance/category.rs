use std::fmt;

use encoding::FeatureRecord;
use rand::Rng;

use crate::error::{DatasetError, Result};
use crate::sampling::downsample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    WhiteWinning,
    BlackWinning,
    Neutral,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "white_to_move"),
            Side::Black => write!(f, "black_to_move"),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::WhiteWinning => write!(f, "white_winning"),
            Outcome::BlackWinning => write!(f, "black_winning"),
            Outcome::Neutral => write!(f, "neutral"),
        }
    }
}

pub type Category = (Side, Outcome);

/// Every stratum the partition can produce, in sampling order.
pub const CATEGORIES: [Category; 6] = [
    (Side::White, Outcome::WhiteWinning),
    (Side::White, Outcome::BlackWinning),
    (Side::White, Outcome::Neutral),
    (Side::Black, Outcome::WhiteWinning),
    (Side::Black, Outcome::BlackWinning),
    (Side::Black, Outcome::Neutral),
];

/// Stratum of a centipawn record. Rows without a white-to-move flag
/// (including defaulted ones) count as black to move.
pub fn category_of(record: &FeatureRecord) -> Category {
    let side = if record.features.white_to_move {
        Side::White
    } else {
        Side::Black
    };

    let outcome = match record.evaluation {
        e if e > 0 => Outcome::WhiteWinning,
        e if e < 0 => Outcome::BlackWinning,
        _ => Outcome::Neutral,
    };

    (side, outcome)
}

fn category_slot(category: Category) -> usize {
    let side = match category.0 {
        Side::White => 0,
        Side::Black => 3,
    };
    let outcome = match category.1 {
        Outcome::WhiteWinning => 0,
        Outcome::BlackWinning => 1,
        Outcome::Neutral => 2,
    };
    side + outcome
}

#[derive(Debug, Clone)]
pub struct CategoryBalance {
    pub records: Vec<FeatureRecord>,
    /// Checkmate rows split off before filtering. Not part of `records`.
    pub mates: Vec<FeatureRecord>,
    pub after_move_filter: usize,
    pub after_cap_filter: usize,
    pub group_sizes: [(Category, usize); 6],
    pub target: usize,
}

/// Filters centipawn rows by move number and evaluation magnitude, then
/// downsamples every (side to move, outcome) group to the smallest group's size.
#[derive(Debug, Clone, Copy)]
pub struct CategoryBalancer {
    min_move: u32,
    max_move: u32,
    eval_cap: Option<i32>,
}

impl CategoryBalancer {
    pub fn new(min_move: u32, max_move: u32, eval_cap: Option<i32>) -> Self {
        Self {
            min_move,
            max_move,
            eval_cap,
        }
    }

    pub fn balance<R: Rng + ?Sized>(
        &self,
        records: &[FeatureRecord],
        rng: &mut R,
    ) -> Result<CategoryBalance> {
        let (mates, centipawns): (Vec<FeatureRecord>, Vec<FeatureRecord>) =
            records.iter().partition(|r| r.is_mate());
        log::info!(
            "Separated {} checkmate positions and {} centipawn positions",
            mates.len(),
            centipawns.len()
        );

        let moves = self.min_move..=self.max_move;
        let filtered: Vec<FeatureRecord> = centipawns
            .into_iter()
            .filter(|r| moves.contains(&r.features.fullmove_counter))
            .collect();
        let after_move_filter = filtered.len();
        log::info!(
            "After move filter [{}, {}]: {} positions",
            self.min_move,
            self.max_move,
            after_move_filter
        );

        let filtered: Vec<FeatureRecord> = match self.eval_cap {
            Some(cap) => {
                let kept: Vec<FeatureRecord> = filtered
                    .into_iter()
                    .filter(|r| r.evaluation.unsigned_abs() <= cap.unsigned_abs())
                    .collect();
                log::info!(
                    "After evaluation cap [-{}, {}]: {} positions",
                    cap,
                    cap,
                    kept.len()
                );
                kept
            }
            None => filtered,
        };
        let after_cap_filter = filtered.len();

        let mut groups: [Vec<usize>; 6] = Default::default();
        for (i, record) in filtered.iter().enumerate() {
            groups[category_slot(category_of(record))].push(i);
        }

        let mut group_sizes = [(CATEGORIES[0], 0); 6];
        for (slot, category) in CATEGORIES.iter().enumerate() {
            group_sizes[slot] = (*category, groups[slot].len());
            log::info!(
                "  Group ({}, {}): {} positions",
                category.0,
                category.1,
                groups[slot].len()
            );
        }

        if let Some(slot) = groups.iter().position(Vec::is_empty) {
            let (side, outcome) = CATEGORIES[slot];
            return Err(DatasetError::EmptyCategory { side, outcome });
        }

        let target = groups.iter().map(Vec::len).min().unwrap_or(0);
        log::info!("Positions per category after balancing: {}", target);

        let mut keep: Vec<usize> = Vec::with_capacity(target * groups.len());
        for group in &groups {
            keep.extend(downsample(group, target, rng));
        }
        keep.sort_unstable();

        let balanced: Vec<FeatureRecord> = keep.into_iter().map(|i| filtered[i]).collect();
        log::info!("After category balance: {} positions", balanced.len());

        Ok(CategoryBalance {
            records: balanced,
            mates,
            after_move_filter,
            after_cap_filter,
            group_sizes,
            target,
        })
    }
}

use ahash::AHashMap;
use encoding::FeatureRecord;
use rand::Rng;

use crate::error::{DatasetError, Result};
use crate::sampling::downsample;

/// Row counts of one evaluation bin, covering `[lower, lower + width)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinCount {
    pub index: usize,
    pub lower: i64,
    pub before: usize,
    pub after: usize,
}

#[derive(Debug, Clone)]
pub struct BinBalance {
    pub records: Vec<FeatureRecord>,
    /// Non-empty bins in ascending order.
    pub bins: Vec<BinCount>,
}

/// Fixed-width evaluation bins anchored at the lowest observed evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinLayout {
    width: i64,
    first: i64,
    last: i64,
}

impl BinLayout {
    /// Bin 0 holds the minimum, the last bin holds the maximum.
    pub fn fit(records: &[FeatureRecord], width: i32) -> Result<Self> {
        let width = i64::from(width);
        let min = records.iter().map(|r| r.evaluation).min().ok_or(DatasetError::EmptyBin)?;
        let max = records.iter().map(|r| r.evaluation).max().ok_or(DatasetError::EmptyBin)?;

        Ok(Self {
            width,
            first: i64::from(min).div_euclid(width),
            last: i64::from(max).div_euclid(width),
        })
    }

    #[inline(always)]
    pub fn index(&self, evaluation: i32) -> usize {
        (i64::from(evaluation).div_euclid(self.width) - self.first) as usize
    }

    pub fn lower(&self, index: usize) -> i64 {
        (self.first + index as i64) * self.width
    }

    pub fn len(&self) -> usize {
        (self.last - self.first + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Caps the row count of every evaluation bin at `target`.
#[derive(Debug, Clone, Copy)]
pub struct BinBalancer {
    width: i32,
    target: usize,
}

impl BinBalancer {
    pub fn new(width: i32, target: usize) -> Self {
        Self { width, target }
    }

    pub fn balance<R: Rng + ?Sized>(
        &self,
        records: &[FeatureRecord],
        rng: &mut R,
    ) -> Result<BinBalance> {
        let layout = BinLayout::fit(records, self.width)?;

        let mut members: AHashMap<usize, Vec<usize>> = AHashMap::new();
        for (i, record) in records.iter().enumerate() {
            members.entry(layout.index(record.evaluation)).or_default().push(i);
        }

        let mut occupied: Vec<usize> = members.keys().copied().collect();
        occupied.sort_unstable();

        log::info!(
            "Balancing {} of {} evaluation bins ({} wide) to at most {} positions each",
            occupied.len(),
            layout.len(),
            self.width,
            self.target
        );

        let mut keep = Vec::new();
        let mut bins = Vec::with_capacity(occupied.len());
        for index in occupied {
            let group = &members[&index];
            let kept = downsample(group, self.target, rng);

            log::debug!(
                "  Bin [{}, {}): {} -> {}",
                layout.lower(index),
                layout.lower(index) + i64::from(self.width),
                group.len(),
                kept.len()
            );

            bins.push(BinCount {
                index,
                lower: layout.lower(index),
                before: group.len(),
                after: kept.len(),
            });
            keep.extend(kept);
        }
        keep.sort_unstable();

        let records: Vec<FeatureRecord> = keep.into_iter().map(|i| records[i]).collect();
        log::info!("After evaluation distribution balance: {} positions", records.len());

        Ok(BinBalance { records, bins })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::synthetic;
    use rand::{rngs::StdRng, SeedableRng};

    fn with_evaluations(evaluations: &[i32]) -> Vec<FeatureRecord> {
        evaluations
            .iter()
            .enumerate()
            .map(|(i, &e)| synthetic(i % 2 == 0, e, 10))
            .collect()
    }

    #[test]
    fn test_layout_tiles_observed_range() {
        let records = with_evaluations(&[-250, -1, 0, 99, 100, 340]);
        let layout = BinLayout::fit(&records, 100).unwrap();

        assert_eq!(layout.len(), 7);
        assert_eq!(layout.index(-250), 0);
        assert_eq!(layout.lower(0), -300);
        assert_eq!(layout.index(-1), 2);
        assert_eq!(layout.index(0), 3);
        assert_eq!(layout.index(99), 3);
        assert_eq!(layout.index(100), 4);
        assert_eq!(layout.index(340), 6);
    }

    #[test]
    fn test_max_on_bin_boundary() {
        let records = with_evaluations(&[0, 200]);
        let layout = BinLayout::fit(&records, 100).unwrap();
        assert_eq!(layout.len(), 3);
        assert_eq!(layout.index(200), 2);
    }

    #[test]
    fn test_empty_input_is_fatal() {
        let err = BinBalancer::new(100, 10)
            .balance(&[], &mut StdRng::seed_from_u64(42))
            .unwrap_err();
        assert!(matches!(err, DatasetError::EmptyBin));
    }

    #[test]
    fn test_bins_capped_at_target() {
        let mut evaluations = Vec::new();
        evaluations.extend(std::iter::repeat(5).take(50)); // bin [0, 100)
        evaluations.extend(std::iter::repeat(-150).take(3)); // bin [-200, -100)
        evaluations.extend(std::iter::repeat(720).take(10)); // bin [700, 800)
        let records = with_evaluations(&evaluations);

        let result = BinBalancer::new(100, 10)
            .balance(&records, &mut StdRng::seed_from_u64(42))
            .unwrap();

        assert_eq!(result.records.len(), 23);
        assert_eq!(
            result.bins.iter().map(|b| (b.lower, b.before, b.after)).collect::<Vec<_>>(),
            vec![(-200, 3, 3), (0, 50, 10), (700, 10, 10)]
        );
        assert_eq!(result.records.iter().filter(|r| r.evaluation == -150).count(), 3);
        assert_eq!(result.records.iter().filter(|r| r.evaluation == 720).count(), 10);
    }

    #[test]
    fn test_small_bins_keep_identical_rows() {
        let records = with_evaluations(&[-20, 30, 150, 160, 170, 520]);
        let result = BinBalancer::new(100, 3)
            .balance(&records, &mut StdRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(result.records, records);
    }

    #[test]
    fn test_same_seed_same_rows() {
        let evaluations: Vec<i32> = (0..2000).map(|i| (i * 37) % 900 - 450).collect();
        let records = with_evaluations(&evaluations);

        let a = BinBalancer::new(50, 20)
            .balance(&records, &mut StdRng::seed_from_u64(42))
            .unwrap();
        let b = BinBalancer::new(50, 20)
            .balance(&records, &mut StdRng::seed_from_u64(42))
            .unwrap();

        assert_eq!(a.records, b.records);
        assert!(a.bins.iter().all(|bin| bin.after <= 20));
    }
}

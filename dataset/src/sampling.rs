use rand::seq::index;
use rand::Rng;

/// Picks `amount` of `indices` uniformly without replacement.
///
/// Groups at or below `amount` come back whole. The result keeps the
/// relative order of `indices`, so sorted input gives sorted output.
pub fn downsample<R: Rng + ?Sized>(indices: &[usize], amount: usize, rng: &mut R) -> Vec<usize> {
    if indices.len() <= amount {
        return indices.to_vec();
    }

    let mut positions = index::sample(rng, indices.len(), amount).into_vec();
    positions.sort_unstable();

    positions.into_iter().map(|i| indices[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_small_group_untouched() {
        let mut rng = StdRng::seed_from_u64(42);
        let indices = vec![3, 7, 9];
        assert_eq!(downsample(&indices, 3, &mut rng), indices);
        assert_eq!(downsample(&indices, 10, &mut rng), indices);
    }

    #[test]
    fn test_exact_size_without_duplicates() {
        let mut rng = StdRng::seed_from_u64(42);
        let indices: Vec<usize> = (100..200).collect();
        let picked = downsample(&indices, 25, &mut rng);

        assert_eq!(picked.len(), 25);
        assert!(picked.windows(2).all(|w| w[0] < w[1]));
        assert!(picked.iter().all(|i| (100..200).contains(i)));
    }

    #[test]
    fn test_same_seed_same_pick() {
        let indices: Vec<usize> = (0..1000).collect();
        let a = downsample(&indices, 10, &mut StdRng::seed_from_u64(7));
        let b = downsample(&indices, 10, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}

mod bins;
mod category;

pub use bins::{BinBalance, BinBalancer, BinCount, BinLayout};
pub use category::{
    category_of, Category, CategoryBalance, CategoryBalancer, Outcome, Side, CATEGORIES,
};

use encoding::{FeatureRecord, Schema};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::BalanceConfig;
use crate::error::Result;
use crate::normalize::normalize;
use crate::table::{read_table_file, TableWriter};

/// What each balancing stage kept.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceReport {
    pub input_rows: usize,
    pub mates_set_aside: usize,
    pub after_move_filter: usize,
    pub after_cap_filter: usize,
    pub group_sizes: [(Category, usize); 6],
    pub category_target: usize,
    pub after_category_balance: usize,
    pub bins: Vec<BinCount>,
    pub after_bin_balance: usize,
    pub normalization_bounds: Option<(i32, i32)>,
}

impl BalanceReport {
    pub fn log(&self) {
        log::info!("Input rows: {}", self.input_rows);
        log::info!("Checkmate rows set aside: {}", self.mates_set_aside);
        log::info!("Category target: {}", self.category_target);
        log::info!("Evaluation bins: {}", self.bins.len());
        log::info!("Final dataset size: {}", self.after_bin_balance);
        if let Some((min, max)) = self.normalization_bounds {
            log::info!("Normalized evaluation range [{}, {}] to [-1, 1]", min, max);
        }
    }
}

#[derive(Debug, Clone)]
pub struct Balanced {
    pub records: Vec<FeatureRecord>,
    /// Scaled evaluations, one per record, when normalization ran.
    pub normalized: Option<Vec<f64>>,
    pub report: BalanceReport,
}

/// Runs category balancing, bin balancing and, if configured, normalization.
/// Every sampling call draws from `rng`, in a fixed order.
pub fn balance_records<R: Rng + ?Sized>(
    records: &[FeatureRecord],
    config: &BalanceConfig,
    rng: &mut R,
) -> Result<Balanced> {
    config.validate()?;

    let categories = CategoryBalancer::new(config.min_move, config.max_move, config.eval_cap)
        .balance(records, rng)?;

    let binned =
        BinBalancer::new(config.bin_width, config.per_bin_target).balance(&categories.records, rng)?;

    let (normalized, normalization_bounds) = if config.normalize {
        log::info!("Normalizing evaluation column...");
        let (scaler, scaled) = normalize(&binned.records)?;
        (Some(scaled), Some(scaler.bounds()))
    } else {
        (None, None)
    };

    let report = BalanceReport {
        input_rows: records.len(),
        mates_set_aside: categories.mates.len(),
        after_move_filter: categories.after_move_filter,
        after_cap_filter: categories.after_cap_filter,
        group_sizes: categories.group_sizes,
        category_target: categories.target,
        after_category_balance: categories.records.len(),
        after_bin_balance: binned.records.len(),
        bins: binned.bins,
        normalization_bounds,
    };

    Ok(Balanced {
        records: binned.records,
        normalized,
        report,
    })
}

/// Reads `config.input`, balances it, and writes `config.output`.
/// Nothing is written unless every stage succeeds.
pub fn run(config: &BalanceConfig) -> Result<BalanceReport> {
    config.validate()?;

    log::info!("Loading {:?}...", config.input);
    let records = read_table_file(&config.input)?;
    log::info!("Loaded {} rows", records.len());

    let mut rng = StdRng::seed_from_u64(config.seed);
    let balanced = balance_records(&records, config, &mut rng)?;

    log::info!("Saving balanced data to {:?}...", config.output);
    match &balanced.normalized {
        Some(scaled) => {
            let mut writer = TableWriter::create(&config.output, Schema::normalized())?;
            for (record, &value) in balanced.records.iter().zip(scaled) {
                writer.write_normalized(record, value)?;
            }
            writer.flush()?;
        }
        None => {
            let mut writer = TableWriter::create(&config.output, Schema::features())?;
            for record in &balanced.records {
                writer.write(record)?;
            }
            writer.flush()?;
        }
    }

    Ok(balanced.report)
}

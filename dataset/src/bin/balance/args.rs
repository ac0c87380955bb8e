use clap::Parser;
use dataset::config::{
    DEFAULT_BIN_WIDTH, DEFAULT_FEATURES_PATH, DEFAULT_MAX_MOVE, DEFAULT_MIN_MOVE,
    DEFAULT_NORMALIZED_OUTPUT, DEFAULT_PER_BIN_TARGET, DEFAULT_SEED, DEFAULT_UNNORMALIZED_OUTPUT,
};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "Chess Dataset Balancer")]
#[command(author = "Jørgen Hanssen <jorgen@hanssen.io>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Feature table written by `process`
    #[arg(long, default_value = DEFAULT_FEATURES_PATH)]
    pub input: PathBuf,

    /// Defaults depend on whether the evaluation is normalized
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_MIN_MOVE)]
    pub min_move: u32,

    #[arg(long, default_value_t = DEFAULT_MAX_MOVE)]
    pub max_move: u32,

    /// Drop centipawn rows whose absolute evaluation exceeds this
    #[arg(long)]
    pub eval_cap: Option<i32>,

    #[arg(long, default_value_t = DEFAULT_BIN_WIDTH)]
    pub bin_width: i32,

    #[arg(long, default_value_t = DEFAULT_PER_BIN_TARGET)]
    pub per_bin_target: usize,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Keep raw centipawns and skip the normalized column
    #[arg(long)]
    pub no_normalize: bool,

    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,

    /// Also write the log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn output(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None if self.no_normalize => PathBuf::from(DEFAULT_UNNORMALIZED_OUTPUT),
            None => PathBuf::from(DEFAULT_NORMALIZED_OUTPUT),
        }
    }
}

mod args;

use args::Args;
use clap::Parser;
use dataset::{balance, BalanceConfig};
use simplelog::{CombinedLogger, Config, SharedLogger, SimpleLogger, WriteLogger};
use std::{error::Error, fs::File};

fn main() -> Result<(), Box<dyn Error>> {
    let args = init()?;

    let config = BalanceConfig {
        output: args.output(),
        input: args.input,
        min_move: args.min_move,
        max_move: args.max_move,
        eval_cap: args.eval_cap,
        bin_width: args.bin_width,
        per_bin_target: args.per_bin_target,
        seed: args.seed,
        normalize: !args.no_normalize,
    };

    let report = balance::run(&config)?;
    report.log();

    log::info!("Balanced data saved to {:?}", config.output);

    Ok(())
}

fn init() -> Result<Args, Box<dyn Error>> {
    let args = Args::parse();

    let mut loggers: Vec<Box<dyn SharedLogger>> =
        vec![SimpleLogger::new(args.log_level, Config::default())];
    if let Some(path) = &args.log_file {
        loggers.push(WriteLogger::new(
            args.log_level,
            Config::default(),
            File::create(path)?,
        ));
    }
    CombinedLogger::init(loggers)?;

    Ok(args)
}

mod args;

use args::Args;
use clap::Parser;
use dataset::{pipeline, ProcessConfig};
use simplelog::{CombinedLogger, Config, SharedLogger, SimpleLogger, WriteLogger};
use std::{
    error::Error,
    fs::File,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

fn main() -> Result<(), Box<dyn Error>> {
    let args = init()?;

    let threads = args.threads.unwrap_or_else(num_cpus::get);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()?;

    // Set up SIGINT handler
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_handler = Arc::clone(&stop_flag);

    ctrlc::set_handler(move || {
        log::info!("Received SIGINT, stopping after the current chunk...");
        stop_flag_handler.store(true, Ordering::Relaxed);
    })?;

    let config = ProcessConfig {
        input: args.input,
        output: args.output,
        chunk_size: args.chunk_size,
        fen_column: args.fen_column,
        eval_column: args.eval_column,
        ..ProcessConfig::default()
    };

    log::info!(
        "Processing {:?} in chunks of {} rows on {} threads",
        config.input,
        config.chunk_size,
        threads
    );

    let stats = pipeline::run(&config, &stop_flag)?;
    stats.log();

    log::info!("Processed data saved to {:?}", config.output);

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

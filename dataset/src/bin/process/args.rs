use clap::Parser;
use dataset::config::{
    DEFAULT_CHUNK_SIZE, DEFAULT_EVAL_COLUMN, DEFAULT_FEATURES_PATH, DEFAULT_FEN_COLUMN,
    DEFAULT_RAW_INPUT,
};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "Chess Position Processor")]
#[command(author = "Jørgen Hanssen <jorgen@hanssen.io>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Raw positions CSV with a FEN column and an evaluation column
    #[arg(long, default_value = DEFAULT_RAW_INPUT)]
    pub input: PathBuf,

    #[arg(long, default_value = DEFAULT_FEATURES_PATH)]
    pub output: PathBuf,

    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    #[arg(long, default_value = DEFAULT_FEN_COLUMN)]
    pub fen_column: String,

    #[arg(long, default_value = DEFAULT_EVAL_COLUMN)]
    pub eval_column: String,

    /// Decoding threads (defaults to the number of CPUs)
    #[arg(long)]
    pub threads: Option<usize>,

    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,

    /// Also write the log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

use hyperloglogplus::{HyperLogLog, HyperLogLogPlus};
use rayon::prelude::*;
use std::collections::hash_map::RandomState;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use csv::StringRecord;
use encoding::{DecodeError, DecodedRecord, Schema};

use crate::config::ProcessConfig;
use crate::error::{DatasetError, Result};
use crate::progress::StreamProgressBar;
use crate::table::TableWriter;

const HLL_PRECISION: u8 = 16;

/// Counters collected while streaming raw positions into the feature table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessStats {
    pub rows: u64,
    pub chunks: u64,
    pub invalid_positions: u64,
    pub unparseable_evaluations: u64,
    pub mates: u64,
    pub unique_positions: u64,
    pub interrupted: bool,
}

impl ProcessStats {
    pub fn log(&self) {
        log::info!("Rows written: {}", self.rows);
        log::info!("Chunks: {}", self.chunks);
        log::info!("Invalid positions (defaulted): {}", self.invalid_positions);
        log::info!(
            "Unparseable evaluations (defaulted): {}",
            self.unparseable_evaluations
        );
        log::info!("Checkmate evaluations: {}", self.mates);
        if self.rows > 0 {
            log::info!(
                "Unique positions: ~{:.2}%",
                (self.unique_positions as f64 / self.rows as f64) * 100.0
            );
        }
        if self.interrupted {
            log::warn!("Run was interrupted; output holds the rows processed so far");
        }
    }

    fn register(&mut self, row_number: u64, decoded: &DecodedRecord) {
        for diagnostic in &decoded.diagnostics {
            log::warn!("Row {}: {}, substituting default", row_number, diagnostic);
            match diagnostic {
                DecodeError::InvalidPosition { .. } => self.invalid_positions += 1,
                DecodeError::UnparseableEvaluation { .. } => self.unparseable_evaluations += 1,
            }
        }

        if decoded.record.is_mate() {
            self.mates += 1;
        }
    }
}

/// Streams `config.input` into the feature table at `config.output`.
///
/// Setting `stop` ends the run after the chunk in flight has been written.
pub fn run(config: &ProcessConfig, stop: &AtomicBool) -> Result<ProcessStats> {
    config.validate()?;

    let file = File::open(&config.input).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DatasetError::InputNotFound(config.input.clone()),
        _ => DatasetError::Io(e),
    })?;
    let total_bytes = file.metadata()?.len();

    let output = BufWriter::new(File::create(&config.output)?);
    let progress = StreamProgressBar::new(total_bytes);

    let stats = transform(BufReader::new(file), output, config, stop, Some(&progress))?;

    progress.finish();
    Ok(stats)
}

/// Reads `config.chunk_size` rows at a time, decodes them, and appends the
/// resulting feature rows to `output` before reading on. Row order is kept.
pub fn transform<R: Read, W: Write>(
    input: R,
    output: W,
    config: &ProcessConfig,
    stop: &AtomicBool,
    progress: Option<&StreamProgressBar>,
) -> Result<ProcessStats> {
    config.validate()?;

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers = reader.headers()?.clone();
    let fen_idx = column_index(&headers, &config.fen_column)?;
    let eval_idx = column_index(&headers, &config.eval_column)?;

    let mut writer = TableWriter::new(output, Schema::features())?;
    let mut stats = ProcessStats::default();
    let mut unique_fens: HyperLogLogPlus<String, RandomState> =
        HyperLogLogPlus::new(HLL_PRECISION, RandomState::new()).unwrap();

    let mut chunk: Vec<StringRecord> = Vec::with_capacity(config.chunk_size);

    loop {
        chunk.clear();
        for result in reader.records().take(config.chunk_size) {
            chunk.push(result?);
        }
        if chunk.is_empty() {
            break;
        }

        // Rows are independent; collect keeps input order
        let decoded: Vec<DecodedRecord> = chunk
            .par_iter()
            .map(|row| {
                config.decoder.decode(
                    row.get(fen_idx).unwrap_or_default(),
                    row.get(eval_idx).unwrap_or_default(),
                )
            })
            .collect();

        for (offset, (row, decoded)) in chunk.iter().zip(&decoded).enumerate() {
            stats.register(stats.rows + offset as u64 + 1, decoded);
            unique_fens.insert(&row.get(fen_idx).unwrap_or_default().trim().to_string());
            writer.write(&decoded.record)?;
        }
        writer.flush()?;

        stats.rows = writer.rows();
        stats.chunks += 1;
        log::debug!(
            "Finished chunk {} ({} rows total)",
            stats.chunks,
            stats.rows
        );

        if let Some(progress) = progress {
            progress.update(reader.position().byte(), stats.rows);
        }

        if chunk.len() < config.chunk_size {
            break;
        }
        if stop.load(Ordering::Relaxed) {
            stats.interrupted = true;
            break;
        }
    }
    writer.flush()?;

    stats.unique_positions = unique_fens.count().round() as u64;
    Ok(stats)
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
}

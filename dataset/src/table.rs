use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use csv::StringRecord;
use encoding::{FeatureRecord, FeatureVector, Schema, NUM_SQUARES};

use crate::error::{DatasetError, Result};

const MISSING: &str = "<none>";

/// Writes feature rows under a fixed schema. The header goes out once, on creation.
pub struct TableWriter<W: Write> {
    writer: csv::Writer<W>,
    schema: Schema,
    fields: Vec<String>,
    rows: u64,
}

impl TableWriter<BufWriter<File>> {
    pub fn create(path: &Path, schema: Schema) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), schema)
    }
}

impl<W: Write> TableWriter<W> {
    pub fn new(inner: W, schema: Schema) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(inner);
        writer.write_record(schema.columns())?;

        Ok(Self {
            writer,
            fields: Vec::with_capacity(schema.len()),
            schema,
            rows: 0,
        })
    }

    pub fn write(&mut self, record: &FeatureRecord) -> Result<()> {
        debug_assert!(!self.schema.has_normalized());

        self.fields.clear();
        push_fields(record, &mut self.fields);
        self.writer.write_record(&self.fields)?;
        self.rows += 1;
        Ok(())
    }

    pub fn write_normalized(&mut self, record: &FeatureRecord, normalized: f64) -> Result<()> {
        debug_assert!(self.schema.has_normalized());

        self.fields.clear();
        push_fields(record, &mut self.fields);
        self.fields.push(normalized.to_string());
        self.writer.write_record(&self.fields)?;
        self.rows += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| DatasetError::Io(e.into_error()))
    }
}

fn push_fields(record: &FeatureRecord, out: &mut Vec<String>) {
    let f = &record.features;

    out.extend(f.squares.iter().map(|code| code.to_string()));
    for flag in [
        f.white_to_move,
        f.black_to_move,
        f.white_kingside,
        f.white_queenside,
        f.black_kingside,
        f.black_queenside,
        f.en_passant,
    ] {
        out.push(u8::from(flag).to_string());
    }
    out.push(f.halfmove_clock.to_string());
    out.push(f.fullmove_counter.to_string());
    out.push(record.evaluation.to_string());
}

pub fn read_table_file(path: &Path) -> Result<Vec<FeatureRecord>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DatasetError::InputNotFound(path.to_path_buf()),
        _ => DatasetError::Io(e),
    })?;
    read_table(BufReader::new(file))
}

/// Reads a feature table, with or without the normalized column.
/// The normalized column is not carried into the records.
pub fn read_table<R: Read>(input: R) -> Result<Vec<FeatureRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let schema = check_header(reader.headers()?)?;

    let mut records = Vec::new();
    let mut row = StringRecord::new();
    let mut row_number = 0u64;

    while reader.read_record(&mut row)? {
        row_number += 1;
        if row.len() != schema.len() {
            return Err(malformed(
                row_number,
                format!("expected {} fields, found {}", schema.len(), row.len()),
            ));
        }
        records.push(parse_row(&row, row_number)?);
    }

    Ok(records)
}

fn check_header(headers: &StringRecord) -> Result<Schema> {
    for schema in [Schema::features(), Schema::normalized()] {
        if headers.iter().eq(schema.columns().iter().map(String::as_str)) {
            return Ok(schema);
        }
    }

    let expected = Schema::features();
    let column = expected
        .columns()
        .iter()
        .zip(headers.iter())
        .position(|(e, h)| e != h)
        .unwrap_or_else(|| expected.len().min(headers.len()));

    Err(DatasetError::SchemaMismatch {
        column,
        expected: expected
            .columns()
            .get(column)
            .map_or(MISSING, String::as_str)
            .to_string(),
        found: headers.get(column).unwrap_or(MISSING).to_string(),
    })
}

fn parse_row(row: &StringRecord, row_number: u64) -> Result<FeatureRecord> {
    let mut squares = [0i8; NUM_SQUARES];
    for (i, square) in squares.iter_mut().enumerate() {
        let code: i8 = parse_field(row, i, row_number)?;
        if !(-6..=6).contains(&code) {
            return Err(malformed(
                row_number,
                format!("piece code {} out of range in column {}", code, i),
            ));
        }
        *square = code;
    }

    let flag = |i: usize| -> Result<bool> {
        match parse_field::<u8>(row, i, row_number)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(malformed(
                row_number,
                format!("flag in column {} must be 0 or 1, found {}", i, other),
            )),
        }
    };

    let state = NUM_SQUARES;
    let features = FeatureVector {
        squares,
        white_to_move: flag(state)?,
        black_to_move: flag(state + 1)?,
        white_kingside: flag(state + 2)?,
        white_queenside: flag(state + 3)?,
        black_kingside: flag(state + 4)?,
        black_queenside: flag(state + 5)?,
        en_passant: flag(state + 6)?,
        halfmove_clock: parse_field(row, state + 7, row_number)?,
        fullmove_counter: parse_field(row, state + 8, row_number)?,
    };

    Ok(FeatureRecord {
        features,
        evaluation: parse_field(row, state + 9, row_number)?,
    })
}

fn parse_field<T: std::str::FromStr>(row: &StringRecord, i: usize, row_number: u64) -> Result<T> {
    let text = row.get(i).unwrap_or_default();
    text.trim().parse().map_err(|_| {
        malformed(
            row_number,
            format!("cannot parse '{}' in column {}", text, i),
        )
    })
}

fn malformed(row: u64, reason: String) -> DatasetError {
    DatasetError::MalformedRow { row, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::{decode, START_FEN};

    fn write_table(records: &[FeatureRecord]) -> Vec<u8> {
        let mut writer = TableWriter::new(Vec::new(), Schema::features()).unwrap();
        for record in records {
            writer.write(record).unwrap();
        }
        writer.into_inner().unwrap()
    }

    #[test]
    fn test_header_and_row_layout() {
        let record = decode(START_FEN, "+17");
        let bytes = write_table(&[record]);
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("a1,b1,c1"));
        assert!(header.ends_with("halfmove_clock,fullmove_counter,evaluation"));

        let row = lines.next().unwrap();
        assert!(row.starts_with("4,2,3,5,6,3,2,4,1,1,"));
        assert!(row.ends_with(",1,0,1,1,1,1,0,0,1,17"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_read_back() {
        let records = vec![
            decode(START_FEN, "-45"),
            decode("r3k2r/8/8/8/8/8/8/4K2R b Kq - 12 40", "#+3"),
            decode("garbage", "0"),
        ];
        let bytes = write_table(&records);

        assert_eq!(read_table(bytes.as_slice()).unwrap(), records);
    }

    #[test]
    fn test_normalized_column_is_ignored_on_read() {
        let record = decode(START_FEN, "250");
        let mut writer = TableWriter::new(Vec::new(), Schema::normalized()).unwrap();
        writer.write_normalized(&record, 0.25).unwrap();
        let bytes = writer.into_inner().unwrap();

        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.lines().nth(1).unwrap().ends_with(",250,0.25"));
        assert_eq!(read_table(bytes.as_slice()).unwrap(), vec![record]);
    }

    #[test]
    fn test_schema_mismatch() {
        let err = read_table("FEN,Evaluation\nx,1\n".as_bytes()).unwrap_err();
        let DatasetError::SchemaMismatch {
            column,
            expected,
            found,
        } = err
        else {
            panic!("Expected SchemaMismatch, got {:?}", err)
        };
        assert_eq!(column, 0);
        assert_eq!(expected, "a1");
        assert_eq!(found, "FEN");
    }

    #[test]
    fn test_malformed_rows() {
        let header = Schema::features().columns().join(",");
        let good = vec!["0"; 74].join(",");

        let short = format!("{}\n{}\n0,0\n", header, good);
        assert!(matches!(
            read_table(short.as_bytes()),
            Err(DatasetError::MalformedRow { row: 2, .. })
        ));

        let mut cells = vec!["0"; 74];
        cells[10] = "7";
        let bad_code = format!("{}\n{}\n", header, cells.join(","));
        assert!(matches!(
            read_table(bad_code.as_bytes()),
            Err(DatasetError::MalformedRow { row: 1, .. })
        ));

        let mut cells = vec!["0"; 74];
        cells[64] = "2";
        let bad_flag = format!("{}\n{}\n", header, cells.join(","));
        assert!(matches!(
            read_table(bad_flag.as_bytes()),
            Err(DatasetError::MalformedRow { row: 1, .. })
        ));

        let mut cells = vec!["0"; 74];
        cells[73] = "1.5";
        let bad_eval = format!("{}\n{}\n", header, cells.join(","));
        assert!(matches!(
            read_table(bad_eval.as_bytes()),
            Err(DatasetError::MalformedRow { row: 1, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = read_table_file(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::InputNotFound(_)));
    }
}

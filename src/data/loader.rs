use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float32Array, Float64Array, LargeListArray, ListArray};
use arrow::datatypes::DataType;
use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::RawMatrix;
use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Token format
// ---------------------------------------------------------------------------

/// How a text cell is spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenFormat {
    /// One float per cell.
    #[default]
    Magnitude,
    /// `<re> + i<im>`, collapsed to `|re + i·im|`.
    Complex,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a magnitude matrix from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – one record per time frame in a list column named `row`
///   (or the first list column)
/// * `.json`    – `[[...], [...], ...]`
/// * `.csv`     – headerless, one record per time frame
/// * anything else – whitespace-delimited text, one line per time frame
pub fn load_file(path: &Path, format: TokenFormat) -> Result<RawMatrix> {
    if !path.exists() {
        bail!("Input file {} does not exist", path.display());
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let matrix = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        _ => load_text(path, format),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    info!(
        "Loaded {} time frames x {} bins from {}",
        matrix.n_time(),
        matrix.n_freq(),
        path.display()
    );
    Ok(matrix)
}

// ---------------------------------------------------------------------------
// Text loader
// ---------------------------------------------------------------------------

fn load_text(path: &Path, format: TokenFormat) -> Result<RawMatrix> {
    let text = std::fs::read_to_string(path).context("reading text file")?;
    Ok(parse_rows(text.lines(), format)?)
}

/// Parse one matrix row per line.  Blank lines are skipped; every other line
/// must hold the same number of finite cells.
pub fn parse_rows<I, S>(lines: I, format: TokenFormat) -> Result<RawMatrix, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut rows = Vec::new();
    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        let row_no = rows.len();
        let row = match format {
            TokenFormat::Magnitude => parse_magnitude_line(line, row_no)?,
            TokenFormat::Complex => parse_complex_line(line, row_no)?,
        };
        rows.push(row);
    }
    check_uniform(rows)
}

fn parse_magnitude_line(line: &str, row: usize) -> Result<Vec<f64>, ParseError> {
    line.split_whitespace()
        .enumerate()
        .map(|(column, tok)| parse_cell(tok, row, column))
        .collect()
}

/// Cells look like `1.5 + i-0.25`: three whitespace tokens per value.
fn parse_complex_line(line: &str, row: usize) -> Result<Vec<f64>, ParseError> {
    let malformed = |tok: &str| ParseError::MalformedComplex {
        row,
        token: tok.to_string(),
    };

    let mut values = Vec::new();
    let mut tokens = line.split_whitespace();
    while let Some(re_tok) = tokens.next() {
        let column = values.len();
        let re = parse_cell(re_tok, row, column)?;
        match tokens.next() {
            Some("+") => {}
            _ => return Err(malformed(re_tok)),
        }
        let im_tok = tokens.next().ok_or_else(|| malformed(re_tok))?;
        let im_str = im_tok.strip_prefix('i').ok_or_else(|| malformed(im_tok))?;
        let im = parse_cell(im_str, row, column)?;
        values.push(re.hypot(im));
    }
    Ok(values)
}

fn parse_cell(tok: &str, row: usize, column: usize) -> Result<f64, ParseError> {
    tok.trim().parse::<f64>().map_err(|_| ParseError::NotNumeric {
        row,
        column,
        token: tok.to_string(),
    })
}

/// Reject ragged input and non-finite magnitudes; never pad or truncate.
fn check_uniform(rows: Vec<Vec<f64>>) -> Result<RawMatrix, ParseError> {
    if let Some(expected) = rows.first().map(Vec::len) {
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(ParseError::Ragged {
                row,
                expected,
                found,
            });
        }
    }
    for (row, values) in rows.iter().enumerate() {
        if let Some((column, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(ParseError::NonFinite { row, column, value });
        }
    }
    Ok(RawMatrix::from_rows(rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON layout: an array of time frames, each an array of numbers.
///
/// ```json
/// [
///   [0.12, 3.40, 0.98, ...],
///   [0.10, 3.10, 1.02, ...]
/// ]
/// ```
fn load_json(path: &Path) -> Result<RawMatrix> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<Vec<f64>> =
        serde_json::from_str(&text).context("Expected a JSON array of numeric arrays")?;
    Ok(check_uniform(rows)?)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: no header, one record per time frame, one bin per field.
fn load_csv(path: &Path) -> Result<RawMatrix> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row = record
            .iter()
            .enumerate()
            .map(|(column, tok)| parse_cell(tok, rows.len(), column))
            .collect::<Result<Vec<f64>, ParseError>>()?;
        rows.push(row);
    }

    Ok(check_uniform(rows)?)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding one spectrum per record.
///
/// Expected schema:
/// - `row`: List<Float64|Float32> or LargeList – the bins of one time frame
///
/// When no `row` column exists the first list column is used.  Other columns
/// (timestamps, labels, ...) are ignored.
fn load_parquet(path: &Path) -> Result<RawMatrix> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let col_idx = match schema.index_of("row") {
            Ok(idx) => idx,
            Err(_) => schema
                .fields()
                .iter()
                .position(|f| {
                    matches!(f.data_type(), DataType::List(_) | DataType::LargeList(_))
                })
                .context("Parquet file has no list column to read frames from")?,
        };
        debug!(
            "reading frames from parquet column '{}'",
            schema.field(col_idx).name()
        );

        let col = batch.column(col_idx);
        for row in 0..batch.num_rows() {
            let frame = extract_f64_list(col, row)
                .with_context(|| format!("Row {}: failed to read frame", rows.len()))?;
            rows.push(frame);
        }
    }

    Ok(check_uniform(rows)?)
}

/// Extract a `Vec<f64>` from a List or LargeList column at the given row.
fn extract_f64_list(col: &Arc<dyn Array>, row: usize) -> Result<Vec<f64>> {
    if col.is_null(row) {
        bail!("null value in list column");
    }

    let values_array = match col.data_type() {
        DataType::List(_) => {
            let list_arr = col
                .as_any()
                .downcast_ref::<ListArray>()
                .context("expected ListArray")?;
            list_arr.value(row)
        }
        DataType::LargeList(_) => {
            let list_arr = col
                .as_any()
                .downcast_ref::<LargeListArray>()
                .context("expected LargeListArray")?;
            list_arr.value(row)
        }
        other => bail!("Expected List or LargeList column, got {other:?}"),
    };

    if let Some(f64_arr) = values_array.as_any().downcast_ref::<Float64Array>() {
        Ok(f64_arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    } else if let Some(f32_arr) = values_array.as_any().downcast_ref::<Float32Array>() {
        Ok(f32_arr.iter().map(|v| v.unwrap_or(f32::NAN) as f64).collect())
    } else {
        bail!(
            "List inner type is {:?}, expected Float64 or Float32",
            values_array.data_type()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float32Builder, Float64Builder, Int64Array, ListBuilder};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Write `columns` as a single record batch.
    fn write_parquet(dir: &TempDir, name: &str, columns: Vec<(&str, Arc<dyn Array>)>) -> PathBuf {
        let path = dir.path().join(name);
        let batch = RecordBatch::try_from_iter(columns).unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    fn f64_lists(rows: &[Option<Vec<f64>>]) -> Arc<dyn Array> {
        let mut builder = ListBuilder::new(Float64Builder::new());
        for row in rows {
            match row {
                Some(values) => {
                    builder.values().append_slice(values);
                    builder.append(true);
                }
                None => builder.append(false),
            }
        }
        Arc::new(builder.finish())
    }

    #[test]
    fn parses_whitespace_rows() {
        let m = parse_rows(["1 2 3", "  4\t5   6  ", ""], TokenFormat::Magnitude).unwrap();
        assert_eq!(m.rows(), &[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!((m.n_time(), m.n_freq()), (2, 3));
    }

    #[test]
    fn accepts_fft_tool_number_formats() {
        let m = parse_rows(["0.00012 1e-05 3.4567 -0"], TokenFormat::Magnitude).unwrap();
        assert_eq!(m.rows()[0][0], 0.00012);
        assert_eq!(m.rows()[0][1], 1e-5);
        assert_eq!(m.rows()[0][3], 0.0);
    }

    #[test]
    fn rejects_non_finite_magnitudes() {
        let err = parse_rows(["1 2 3", "4 inf 6"], TokenFormat::Magnitude).unwrap_err();
        assert!(matches!(
            err,
            ParseError::NonFinite { row: 1, column: 1, value } if value.is_infinite()
        ));
        assert!(matches!(
            parse_rows(["NaN 1"], TokenFormat::Magnitude),
            Err(ParseError::NonFinite { row: 0, column: 0, .. })
        ));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = parse_rows(["1 2 3", "4 5 6", "7 8"], TokenFormat::Magnitude).unwrap_err();
        assert_eq!(
            err,
            ParseError::Ragged {
                row: 2,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn rejects_non_numeric_tokens() {
        let err = parse_rows(["1 2 3", "4 five 6"], TokenFormat::Magnitude).unwrap_err();
        assert_eq!(
            err,
            ParseError::NotNumeric {
                row: 1,
                column: 1,
                token: "five".to_string()
            }
        );
    }

    #[test]
    fn complex_cells_collapse_to_magnitude() {
        let m = parse_rows(
            ["3 + i4 0 + i-2", "-6 + i8 1 + i0"],
            TokenFormat::Complex,
        )
        .unwrap();
        assert_eq!(m.rows(), &[vec![5.0, 2.0], vec![10.0, 1.0]]);
    }

    #[test]
    fn malformed_complex_cells_are_rejected() {
        assert!(matches!(
            parse_rows(["3 4"], TokenFormat::Complex),
            Err(ParseError::MalformedComplex { row: 0, .. })
        ));
        assert!(matches!(
            parse_rows(["3 + 4"], TokenFormat::Complex),
            Err(ParseError::MalformedComplex { .. })
        ));
        assert!(matches!(
            parse_rows(["3 +"], TokenFormat::Complex),
            Err(ParseError::MalformedComplex { .. })
        ));
    }

    #[test]
    fn empty_input_gives_empty_matrix() {
        let m = parse_rows(Vec::<String>::new(), TokenFormat::Magnitude).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn loads_text_file() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "frames.txt", "1 2 3 4 \n5 6 7 8 \n");
        let m = load_file(&path, TokenFormat::Magnitude).unwrap();
        assert_eq!(m.n_time(), 2);
        assert_eq!(m.n_freq(), 4);
    }

    #[test]
    fn loads_csv_file() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "frames.csv", "1, 2, 3\n4, 5, 6\n");
        let m = load_file(&path, TokenFormat::Magnitude).unwrap();
        assert_eq!(m.rows(), &[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn ragged_csv_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "ragged.csv", "1,2,3\n4,5\n");
        let err = load_file(&path, TokenFormat::Magnitude).unwrap_err();
        assert!(err.downcast_ref::<ParseError>().is_some());
    }

    #[test]
    fn loads_json_file() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "frames.json", "[[1, 2.5], [3, 4]]");
        let m = load_file(&path, TokenFormat::Magnitude).unwrap();
        assert_eq!(m.rows(), &[vec![1.0, 2.5], vec![3.0, 4.0]]);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_file(Path::new("/definitely/not/here.txt"), TokenFormat::Magnitude)
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn loads_parquet_row_column() {
        let dir = tempdir().unwrap();
        let frame: Arc<dyn Array> = Arc::new(Int64Array::from(vec![0, 1]));
        let rows = f64_lists(&[Some(vec![1.0, 2.0, 3.0, 4.0]), Some(vec![5.0, 6.0, 7.0, 8.0])]);
        // A list column before `row` must not be picked over it.
        let other = f64_lists(&[Some(vec![9.0]), Some(vec![9.0])]);
        let path = write_parquet(
            &dir,
            "frames.parquet",
            vec![("other", other), ("frame", frame), ("row", rows)],
        );

        let m = load_file(&path, TokenFormat::Magnitude).unwrap();
        assert_eq!(
            m.rows(),
            &[vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0]]
        );
    }

    #[test]
    fn parquet_without_row_column_uses_first_list() {
        let dir = tempdir().unwrap();
        let frame: Arc<dyn Array> = Arc::new(Int64Array::from(vec![0, 1]));
        let bins = f64_lists(&[Some(vec![0.5, 1.5]), Some(vec![2.5, 3.5])]);
        let path = write_parquet(&dir, "bins.pq", vec![("frame", frame), ("bins", bins)]);

        let m = load_file(&path, TokenFormat::Magnitude).unwrap();
        assert_eq!(m.rows(), &[vec![0.5, 1.5], vec![2.5, 3.5]]);
    }

    #[test]
    fn parquet_float32_frames_are_widened() {
        let dir = tempdir().unwrap();
        let mut builder = ListBuilder::new(Float32Builder::new());
        for row in [[0.25f32, 1.5], [2.0, 4.75]] {
            builder.values().append_slice(&row);
            builder.append(true);
        }
        let rows: Arc<dyn Array> = Arc::new(builder.finish());
        let path = write_parquet(&dir, "f32.parquet", vec![("row", rows)]);

        let m = load_file(&path, TokenFormat::Magnitude).unwrap();
        assert_eq!(m.rows(), &[vec![0.25, 1.5], vec![2.0, 4.75]]);
    }

    #[test]
    fn parquet_null_frame_is_an_error() {
        let dir = tempdir().unwrap();
        let rows = f64_lists(&[Some(vec![1.0, 2.0]), None]);
        let path = write_parquet(&dir, "nulls.parquet", vec![("row", rows)]);

        let err = load_file(&path, TokenFormat::Magnitude).unwrap_err();
        assert!(format!("{err:#}").contains("null value in list column"));
    }

    #[test]
    fn ragged_parquet_is_rejected() {
        let dir = tempdir().unwrap();
        let rows = f64_lists(&[Some(vec![1.0, 2.0]), Some(vec![3.0])]);
        let path = write_parquet(&dir, "ragged.parquet", vec![("row", rows)]);

        let err = load_file(&path, TokenFormat::Magnitude).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ParseError>(),
            Some(&ParseError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn parquet_without_list_column_is_an_error() {
        let dir = tempdir().unwrap();
        let frame: Arc<dyn Array> = Arc::new(Int64Array::from(vec![0, 1]));
        let path = write_parquet(&dir, "flat.parquet", vec![("frame", frame)]);

        let err = load_file(&path, TokenFormat::Magnitude).unwrap_err();
        assert!(format!("{err:#}").contains("no list column"));
    }
}

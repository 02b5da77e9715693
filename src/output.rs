use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use log::info;

use crate::args::{OutputFormat, OutputOptions};
use crate::data::model::DisplayMatrix;
use crate::pipeline::RenderPayload;

// ---------------------------------------------------------------------------
// Payload writers
// ---------------------------------------------------------------------------

/// Write the payload to the configured destination.
pub fn emit(payload: &RenderPayload, options: &OutputOptions) -> Result<()> {
    match &options.path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_payload(payload, options.format, &mut writer)?;
            writer.flush().context("flushing output file")?;
            info!("Wrote {:?} output to {}", options.format, path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_payload(payload, options.format, &mut writer)?;
            writer.flush().context("flushing stdout")?;
        }
    }
    Ok(())
}

pub fn write_payload<W: Write>(
    payload: &RenderPayload,
    format: OutputFormat,
    writer: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(payload, writer),
        OutputFormat::Csv => write_csv(&payload.matrix, writer),
    }
}

/// Pretty-printed JSON, newline terminated. Magnitudes are finite (the loader
/// rejects `inf`/`NaN`), so no cell serializes as `null`.
pub fn write_json<W: Write>(payload: &RenderPayload, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, payload).context("serializing payload")?;
    writeln!(writer).context("writing payload")?;
    Ok(())
}

/// One record per frequency bin, one field per time frame.
pub fn write_csv<W: Write>(matrix: &DisplayMatrix, writer: &mut W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (row_no, row) in matrix.rows().iter().enumerate() {
        csv_writer
            .write_record(row.iter().map(|v| v.to_string()))
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    csv_writer.flush().context("flushing CSV")?;
    Ok(())
}

use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Builder, Int64Array, ListBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// FFT size and number of frames.
const N: usize = 64;
const FRAMES: usize = 120;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Full two-sided magnitude spectrum with a tone at `bin` and its mirror.
fn frame(bin: f64, noise_level: f64, rng: &mut SimpleRng) -> Vec<f64> {
    (0..N)
        .map(|k| {
            let k = k as f64;
            let tone = gaussian(k, bin, 1.2, 20.0) + gaussian(k, N as f64 - bin, 1.2, 20.0);
            (tone + rng.gauss(0.0, noise_level)).abs()
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    // Linear chirp from bin 2 up to bin N/2 - 4.
    let frames: Vec<Vec<f64>> = (0..FRAMES)
        .map(|i| {
            let bin = 2.0 + (N as f64 / 2.0 - 6.0) * i as f64 / (FRAMES - 1) as f64;
            frame(bin, 0.3, &mut rng)
        })
        .collect();

    // Text: one frame per line, space separated, 5 significant digits.
    let text_path = "spectrogram.txt";
    let mut text = BufWriter::new(File::create(text_path).context("creating text output")?);
    for row in &frames {
        for v in row {
            write!(text, "{} ", format_significant(*v, 5))?;
        }
        writeln!(text)?;
    }
    text.flush()?;

    // Parquet: `frame` index plus the `row` list column.
    let mut row_builder = ListBuilder::new(Float64Builder::new());
    for row in &frames {
        let values = row_builder.values();
        for &v in row {
            values.append_value(v);
        }
        row_builder.append(true);
    }
    let row_array = row_builder.finish();
    let frame_array = Int64Array::from((0..FRAMES as i64).collect::<Vec<_>>());

    let schema = Arc::new(Schema::new(vec![
        Field::new("frame", DataType::Int64, false),
        Field::new("row", DataType::List(Arc::new(Field::new("item", DataType::Float64, true))), false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![Arc::new(frame_array), Arc::new(row_array)],
    )
    .context("building record batch")?;

    let parquet_path = "spectrogram.parquet";
    let file = File::create(parquet_path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;

    println!("Wrote {FRAMES} frames ({N} bins each) to {text_path} and {parquet_path}");
    Ok(())
}

/// `std::setprecision(5)`-style output: `digits` significant digits, no
/// trailing zeros.
fn format_significant(v: f64, digits: usize) -> String {
    if v == 0.0 || !v.is_finite() {
        return format!("{v}");
    }
    let magnitude = v.abs().log10().floor() as i32;
    let decimals = (digits as i32 - 1 - magnitude).max(0) as usize;
    let s = format!("{v:.decimals$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

//! Writes `sample_readings.csv` and `sample_readings.parquet`: two days of
//! hourly sensor readings whose column names exercise every colour rule.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const HOURS: usize = 48;

/// (column name, daily mean, daily swing, noise)
const SENSORS: [(&str, f64, f64, f64); 5] = [
    ("pressure (R)", 101.3, 0.8, 0.05),
    ("flow_B", 12.0, 4.0, 0.4),
    ("Y-level", 3.5, 0.6, 0.1),
    ("ambient grey", 18.0, 6.0, 0.3),
    ("humidity", 55.0, 15.0, 1.5),
];

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

/// One reading per hour; about 3% of cells are dropped to leave gaps.
fn sensor_readings(rng: &mut SimpleRng, mean: f64, swing: f64, noise: f64) -> Vec<Option<f64>> {
    (0..HOURS)
        .map(|h| {
            let phase = h as f64 / 24.0 * std::f64::consts::TAU;
            let value = mean + swing * phase.sin() + rng.gauss(0.0, noise);
            let rounded = (value * 100.0).round() / 100.0;
            (rng.next_f64() > 0.03).then_some(rounded)
        })
        .collect()
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let times: Vec<String> = (0..HOURS)
        .map(|h| format!("day{} {:02}:00", h / 24 + 1, h % 24))
        .collect();
    let status: Vec<&str> = (0..HOURS)
        .map(|_| if rng.next_f64() < 0.1 { "alarm" } else { "ok" })
        .collect();
    let readings: Vec<Vec<Option<f64>>> = SENSORS
        .iter()
        .map(|&(_, mean, swing, noise)| sensor_readings(&mut rng, mean, swing, noise))
        .collect();

    // ---- CSV ----
    let csv_path = "sample_readings.csv";
    let mut writer = csv::Writer::from_path(csv_path).context("creating CSV")?;
    let mut header = vec!["time"];
    header.extend(SENSORS.iter().map(|(name, ..)| *name));
    header.push("status");
    writer.write_record(&header)?;

    for h in 0..HOURS {
        let mut record = vec![times[h].clone()];
        record.extend(
            readings
                .iter()
                .map(|col| col[h].map(|v| v.to_string()).unwrap_or_default()),
        );
        record.push(status[h].to_string());
        writer.write_record(&record)?;
    }
    writer.flush().context("flushing CSV")?;

    // ---- Parquet ----
    let mut fields = vec![Field::new("time", DataType::Utf8, false)];
    let mut columns: Vec<ArrayRef> = vec![Arc::new(StringArray::from(times.clone()))];
    for ((name, ..), values) in SENSORS.iter().zip(&readings) {
        fields.push(Field::new(*name, DataType::Float64, true));
        columns.push(Arc::new(Float64Array::from(values.clone())));
    }
    fields.push(Field::new("status", DataType::Utf8, false));
    columns.push(Arc::new(StringArray::from(status.clone())));

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let parquet_path = "sample_readings.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    println!("Wrote {HOURS} hourly readings to {csv_path} and {parquet_path}");
    Ok(())
}

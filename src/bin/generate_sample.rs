//! Writes a small deterministic CSV for trying the dashboard:
//! numeric, text and boolean columns, a few missing cells and one
//! duplicated row.
//!
//! Usage: `generate_sample [output.csv]` (default `sample_data.csv`).

use anyhow::{Context, Result};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
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
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_data.csv".to_string());
    let mut rng = SimpleRng::new(42);

    let samples = [("Sample_A", 3400.0), ("Sample_B", 3200.0), ("Sample_C", 3600.0)];
    let concentrations = [0.1, 0.5, 1.0, 2.0, 5.0];
    let operators = ["Alice", "Bob"];

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "measurement_id",
        "sample",
        "concentration",
        "operator",
        "peak_position",
        "absorbance",
        "temperature",
        "passed",
    ])?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (sample, centre) in samples {
        for conc in concentrations {
            for operator in operators {
                let id = rows.len();
                let peak = centre + rng.gauss(0.0, 15.0);
                let absorbance = gaussian(peak, centre, 80.0, conc) + rng.gauss(0.0, 0.01 * conc);
                // Every seventh temperature reading is missing.
                let temperature = if id % 7 == 3 {
                    String::new()
                } else {
                    format!("{:.1}", 21.0 + rng.gauss(0.0, 1.5))
                };
                rows.push(vec![
                    id.to_string(),
                    sample.to_string(),
                    conc.to_string(),
                    operator.to_string(),
                    format!("{peak:.2}"),
                    format!("{absorbance:.4}"),
                    temperature,
                    (absorbance > 0.2).to_string(),
                ]);
            }
        }
    }

    // One exact duplicate so the duplicate counter has something to find.
    if let Some(first) = rows.first().cloned() {
        rows.push(first);
    }

    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush().context("flushing CSV writer")?;

    println!("Wrote {} rows to {output_path}", rows.len());
    Ok(())
}

//! Generates a deterministic sample precipitation CSV in the
//! `Gauge,DateTime,Rainfall Total,Daily Accumulation` layout, for demos
//! and manual testing.
//!
//! Usage: `cargo run --bin generate_sample [output.csv]`

use chrono::{Duration, NaiveDate};

const GAUGES: [&str; 3] = ["East Riverside", "Huron Estates", "Malden"];
const FIRST_YEAR: i32 = 2019;
const LAST_YEAR: i32 = 2022;
const READINGS_PER_DAY: [u32; 2] = [6, 18]; // hours of day

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

    fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller.
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.uniform().max(f64::MIN_POSITIVE);
        let u2 = self.uniform();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample-precipitation.csv".to_string());

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(["Gauge", "DateTime", "Rainfall Total", "Daily Accumulation"])?;

    let mut rng = SimpleRng::new(0xDEC0DE);
    let start = NaiveDate::from_ymd_opt(FIRST_YEAR, 1, 1).expect("valid date");
    let end = NaiveDate::from_ymd_opt(LAST_YEAR, 12, 31).expect("valid date");

    let mut rows = 0usize;
    let mut day = start;
    while day <= end {
        for gauge in GAUGES {
            let mut accumulated = 0.0;
            // Roughly a third of periods see rain; amounts are a clipped
            // gaussian in mm.
            for hour in READINGS_PER_DAY {
                let rainfall = if rng.uniform() < 0.35 {
                    rng.gauss(1.5, 1.2).max(0.0)
                } else {
                    0.0
                };
                accumulated += rainfall;

                let timestamp = day
                    .and_hms_opt(hour, 0, 0)
                    .expect("valid time")
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string();
                let rainfall_cell = format!("{rainfall:.1}");
                let accumulated_cell = format!("{accumulated:.1}");
                writer.write_record([
                    gauge,
                    timestamp.as_str(),
                    rainfall_cell.as_str(),
                    accumulated_cell.as_str(),
                ])?;
                rows += 1;
            }
        }
        day += Duration::days(1);
    }

    writer.flush()?;
    println!("Wrote {rows} readings for {} gauges to {path}", GAUGES.len());
    Ok(())
}

//! Writes `sample_readings.json` and `sample_readings.csv` with synthetic
//! motorsports sensor readings, for use with File → Open….

use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Reading {
    id: i64,
    sensor_id: String,
    vehicle_id: String,
    track_layout: String,
    sensor_value: f64,
    year: i64,
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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Sensor kinds with the value range each one reports in.
const SENSORS: [(&str, f64, f64); 3] = [
    ("TEMP", 60.0, 120.0),
    ("PRES", 1.5, 3.5),
    ("SPEED", 80.0, 200.0),
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let vehicles = ["MK1", "MK2", "MK3", "MK4", "EV1"];
    let layouts = ["Oval", "Street", "Road"];
    let years = [2022, 2023, 2024];

    let mut readings = Vec::new();
    let mut id: i64 = 1;
    for (kind, lo, hi) in SENSORS {
        for channel in 1..=3 {
            for _ in 0..4 {
                // one decimal place, like the logger exports
                let value = ((lo + rng.next_f64() * (hi - lo)) * 10.0).round() / 10.0;
                readings.push(Reading {
                    id,
                    sensor_id: format!("{kind}_{channel:03}"),
                    vehicle_id: rng.pick(&vehicles).to_string(),
                    track_layout: rng.pick(&layouts).to_string(),
                    sensor_value: value,
                    year: years[(rng.next_u64() % years.len() as u64) as usize],
                });
                id += 1;
            }
        }
    }

    let json_path = "sample_readings.json";
    let json = serde_json::to_string_pretty(&readings).context("serializing readings")?;
    std::fs::write(json_path, json).with_context(|| format!("writing {json_path}"))?;

    let csv_path = "sample_readings.csv";
    let mut writer = csv::Writer::from_path(csv_path).with_context(|| format!("creating {csv_path}"))?;
    for reading in &readings {
        writer.serialize(reading).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {} readings to {json_path} and {csv_path}", readings.len());
    Ok(())
}

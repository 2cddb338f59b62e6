use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

/// Seismically active regions: (country, continent, latitude, longitude, typical depth km).
const REGIONS: [(&str, &str, f64, f64, f64); 10] = [
    ("Japan", "Asia", 36.2, 138.3, 40.0),
    ("Indonesia", "Asia", -2.5, 118.0, 60.0),
    ("Philippines", "Asia", 12.9, 121.8, 35.0),
    ("Turkey", "Asia", 38.9, 35.2, 12.0),
    ("Chile", "Americas", -33.4, -70.6, 50.0),
    ("Peru", "Americas", -9.2, -75.0, 70.0),
    ("Mexico", "Americas", 19.4, -99.1, 45.0),
    ("Italy", "Europe", 42.5, 12.6, 10.0),
    ("Papua New Guinea", "Oceania", -6.3, 143.9, 55.0),
    ("Algeria", "Africa", 36.0, 3.0, 10.0),
];

const OUTPUT_PATH: &str = "earthquake_country_continent_cleaned_data.csv";

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Gutenberg-Richter style magnitude: exponential tail above `min`.
    fn magnitude(&mut self, min: f64) -> f64 {
        let m = min - self.next_f64().max(1e-15).ln() / 2.3;
        (m.min(9.5) * 10.0).round() / 10.0
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let first_day = NaiveDate::from_ymd_opt(1995, 1, 1).context("invalid start date")?;
    let span_days = 365 * 29;
    let n_events = 3000;

    let mut writer = csv::Writer::from_path(OUTPUT_PATH).context("creating output file")?;
    writer.write_record([
        "id", "date", "latitude", "longitude", "depth", "mag", "country", "continent",
    ])?;

    for i in 0..n_events {
        let (country, continent, lat, lon, depth) = REGIONS[rng.below(REGIONS.len())];
        let date = first_day + Duration::days(rng.below(span_days) as i64);
        let latitude = (rng.gauss(lat, 2.0) * 1000.0).round() / 1000.0;
        let longitude = (rng.gauss(lon, 2.0) * 1000.0).round() / 1000.0;
        let depth = (rng.gauss(depth, depth / 3.0).abs() * 10.0).round() / 10.0;
        let mag = rng.magnitude(4.5);

        writer.write_record([
            format!("sim{i:05}"),
            date.format("%Y-%m-%d").to_string(),
            latitude.to_string(),
            longitude.to_string(),
            depth.to_string(),
            mag.to_string(),
            country.to_string(),
            continent.to_string(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {n_events} events to {OUTPUT_PATH}");
    Ok(())
}

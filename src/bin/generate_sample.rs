//! Writes a deterministic synthetic grades file for trying the dashboard.
//!
//! Usage: `generate_sample [OUTPUT]` (default `notas_1u.csv`).

use anyhow::{Context, Result};

/// Seeded xoshiro256** generator, so every run writes the same file.
struct ScoreRng {
    state: [u64; 4],
}

impl ScoreRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        ScoreRng { state: s }
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

    /// Uniform in `[0, 1)`, built from the top 53 bits of the next word.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Normal sample via Box–Muller; `u1` is floored to keep `ln` finite.
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Whole-point grade on the 0–20 scale.
    fn grade(&mut self, mean: f64, spread: f64) -> f64 {
        self.gauss(mean, spread).round().clamp(0.0, 20.0)
    }
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "notas_1u.csv".to_string());

    let mut rng = ScoreRng::new(42);

    let students = [
        "Ana", "Luis", "Carmen", "Jorge", "Rosa", "Miguel", "Lucía", "Pedro", "Sofía", "Diego",
        "Valeria", "Andrés", "Camila", "Mateo", "Daniela",
    ];
    // (exam type, mean, spread) on a 0–20 scale
    let exams = [
        ("Práctica", 13.0, 3.0),
        ("Parcial", 11.5, 3.5),
        ("Final", 12.5, 2.5),
    ];

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["Alumno", "Nota", "Tipo_Examen"])?;

    let mut rows = 0usize;
    for (exam, mean, spread) in exams {
        for student in students {
            let score = rng.grade(mean, spread).to_string();
            writer.write_record([student, score.as_str(), exam])?;
            rows += 1;
        }
    }
    writer.flush().with_context(|| format!("writing {output_path}"))?;

    println!("Wrote {rows} grades to {output_path}");
    Ok(())
}

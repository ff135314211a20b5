use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use trial_plotter::config::{ChartLabels, JobConfig, RunConfig, SeriesKind};

/// Seeded measurement noise, so the sample tree is identical on every run.
struct Noise {
    state: u64,
}

impl Noise {
    fn seeded(seed: u64) -> Self {
        Noise { state: seed }
    }

    /// splitmix64 step mapped onto `[0, 1)`.
    fn unit(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Zero-mean normal sample with deviation `sigma`.
    fn jitter(&mut self, sigma: f64) -> f64 {
        let radius = (-2.0 * self.unit().max(f64::MIN_POSITIVE).ln()).sqrt();
        let angle = std::f64::consts::TAU * self.unit();
        sigma * radius * angle.cos()
    }
}

/// Damped oscillation sampled every `dt` seconds.
fn damped_wave(n: usize, dt: f64, omega: f64, amplitude: f64, noise: f64, rng: &mut Noise) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| {
            let t = i as f64 * dt;
            let v = amplitude * (-0.4 * t).exp() * (omega * t).sin();
            (t, v + rng.jitter(noise))
        })
        .collect()
}

fn write_series(path: &Path, samples: &[(f64, f64)]) -> Result<()> {
    let mut body = String::new();
    for (t, v) in samples {
        writeln!(body, "{t:.4} {v:.6}")?;
    }
    fs::create_dir_all(path.parent().context("series path has no parent")?)?;
    fs::write(path, body).with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    let mut rng = Noise::seeded(42);
    let root = Path::new("sample_results");

    // (test directory, angular frequency, write file?)
    let tests = [
        ("test 7 w=200", 2.0, true),
        ("test 8 w=1", 0.5, true),
        ("test 9 w=100", 1.2, false),
        ("test 10 w=400", 3.0, true),
    ];

    let mut jobs = Vec::new();
    for (kind, amplitude) in [(SeriesKind::Displacement, 4.0), (SeriesKind::NavierStokes, 0.8)] {
        let labels: ChartLabels = kind.labels();
        let base_dir = root.join(&labels.file_prefix);
        let file_name = labels.file_name.clone().context("built-in kind without a data file")?;

        for &(dir, omega, present) in &tests {
            let test_dir = base_dir.join(dir);
            fs::create_dir_all(&test_dir)?;
            if present {
                let samples = damped_wave(200, 0.05, omega, amplitude, amplitude * 0.01, &mut rng);
                write_series(&test_dir.join(&file_name), &samples)?;
            }
        }

        let output_dir = Path::new("sample_plots").join(&labels.file_prefix);
        jobs.push(JobConfig::new(
            kind,
            base_dir,
            tests.iter().map(|(dir, _, _)| dir.to_string()).collect(),
            output_dir,
        ));
    }

    let config = RunConfig { jobs, font: None };
    let config_path = root.join("run.json");
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!(
        "Wrote sample results under {} and a run file at {}",
        root.display(),
        config_path.display()
    );
    Ok(())
}

use std::io;

use anyhow::{Context, Result};
use ndarray::{ArrayD, Axis, IxDyn};

use abm_scenario_analysis::export::{summary_records, write_csv, AxisLabels};
use abm_scenario_analysis::pipeline::reconcile_names;
use abm_scenario_analysis::{
    load_scenario, Analysis, AnalysisConfig, Dimensions, MatValue, SectorMap,
};

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

/// Output loss in a set of countries that peaks at `onset` and decays by
/// `recovery` per quarter afterwards.
struct Shock {
    countries: &'static [&'static str],
    depth: f64,
    onset: usize,
    recovery: f64,
}

impl Shock {
    fn factor(&self, t: usize, country: &str) -> f64 {
        if t < self.onset || !self.countries.contains(&country) {
            return 1.0;
        }
        1.0 - self.depth * self.recovery.powi((t - self.onset) as i32)
    }
}

/// Variables of one synthetic scenario file, shaped like the model's MAT output.
fn synthetic_variables(
    dims: &Dimensions,
    experiments: usize,
    shock: Option<&Shock>,
    rng: &mut SimpleRng,
) -> Vec<(String, MatValue)> {
    let (n_t, n_c, n_s) = (dims.time.len(), dims.countries.len(), dims.fine_sectors.len());

    let mut sector_output = ArrayD::<f64>::zeros(IxDyn(&[n_t, experiments, n_c, n_s]));
    let mut unemployment = ArrayD::<f64>::zeros(IxDyn(&[n_t, experiments, n_c]));
    let mut euribor = ArrayD::<f64>::zeros(IxDyn(&[n_t, experiments]));

    for t in 0..n_t {
        let trend = 1.005f64.powi(t as i32);
        for e in 0..experiments {
            euribor[[t, e]] = 0.035 + rng.gauss(0.0, 0.002);
            for (c, code) in dims.countries.iter().enumerate() {
                let factor = shock.map_or(1.0, |s| s.factor(t, code));
                let level = (100.0 + 10.0 * c as f64) * trend * factor;
                for s in 0..n_s {
                    let share = 1.0 + (s % 7) as f64;
                    sector_output[[t, e, c, s]] = level * share * (1.0 + rng.gauss(0.0, 0.01));
                }
                unemployment[[t, e, c]] = 0.06 + (1.0 - factor) * 0.5 + rng.gauss(0.0, 0.001);
            }
        }
    }

    let output = sector_output.sum_axis(Axis(3));
    let nominal_gdp = output.mapv(|v| (v * 1.02) as f32);

    vec![
        ("__header__".to_string(), MatValue::Text("MATLAB 5.0 MAT-file".to_string())),
        ("real_sector_output".to_string(), MatValue::Double(sector_output)),
        ("real_output".to_string(), MatValue::Double(output)),
        ("nominal_gdp".to_string(), MatValue::Single(nominal_gdp)),
        ("unemployment_rate".to_string(), MatValue::Double(unemployment)),
        ("euribor".to_string(), MatValue::Double(euribor)),
    ]
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Starting ABM scenario analysis");

    let config = AnalysisConfig::default();
    let dims = Dimensions::default();
    let sectors = SectorMap::nace62_to_nace1().context("building NACE sector map")?;
    let experiments = dims.experiments.len();
    let mut rng = SimpleRng::new(42);

    let base = load_scenario(
        "baseline",
        synthetic_variables(&dims, experiments, None, &mut rng),
    )
    .context("loading baseline")?;

    let flood = Shock {
        countries: &["DE", "AT", "CZ", "HU", "SK", "SI", "RO", "BG", "HR"],
        depth: 0.04,
        onset: 1,
        recovery: 0.7,
    };
    let names = reconcile_names(&["flood".to_string()], 1);
    let shocks = vec![load_scenario(
        &names[0],
        synthetic_variables(&dims, experiments, Some(&flood), &mut rng),
    )
    .with_context(|| format!("loading {}", names[0]))?];

    let analysis = Analysis::new(&config, &sectors);
    let output = analysis.run(&base, &shocks).context("running analysis")?;
    log::info!(
        "{} {} range: {:.4} .. {:.4}",
        config.sector_variable,
        config.comparison,
        output.sector_range.min,
        output.sector_range.max
    );

    let country_axes = AxisLabels::countries(&dims);
    let sector_axes = country_axes.with_sectors(sectors.coarse_labels());
    let headline = "real_output";
    let sector_variable = config.aggregate_name("real_sector_output");

    let mut records = Vec::new();
    for scenario in std::iter::once(&output.base).chain(&output.shocks) {
        let summary = analysis
            .summarize(scenario, headline)
            .with_context(|| format!("summarizing {}/{headline}", scenario.name))?;
        records.extend(summary_records(&scenario.name, headline, &summary, country_axes)?);

        let summary = analysis
            .summarize(scenario, &sector_variable)
            .with_context(|| format!("summarizing {}/{sector_variable}", scenario.name))?;
        records.extend(summary_records(
            &scenario.name,
            &sector_variable,
            &summary,
            sector_axes,
        )?);
    }

    write_csv(io::stdout().lock(), &records).context("writing summary CSV")?;
    log::info!("Analysis complete: {} summary rows", records.len());
    Ok(())
}

use gravsim::{GridConfig, Preset, RunSettings, Scenario, ScenarioConfig, Simulation, TrajectorySettings};
use gravsim::{bench_forces, bench_step, bench_trajectory_curve};
use gravsim::run_viewer;

use clap::Parser;
use anyhow::{Context, Result};

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Interactive n-body gravity sandbox")]
struct Args {
    /// Scenario YAML; bare names are looked up in the `scenarios/` directory
    #[arg(short, long)]
    file: Option<String>,

    /// Built-in scenario, used when no file is given
    #[arg(short, long, value_enum, default_value_t = Preset::Solar)]
    preset: Preset,

    /// Print timing tables instead of opening the viewer
    #[arg(long)]
    bench: bool,
}

fn scenario_path(name: &str) -> PathBuf {
    let direct = PathBuf::from(name);
    if direct.exists() {
        return direct;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(name)
}

// load here to keep main clean
fn load_scenario(args: &Args) -> Result<(Simulation, RunSettings)> {
    match &args.file {
        Some(name) => {
            let path = scenario_path(name);
            let cfg = ScenarioConfig::from_yaml_file(&path)
                .with_context(|| format!("loading {}", path.display()))?;
            let scenario = Scenario::build_scenario(cfg)?;

            let settings = RunSettings {
                sim_speed: scenario.sim_speed,
                follow_camera: scenario.follow_camera,
                trajectory: TrajectorySettings {
                    steps: scenario.trajectory_steps,
                    ..Default::default()
                },
                ..Default::default()
            };
            let sim = Simulation::new(scenario.spec, scenario.grid)?;
            Ok((sim, settings))
        }
        None => {
            let sim = Simulation::new(args.preset.build(), GridConfig::default())?;
            Ok((sim, RunSettings::default()))
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench {
        bench_forces();
        bench_step();
        bench_trajectory_curve();
        return Ok(());
    }

    let (sim, settings) = load_scenario(&args)?;
    run_viewer(sim, settings);

    Ok(())
}

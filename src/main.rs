use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use servo_observer::cli::{CommandsEnum, ServoObserverArgs};
use servo_observer::plotting::render_history;
use servo_observer::{logging, simulate, ControlDesign, SimulationConfig};

fn load_config(params_path: Option<&str>) -> Result<SimulationConfig> {
    let Some(path) = params_path else {
        return Ok(SimulationConfig::default());
    };
    let text =
        std::fs::read_to_string(path).with_context(|| format!("unable to read param file {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("unable to parse param file {path}"))
}

fn main() -> Result<()> {
    let args = ServoObserverArgs::parse();
    logging::init(args.verbose);

    match &args.command {
        CommandsEnum::Simulate(params) => {
            let config = load_config(params.params.params_path.as_deref())?;
            let (design, history) = simulate(&config)?;

            let output = history.output(&design.system.c_matrix);
            if let (Some(y), Some(x), Some(x_hat)) =
                (output.last(), history.x.last(), history.x_hat.last())
            {
                info!(
                    final_output = *y,
                    final_estimation_error = (x - x_hat).norm(),
                    diverged_at = ?history.diverged_at,
                    "simulation complete"
                );
            }

            if !params.no_plots {
                let written = render_history(
                    &history,
                    &["position", "velocity"],
                    Path::new(&params.out_dir),
                )?;
                println!("wrote {} charts to {}", written.len(), params.out_dir);
            }
        }

        CommandsEnum::Design(params) => {
            let config = load_config(params.params_path.as_deref())?;
            config.validate()?;
            let design = ControlDesign::from_config(&config)?;

            println!("K = {:?}", design.K.as_slice());
            println!("N = {}", design.feedforward);
            println!("L = {:?}", design.L.as_slice());
            println!("closed loop poles (A - BK): {:?}", design.closed_loop_poles());
            println!("observer poles (A - LC): {:?}", design.observer_poles());
        }

        CommandsEnum::DefaultParams => {
            println!("{}", serde_json::to_string_pretty(&SimulationConfig::default())?);
        }
    }
    Ok(())
}

pub mod settings;
pub mod state;

use route_maker_lib::{DataError, ImportError, LedgerSnapshot};
use settings::{Command, Settings};
use state::AppState;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to import {}: {source}", path.display())]
    Import { path: PathBuf, source: ImportError },

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid start time: {0}")]
    StartTime(#[from] time::error::ComponentRange),
}

/// Run the command selected on the command line
pub fn run(settings: Settings) -> Result<(), CliError> {
    let mut state = AppState::new(settings.config());

    match settings.command {
        Command::Build { points, output } => {
            if let Some(name) = &output.name {
                state.session.set_name(name.clone());
            }
            for point in points {
                state.session.insert(point);
            }
            state.update_stats();
            state.save(&output)
        }
        Command::Info { file, json } => {
            state.load_gpx_file(&file)?;
            let snapshot = state.session.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_summary(&state, &snapshot);
            }
            Ok(())
        }
        Command::Reverse { file, output } => {
            state.load_gpx_file(&file)?;
            state.session.reverse();
            state.update_stats();
            state.save(&output)
        }
        Command::Export { file, output } => {
            state.load_gpx_file(&file)?;
            state.save(&output)
        }
    }
}

fn print_summary(state: &AppState, snapshot: &LedgerSnapshot) {
    println!("Name:     {}", state.session.name());
    println!("Points:   {}", state.stats.format_points());
    println!(
        "Distance: {} ({})",
        state.stats.format_distance(),
        state.stats.format_miles()
    );
    if snapshot.nodes.is_empty() {
        return;
    }

    println!();
    println!(
        "{:>6}  {:>12}  {:>11}  {:>10}  {:>12}",
        "#", "lon", "lat", "step (m)", "total (m)"
    );
    for (index, node) in snapshot.nodes.iter().enumerate() {
        println!(
            "{:>6}  {:>12.6}  {:>11.6}  {:>10.1}  {:>12.1}",
            index,
            node.point.lon,
            node.point.lat,
            node.distance_from_previous,
            node.cumulative_distance
        );
    }
}

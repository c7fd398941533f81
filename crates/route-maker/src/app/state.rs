//! Application state management
//!
//! This module wraps the editing session with the file handling and summary
//! formatting the commands share.

use super::CliError;
use super::settings::OutputArgs;
use route_maker_lib::{Config, DataError, EditSession, ExportOptions, utils};
use std::io::Write;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Main application state
pub struct AppState {
    /// The route being worked on
    pub session: EditSession,

    /// File the route was loaded from, if any
    pub source: Option<PathBuf>,

    /// Statistics about the loaded route
    pub stats: Stats,
}

/// Statistics about the loaded route
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Stats {
    /// Number of points in the path
    pub total_points: usize,

    /// Total distance in meters
    pub total_distance: f64,
}

impl AppState {
    /// Create an empty state from the library configuration
    pub fn new(config: Config) -> Self {
        Self {
            session: EditSession::new(config),
            source: None,
            stats: Stats::default(),
        }
    }

    /// Load a GPX file into the session
    pub fn load_gpx_file(&mut self, path: &Path) -> Result<(), CliError> {
        profiling::scope!("load_gpx_file");

        let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.session
            .import(&text)
            .map_err(|source| CliError::Import {
                path: path.to_path_buf(),
                source,
            })?;

        self.source = Some(path.to_path_buf());
        self.update_stats();
        Ok(())
    }

    /// Export options for `output`, falling back to the session name
    pub fn export_options(&self, output: &OutputArgs) -> Result<ExportOptions, CliError> {
        let name = output
            .name
            .clone()
            .unwrap_or_else(|| self.session.name().to_string());
        let mut options = ExportOptions::new(name);
        if output.timestamps {
            let start = output
                .start_unix
                .map(OffsetDateTime::from_unix_timestamp)
                .transpose()?;
            options = options.with_synthetic_timestamps(start);
        }
        Ok(options)
    }

    /// Write the session as GPX to the requested file, or stdout
    pub fn save(&self, output: &OutputArgs) -> Result<(), CliError> {
        let options = self.export_options(output)?;
        let text = self.session.export_with(&options).map_err(DataError::from)?;

        match &output.output {
            Some(path) => {
                std::fs::write(path, text).map_err(|source| CliError::Write {
                    path: path.clone(),
                    source,
                })?;
                tracing::info!(
                    "Wrote {} points ({}) to {}",
                    self.stats.format_points(),
                    self.stats.format_distance(),
                    path.display()
                );
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(text.as_bytes())
                    .and_then(|_| stdout.flush())
                    .map_err(DataError::from)?;
            }
        }
        Ok(())
    }

    /// Update statistics from the session
    pub fn update_stats(&mut self) {
        let ledger = self.session.ledger();
        self.stats.total_points = ledger.len();
        self.stats.total_distance = ledger.total_distance();
    }
}

impl Stats {
    /// Format distance as human-readable string
    pub fn format_distance(&self) -> String {
        utils::format_distance(self.total_distance)
    }

    /// Format distance in miles
    pub fn format_miles(&self) -> String {
        format!("{:.2} mi", utils::meters_to_miles(self.total_distance))
    }

    /// Format point count with thousands separators
    pub fn format_points(&self) -> String {
        format_number_with_commas(self.total_points)
    }
}

/// Helper to format numbers with comma separators
fn format_number_with_commas(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

use clap::{Args, Parser, Subcommand, ValueEnum};
use route_maker_lib::{Config, DistanceModel, GeoPoint};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Route Maker - build, inspect and convert GPX routes
pub struct Settings {
    /// Log filter, e.g. "debug" or "route_maker_lib=trace" (default: RUST_LOG, then "info")
    #[clap(long, global = true, value_name = "FILTER")]
    pub log: Option<String>,

    /// How distances between points are measured
    #[clap(long, global = true, value_enum, default_value = "haversine")]
    pub metric: Metric,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a route from a list of coordinates
    Build {
        /// A point as "LON,LAT" in degrees (repeatable, in path order)
        #[clap(
            short,
            long = "point",
            value_name = "LON,LAT",
            required = true,
            allow_hyphen_values = true,
            value_parser = parse_point
        )]
        points: Vec<GeoPoint>,

        #[clap(flatten)]
        output: OutputArgs,
    },

    /// Print the points and distances of a GPX file
    Info {
        /// GPX file to inspect
        file: PathBuf,

        /// Print the path as JSON instead of a table
        #[clap(long)]
        json: bool,
    },

    /// Reverse the direction of a GPX route
    Reverse {
        /// GPX file to reverse
        file: PathBuf,

        #[clap(flatten)]
        output: OutputArgs,
    },

    /// Re-export a GPX route, optionally renamed or with synthetic timestamps
    Export {
        /// GPX file to convert
        file: PathBuf,

        #[clap(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct OutputArgs {
    /// Where to write the GPX document (stdout when omitted)
    #[clap(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Track name to write
    #[clap(long)]
    pub name: Option<String>,

    /// Add one timestamp per point at a pace of at most 1 m/s
    #[clap(long)]
    pub timestamps: bool,

    /// Unix time of the first timestamp (default: now)
    #[clap(long, value_name = "SECONDS", requires = "timestamps")]
    pub start_unix: Option<i64>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    /// Great-circle distance on a sphere
    Haversine,
    /// Geodesic distance on the WGS84 ellipsoid
    Geodesic,
}

impl From<Metric> for DistanceModel {
    fn from(metric: Metric) -> Self {
        match metric {
            Metric::Haversine => DistanceModel::Haversine,
            Metric::Geodesic => DistanceModel::Geodesic,
        }
    }
}

impl Settings {
    /// Library configuration for these settings
    pub fn config(&self) -> Config {
        Config {
            distance_model: self.metric.into(),
            ..Config::default()
        }
    }
}

/// Parse "LON,LAT" into a point
fn parse_point(value: &str) -> Result<GeoPoint, String> {
    let (lon, lat) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LON,LAT but got {value:?}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude {lon:?}: {e}"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude {lat:?}: {e}"))?;

    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude {lon} is outside -180..=180"));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {lat} is outside -90..=90"));
    }
    Ok(GeoPoint::new(lon, lat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("-0.1278,51.5074"), Ok(GeoPoint::new(-0.1278, 51.5074)));
        assert_eq!(parse_point(" 2.35 , 48.85 "), Ok(GeoPoint::new(2.35, 48.85)));
        assert!(parse_point("51.5").is_err());
        assert!(parse_point("east,51.5").is_err());
        assert!(parse_point("0,NaN").is_err());
        assert!(parse_point("0,91").is_err());
        assert!(parse_point("181,0").is_err());
    }

    #[test]
    fn test_build_command() {
        let settings = Settings::try_parse_from([
            "route-maker",
            "--metric",
            "geodesic",
            "build",
            "--point",
            "-121.961,37.55",
            "-p",
            "-121.960,37.551",
            "--name",
            "Patch",
            "--timestamps",
            "--start-unix",
            "1700000000",
        ])
        .unwrap();

        assert_eq!(settings.config().distance_model, DistanceModel::Geodesic);
        match settings.command {
            Command::Build { points, output } => {
                assert_eq!(points.len(), 2);
                assert_eq!(points[0], GeoPoint::new(-121.961, 37.55));
                assert_eq!(output.name.as_deref(), Some("Patch"));
                assert!(output.timestamps);
                assert_eq!(output.start_unix, Some(1_700_000_000));
                assert_eq!(output.output, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_build_requires_points() {
        assert!(Settings::try_parse_from(["route-maker", "build"]).is_err());
    }

    #[test]
    fn test_start_time_requires_timestamps() {
        let result = Settings::try_parse_from([
            "route-maker",
            "export",
            "in.gpx",
            "--start-unix",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let settings =
            Settings::try_parse_from(["route-maker", "info", "in.gpx", "--json", "--log", "debug"])
                .unwrap();

        assert_eq!(settings.log.as_deref(), Some("debug"));
        assert_eq!(settings.metric, Metric::Haversine);
        assert!(matches!(settings.command, Command::Info { json: true, .. }));
    }
}

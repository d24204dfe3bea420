//! Batch surface-mesh validator.
//!
//! Finds mesh files in a directory, runs the validation pipeline on each,
//! repairs small holes, and reports what failed and where.
//!
//! # Usage
//!
//! ```text
//! surface-validator --config mesh.toml --dir models --report report.json
//! ```
//!
//! The exit status is non-zero if any mesh failed or could not be loaded.

mod config;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mesh_io::{find_mesh_files, load_mesh};
use mesh_validate::SurfaceValidator;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::report::Reporter;

/// Validate triangle meshes for 3D printing.
#[derive(Parser, Debug)]
#[command(name = "surface-validator", version, about, long_about = None)]
struct Cli {
    /// TOML configuration file [default: mesh.toml, if present]
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory to search, overriding `path_to_files`
    #[arg(long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Write a JSON report to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(2)
        }
    }
}

/// Validate every matching file. Returns whether all of them passed.
fn run(cli: &Cli) -> Result<bool> {
    let config = Config::load(cli.config.as_deref())?;
    let dir = config.target_dir(cli.dir.as_deref())?;
    let options = config.checks.to_options();

    let files = find_mesh_files(&dir, &config.validated_file_endings)
        .with_context(|| format!("failed to list {}", dir.display()))?;
    if files.is_empty() {
        warn!(
            "no files ending in {:?} found in {}",
            config.validated_file_endings,
            dir.display()
        );
    }
    info!("Found {} files to check", files.len());

    let verbose = files.len() <= config.maximum_files_for_verbosity;
    let mut validator = SurfaceValidator::new(options)
        .context("invalid [checks] configuration")?
        .with_verbose(verbose);

    let mut reporter = Reporter::new();
    let sources = files.iter().map(|path| {
        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        );
        (name, load_mesh(path))
    });
    let summary = validator.validate_sources(sources, &mut reporter);

    if let Some(path) = &cli.report {
        reporter.write_json(path)?;
    }

    Ok(summary.all_passed())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    use mesh_types::unit_cube;

    fn cube_obj() -> String {
        let cube = unit_cube();
        let mut out = String::new();
        for v in &cube.vertices {
            let p = v.position;
            writeln!(out, "v {} {} {}", p.x, p.y, p.z).unwrap();
        }
        for [a, b, c] in &cube.faces {
            writeln!(out, "f {} {} {}", a + 1, b + 1, c + 1).unwrap();
        }
        out
    }

    #[test]
    fn unloadable_file_is_reported_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let models = dir.path().join("models");
        std::fs::create_dir(&models).unwrap();
        std::fs::write(
            models.join("a_bad.obj"),
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .unwrap();
        std::fs::write(models.join("b_cube.obj"), cube_obj()).unwrap();

        let config = dir.path().join("mesh.toml");
        std::fs::write(&config, "validated_file_endings = [\"obj\"]\n").unwrap();
        let report = dir.path().join("report.json");

        let cli = Cli {
            config: Some(config),
            dir: Some(models),
            report: Some(report.clone()),
            log_level: LogLevel::Warn,
        };
        assert!(!run(&cli).unwrap());

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        let names: Vec<_> = json["meshes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["a_bad.obj", "b_cube.obj"]);
        assert_eq!(json["meshes"][0]["status"], "error");
        assert_eq!(json["meshes"][0]["kind"], "load_error");
        assert_eq!(json["meshes"][1]["status"], "pass");
        assert_eq!(json["total"], 2);
        assert_eq!(json["passed"], 1);
        assert_eq!(json["errors"], 1);
    }

    #[test]
    fn all_good_directory_passes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cube.obj"), cube_obj()).unwrap();
        let config = dir.path().join("mesh.toml");
        std::fs::write(&config, "validated_file_endings = [\"OBJ\"]\n").unwrap();

        let cli = Cli {
            config: Some(config),
            dir: Some(dir.path().to_path_buf()),
            report: None,
            log_level: LogLevel::Warn,
        };
        assert!(run(&cli).unwrap());
    }
}

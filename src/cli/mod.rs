pub(crate) mod advanced;
pub(crate) mod align;
pub(crate) mod analyze;
pub(crate) mod composition;
pub(crate) mod contacts;
pub(crate) mod info;
pub(crate) mod mutation;
pub(crate) mod quick;
pub(crate) mod sasa;
pub(crate) mod structures;

use clap::Args;
use pdbprobe::{Analyzer, Collaborators, Outcome, Result, Settings, Structure};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

/// Options shared by the commands that talk to remote services.
#[derive(Args, Debug, Clone)]
pub(crate) struct GlobalArgs {
    /// Directory where downloaded coordinate files are kept
    #[arg(long, global = true, value_name = "DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Skip the remote annotation services and use the local estimators only
    #[arg(long, global = true)]
    pub offline: bool,

    /// Timeout in seconds for every remote request
    #[arg(long, global = true, default_value_t = pdbprobe::settings::REMOTE_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Write the JSON result to this file instead of stdout
    #[arg(short, long, global = true, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn settings(&self) -> Settings {
        let mut settings = Settings {
            use_remote_annotation: !self.offline,
            timeout: Duration::from_secs(self.timeout),
            ..Settings::default()
        };
        if let Some(dir) = &self.staging_dir {
            settings.staging_dir = dir.clone();
        }
        settings
    }

    pub fn analyzer(&self) -> Result<Analyzer> {
        let settings = self.settings();
        debug!("{settings:?}");
        Ok(Analyzer::new(Collaborators::web(&settings)?, settings))
    }
}

/// `-v` for info, `-vv` for debug and `-vvv` for trace; warnings only by default.
pub(crate) fn setup_logging(verbosity: u8) {
    let level_filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();
    tracing_subscriber::registry()
        .with(level_filter)
        .with(stderr_layer)
        .init();
}

/// Load a local coordinate file if `target` is a path, otherwise fetch it by identifier.
pub(crate) fn load_target(analyzer: &Analyzer, target: &str) -> Result<Structure> {
    let path = Path::new(target);
    if path.is_file() {
        Structure::from_file(path, None)
    } else {
        analyzer.fetch(target)
    }
}

/// Run `op` on every target in parallel, keyed by target.
pub(crate) fn for_each_target<T, F>(targets: &[String], op: F) -> BTreeMap<String, Outcome<T>>
where
    T: Send,
    F: Fn(&str) -> Result<T> + Sync,
{
    targets
        .par_iter()
        .map(|target| (target.clone(), Outcome::from(op(target))))
        .collect()
}

/// Pretty-print `value` as JSON to `output`, or to stdout.
pub(crate) fn emit<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, json + "\n")?;
            info!("Results saved to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use teebox_core::config::TeeboxConfig;
use teebox_tally::run;
use teebox_tally::snapshot::RoundSnapshot;

const USAGE: &str = "usage: teebox-tally <snapshot.json|snapshot.msgpack> [--settle]";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut path = None;
    let mut settle = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--settle" => settle = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return ExitCode::SUCCESS;
            },
            _ if path.is_none() => path = Some(PathBuf::from(&arg)),
            _ => {
                eprintln!("{USAGE}");
                return ExitCode::from(2);
            },
        }
    }
    let Some(path) = path else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    let config = TeeboxConfig::load();
    let report = RoundSnapshot::load(&path).and_then(|snapshot| run(&snapshot, &config, settle));
    match report.and_then(|report| Ok(serde_json::to_string_pretty(&report)?)) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        },
        Err(e) => {
            tracing::error!("Failed to tally {}: {e}", path.display());
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    }
}

use std::process::ExitCode;

use tracing::error;

use weapons_etl::run_cli;

fn main() -> ExitCode {
    match run_cli(std::env::args()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Pipeline run failed: {err}");
            ExitCode::FAILURE
        }
    }
}

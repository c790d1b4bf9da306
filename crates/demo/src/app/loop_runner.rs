use std::process::ExitCode;

use grid_engine::run_app;
use tracing::error;

use super::board;
use super::bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    if let Err(err) = run_app(app.config, |engine| {
        board::populate(engine);
    }) {
        error!(error = %err, "run_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

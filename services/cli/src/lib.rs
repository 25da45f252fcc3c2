mod cli;
mod commands;

use acs_reference::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}

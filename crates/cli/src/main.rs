//! s3-upload - upload one file to S3-compatible object storage
//!
//! Uses either the AWS command-line tool or the AWS SDK, selected with
//! `--method`.

use clap::Parser;

mod commands;
mod exit_code;
mod output;

use commands::Cli;
use exit_code::ExitCode;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse_from(commands::normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                ExitCode::GeneralError
            } else {
                ExitCode::Success
            };
            std::process::exit(code.as_i32());
        }
    };

    if let Err(e) = output::init_logging(cli.json) {
        eprintln!("{e:#}");
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}

//! `portos` entry point. Everything interesting lives in the library so it
//! can be tested without spawning a process.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    portos_cli::init_tracing();
    portos_cli::run().await
}

//! Reading answers from stdin.
//!
//! Reads go through the process-wide `std::io::Stdin` buffer on a blocking
//! thread, so piped input with several answers is consumed line by line.

use std::io::Write;

use crate::error::{CliError, CliResult};

/// One line from stdin, without its line ending. `None` at end of input.
pub async fn read_line() -> CliResult<Option<String>> {
    let read = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|n| (n, line))
    })
    .await
    .map_err(|e| CliError::Io(std::io::Error::other(e)))?;

    let (n, line) = read?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Writes `label` to stderr and waits for an answer.
pub async fn ask(label: &str) -> CliResult<String> {
    eprint!("{label}");
    std::io::stderr().flush()?;
    read_line()
        .await?
        .ok_or_else(|| CliError::input(format!("no answer given for {:?}", label.trim())))
}

/// Yes/no question; anything but `y`/`yes` is no.
pub async fn confirm(question: &str) -> CliResult<bool> {
    let answer = ask(&format!("{question} [y/N] ")).await?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

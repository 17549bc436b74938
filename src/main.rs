//! Headless board runner (default binary).
//!
//! Reads line-delimited JSON commands from stdin and writes the resulting messages to
//! stdout, one JSON object per line. Logging goes to stderr through `env_logger`
//! (set `RUST_LOG=debug` to follow cascades).

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use cookie_crunch::adapter::{encode, OutboundMessage, Session, SessionConfig};

fn main() -> Result<()> {
    env_logger::init();

    let config = SessionConfig::from_env();
    log::info!(
        "starting session (seed {}, level {})",
        config.seed,
        config
            .level_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "default".to_string())
    );
    let mut session = Session::from_config(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_all(&mut out, &session.start())?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read command from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        write_all(&mut out, &session.handle_line(&line))?;
    }

    Ok(())
}

fn write_all(out: &mut impl Write, messages: &[OutboundMessage]) -> Result<()> {
    for msg in messages {
        writeln!(out, "{}", encode(msg)?).context("failed to write to stdout")?;
    }
    out.flush().context("failed to flush stdout")
}

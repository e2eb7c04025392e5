//! Interactive todo list on the terminal.
//!
//! Reads one command per line from stdin and prints the list after every
//! change. Logs go to stderr.

use anyhow::Context;
use std::io::{self, BufRead, Write};
use todo::ui::{Command, Outcome, Shell, HELP};
use todo::config::DEFAULT_LOG_FILTER;
use todo::{new_store, Config, TodoEnvironment};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;

    // Initialize tracing
    let (filter, rejected) = match config.env_filter() {
        Ok(filter) => (filter, None),
        Err(error) => (EnvFilter::new(DEFAULT_LOG_FILTER), Some(error)),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
    if let Some(error) = rejected {
        tracing::warn!(
            filter = %config.log_filter,
            %error,
            default = DEFAULT_LOG_FILTER,
            "Invalid log filter, using the default"
        );
    }
    reducer_runtime::metrics::describe_store_metrics();

    tracing::info!(
        max_feedback_actions = config.store.max_feedback_actions,
        "Starting todo shell"
    );

    let mut shell = Shell::new(new_store(TodoEnvironment::system(), config.store));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{HELP}\n\n{}", shell.frame())?;
    prompt(&mut out)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read from stdin")?;
        if line.trim().is_empty() {
            prompt(&mut out)?;
            continue;
        }

        match line.parse::<Command>().and_then(|command| shell.handle(command)) {
            Ok(Outcome::Rendered) => writeln!(out, "{}", shell.frame())?,
            Ok(Outcome::Json(json)) => writeln!(out, "{json}")?,
            Ok(Outcome::Help) => writeln!(out, "{HELP}")?,
            Ok(Outcome::Quit) => break,
            Err(error) => {
                tracing::debug!(%error, "Command rejected");
                writeln!(out, "error: {error}")?;
            },
        }
        prompt(&mut out)?;
    }

    let (total, visible) = shell
        .store()
        .state(|state| (state.count(), state.visible_count()));
    tracing::info!(total, visible, "Exiting todo shell");
    Ok(())
}

fn prompt(out: &mut impl Write) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}

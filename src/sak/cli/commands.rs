use super::setup::{init_tracing, root_registry};
use sak::command::ExitStatus;
use sak::config::{config_dir, SakConfig};
use sak::context::InvocationContext;
use sak::dispatch::dispatch;
use sak::error::{Result, SakError};
use sak::help;
use sak::render::stdout_supports_color;
use std::io::Write;
use tracing::{debug, warn};

pub fn run() -> Result<ExitStatus> {
    init_tracing();

    let dir = config_dir();
    let config = match &dir {
        Some(dir) => SakConfig::load(dir).unwrap_or_else(|e| {
            warn!("ignoring unreadable config in {}: {e}", dir.display());
            SakConfig::default()
        }),
        None => SakConfig::default(),
    }
    .with_env_overrides(|key| std::env::var(key).ok());
    debug!(?dir, ?config, "loaded configuration");

    let registry = root_registry(config, dir)?;
    let ctx = InvocationContext::from_args(std::env::args()).with_color(stdout_supports_color());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let status = match dispatch(&registry, &ctx, &mut out) {
        Err(SakError::MissingCommand) => {
            out.write_all(help::usage(&ctx, &registry)?.as_bytes())?;
            ExitStatus::Failure
        }
        other => other?,
    };
    out.flush()?;
    Ok(status)
}

use sak::commands::aws::UpdateAws;
use sak::commands::builtin::{ShowCompletion, ShowHelp};
use sak::commands::config::ConfigCommand;
use sak::commands::db;
use sak::commands::fetch::Fetch;
use sak::commands::test_names::DjTestNames;
use sak::config::SakConfig;
use sak::error::Result;
use sak::registry::Registry;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `SAK_LOG=debug`.
pub const LOG_ENV: &str = "SAK_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Initialize the global tracing subscriber.
///
/// Logs go to stderr so they never mix with command output. Calling this
/// twice is harmless; the second subscriber is simply not installed.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// The root command tree of the `sak` binary.
///
/// `help` and `complete` rebuild this same tree on demand, so they always
/// describe exactly what the dispatcher sees.
pub fn root_registry(config: SakConfig, config_dir: Option<PathBuf>) -> Result<Registry> {
    let for_help = config.clone();
    let dir_for_help = config_dir.clone();
    let for_completion = config.clone();
    let dir_for_completion = config_dir.clone();

    Registry::builder()
        .parameterized(
            "update-aws",
            "Update AWS credentials from the environment",
            UpdateAws::new(config.aws_credentials_path()),
        )
        .parameterized(
            "dj-test-names",
            "Dj test names complete script",
            DjTestNames,
        )
        .parameterized(
            "fetch",
            "Fetch a URL and pretty-print the response",
            Fetch::new(config.fetch_url.clone()),
        )
        .composite(
            "db",
            "Query a SQLite database",
            db::registry(config.database.clone())?,
        )
        .parameterized(
            "config",
            "Show or set configuration",
            ConfigCommand::new(config_dir, config),
        )
        .simple(
            "help",
            "Show help",
            ShowHelp::new(move || root_registry(for_help.clone(), dir_for_help.clone())),
        )
        .simple(
            "complete",
            "Print the fish completion script",
            ShowCompletion::new(move || {
                root_registry(for_completion.clone(), dir_for_completion.clone())
            }),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_order() {
        let registry = root_registry(SakConfig::default(), None).unwrap();
        assert_eq!(
            registry.names(),
            vec!["update-aws", "dj-test-names", "fetch", "db", "config", "help", "complete"]
        );
    }

    #[test]
    fn test_db_is_composite() {
        let registry = root_registry(SakConfig::default(), None).unwrap();
        let db = registry.lookup("db").unwrap();
        assert_eq!(db.subcommands().map(Registry::names), Some(vec!["query", "tables"]));
    }
}

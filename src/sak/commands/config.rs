use crate::command::{ExitStatus, ParameterizedCommand};
use crate::config::{SakConfig, KEYS};
use crate::context::InvocationContext;
use crate::error::{Result, SakError};
use crate::options::{OptionSchema, ParsedOptions, PositionalSpec};
use std::io::Write;
use std::path::PathBuf;

/// `config [KEY] [VALUE]`: show every key, show one key, or set one key.
///
/// Reads show the effective values (file plus environment overrides); writes
/// only ever touch the file.
pub struct ConfigCommand {
    dir: Option<PathBuf>,
    effective: SakConfig,
}

impl ConfigCommand {
    pub fn new(dir: Option<PathBuf>, effective: SakConfig) -> Self {
        Self { dir, effective }
    }
}

fn show(value: Option<String>) -> String {
    value.unwrap_or_else(|| "(unset)".to_string())
}

impl ParameterizedCommand for ConfigCommand {
    fn schema(&self) -> OptionSchema {
        OptionSchema::new()
            .positional(PositionalSpec::one("key", "Config key"))
            .positional(PositionalSpec::one("value", "New value for the key"))
    }

    fn execute(
        &self,
        _ctx: &InvocationContext,
        options: ParsedOptions,
        out: &mut dyn Write,
    ) -> Result<ExitStatus> {
        match (options.get("key"), options.get("value")) {
            (None, _) => {
                for key in KEYS {
                    writeln!(out, "{key} = {}", show(self.effective.get(key)?))?;
                }
            }
            (Some(key), None) => {
                writeln!(out, "{key} = {}", show(self.effective.get(key)?))?;
            }
            (Some(key), Some(value)) => {
                let dir = self
                    .dir
                    .as_ref()
                    .ok_or_else(|| SakError::command("No config directory available"))?;
                let mut config = SakConfig::load(dir)?;
                config.set(key, value)?;
                config.save(dir)?;
                writeln!(out, "{key} = {value}")?;
            }
        }
        Ok(ExitStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KEY_DATABASE, KEY_FETCH_URL};
    use crate::dispatch::dispatch;
    use crate::registry::Registry;
    use std::path::Path;

    fn run(dir: &Path, effective: SakConfig, args: &[&str]) -> Result<String> {
        let registry = Registry::builder()
            .parameterized(
                "config",
                "Show or set configuration",
                ConfigCommand::new(Some(dir.to_path_buf()), effective),
            )
            .build()?;
        let ctx = InvocationContext::new("sak", std::iter::once("config").chain(args.iter().copied()));
        let mut out = Vec::new();
        dispatch(&registry, &ctx, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_list_all_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut effective = SakConfig::default();
        effective.set(KEY_FETCH_URL, "http://localhost").unwrap();

        let out = run(dir.path(), effective, &[]).unwrap();
        assert_eq!(
            out,
            "aws-credentials = (unset)\ndatabase = (unset)\nfetch-url = http://localhost\n"
        );
    }

    #[test]
    fn test_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let out = run(dir.path(), SakConfig::default(), &[KEY_DATABASE, "/tmp/app.sqlite"]).unwrap();
        assert_eq!(out, "database = /tmp/app.sqlite\n");

        let saved = SakConfig::load(dir.path()).unwrap();
        assert_eq!(saved.get(KEY_DATABASE).unwrap().as_deref(), Some("/tmp/app.sqlite"));

        let out = run(dir.path(), saved, &[KEY_DATABASE]).unwrap();
        assert_eq!(out, "database = /tmp/app.sqlite\n");
    }

    #[test]
    fn test_unknown_key() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(dir.path(), SakConfig::default(), &["colour"]).unwrap_err();
        assert!(err.to_string().starts_with("Unknown config key: colour"));
    }

    #[test]
    fn test_extra_positional_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(dir.path(), SakConfig::default(), &["database", "a", "b"]).unwrap_err();
        assert!(matches!(err, SakError::UnrecognizedOptions(tokens) if tokens == ["b"]));
    }
}

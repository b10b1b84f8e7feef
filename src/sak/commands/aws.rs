//! `update-aws`: copy the session credentials in the environment into the
//! `[default]` profile of the AWS credentials file.

use crate::command::{ExitStatus, ParameterizedCommand};
use crate::context::InvocationContext;
use crate::error::{Result, SakError};
use crate::options::{OptionSchema, ParsedOptions};
use console::style;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

pub const ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

const ELLIPSIS: char = '…';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
}

impl Credentials {
    /// Reads and trims all three variables, reporting every missing one at once.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| lookup(key).map(|value| value.trim().to_string());

        let access_key_id = read(ACCESS_KEY_ID);
        let secret_access_key = read(SECRET_ACCESS_KEY);
        let session_token = read(SESSION_TOKEN);

        match (access_key_id, secret_access_key, session_token) {
            (Some(access_key_id), Some(secret_access_key), Some(session_token)) => Ok(Self {
                access_key_id,
                secret_access_key,
                session_token,
            }),
            (a, s, t) => {
                let missing: Vec<&str> = [
                    (a.is_none(), ACCESS_KEY_ID),
                    (s.is_none(), SECRET_ACCESS_KEY),
                    (t.is_none(), SESSION_TOKEN),
                ]
                .into_iter()
                .filter_map(|(missing, key)| missing.then_some(key))
                .collect();
                Err(SakError::command(format!(
                    "Missing environment variables: {}",
                    missing.join(", ")
                )))
            }
        }
    }

    pub fn to_profile(&self) -> String {
        format!(
            "[default]\naws_access_key_id = {}\naws_secret_access_key = {}\naws_session_token = {}\n",
            self.access_key_id, self.secret_access_key, self.session_token
        )
    }

    /// Shortened values, safe enough to echo back to a terminal.
    pub fn preview(&self) -> String {
        format!(
            "aws_access_key_id = {}\naws_secret_access_key = {}\naws_session_token = {}\n",
            truncate(&self.access_key_id, 10),
            truncate(&self.secret_access_key, 20),
            truncate(&self.session_token, 45)
        )
    }
}

fn truncate(value: &str, keep: usize) -> String {
    let mut shown: String = value.chars().take(keep).collect();
    shown.push(ELLIPSIS);
    shown
}

pub struct UpdateAws {
    credentials_file: Option<PathBuf>,
}

impl UpdateAws {
    pub fn new(credentials_file: Option<PathBuf>) -> Self {
        Self { credentials_file }
    }
}

/// No options of its own: the empty schema only carries `--help`.
impl ParameterizedCommand for UpdateAws {
    fn schema(&self) -> OptionSchema {
        OptionSchema::new()
    }

    fn execute(
        &self,
        _ctx: &InvocationContext,
        _options: ParsedOptions,
        out: &mut dyn Write,
    ) -> Result<ExitStatus> {
        let path = self
            .credentials_file
            .as_ref()
            .ok_or_else(|| SakError::command("No home directory found"))?;

        if !path.exists() {
            return Err(SakError::command(format!(
                "No AWS credentials file found: {}",
                path.display()
            )));
        }

        let credentials = Credentials::from_lookup(|key| std::env::var(key).ok())?;

        debug!(path = %path.display(), "rewriting credentials");
        fs::write(path, credentials.to_profile()).map_err(|e| {
            SakError::command(format!(
                "Failed to open AWS credentials file: {}: {e}",
                path.display()
            ))
        })?;

        out.write_all(credentials.preview().as_bytes())?;
        writeln!(out, "{}", style("AWS credentials updated").green())?;
        Ok(ExitStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::dispatch;
    use crate::registry::Registry;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_reads_and_trims() {
        let creds = Credentials::from_lookup(env(&[
            (ACCESS_KEY_ID, "  AKIA123  "),
            (SECRET_ACCESS_KEY, "secret\n"),
            (SESSION_TOKEN, "\ttoken"),
        ]))
        .unwrap();
        assert_eq!(creds.access_key_id, "AKIA123");
        assert_eq!(creds.secret_access_key, "secret");
        assert_eq!(creds.session_token, "token");
    }

    #[test]
    fn test_reports_every_missing_variable() {
        let err = Credentials::from_lookup(env(&[(SECRET_ACCESS_KEY, "s")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing environment variables: AWS_ACCESS_KEY_ID, AWS_SESSION_TOKEN"
        );
    }

    #[test]
    fn test_profile_format() {
        let creds = Credentials {
            access_key_id: "a".into(),
            secret_access_key: "b".into(),
            session_token: "c".into(),
        };
        assert_eq!(
            creds.to_profile(),
            "[default]\naws_access_key_id = a\naws_secret_access_key = b\naws_session_token = c\n"
        );
    }

    #[test]
    fn test_preview_truncates() {
        let creds = Credentials {
            access_key_id: "ABCDEFGHIJKLMNOP".into(),
            secret_access_key: "short".into(),
            session_token: "t".repeat(60),
        };
        let preview = creds.preview();
        assert!(preview.contains("aws_access_key_id = ABCDEFGHIJ…\n"));
        assert!(preview.contains("aws_secret_access_key = short…\n"));
        assert!(preview.contains(&format!("aws_session_token = {}…\n", "t".repeat(45))));
    }

    #[test]
    fn test_missing_credentials_file() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = UpdateAws::new(Some(dir.path().join("credentials")));
        let ctx = InvocationContext::new("sak", Vec::<String>::new());
        let err = cmd
            .execute(&ctx, ParsedOptions::default(), &mut Vec::new())
            .unwrap_err();
        assert!(err.to_string().starts_with("No AWS credentials file found"));
    }

    fn registry(credentials: PathBuf) -> Registry {
        Registry::builder()
            .parameterized("update-aws", "Update AWS credentials", UpdateAws::new(Some(credentials)))
            .build()
            .unwrap()
    }

    #[test]
    fn test_help_leaves_credentials_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials");
        fs::write(&path, "[default]\nkeep = me\n").unwrap();

        let ctx = InvocationContext::new("sak", ["update-aws", "--help"]);
        let mut out = Vec::new();
        let status = dispatch(&registry(path.clone()), &ctx, &mut out).unwrap();

        assert_eq!(status, ExitStatus::Success);
        assert!(String::from_utf8(out).unwrap().contains("Usage"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "[default]\nkeep = me\n");
    }

    #[test]
    fn test_unknown_option_leaves_credentials_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials");
        fs::write(&path, "[default]\nkeep = me\n").unwrap();

        let ctx = InvocationContext::new("sak", ["update-aws", "--typo"]);
        let err = dispatch(&registry(path.clone()), &ctx, &mut Vec::new()).unwrap_err();

        assert!(matches!(err, SakError::UnrecognizedOptions(tokens) if tokens == ["--typo"]));
        assert_eq!(fs::read_to_string(&path).unwrap(), "[default]\nkeep = me\n");
    }
}

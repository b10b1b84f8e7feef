use crate::command::{ExitStatus, ParameterizedCommand};
use crate::context::InvocationContext;
use crate::error::{Result, SakError};
use crate::options::{OptionSchema, OptionSpec, ParsedOptions, PositionalSpec};
use reqwest::Url;
use std::io::Write;
use tracing::{debug, warn};

/// `fetch <URL> [--raw]`: GET a URL and print the body, JSON pretty-printed.
pub struct Fetch {
    base_url: Option<String>,
}

impl Fetch {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

/// Absolute targets are used as given; relative ones are joined onto `base`.
pub fn resolve_url(base: Option<&str>, target: &str) -> Result<Url> {
    if let Ok(url) = Url::parse(target) {
        return Ok(url);
    }

    let base = base.ok_or_else(|| {
        SakError::command(format!(
            "Relative URL {target} needs a base, set fetch-url first"
        ))
    })?;
    let base =
        Url::parse(base).map_err(|e| SakError::command(format!("Invalid fetch-url {base}: {e}")))?;
    base.join(target)
        .map_err(|e| SakError::command(format!("Invalid URL {target}: {e}")))
}

/// Pretty-prints JSON bodies. Anything else comes back untouched.
pub fn pretty(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_string()),
        Err(e) => {
            warn!("response is not JSON ({e}), printing as-is");
            body.to_string()
        }
    }
}

impl ParameterizedCommand for Fetch {
    fn schema(&self) -> OptionSchema {
        OptionSchema::new()
            .option(OptionSpec::flag("raw", "Print the body without reformatting"))
            .positional(PositionalSpec::one("url", "URL, or a path relative to fetch-url").required())
    }

    fn execute(
        &self,
        _ctx: &InvocationContext,
        options: ParsedOptions,
        out: &mut dyn Write,
    ) -> Result<ExitStatus> {
        let target = options
            .get("url")
            .ok_or_else(|| SakError::command("No URL given"))?;
        let url = resolve_url(self.base_url.as_deref(), target)?;

        debug!(%url, "fetching");
        let response = reqwest::blocking::get(url.clone())?;
        let status = response.status();
        if !status.is_success() {
            return Err(SakError::command(format!("GET {url} returned {status}")));
        }

        let body = response.text()?;
        let body = if options.is_present("raw") {
            body
        } else {
            pretty(&body)
        };

        out.write_all(body.as_bytes())?;
        if !body.ends_with('\n') {
            writeln!(out)?;
        }
        Ok(ExitStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_url_ignores_base() {
        let url = resolve_url(Some("http://localhost:8080/"), "https://example.com/x").unwrap();
        assert_eq!(url.as_str(), "https://example.com/x");
    }

    #[test]
    fn test_relative_url_joins_base() {
        let url = resolve_url(Some("http://localhost:8080/api/"), "users/1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/users/1");

        let url = resolve_url(Some("http://localhost:8080/api/"), "/health").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/health");
    }

    #[test]
    fn test_relative_url_without_base() {
        let err = resolve_url(None, "users/1").unwrap_err();
        assert!(err.to_string().contains("fetch-url"));
    }

    #[test]
    fn test_invalid_base() {
        let err = resolve_url(Some("not a url"), "users/1").unwrap_err();
        assert!(err.to_string().starts_with("Invalid fetch-url"));
    }

    #[test]
    fn test_pretty_json() {
        assert_eq!(pretty(r#"{"a":[1,2]}"#), "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
    }

    #[test]
    fn test_pretty_leaves_text_alone() {
        assert_eq!(pretty("<html></html>"), "<html></html>");
    }

    #[test]
    fn test_missing_url_is_a_parse_error() {
        let registry = crate::registry::Registry::builder()
            .parameterized("fetch", "Fetch a URL", Fetch::new(None))
            .build()
            .unwrap();
        let ctx = InvocationContext::new("sak", ["fetch", "--raw"]);
        let err = crate::dispatch::dispatch(&registry, &ctx, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, SakError::OptionParse(_)));
    }
}

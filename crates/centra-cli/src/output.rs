//! Rendering for centra commands and their errors.
//!
//! Each command builds one serializable output value and hands it to
//! [`render_mode`] with a text and a pretty renderer. JSON output is the
//! serialized value itself, so every mode reports the same numbers.
//!
//! # Choosing a mode
//!
//! First match wins:
//! 1. `--format`, then the hidden `--json` flag
//! 2. `FORMAT` env var (`pretty`, `text` or `json`, any case)
//! 3. `output` in `centra.toml` or the user config
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use std::fmt;
use std::io::{self, IsTerminal, Write};

use centra_core::error::ErrorCode;
use centra_core::graph::GraphError;
use centra_core::linalg::LinalgError;
use centra_stats::StatsError;
use clap::ValueEnum;
use serde::Serialize;

/// Width of the rule under pretty section headings.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Horizontal rule for pretty output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Heading line plus rule.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// `key:` padded to a fixed column, then the value.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<14} {}", format!("{key}:"), value.as_ref())
}

/// How a command prints its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Headed sections and aligned columns for a terminal.
    Pretty,
    /// Plain `key value` lines for pipes and scripts.
    Text,
    /// Machine-readable JSON (one object per command).
    Json,
}

impl OutputMode {
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Mode selection without touching the environment or stdout.
///
/// `format_flag`: explicit `--format` value if provided.
/// `json_flag`: hidden `--json` alias.
/// `format_env`: the value of `FORMAT` if set.
/// `config_output`: `output` from the loaded config files.
/// `is_tty`: true if stdout is a TTY.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    config_output: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if json_flag {
        return OutputMode::Json;
    }

    // Unknown values fall through to the next source.
    if let Some(mode) = format_env.and_then(OutputMode::parse) {
        return mode;
    }
    if let Some(mode) = config_output.and_then(OutputMode::parse) {
        return mode;
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, config and TTY
/// defaults.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    config_output: Option<&str>,
) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(
        format_flag,
        json_flag,
        env_val.as_deref(),
        config_output,
        is_tty,
    )
}

/// Print `value` to stdout in `mode`.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_mode_to(&mut out, mode, value, text_fn, pretty_fn)
}

fn render_mode_to<T: Serialize>(
    out: &mut dyn Write,
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, out)?,
        OutputMode::Pretty => pretty_fn(value, out)?,
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Context marker that tags an `anyhow` error with an [`ErrorCode`].
///
/// Loaders wrap their failures in `.context(Coded(...))` so the renderer can
/// report a stable code without knowing the underlying error type.
#[derive(Debug, Clone, Copy)]
pub struct Coded(pub ErrorCode);

impl fmt::Display for Coded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.message())
    }
}

/// Best-effort error code for an `anyhow` error.
pub fn error_code(err: &anyhow::Error) -> ErrorCode {
    if let Some(Coded(code)) = err.downcast_ref::<Coded>() {
        return *code;
    }
    if let Some(e) = err.downcast_ref::<GraphError>() {
        return e.code();
    }
    if let Some(e) = err.downcast_ref::<LinalgError>() {
        return e.code();
    }
    if let Some(e) = err.downcast_ref::<StatsError>() {
        return e.code();
    }
    ErrorCode::InternalUnexpected
}

/// A structured error with optional hint and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Full `anyhow` chain, outermost context first.
    pub message: String,
    /// Remediation hint attached to the error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Machine-readable error code (e.g. "E2004").
    pub error_code: String,
}

impl From<&anyhow::Error> for CliError {
    fn from(err: &anyhow::Error) -> Self {
        let code = error_code(err);
        Self {
            message: format!("{err:#}"),
            hint: code.hint().map(str::to_string),
            error_code: code.code().to_string(),
        }
    }
}

/// Print `error` to stderr; JSON mode wraps it as `{"error": ...}`.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    render_error_to(&mut out, mode, error)
}

fn render_error_to(out: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            writeln!(out, "error[{}]: {}", error.error_code, error.message)?;
            if let Some(ref hint) = error.hint {
                writeln!(out, "  hint: {hint}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use centra_core::NodeId;

    // ── resolve_output_mode_inner ───────────────────────────────────────────

    #[test]
    fn resolve_format_flag_wins_over_json_and_env() {
        let mode =
            resolve_output_mode_inner(Some(OutputMode::Text), true, Some("pretty"), None, true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_json_flag_wins_over_env() {
        let mode = resolve_output_mode_inner(None, true, Some("text"), Some("pretty"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_env_wins_over_config() {
        let mode = resolve_output_mode_inner(None, false, Some("JSON"), Some("text"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_config_wins_over_tty() {
        let mode = resolve_output_mode_inner(None, false, None, Some("text"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_unknown_values_fall_through_to_tty() {
        let mode = resolve_output_mode_inner(None, false, Some("yaml"), Some("xml"), true);
        assert_eq!(mode, OutputMode::Pretty);
        let mode = resolve_output_mode_inner(None, false, None, None, false);
        assert_eq!(mode, OutputMode::Text);
    }

    // ── rendering ───────────────────────────────────────────────────────────

    #[test]
    fn render_mode_dispatches() {
        let value = serde_json::json!({ "n": 1 });
        let mut buf = Vec::new();
        render_mode_to(
            &mut buf,
            OutputMode::Text,
            &value,
            |_, w| writeln!(w, "text"),
            |_, w| writeln!(w, "pretty"),
        )
        .expect("render");
        assert_eq!(String::from_utf8_lossy(&buf), "text\n");

        let mut buf = Vec::new();
        render_mode_to(&mut buf, OutputMode::Json, &value, |_, _| Ok(()), |_, _| Ok(()))
            .expect("render");
        let parsed: serde_json::Value = serde_json::from_slice(&buf).expect("valid json");
        assert_eq!(parsed["n"], 1);
    }

    // ── errors ──────────────────────────────────────────────────────────────

    #[test]
    fn typed_errors_keep_their_code_through_context() {
        let err = anyhow::Error::new(GraphError::NodeNotFound(NodeId(42)))
            .context("while enumerating paths");
        assert_eq!(error_code(&err), ErrorCode::NodeNotFound);

        let err = anyhow::Error::new(StatsError::DegenerateVariance);
        assert_eq!(error_code(&err), ErrorCode::DegenerateVariance);
    }

    #[test]
    fn coded_context_sets_code_and_message() {
        let err: anyhow::Result<()> = Err(anyhow::anyhow!("unexpected token"));
        let err = err
            .context(Coded(ErrorCode::DatasetParseError))
            .expect_err("is an error");
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code, "E1002");
        assert!(cli.message.starts_with("Dataset file parse error"));
        assert!(cli.message.contains("unexpected token"));
        assert!(cli.hint.is_some());
    }

    #[test]
    fn untyped_errors_are_internal() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(error_code(&err), ErrorCode::InternalUnexpected);
    }

    #[test]
    fn render_error_text_has_code_prefix() {
        let err = anyhow::Error::new(GraphError::NodeNotFound(NodeId(7)));
        let mut buf = Vec::new();
        render_error_to(&mut buf, OutputMode::Text, &CliError::from(&err)).expect("render");
        let text = String::from_utf8_lossy(&buf);
        assert!(text.starts_with("error[E2004]: node 7 is not in the graph"));
        assert!(text.contains("  hint: "));
    }

    #[test]
    fn render_error_json() {
        let err = anyhow::Error::new(LinalgError::Degenerate { iterations: 1 });
        let mut buf = Vec::new();
        render_error_to(&mut buf, OutputMode::Json, &CliError::from(&err)).expect("render");
        let parsed: serde_json::Value = serde_json::from_slice(&buf).expect("valid json");
        assert_eq!(parsed["error"]["error_code"], "E3003");
    }
}

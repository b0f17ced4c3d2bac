//! Conversion of downloaded images into the canonical avatar format.
//!
//! The actual work is delegated to a system image tool. The argv is a
//! template so the tool can be swapped without a rebuild.
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env::{self, VarError};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Instant;

/// Edge length of the square avatar, in pixels.
pub const AVATAR_SIZE: u32 = 256;

pub const CONVERT_COMMAND_ENV: &str = "QUOTE_AVATAR_CONVERT_COMMAND";

const INPUT_PLACEHOLDER: &str = "{input}";
const OUTPUT_PLACEHOLDER: &str = "{output}";
const SIZE_PLACEHOLDER: &str = "{size}";

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConvertCommandConfig {
    command: Vec<String>,
}

/// External converter invocation with `{input}`, `{output}` and `{size}`
/// placeholders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Converter {
    argv: Vec<String>,
    size: u32,
}

impl Converter {
    pub fn new(argv: Vec<String>, size: u32) -> Result<Self> {
        if argv.is_empty() {
            return Err(anyhow!("convert command is empty"));
        }
        if !argv.iter().any(|arg| arg.contains(OUTPUT_PLACEHOLDER)) {
            return Err(anyhow!("convert command has no {OUTPUT_PLACEHOLDER} placeholder"));
        }
        Ok(Self { argv, size })
    }

    /// Converter from `QUOTE_AVATAR_CONVERT_COMMAND`, else the first image
    /// tool found on `PATH`. `Ok(None)` when neither is available.
    pub fn from_env(size: u32) -> Result<Option<Self>> {
        Self::from_var(env::var(CONVERT_COMMAND_ENV), size)
    }

    fn from_var(var: Result<String, VarError>, size: u32) -> Result<Option<Self>> {
        match var {
            Ok(raw) => {
                let argv = parse_command_config(&raw)
                    .with_context(|| format!("parse {CONVERT_COMMAND_ENV}"))?;
                Self::new(argv, size).map(Some)
            }
            Err(VarError::NotUnicode(_)) => {
                Err(anyhow!("{CONVERT_COMMAND_ENV} is not valid UTF-8"))
            }
            Err(VarError::NotPresent) => match detect_tool_argv() {
                Some(argv) => Self::new(argv, size).map(Some),
                None => Ok(None),
            },
        }
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    fn render_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let size = self.size.to_string();
        let input = input.display().to_string();
        let output = output.display().to_string();
        self.argv[1..]
            .iter()
            .map(|arg| {
                arg.replace(INPUT_PLACEHOLDER, &input)
                    .replace(OUTPUT_PLACEHOLDER, &output)
                    .replace(SIZE_PLACEHOLDER, &size)
            })
            .collect()
    }

    /// Convert `input` into a square PNG at `output`.
    ///
    /// Succeeds only when the tool exits 0 and `output` exists afterwards.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let args = self.render_args(input, output);
        let start = Instant::now();
        let result = Command::new(self.program())
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("run {}", self.program()))?;
        tracing::debug!(
            program = self.program(),
            elapsed_ms = start.elapsed().as_millis(),
            status = %result.status,
            "convert complete"
        );

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let detail = stderr.trim().lines().next().unwrap_or_default().to_string();
            return Err(anyhow!(
                "{} failed ({}){}",
                self.program(),
                result.status,
                if detail.is_empty() {
                    String::new()
                } else {
                    format!(": {detail}")
                }
            ));
        }
        if !output.exists() {
            return Err(anyhow!(
                "{} exited 0 but wrote no {}",
                self.program(),
                output.display()
            ));
        }
        Ok(())
    }
}

/// Accept either `{"command": [...]}` JSON or a shell-style command line.
fn parse_command_config(raw: &str) -> Result<Vec<String>> {
    let raw = raw.trim();
    let argv = if raw.starts_with('{') {
        let config: ConvertCommandConfig =
            serde_json::from_str(raw).context("parse convert command JSON")?;
        config.command
    } else {
        shell_words::split(raw).context("split convert command")?
    };
    if argv.is_empty() {
        return Err(anyhow!("convert command is empty"));
    }
    Ok(argv)
}

fn detect_tool_argv() -> Option<Vec<String>> {
    if which::which("sips").is_ok() {
        return Some(sips_argv());
    }
    ["magick", "convert"]
        .into_iter()
        .find(|tool| which::which(tool).is_ok())
        .map(imagemagick_argv)
}

fn sips_argv() -> Vec<String> {
    [
        "sips",
        "-s",
        "format",
        "png",
        "-z",
        SIZE_PLACEHOLDER,
        SIZE_PLACEHOLDER,
        INPUT_PLACEHOLDER,
        "--out",
        OUTPUT_PLACEHOLDER,
    ]
    .iter()
    .map(|arg| arg.to_string())
    .collect()
}

// `!` forces the exact size, matching `sips -z`.
fn imagemagick_argv(tool: &str) -> Vec<String> {
    vec![
        tool.to_string(),
        INPUT_PLACEHOLDER.to_string(),
        "-resize".to_string(),
        format!("{SIZE_PLACEHOLDER}x{SIZE_PLACEHOLDER}!"),
        format!("png:{OUTPUT_PLACEHOLDER}"),
    ]
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;

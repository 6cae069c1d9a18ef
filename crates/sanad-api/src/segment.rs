//! The external morphological segmenter, consumed as a black box.
//!
//! The contract is one call: text in, whitespace-separated sub-word tokens
//! out, with `+` marking internal affix boundaries. Anything that implements
//! [`Segmenter`] can back the pipeline; closures qualify, which is how tests
//! fake segmenter behaviour without a process boundary.

use std::io::Write;
use std::process::{Command, Stdio};

use thiserror::Error;

/// Errors from a segmentation attempt. The matcher folds all of them into
/// its "segmenter unavailable" outcome.
#[derive(Debug, Error)]
pub enum SegmenterError {
    #[error("failed to run segmenter: {0}")]
    Io(#[from] std::io::Error),
    #[error("segmenter exited with {0}")]
    Failed(std::process::ExitStatus),
    #[error("segmenter produced non-utf8 output")]
    InvalidOutput,
}

/// A sentence segmenter. Output is whitespace-separated sub-word tokens,
/// some carrying an internal `+` join marker.
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Result<String, SegmenterError>;
}

impl<F> Segmenter for F
where
    F: Fn(&str) -> Result<String, SegmenterError> + Send + Sync,
{
    fn segment(&self, text: &str) -> Result<String, SegmenterError> {
        self(text)
    }
}

/// Runs an external segmenter command per call: the sentence goes to stdin,
/// the token stream comes back on stdout.
#[derive(Clone, Debug)]
pub struct CommandSegmenter {
    program: String,
    args: Vec<String>,
}

impl CommandSegmenter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Split a shell-ish command line into program + args. Returns `None`
    /// for a blank line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let program = words.next()?.to_string();
        let args = words.map(str::to_string).collect();
        Some(Self { program, args })
    }
}

impl Segmenter for CommandSegmenter {
    fn segment(&self, text: &str) -> Result<String, SegmenterError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(SegmenterError::Failed(output.status));
        }
        let tokens =
            String::from_utf8(output.stdout).map_err(|_| SegmenterError::InvalidOutput)?;
        Ok(tokens.trim().to_string())
    }
}

/// Degraded fallback when no external segmenter is configured: sentences
/// pass through on their existing whitespace, so affix splits are never
/// produced and never repaired.
#[derive(Clone, Copy, Debug, Default)]
pub struct WhitespaceSegmenter;

impl Segmenter for WhitespaceSegmenter {
    fn segment(&self, text: &str) -> Result<String, SegmenterError> {
        Ok(text.to_string())
    }
}

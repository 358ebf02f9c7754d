//! Optional clipboard capability backed by a system copy tool.
//!
//! Detection runs once at startup; the result is an `Option<Clipboard>` that
//! the binary passes to whatever needs it.

use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Copy tools in probe order: program name and the arguments that make it
/// read the clipboard contents from stdin.
const TOOLS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip.exe", &[]),
];

/// A located clipboard tool.
#[derive(Debug, Clone)]
pub struct Clipboard {
    program: PathBuf,
    args: &'static [&'static str],
}

impl Clipboard {
    /// Locate the first available copy tool on `PATH`.
    pub fn detect() -> Option<Self> {
        TOOLS.iter().find_map(|(name, args)| {
            let program = which::which(name).ok()?;
            debug!(tool = *name, path = %program.display(), "clipboard tool found");
            Some(Self {
                program,
                args: *args,
            })
        })
    }

    /// Path of the tool in use.
    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    /// Send `text` to the clipboard.
    pub fn copy(&self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start {}", self.program.display()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.program.display()))?;
        }

        let status = child
            .wait()
            .with_context(|| format!("Failed to wait for {}", self.program.display()))?;
        if !status.success() {
            bail!("{} exited with {}", self.program.display(), status);
        }
        Ok(())
    }
}

/// Copy `text` if a tool is available, logging instead of failing.
pub fn copy_or_warn(clipboard: Option<&Clipboard>, text: &str) -> bool {
    let Some(clipboard) = clipboard else {
        warn!("no clipboard tool found; install pbcopy, wl-copy, xclip or xsel");
        return false;
    };
    match clipboard.copy(text) {
        Ok(()) => {
            println!("Copied to clipboard.");
            true
        }
        Err(err) => {
            warn!(error = %err, "clipboard copy failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_returns_known_tool() {
        // Availability depends on the host; only the shape is checked
        if let Some(clipboard) = Clipboard::detect() {
            let name = clipboard
                .program()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            assert!(TOOLS.iter().any(|(tool, _)| *tool == name));
        }
    }

    #[test]
    fn test_failing_tool_is_error() {
        let Ok(program) = which::which("false") else {
            return;
        };
        let clipboard = Clipboard { program, args: &[] };
        assert!(clipboard.copy("text").is_err());
        assert!(!copy_or_warn(Some(&clipboard), "text"));
    }

    #[test]
    fn test_missing_tool_does_not_copy() {
        assert!(!copy_or_warn(None, "text"));
    }
}

//! Clipboard and file export of the finalized document.
//!
//! Both are explicit user actions on the result screen and sit outside the
//! lifecycle; their failures surface as notifications only.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::errors::SideEffectError;

/// Fixed name of the exported document.
pub const EXPORT_FILE_NAME: &str = "cover_letter.txt";

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), SideEffectError>;
}

#[async_trait]
pub trait DocumentExporter: Send + Sync {
    /// Writes `text` as a plain-text file and returns where it landed.
    async fn export(&self, file_name: &str, text: &str) -> Result<PathBuf, SideEffectError>;
}

/// Pipes text into the platform's clipboard command.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// `pbcopy` on macOS, `wl-copy` under Wayland, `xclip` otherwise.
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("pbcopy", &[])
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            Self::new("wl-copy", &[])
        } else {
            Self::new("xclip", &["-selection", "clipboard"])
        }
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn write_text(&self, text: &str) -> Result<(), SideEffectError> {
        debug!("Copying {} bytes via {}", text.len(), self.program);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(SideEffectError::Clipboard(format!(
                "{} exited with {status}",
                self.program
            )));
        }
        Ok(())
    }
}

/// Writes exports into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct FileExporter {
    dir: PathBuf,
}

impl FileExporter {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl DocumentExporter for FileExporter {
    async fn export(&self, file_name: &str, text: &str) -> Result<PathBuf, SideEffectError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, text).await?;
        debug!("Exported document to {}", path.display());
        Ok(path)
    }
}

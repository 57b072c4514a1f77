//! Output-folder bookkeeping: per-step dumps and the append-only token log.
//!
//! The folder is wiped on setup so every run starts from a clean slate,
//! matching the demo's behavior.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::crew::TokenUsage;
use crate::models::Element;
use crate::Result;

/// One line of `token_use.jsonl`.
#[derive(Debug, Clone, Serialize)]
pub struct TokenUseRecord {
    /// Which crew made the call ("planner", "interact", "extract").
    pub crew: String,
    /// Plan step the call belonged to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
    pub logged_at: DateTime<Utc>,
    #[serde(flatten)]
    pub usage: TokenUsage,
}

impl TokenUseRecord {
    pub fn new(crew: &str, step: Option<u32>, usage: TokenUsage) -> Self {
        Self {
            crew: crew.to_string(),
            step,
            logged_at: Utc::now(),
            usage,
        }
    }
}

/// A run's output directory.
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    /// Delete the directory if it exists and recreate it empty.
    pub fn reset(path: impl Into<PathBuf>) -> Result<Self> {
        let root = path.into();
        if root.exists() {
            debug!("deleting output folder {}", root.display());
            fs::remove_dir_all(&root)?;
        }
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Pretty-printed element dump for one step.
    pub fn write_elements(&self, step: usize, elements: &[Element]) -> Result<PathBuf> {
        let path = self.root.join(format!("interactive_elements_{}.json", step));
        let mut file = File::create(&path)?;
        serde_json::to_writer_pretty(&mut file, elements)?;
        debug!("interactive elements dumped to {}", path.display());
        Ok(path)
    }

    /// Minified stripped-element JSON for one step, as sent to the agent.
    pub fn write_minified_elements(&self, step: usize, minified: &str) -> Result<PathBuf> {
        let path = self
            .root
            .join(format!("interactive_elements_minified_{}.json", step));
        fs::write(&path, minified)?;
        Ok(path)
    }

    /// Markdown dump for one step.
    pub fn write_markdown(&self, step: usize, markdown: &str) -> Result<PathBuf> {
        let path = self.root.join(format!("{}.md", step));
        fs::write(&path, markdown)?;
        Ok(path)
    }

    /// Latest observation screenshot (overwritten each step).
    pub fn write_screenshot(&self, png: &[u8]) -> Result<PathBuf> {
        let path = self.root.join("screenshot.png");
        fs::write(&path, png)?;
        Ok(path)
    }

    /// Append one record to the token-usage log.
    pub fn append_token_use(&self, record: &TokenUseRecord) -> Result<()> {
        let path = self.root.join("token_use.jsonl");
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

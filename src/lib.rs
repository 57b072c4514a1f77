//! # surfcrew
//!
//! Crew-of-agents browser automation. A planner agent turns a natural-language
//! request into a step-by-step task list, an element-selection agent picks the
//! interactive element for each step from a compact DOM dump, and an extraction
//! agent pulls the requested information out of the final page's markdown.
//!
//! All reasoning is delegated to LLM providers through [`genai`]; the browser
//! is driven through [`eoka`]. This crate supplies the glue: DOM enumeration,
//! HTML-to-markdown conversion, the DTOs crossing the LLM boundary, and the
//! sequential driver loop with its output/token bookkeeping.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use surfcrew::{Job, ModelConfig, Runner, RunnerConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> surfcrew::Result<()> {
//! let mut runner = Runner::new(&RunnerConfig {
//!     headless: true,
//!     output_dir: "output".into(),
//!     pause_between_steps: false,
//!     models: ModelConfig::default(),
//! })
//! .await?;
//!
//! let report = runner
//!     .run(&Job {
//!         url: "https://www.destandaard.be".into(),
//!         task: "Give a quick overview of the 10 latest news articles.".into(),
//!         plan_guide: "Only do a 2 step plan because the info is on the main page.".into(),
//!     })
//!     .await?;
//!
//! println!("{:?}", report.answer);
//! runner.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod crew;
pub mod crews;
pub mod interact;
pub mod markdown;
pub mod models;
pub mod observe;
pub mod output;
mod runner;

pub use crew::{Agent, AgentOutput, TokenUsage};
pub use crews::{CrewSet, ModelConfig};
pub use models::{Element, ElementChoice, StrippedElement, TaskPlan, TaskStep};
pub use output::{OutputDir, TokenUseRecord};
pub use runner::{Job, RunReport, Runner, RunnerConfig};

/// Result type for surfcrew operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning or executing a browsing job.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("browser error: {0}")]
    Browser(#[from] eoka::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("llm error: {0}")]
    Llm(#[from] genai::Error),

    #[error("plan error: {0}")]
    Plan(String),

    #[error("agent returned malformed output: {0}")]
    BadAgentOutput(String),

    #[error("element [{0}] is not in the current element list")]
    ElementNotFound(u32),

    #[error("unsupported tag <{0}> — only button, a and input can be interacted with")]
    UnsupportedTag(String),

    #[error("element [{0}] is an <input> and requires a value to fill")]
    MissingArgument(u32),
}

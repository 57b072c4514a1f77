//! The sequential driver loop: plan once, then act step by step, extracting
//! the answer on the final step.

use std::path::PathBuf;
use std::time::Instant;

use eoka::{Browser, Page, StealthConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::crews::{CrewSet, ModelConfig};
use crate::models::{minify_elements, prepare_elements};
use crate::output::{OutputDir, TokenUseRecord};
use crate::{interact, markdown, observe, Result};

const VIEWPORT_WIDTH: u32 = 1280;
const VIEWPORT_HEIGHT: u32 = 1024;
const IDLE_MS: u64 = 500;
const IDLE_TIMEOUT_MS: u64 = 10_000;

/// One browsing job.
#[derive(Debug, Clone)]
pub struct Job {
    /// Page to start from.
    pub url: String,
    /// The user's request, handed to the planner verbatim.
    pub task: String,
    /// Extra guideline appended to the planner prompt.
    pub plan_guide: String,
}

/// How to set up the runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub headless: bool,
    pub output_dir: PathBuf,
    /// Wait for Enter on stdin after each step.
    pub pause_between_steps: bool,
    pub models: ModelConfig,
}

/// Result of running a job.
#[derive(Debug)]
pub struct RunReport {
    /// Steps of the plan that were executed.
    pub steps_executed: usize,
    /// The extraction crew's answer from the final step.
    pub answer: Option<String>,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

/// Owns the browser, the crews and the output folder for one run.
pub struct Runner {
    browser: Browser,
    page: Page,
    crews: CrewSet,
    output: OutputDir,
    pause: bool,
}

impl Runner {
    pub async fn new(config: &RunnerConfig) -> Result<Self> {
        let output = OutputDir::reset(&config.output_dir)?;

        let stealth = StealthConfig {
            headless: config.headless,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            ..Default::default()
        };
        debug!("launching browser (headless: {})", config.headless);
        let browser = Browser::launch_with_config(stealth).await?;
        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            page,
            crews: CrewSet::new(&config.models),
            output,
            pause: config.pause_between_steps,
        })
    }

    /// Get a reference to the page.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Where the dumps and logs of this run land.
    pub fn output(&self) -> &OutputDir {
        &self.output
    }

    /// Plan and execute a job end to end.
    pub async fn run(&mut self, job: &Job) -> Result<RunReport> {
        let start = Instant::now();

        info!("navigating to {}", job.url);
        self.page.goto(&job.url).await?;
        self.settle().await;

        let (plan, usage) = self.crews.plan(&job.task, &job.plan_guide).await?;
        self.output
            .append_token_use(&TokenUseRecord::new("planner", None, usage))?;
        info!("plan has {} steps", plan.tasks.len());
        for step in &plan.tasks {
            debug!("  {}", step);
        }

        let last = plan.tasks.len() - 1;
        let mut previous: Option<String> = None;
        let mut answer = None;
        let mut steps_executed = 0;

        for (i, step) in plan.tasks.iter().enumerate() {
            let label = step.to_string();
            info!("step {}/{}: {}", i + 1, plan.tasks.len(), step.task);

            if i == last {
                answer = Some(self.extraction_step(i, &label).await?);
            } else {
                self.interaction_step(i, &label, previous.as_deref()).await?;
            }

            steps_executed += 1;
            previous = Some(label);
            self.maybe_pause().await?;
        }

        Ok(RunReport {
            steps_executed,
            answer,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Observe the page, let the interact crew pick an element, act on it.
    async fn interaction_step(
        &mut self,
        step: usize,
        task: &str,
        previous: Option<&str>,
    ) -> Result<()> {
        self.settle().await;

        let elements = observe::observe(&self.page).await?;
        info!("observed {} interactive elements", elements.len());

        let png = self.page.screenshot().await?;
        self.output.write_screenshot(&png)?;
        observe::clear_highlights(&self.page).await?;

        self.output.write_elements(step, &elements)?;
        let minified = minify_elements(&prepare_elements(&elements))?;
        self.output.write_minified_elements(step, &minified)?;

        let (choice, usage) = self.crews.pick_element(task, previous, &minified).await?;
        self.output
            .append_token_use(&TokenUseRecord::new("interact", Some(step as u32), usage))?;

        interact::apply(&self.page, &elements, &choice).await?;
        self.settle().await;
        Ok(())
    }

    /// Dump the page as markdown and let the extract crew answer the task.
    async fn extraction_step(&mut self, step: usize, task: &str) -> Result<String> {
        let md = markdown::page_markdown(&self.page).await?;
        debug!("markdown is {} tokens", markdown::count_tokens(&md));
        self.output.write_markdown(step, &md)?;

        let (answer, usage) = self.crews.extract(task, &md).await?;
        self.output
            .append_token_use(&TokenUseRecord::new("extract", Some(step as u32), usage))?;
        Ok(answer)
    }

    /// Best-effort wait for the page to quiet down. Some sites never stop
    /// polling, so a timeout here is not an error.
    async fn settle(&self) {
        if let Err(e) = self.page.wait_for_network_idle(IDLE_MS, IDLE_TIMEOUT_MS).await {
            warn!("network did not go idle: {}", e);
        }
    }

    async fn maybe_pause(&self) -> Result<()> {
        if !self.pause {
            return Ok(());
        }
        println!("Press Enter to continue");
        let mut line = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        Ok(())
    }

    /// Close the browser.
    pub async fn close(self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }
}

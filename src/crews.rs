//! The three crews of the demo: plan, pick-and-act, extract.
//!
//! A planner turns
//! the user request into numbered steps, a scraper model picks the element id
//! for each step from the minified element list, and an extractor answers the
//! final step from the page markdown.

use genai::Client;
use tracing::info;

use crate::crew::{Agent, TokenUsage};
use crate::models::{ElementChoice, TaskPlan};
use crate::Result;

/// Which model serves each crew: Gemini for planning and extraction, a
/// Groq-hosted llama for element selection.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub planner: String,
    pub scraper: String,
    pub extractor: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            planner: "gemini-1.5-flash".into(),
            scraper: "llama-3.2-90b-vision-preview".into(),
            extractor: "gemini-1.5-flash".into(),
        }
    }
}

const PLANNER_GOAL: &str = "Create a step-by-step task list on how you can achieve the requested task. \
Consider that most web pages have a cookie consent, which should be a separate step. \
Always focus on interacting with the search functionality to reach a goal unless the user asked not to! \
Skip the navigate-to-page step. \
When doing a search put clicking on the search functionality, entering the search string and potentially clicking on search into separate steps. \
When doing a search expect that after entering the search string and/or clicking search the search results appear and should be picked from the list. \
Answer with JSON only, of the shape {\"tasks\": [{\"Nr\": 1, \"Task\": \"...\", \"Outcome\": \"...\"}]}.";

const SCRAPER_GOAL: &str = "Identify the most relevant element in the provided element list to achieve \
the given task. Return its id and, if the element is an input, the value to fill into it. \
Make sure that the returned id is present in the element list! \
Answer with JSON only, of the shape {\"id\": 0, \"arguments\": \"optional string, only for inputs\"}.";

const EXTRACTOR_GOAL: &str =
    "Extract the requested information based on a given task and return it.";

/// The demo's three sequential crews, sharing one provider client.
pub struct CrewSet {
    client: Client,
    planner: Agent,
    scraper: Agent,
    extractor: Agent,
}

impl CrewSet {
    pub fn new(models: &ModelConfig) -> Self {
        Self {
            client: Client::default(),
            planner: Agent {
                role: "an expert web interaction planner".into(),
                goal: PLANNER_GOAL.into(),
                backstory: "Based on a task you think about which steps should be needed to achieve it."
                    .into(),
                model: models.planner.clone(),
                temperature: 0.0,
            },
            scraper: Agent {
                role: "an element interaction analyzer".into(),
                goal: SCRAPER_GOAL.into(),
                backstory: "You are an expert in analyzing webpage elements and identifying the best element to interact with to complete a task."
                    .into(),
                model: models.scraper.clone(),
                temperature: 0.0,
            },
            extractor: Agent {
                role: "a summarizer".into(),
                goal: EXTRACTOR_GOAL.into(),
                backstory: "You are an expert in extracting information given in a task from a markdown document."
                    .into(),
                model: models.extractor.clone(),
                temperature: 0.0,
            },
        }
    }

    /// Planner crew: user request + guideline → task plan.
    pub async fn plan(&self, user_task: &str, plan_guide: &str) -> Result<(TaskPlan, TokenUsage)> {
        info!("planning: {}", user_task);
        let input = format!(
            "{user_task}\n\nUse these user guidelines: {plan_guide}",
            user_task = user_task,
            plan_guide = plan_guide
        );
        let out = self.planner.execute(&self.client, &input).await?;
        let plan = TaskPlan::parse(&out.text)?;
        Ok((plan, out.usage))
    }

    /// Interact crew, selection half: task + element list → element choice.
    pub async fn pick_element(
        &self,
        task: &str,
        previous: Option<&str>,
        minified_elements: &str,
    ) -> Result<(ElementChoice, TokenUsage)> {
        let input = format!(
            "Task: {task}\n\nPrevious executed task: {previous}\n\nElement list: {elements}",
            task = task,
            previous = previous.unwrap_or("none"),
            elements = minified_elements
        );
        let out = self.scraper.execute(&self.client, &input).await?;
        let choice = ElementChoice::parse(&out.text)?;
        Ok((choice, out.usage))
    }

    /// Extract crew: task + page markdown → answer text.
    pub async fn extract(&self, task: &str, page_markdown: &str) -> Result<(String, TokenUsage)> {
        let input = format!(
            "Extract the information requested in the task below from the markdown document.\n\nTask: {task}\n\nMarkdown:\n{markdown}",
            task = task,
            markdown = page_markdown
        );
        let out = self.extractor.execute(&self.client, &input).await?;
        Ok((out.text, out.usage))
    }
}

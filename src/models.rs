//! DTOs crossing the LLM boundary: element descriptors, their stripped
//! projection, and the planner's task list.
//!
//! Field names follow the JSON the agents see (`idAttr`, `ariaLabel`,
//! `innerText`, `Nr`/`Task`/`Outcome`); absent fields are omitted from
//! serialization to keep the element lists small.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An interactive element on the page and how to locate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Position in the element list; stable until the next observation.
    pub id: u32,
    /// Lowercase HTML tag name ("button", "a", "input", ...).
    pub tag: String,
    /// The element's `id` attribute, if any.
    #[serde(rename = "idAttr", skip_serializing_if = "Option::is_none", default)]
    pub id_attr: Option<String>,
    /// `aria-label` attribute, if any.
    #[serde(rename = "ariaLabel", skip_serializing_if = "Option::is_none", default)]
    pub aria_label: Option<String>,
    /// Trimmed visible text, if any.
    #[serde(rename = "innerText", skip_serializing_if = "Option::is_none", default)]
    pub inner_text: Option<String>,
    /// CSS selector that locates the element.
    pub selector: String,
}

/// [`Element`] minus everything the selection agent does not need.
///
/// The selector stays on our side of the boundary; the agent answers with the
/// id and we resolve it back against the full list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrippedElement {
    pub id: u32,
    pub tag: String,
    #[serde(rename = "ariaLabel", skip_serializing_if = "Option::is_none", default)]
    pub aria_label: Option<String>,
    #[serde(rename = "innerText", skip_serializing_if = "Option::is_none", default)]
    pub inner_text: Option<String>,
}

impl From<&Element> for StrippedElement {
    fn from(el: &Element) -> Self {
        Self {
            id: el.id,
            tag: el.tag.clone(),
            aria_label: el.aria_label.clone(),
            inner_text: el.inner_text.clone(),
        }
    }
}

/// Project a full element list down to what the selection agent sees.
pub fn prepare_elements(elements: &[Element]) -> Vec<StrippedElement> {
    elements.iter().map(StrippedElement::from).collect()
}

/// Minified JSON string of a stripped element list.
pub fn minify_elements(elements: &[StrippedElement]) -> Result<String> {
    Ok(serde_json::to_string(elements)?)
}

/// One step of the execution plan, as produced by the planner crew.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStep {
    #[serde(rename = "Nr")]
    pub nr: u32,
    #[serde(rename = "Task")]
    pub task: String,
    #[serde(rename = "Outcome")]
    pub outcome: String,
}

impl fmt::Display for TaskStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.nr, self.task, self.outcome)
    }
}

/// The full execution plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPlan {
    pub tasks: Vec<TaskStep>,
}

// Planners answer either `{"tasks": [...]}` or a bare array depending on
// model mood; accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum PlanRepr {
    Wrapped { tasks: Vec<TaskStep> },
    Bare(Vec<TaskStep>),
}

impl TaskPlan {
    /// Parse a plan from raw LLM output (code fences tolerated).
    pub fn parse(text: &str) -> Result<Self> {
        let value = crate::crew::extract_json(text)?;
        let repr: PlanRepr = serde_json::from_value(value)
            .map_err(|e| Error::Plan(format!("malformed task list: {}", e)))?;
        let tasks = match repr {
            PlanRepr::Wrapped { tasks } => tasks,
            PlanRepr::Bare(tasks) => tasks,
        };
        if tasks.is_empty() {
            return Err(Error::Plan("planner produced an empty task list".into()));
        }
        Ok(Self { tasks })
    }
}

/// The selection agent's answer: which element to act on, and the input
/// value when the element is an `<input>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementChoice {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub arguments: Option<String>,
}

impl ElementChoice {
    /// Parse a choice from raw LLM output (code fences tolerated).
    pub fn parse(text: &str) -> Result<Self> {
        let value = crate::crew::extract_json(text)?;
        serde_json::from_value(value)
            .map_err(|e| Error::BadAgentOutput(format!("malformed element choice: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_element() -> Element {
        Element {
            id: 3,
            tag: "input".into(),
            id_attr: Some("search".into()),
            aria_label: Some("Search".into()),
            inner_text: None,
            selector: "#search".into(),
        }
    }

    #[test]
    fn test_stripped_projection_drops_selector() {
        let el = sample_element();
        let stripped = StrippedElement::from(&el);
        assert_eq!(stripped.id, el.id);
        assert_eq!(stripped.tag, el.tag);
        assert_eq!(stripped.aria_label, el.aria_label);
        assert_eq!(stripped.inner_text, el.inner_text);

        let json = serde_json::to_value(&stripped).unwrap();
        assert!(json.get("selector").is_none());
        assert!(json.get("idAttr").is_none());
    }

    #[test]
    fn test_element_serializes_camel_case_and_omits_absent() {
        let el = sample_element();
        let json = serde_json::to_string(&el).unwrap();
        assert!(json.contains("\"idAttr\":\"search\""));
        assert!(json.contains("\"ariaLabel\":\"Search\""));
        assert!(!json.contains("innerText"));
        assert!(json.contains("\"selector\":\"#search\""));
    }

    #[test]
    fn test_element_deserializes_from_observe_output() {
        let raw = r#"{"id":0,"tag":"a","innerText":"Home","selector":"nav > a:nth-of-type(1)"}"#;
        let el: Element = serde_json::from_str(raw).unwrap();
        assert_eq!(el.id, 0);
        assert_eq!(el.tag, "a");
        assert_eq!(el.inner_text.as_deref(), Some("Home"));
        assert!(el.id_attr.is_none());
    }

    #[test]
    fn test_minify_round_trips_same_fields() {
        let stripped = prepare_elements(&[sample_element()]);
        let minified = minify_elements(&stripped).unwrap();
        assert!(!minified.contains('\n'));
        assert!(!minified.contains(": "));

        let back: Vec<StrippedElement> = serde_json::from_str(&minified).unwrap();
        assert_eq!(back, stripped);
    }

    #[test]
    fn test_plan_parses_wrapped_object() {
        let plan = TaskPlan::parse(
            r#"{"tasks": [{"Nr": 1, "Task": "Accept cookies", "Outcome": "Banner gone"}]}"#,
        )
        .unwrap();
        assert_eq!(plan.tasks.len(), 1);
        assert_eq!(plan.tasks[0].nr, 1);
        assert_eq!(plan.tasks[0].task, "Accept cookies");
        assert_eq!(plan.tasks[0].outcome, "Banner gone");
    }

    #[test]
    fn test_plan_parses_bare_array_in_fence() {
        let plan = TaskPlan::parse(
            "Here is the plan:\n```json\n[{\"Nr\": 1, \"Task\": \"t\", \"Outcome\": \"o\"},\n {\"Nr\": 2, \"Task\": \"t2\", \"Outcome\": \"o2\"}]\n```",
        )
        .unwrap();
        assert_eq!(plan.tasks.len(), 2);
        assert_eq!(plan.tasks[1].nr, 2);
    }

    #[test]
    fn test_plan_rejects_missing_fields() {
        let result = TaskPlan::parse(r#"[{"Nr": 1, "Task": "no outcome"}]"#);
        assert!(matches!(result, Err(Error::Plan(_))));
    }

    #[test]
    fn test_plan_rejects_empty_list() {
        let result = TaskPlan::parse(r#"{"tasks": []}"#);
        assert!(matches!(result, Err(Error::Plan(_))));
    }

    #[test]
    fn test_step_display() {
        let step = TaskStep {
            nr: 2,
            task: "Click search".into(),
            outcome: "Results shown".into(),
        };
        assert_eq!(step.to_string(), "2 - Click search - Results shown");
    }

    #[test]
    fn test_choice_parses_with_and_without_arguments() {
        let choice = ElementChoice::parse(r#"{"id": 4, "arguments": "rust news"}"#).unwrap();
        assert_eq!(choice.id, 4);
        assert_eq!(choice.arguments.as_deref(), Some("rust news"));

        let choice = ElementChoice::parse("```json\n{\"id\": 7}\n```").unwrap();
        assert_eq!(choice.id, 7);
        assert!(choice.arguments.is_none());
    }
}

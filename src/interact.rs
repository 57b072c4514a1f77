//! The interaction tool — applies an agent's element choice to the live page.
//!
//! Supported interactions mirror the demo's tool surface: click for buttons
//! and links, fill for inputs. Anything else is an error that propagates to
//! the caller; there is no retry here.

use eoka::Page;
use tracing::info;

use crate::models::{Element, ElementChoice};
use crate::{Error, Result};

/// What will be done to the page for a given choice.
#[derive(Debug, Clone, PartialEq)]
pub enum Action<'a> {
    /// Click the element at this selector.
    Click(&'a str),
    /// Fill the element at this selector with the value.
    Fill(&'a str, &'a str),
}

/// Resolve a choice against the current element list without touching the
/// page. Errors: unknown id, unsupported tag, missing input value.
pub fn resolve<'a>(elements: &'a [Element], choice: &'a ElementChoice) -> Result<Action<'a>> {
    let el = elements
        .iter()
        .find(|e| e.id == choice.id)
        .ok_or(Error::ElementNotFound(choice.id))?;

    match el.tag.as_str() {
        "button" | "a" => Ok(Action::Click(&el.selector)),
        "input" => {
            let value = choice
                .arguments
                .as_deref()
                .filter(|v| !v.is_empty())
                .ok_or(Error::MissingArgument(choice.id))?;
            Ok(Action::Fill(&el.selector, value))
        }
        other => Err(Error::UnsupportedTag(other.to_string())),
    }
}

/// Resolve and execute a choice on the page.
pub async fn apply(page: &Page, elements: &[Element], choice: &ElementChoice) -> Result<()> {
    match resolve(elements, choice)? {
        Action::Click(selector) => {
            info!("click [{}]: {}", choice.id, selector);
            page.click(selector).await?;
        }
        Action::Fill(selector, value) => {
            info!("fill [{}]: {} = '{}'", choice.id, selector, value);
            page.fill(selector, value).await?;
        }
    }
    Ok(())
}

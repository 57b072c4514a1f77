//! Integration tests for surfcrew.
//!
//! These tests require Chrome to be installed and available.
//! Run with: cargo test --test integration -- --ignored

use eoka::Browser;
use surfcrew::models::{minify_elements, prepare_elements, ElementChoice};
use surfcrew::{interact, markdown, observe};

/// Check if Chrome is available
fn chrome_available() -> bool {
    eoka::stealth::patcher::find_chrome().is_ok()
}

const FORM_PAGE: &str = r##"data:text/html,
    <style>body { margin: 0; padding: 20px; }</style>
    <h1>Demo form</h1>
    <button id="accept">Accept cookies</button>
    <input id="q" type="text" aria-label="Search" placeholder="Search">
    <a href="https://example.com">Read more</a>
"##;

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_observe_empty_page() {
    if !chrome_available() {
        eprintln!("Chrome not found, skipping test");
        return;
    }

    let browser = Browser::launch().await.expect("Failed to launch browser");
    let page = browser
        .new_page("about:blank")
        .await
        .expect("Failed to create page");

    let elements = observe::observe(&page).await.expect("Failed to observe");
    assert!(elements.is_empty());

    browser.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_observe_populated_page() {
    if !chrome_available() {
        eprintln!("Chrome not found, skipping test");
        return;
    }

    let browser = Browser::launch().await.expect("Failed to launch browser");
    let page = browser
        .new_page(FORM_PAGE)
        .await
        .expect("Failed to create page");

    let elements = observe::observe(&page).await.expect("Failed to observe");
    assert!(
        elements.len() >= 3,
        "Expected at least 3 elements, got {}",
        elements.len()
    );

    // Ids follow array order
    for (i, el) in elements.iter().enumerate() {
        assert_eq!(el.id, i as u32);
        assert!(!el.selector.is_empty());
    }

    let button = elements
        .iter()
        .find(|e| e.tag == "button")
        .expect("button not observed");
    assert_eq!(button.id_attr.as_deref(), Some("accept"));
    assert_eq!(button.inner_text.as_deref(), Some("Accept cookies"));
    assert_eq!(button.selector, "#accept");

    let input = elements
        .iter()
        .find(|e| e.tag == "input")
        .expect("input not observed");
    assert_eq!(input.aria_label.as_deref(), Some("Search"));

    // Minified projection parses and carries no selectors
    let minified = minify_elements(&prepare_elements(&elements)).unwrap();
    assert!(!minified.contains("selector"));

    observe::clear_highlights(&page)
        .await
        .expect("Failed to clear highlights");
    let overlay_gone: bool = page
        .evaluate("(() => !window.__surfcrew_highlights)()")
        .await
        .expect("Failed to check overlay");
    assert!(overlay_gone);

    browser.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_interact_fill_and_click() {
    if !chrome_available() {
        eprintln!("Chrome not found, skipping test");
        return;
    }

    let browser = Browser::launch().await.expect("Failed to launch browser");
    let page = browser
        .new_page(FORM_PAGE)
        .await
        .expect("Failed to create page");

    let elements = observe::observe(&page).await.expect("Failed to observe");
    observe::clear_highlights(&page).await.expect("clear");

    let input_id = elements.iter().find(|e| e.tag == "input").unwrap().id;
    interact::apply(
        &page,
        &elements,
        &ElementChoice {
            id: input_id,
            arguments: Some("rust".into()),
        },
    )
    .await
    .expect("Failed to fill");

    let value: String = page
        .evaluate("(() => document.getElementById('q').value)()")
        .await
        .expect("Failed to read value");
    assert_eq!(value, "rust");

    let button_id = elements.iter().find(|e| e.tag == "button").unwrap().id;
    interact::apply(
        &page,
        &elements,
        &ElementChoice {
            id: button_id,
            arguments: None,
        },
    )
    .await
    .expect("Failed to click");

    browser.close().await.expect("Failed to close browser");
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_page_markdown() {
    if !chrome_available() {
        eprintln!("Chrome not found, skipping test");
        return;
    }

    let browser = Browser::launch().await.expect("Failed to launch browser");
    let page = browser
        .new_page("data:text/html,<h1>Latest news</h1><script>var x=1;</script><p>Story one</p>")
        .await
        .expect("Failed to create page");

    let md = markdown::page_markdown(&page).await.expect("Failed to convert");
    assert!(md.contains("Latest news"));
    assert!(md.contains("Story one"));
    assert!(!md.contains("var x"));
    assert!(markdown::count_tokens(&md) > 0);

    browser.close().await.expect("Failed to close browser");
}

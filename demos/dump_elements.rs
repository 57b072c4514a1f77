//! Dump a page's interactive elements and markdown without running any crew.
//!
//! Usage: cargo run --example dump_elements -- https://example.com

use eoka::Browser;
use surfcrew::models::{minify_elements, prepare_elements};
use surfcrew::{markdown, observe, OutputDir};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://www.destandaard.be".to_string());

    let output = OutputDir::reset("output")?;

    let browser = Browser::launch().await?;
    let page = browser.new_page(&url).await?;
    let _ = page.wait_for_network_idle(500, 10_000).await;

    let elements = observe::observe(&page).await?;
    println!("=== {} interactive elements ===", elements.len());
    for el in &elements {
        println!(
            "[{}] <{}> {}",
            el.id,
            el.tag,
            el.inner_text.as_deref().or(el.aria_label.as_deref()).unwrap_or("")
        );
    }

    let png = page.screenshot().await?;
    output.write_screenshot(&png)?;
    observe::clear_highlights(&page).await?;

    output.write_elements(0, &elements)?;
    let minified = minify_elements(&prepare_elements(&elements))?;
    output.write_minified_elements(0, &minified)?;

    let md = markdown::page_markdown(&page).await?;
    output.write_markdown(0, &md)?;
    println!("markdown: {} tokens", markdown::count_tokens(&md));
    println!("dumps written to {}", output.path().display());

    browser.close().await?;
    Ok(())
}

//! DOM enumeration — finds the interactive elements on the page and
//! highlights them in place.
//!
//! The injected script returns the element array as a JSON string; ids are
//! assigned on the Rust side from array order, which matches the numeric
//! labels drawn on the page.

use eoka::Page;
use serde::Deserialize;

use crate::models::Element;
use crate::Result;

#[derive(Deserialize)]
struct RawElement {
    tag: String,
    #[serde(rename = "idAttr")]
    id_attr: Option<String>,
    #[serde(rename = "ariaLabel")]
    aria_label: Option<String>,
    #[serde(rename = "innerText")]
    inner_text: Option<String>,
    selector: String,
}

/// JavaScript that enumerates interactive elements and draws the overlay.
const OBSERVE_JS: &str = r#"
(() => {
    const SELECTORS = 'button, a, input, select, textarea, [role="button"]';
    const results = [];
    const seen = new Set();

    const isPartiallyVisible = (el) => {
        const rect = el.getBoundingClientRect();
        return (
            rect.width > 0 &&
            rect.height > 0 &&
            rect.bottom > 0 &&
            rect.right > 0 &&
            rect.top < (window.innerHeight || document.documentElement.clientHeight)
        );
    };

    const cssSelector = (el) => {
        if (el.id) return '#' + CSS.escape(el.id);
        const parts = [];
        let node = el;
        while (node && node !== document.body && parts.length < 4) {
            let s = node.tagName.toLowerCase();
            if (node.id) {
                parts.unshift('#' + CSS.escape(node.id));
                break;
            }
            const parent = node.parentElement;
            if (parent) {
                const siblings = Array.from(parent.children).filter(c => c.tagName === node.tagName);
                if (siblings.length > 1) {
                    s += ':nth-of-type(' + (siblings.indexOf(node) + 1) + ')';
                }
            }
            parts.unshift(s);
            node = parent;
        }
        return parts.join(' > ');
    };

    // Overlay container lives on window so a later call can remove it.
    let container = window.__surfcrew_highlights;
    if (!container) {
        container = document.createElement('div');
        container.id = '__surfcrew_highlights';
        container.style.cssText =
            'position:absolute;top:0;left:0;width:100%;height:100%;pointer-events:none;z-index:2147483647';
        document.body.appendChild(container);
        window.__surfcrew_highlights = container;
    }

    for (const el of document.querySelectorAll(SELECTORS)) {
        if (!isPartiallyVisible(el)) continue;

        const selector = cssSelector(el);
        if (!selector || seen.has(selector)) continue;
        seen.add(selector);

        const text = (el.innerText || '').trim().replace(/\s+/g, ' ');
        results.push({
            tag: el.tagName.toLowerCase(),
            idAttr: el.id || null,
            ariaLabel: el.getAttribute('aria-label') || null,
            innerText: text || null,
            selector: selector,
        });

        const index = results.length - 1;
        const rect = el.getBoundingClientRect();

        const box = document.createElement('div');
        box.style.cssText =
            'position:absolute;border:2px solid blue;background:rgba(0,0,255,0.2);' +
            'top:' + (rect.top + window.scrollY) + 'px;left:' + (rect.left + window.scrollX) + 'px;' +
            'width:' + rect.width + 'px;height:' + rect.height + 'px';
        container.appendChild(box);

        const label = document.createElement('div');
        label.innerText = String(index);
        label.style.cssText =
            'position:absolute;color:white;background:blue;padding:2px 4px;border-radius:3px;' +
            'font:12px monospace;z-index:2147483647;' +
            'top:' + (rect.top + window.scrollY - 20) + 'px;left:' + (rect.left + window.scrollX) + 'px';
        container.appendChild(label);
    }

    return JSON.stringify(results);
})()
"#;

/// Run the observe script and return the parsed element list.
pub async fn observe(page: &Page) -> Result<Vec<Element>> {
    let json_str: String = page.evaluate(OBSERVE_JS).await?;

    let raw: Vec<RawElement> = serde_json::from_str(&json_str)?;

    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(i, r)| Element {
            id: i as u32,
            tag: r.tag,
            id_attr: r.id_attr,
            aria_label: r.aria_label,
            inner_text: r.inner_text,
            selector: r.selector,
        })
        .collect())
}

/// Remove the highlight overlay drawn by [`observe`].
pub async fn clear_highlights(page: &Page) -> Result<()> {
    page.execute(
        r#"(() => {
            if (window.__surfcrew_highlights) {
                window.__surfcrew_highlights.remove();
                delete window.__surfcrew_highlights;
            }
        })()"#,
    )
    .await?;
    Ok(())
}

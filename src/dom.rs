use crate::constants::SR_ONLY_STYLE;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Attach a click handler to `#id`; missing elements are skipped.
pub fn add_click_listener(document: &web::Document, id: &str, mut f: impl FnMut() + 'static) {
    if let Some(el) = document.get_element_by_id(id) {
        let closure = Closure::wrap(Box::new(move || f()) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

/// Find `#id`, or append a visually hidden live region with that id.
pub fn ensure_live_region(
    document: &web::Document,
    id: &str,
    politeness: &str,
) -> anyhow::Result<web::Element> {
    if let Some(el) = document.get_element_by_id(id) {
        return Ok(el);
    }
    let el = document
        .create_element("div")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    el.set_id(id);
    _ = el.set_attribute("aria-live", politeness);
    _ = el.set_attribute("aria-atomic", "true");
    _ = el.set_attribute("role", if politeness == "assertive" { "alert" } else { "status" });
    _ = el.set_attribute("style", SR_ONLY_STYLE);
    let body = document
        .body()
        .ok_or_else(|| anyhow::anyhow!("no body"))?;
    body.append_child(&el)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(el)
}

/// Replace `<body>`'s preference classes with `classes`.
pub fn apply_body_classes(document: &web::Document, classes: &[&str], font_size: u8) {
    let Some(body) = document.body() else {
        return;
    };
    let list = body.class_list();
    for stale in [
        "theme-light",
        "theme-dark",
        "theme-system",
        "high-contrast",
        "reduce-motion",
    ] {
        _ = list.remove_1(stale);
    }
    for class in classes {
        _ = list.add_1(class);
    }
    _ = body
        .style()
        .set_property("font-size", &format!("{font_size}px"));
}

/// Current value of the message box, cleared on read.
pub fn take_input_value(document: &web::Document, id: &str) -> Option<String> {
    let input = document
        .get_element_by_id(id)?
        .dyn_into::<web::HtmlInputElement>()
        .ok()?;
    let value = input.value();
    input.set_value("");
    Some(value)
}

/// Whether keyboard focus is in a text field.
pub fn is_typing(document: &web::Document) -> bool {
    document
        .active_element()
        .map(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA"))
        .unwrap_or(false)
}

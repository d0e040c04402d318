use crate::constants::{TOAST_ID, TOAST_RETRY_ID, TOAST_TEXT_CLASS, TOAST_TEXT_SELECTOR};
use crate::view::{ToastKind, ToastView};
use web_sys as web;

#[inline]
pub fn show(document: &web::Document, view: &ToastView) {
    if let Some(el) = document.get_element_by_id(TOAST_ID) {
        let cl = el.class_list();
        _ = cl.remove_1("hidden");
        _ = cl.remove_2(ToastKind::Error.class(), ToastKind::Success.class());
        _ = cl.add_1(view.kind.class());
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
        match text_slot(document, &el) {
            Some(text) => text.set_text_content(Some(&view.text)),
            None => log::warn!("[toast] no text slot for: {}", view.text),
        }
    }
    if let Some(retry) = document.get_element_by_id(TOAST_RETRY_ID) {
        _ = retry.set_attribute("style", if view.can_retry { "" } else { "display:none" });
    }
}

/// The `.toast-text` child, created in front of the buttons when missing so
/// the toast's other children are never overwritten.
fn text_slot(document: &web::Document, toast: &web::Element) -> Option<web::Element> {
    if let Some(text) = toast.query_selector(TOAST_TEXT_SELECTOR).ok().flatten() {
        return Some(text);
    }
    let text = document.create_element("span").ok()?;
    text.set_class_name(TOAST_TEXT_CLASS);
    toast.prepend_with_node_1(&text).ok()?;
    Some(text)
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(TOAST_ID) {
        _ = el.class_list().add_1("hidden");
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}

/// Show or hide the toast to match `view`.
pub fn render(document: &web::Document, view: Option<&ToastView>) {
    match view {
        Some(view) => show(document, view),
        None => hide(document),
    }
}

use web_sys as web;

#[inline]
pub fn hide_gate(document: &web::Document) {
    if let Some(el) = document.get_element_by_id("gate") {
        _ = el.set_attribute("style", "display:none");
    }
}

/// Advisory, non-fatal message for the user.
pub fn show_notice(document: &web::Document, text: &str) {
    if let Some(el) = document.get_element_by_id("notice") {
        el.set_text_content(Some(text));
        _ = el.set_attribute("style", "");
    }
}

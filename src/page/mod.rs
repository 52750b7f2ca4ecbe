// src/page/mod.rs
//! # Page model
//!
//! `Page` is the root container the controller works on: the parsed markup of
//! whatever the server last returned, plus an **overlay** of UI state the
//! client changed since (visibility, disabled flags, status text, user input).
//!
//! The markup itself is never edited. Looking up an element means "find it in
//! the document, then let the overlay win". Replacing the body drops the
//! overlay together with the old document, so state cannot leak between
//! renders.
//!
//! Elements are addressed by `id`, form controls by `name`.

mod form;
pub mod view;

use std::collections::HashMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::core::sanitize::normalize_ws;

pub use form::FormData;
pub use view::{Block, FieldKind, FieldView, FormView, PageView, TableView};

pub(crate) fn selector(css: &str) -> Selector {
    // Only called with literals from this crate.
    Selector::parse(css).unwrap_or_else(|e| panic!("bad built-in selector {css:?}: {e}"))
}

static WITH_ID: LazyLock<Selector> = LazyLock::new(|| selector("[id]"));
static WITH_NAME: LazyLock<Selector> = LazyLock::new(|| selector("[name]"));
static CONTROLS: LazyLock<Selector> =
    LazyLock::new(|| selector("input[name], select[name], textarea[name]"));
static OPTION: LazyLock<Selector> = LazyLock::new(|| selector("option"));

#[derive(Clone, Debug, Default)]
struct ElementState {
    visible: Option<bool>,
    disabled: Option<bool>,
    text: Option<String>,
}

pub struct Page {
    html: String,
    doc: Html,
    overlay: HashMap<String, ElementState>,
    inputs: HashMap<String, String>,
    generation: u64,
}

impl Page {
    pub fn from_html(html: impl Into<String>) -> Self {
        let html = html.into();
        let doc = Html::parse_document(&html);
        Self { html, doc, overlay: HashMap::new(), inputs: HashMap::new(), generation: 0 }
    }

    /// Swap in new markup. All overlay state belongs to the old document and
    /// goes with it.
    pub fn replace_body(&mut self, html: impl Into<String>) {
        self.html = html.into();
        self.doc = Html::parse_document(&self.html);
        self.overlay.clear();
        self.inputs.clear();
        self.generation += 1;
        logd!("Page: replaced (generation={}, bytes={})", self.generation, self.html.len());
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn document(&self) -> &Html {
        &self.doc
    }

    /// Bumped on every `replace_body`; frontends key widget state on it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn title(&self) -> Option<String> {
        static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
        self.doc
            .select(&TITLE)
            .next()
            .map(|t| normalize_ws(&t.text().collect::<String>()))
            .filter(|t| !t.is_empty())
    }

    pub fn element(&self, id: &str) -> Option<ElementRef<'_>> {
        self.doc.select(&WITH_ID).find(|el| el.value().attr("id") == Some(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    /* ---------- visibility ---------- */

    pub fn show(&mut self, id: &str) {
        self.state_mut(id).visible = Some(true);
    }

    pub fn hide(&mut self, id: &str) {
        self.state_mut(id).visible = Some(false);
    }

    /// Missing elements are never visible. Without overlay state, inline
    /// `display: none` and the `hidden` attribute hide an element.
    pub fn is_visible(&self, id: &str) -> bool {
        let Some(el) = self.element(id) else { return false };
        if let Some(v) = self.overlay.get(id).and_then(|s| s.visible) {
            return v;
        }
        if el.value().attr("hidden").is_some() {
            return false;
        }
        !el.value().attr("style").is_some_and(hides_inline)
    }

    /* ---------- text ---------- */

    pub fn set_text(&mut self, id: &str, text: impl Into<String>) {
        self.state_mut(id).text = Some(text.into());
    }

    pub fn text(&self, id: &str) -> Option<String> {
        if let Some(t) = self.overlay.get(id).and_then(|s| s.text.clone()) {
            return Some(t);
        }
        self.element(id).map(|el| normalize_ws(&el.text().collect::<String>()))
    }

    /* ---------- disabled ---------- */

    pub fn set_disabled(&mut self, id: &str, disabled: bool) {
        self.state_mut(id).disabled = Some(disabled);
    }

    pub fn is_disabled(&self, id: &str) -> bool {
        if let Some(d) = self.overlay.get(id).and_then(|s| s.disabled) {
            return d;
        }
        self.element(id).is_some_and(|el| el.value().attr("disabled").is_some())
    }

    /* ---------- form controls ---------- */

    /// User-entered value for the control named `name`.
    pub fn set_input(&mut self, name: &str, value: impl Into<String>) {
        self.inputs.insert(s!(name), value.into());
    }

    /// Current value: user input first, else what the markup says.
    pub fn input(&self, name: &str) -> Option<String> {
        if let Some(v) = self.inputs.get(name) {
            return Some(v.clone());
        }
        self.doc
            .select(&WITH_NAME)
            .find(|el| el.value().attr("name") == Some(name))
            .map(markup_value)
    }

    /// Collect the successful controls of form `form_id` in document order.
    /// Returns `None` when the form is not on the page.
    pub fn form_data(&self, form_id: &str) -> Option<FormData> {
        let form = self.element(form_id).filter(|el| el.value().name() == "form")?;
        let mut data = FormData::new();

        for ctl in form.select(&CONTROLS) {
            let v = ctl.value();
            let Some(name) = v.attr("name") else { continue };
            if v.attr("disabled").is_some() {
                continue;
            }
            let ty = v.attr("type").unwrap_or("text").to_ascii_lowercase();
            if v.name() == "input" {
                match ty.as_str() {
                    "submit" | "button" | "reset" | "image" | "file" => continue,
                    "checkbox" | "radio" if v.attr("checked").is_none() => continue,
                    _ => {}
                }
            }
            let value = match self.inputs.get(name) {
                Some(user) => user.clone(),
                None => markup_value(ctl),
            };
            data.append(name, &value);
        }
        Some(data)
    }

    fn state_mut(&mut self, id: &str) -> &mut ElementState {
        self.overlay.entry(s!(id)).or_default()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::from_html(crate::config::consts::FALLBACK_INDEX_HTML)
    }
}

fn hides_inline(style: &str) -> bool {
    let compact: String = style
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    compact.split(';').any(|decl| decl == "display:none")
}

fn markup_value(el: ElementRef<'_>) -> String {
    let v = el.value();
    match v.name() {
        "textarea" => el.text().collect(),
        "select" => {
            let mut first = None;
            for opt in el.select(&OPTION) {
                let val = opt
                    .value()
                    .attr("value")
                    .map(String::from)
                    .unwrap_or_else(|| normalize_ws(&opt.text().collect::<String>()));
                if opt.value().attr("selected").is_some() {
                    return val;
                }
                first.get_or_insert(val);
            }
            first.unwrap_or_default()
        }
        _ => match v.attr("type").map(str::to_ascii_lowercase).as_deref() {
            Some("checkbox" | "radio") => s!(v.attr("value").unwrap_or("on")),
            _ => s!(v.attr("value").unwrap_or("")),
        },
    }
}

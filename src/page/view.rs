// src/page/view.rs
//
// Flattens a page into the blocks a frontend knows how to draw, in document
// order. Anything else in the markup is ignored.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use super::{selector, Page};
use crate::config::consts::{ERROR, EXPORT_ERROR, EXPORT_LOADING, LOADING};
use crate::core::sanitize::normalize_ws;

pub const INDICATORS: [&str; 4] = [LOADING, ERROR, EXPORT_LOADING, EXPORT_ERROR];

static BLOCKS: LazyLock<Selector> =
    LazyLock::new(|| selector("h1, h2, h3, h4, p, form, table, button, div[id]"));
static FIELDS: LazyLock<Selector> = LazyLock::new(|| selector("input[name], select[name], textarea[name]"));
static LABEL: LazyLock<Selector> = LazyLock::new(|| selector("label[for]"));
static SUBMIT: LazyLock<Selector> =
    LazyLock::new(|| selector("button, input[type=submit]"));
static OPTION: LazyLock<Selector> = LazyLock::new(|| selector("option"));
static CAPTION: LazyLock<Selector> = LazyLock::new(|| selector("caption"));
static HEAD_ROW: LazyLock<Selector> = LazyLock::new(|| selector("thead tr"));
static BODY_ROW: LazyLock<Selector> = LazyLock::new(|| selector("tbody tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("th, td"));

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageView {
    pub title: Option<String>,
    pub blocks: Vec<Block>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph(String),
    Form(FormView),
    Table(TableView),
    Button { id: Option<String>, label: String },
    /// One of the status elements; its text/visibility are read live.
    Indicator { id: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormView {
    pub id: Option<String>,
    pub fields: Vec<FieldView>,
    pub submit_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub placeholder: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Password,
    TextArea,
    Select(Vec<(String, String)>),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableView {
    pub caption: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PageView {
    pub fn build(page: &Page) -> Self {
        let doc = page.document();
        let mut blocks = Vec::new();

        for el in doc.select(&BLOCKS) {
            if inside_block(el) {
                continue;
            }
            let v = el.value();
            let block = match v.name() {
                "h1" | "h2" | "h3" | "h4" => {
                    let level = v.name()[1..].parse().unwrap_or(1);
                    Block::Heading { level, text: text_of(el) }
                }
                "p" => Block::Paragraph(text_of(el)),
                "form" => Block::Form(form_view(el)),
                "table" => Block::Table(table_view(el)),
                "button" => Block::Button { id: v.attr("id").map(String::from), label: text_of(el) },
                "div" => match v.attr("id") {
                    Some(id) if INDICATORS.contains(&id) => Block::Indicator { id: s!(id) },
                    _ => continue,
                },
                _ => continue,
            };
            blocks.push(block);
        }

        Self { title: page.title(), blocks }
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableView> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }
}

fn text_of(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// True when an ancestor already renders this element as part of itself.
fn inside_block(el: ElementRef<'_>) -> bool {
    el.ancestors().filter_map(ElementRef::wrap).any(|a| {
        let v = a.value();
        match v.name() {
            "form" | "table" | "button" => true,
            "div" => v.attr("id").is_some_and(|id| INDICATORS.contains(&id)),
            _ => false,
        }
    })
}

fn form_view(form: ElementRef<'_>) -> FormView {
    let labels: Vec<(String, String)> = form
        .select(&LABEL)
        .filter_map(|l| Some((s!(l.value().attr("for")?), text_of(l))))
        .collect();

    let mut fields = Vec::new();
    for ctl in form.select(&FIELDS) {
        let v = ctl.value();
        let Some(name) = v.attr("name") else { continue };
        let ty = v.attr("type").unwrap_or("text").to_ascii_lowercase();
        let kind = match (v.name(), ty.as_str()) {
            ("textarea", _) => FieldKind::TextArea,
            ("select", _) => FieldKind::Select(
                ctl.select(&OPTION)
                    .map(|o| {
                        let label = text_of(o);
                        let value = o.value().attr("value").map(String::from).unwrap_or_else(|| label.clone());
                        (value, label)
                    })
                    .collect(),
            ),
            // Checkable controls submit per their markup state.
            (_, "hidden" | "submit" | "button" | "reset" | "image" | "file" | "checkbox" | "radio") => continue,
            (_, "password") => FieldKind::Password,
            _ => FieldKind::Text,
        };
        let label = v
            .attr("id")
            .and_then(|id| labels.iter().find(|(f, _)| f == id))
            .map(|(_, l)| l.clone())
            .unwrap_or_else(|| s!(name));
        fields.push(FieldView {
            name: s!(name),
            label,
            kind,
            placeholder: s!(v.attr("placeholder").unwrap_or("")),
        });
    }

    let submit_label = form
        .select(&SUBMIT)
        .find(|b| {
            let t = b.value().attr("type").map(str::to_ascii_lowercase);
            // <button> defaults to submit
            !matches!(t.as_deref(), Some("button" | "reset"))
        })
        .map(|b| match b.value().name() {
            "input" => s!(b.value().attr("value").unwrap_or("Submit")),
            _ => text_of(b),
        })
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| s!("Submit"));

    FormView { id: form.value().attr("id").map(String::from), fields, submit_label }
}

fn row_cells(row: ElementRef<'_>) -> Vec<String> {
    row.select(&CELL).map(text_of).collect()
}

fn table_view(table: ElementRef<'_>) -> TableView {
    let caption = table.select(&CAPTION).next().map(text_of);
    let headers = table.select(&HEAD_ROW).next().map(row_cells).unwrap_or_default();
    let rows = table.select(&BODY_ROW).map(row_cells).collect();
    TableView { caption, headers, rows }
}

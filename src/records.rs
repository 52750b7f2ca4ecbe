// src/records.rs
//
// Rows scraped from the rendered results page for `/export`.
//
// Shapes:
//   students: first <table>, cells [id, name, email, groups]
//   groups:   last <table> (only when there are two or more), cells [id, name, members]
// Rows are `tbody tr`; both `td` and `th` count as cells.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::config::consts::NO_GROUP;
use crate::core::sanitize::{normalize_ws, parse_leading_int, split_groups};
use crate::page::selector;

static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static BODY_ROW: LazyLock<Selector> = LazyLock::new(|| selector("tbody tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td, th"));

pub const STUDENT_CELLS: usize = 4;
pub const GROUP_CELLS: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub groups: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupRecord {
    pub id: String,
    pub name: String,
    /// `None` (sent as `null`) when the cell holds no integer.
    pub members_count: Option<i64>,
}

/// Placeholder for data the page has no source for. Always sent as `[]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NotYetAvailable;

impl Serialize for NotYetAvailable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(std::iter::empty::<()>())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExportPayload {
    pub students: Vec<StudentRecord>,
    pub groups: Vec<GroupRecord>,
    pub group_categories: NotYetAvailable,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScrapeError {
    #[error("{table} table row {row} has {found} cells, expected {expected}")]
    ShortRow { table: &'static str, row: usize, found: usize, expected: usize },
}

impl ExportPayload {
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Read both tables. Recomputed from the document on every call.
pub fn scrape_payload(doc: &Html) -> Result<ExportPayload, ScrapeError> {
    let tables: Vec<ElementRef<'_>> = doc.select(&TABLE).collect();

    let students = match tables.first() {
        Some(t) => scrape_students(*t)?,
        None => Vec::new(),
    };
    let groups = match tables.as_slice() {
        [_, .., last] => scrape_groups(*last)?,
        _ => Vec::new(),
    };

    logd!("Records: students={} groups={}", students.len(), groups.len());
    Ok(ExportPayload { students, groups, group_categories: NotYetAvailable })
}

pub fn scrape_students(table: ElementRef<'_>) -> Result<Vec<StudentRecord>, ScrapeError> {
    rows(table, "students", STUDENT_CELLS)
        .map(|r| -> Result<StudentRecord, ScrapeError> {
            let mut c = r?.into_iter();
            let mut next = || c.next().unwrap_or_default();
            Ok(StudentRecord {
                id: next(),
                name: next(),
                email: next(),
                groups: split_groups(&next(), NO_GROUP),
            })
        })
        .collect()
}

pub fn scrape_groups(table: ElementRef<'_>) -> Result<Vec<GroupRecord>, ScrapeError> {
    rows(table, "groups", GROUP_CELLS)
        .map(|r| -> Result<GroupRecord, ScrapeError> {
            let mut c = r?.into_iter();
            let mut next = || c.next().unwrap_or_default();
            Ok(GroupRecord {
                id: next(),
                name: next(),
                members_count: parse_leading_int(&next()),
            })
        })
        .collect()
}

fn rows<'a>(
    table: ElementRef<'a>,
    name: &'static str,
    expected: usize,
) -> impl Iterator<Item = Result<Vec<String>, ScrapeError>> + 'a {
    table.select(&BODY_ROW).enumerate().map(move |(ix, tr)| {
        let cells: Vec<String> = tr
            .select(&CELL)
            .map(|td| normalize_ws(&td.text().collect::<String>()))
            .collect();
        if cells.len() < expected {
            return Err(ScrapeError::ShortRow { table: name, row: ix + 1, found: cells.len(), expected });
        }
        Ok(cells)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_json_shape() {
        let p = ExportPayload {
            students: vec![StudentRecord {
                id: s!("1"),
                name: s!("Alice"),
                email: s!("a@x.com"),
                groups: vec![s!("G1")],
            }],
            groups: vec![GroupRecord { id: s!("5"), name: s!("TeamX"), members_count: None }],
            group_categories: NotYetAvailable,
        };
        let v: serde_json::Value = serde_json::from_slice(&p.to_json().unwrap()).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "students": [{"id": "1", "name": "Alice", "email": "a@x.com", "groups": ["G1"]}],
                "groups": [{"id": "5", "name": "TeamX", "members_count": null}],
                "group_categories": []
            })
        );
    }
}

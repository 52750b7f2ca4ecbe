// src/gui/components/data_table.rs
//
// One HTML table, drawn read-only. Purely a view.

use std::hash::Hash;

use eframe::egui::{self, RichText, TextWrapMode};
use egui_extras::{Column, TableBuilder};

use crate::page::TableView;

pub fn draw(ui: &mut egui::Ui, table: &TableView, id: impl Hash) {
    if let Some(caption) = &table.caption {
        ui.label(RichText::new(caption).strong());
    }

    let cols = table
        .rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(table.headers.len()))
        .max()
        .unwrap_or(0);
    if cols == 0 {
        ui.label(RichText::new("(empty table)").weak());
        return;
    }

    ui.push_id(id, |ui| {
        ui.style_mut().wrap_mode = Some(TextWrapMode::Extend);

        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().at_least(40.0).resizable(true).clip(true), cols)
            .header(22.0, |mut header| {
                for ci in 0..cols {
                    header.col(|ui| {
                        ui.strong(table.headers.get(ci).map(String::as_str).unwrap_or(""));
                    });
                }
            })
            .body(|mut body| {
                for row in &table.rows {
                    body.row(20.0, |mut r| {
                        for ci in 0..cols {
                            r.col(|ui| {
                                ui.label(row.get(ci).map(String::as_str).unwrap_or(""));
                            });
                        }
                    });
                }
            });
    });
}

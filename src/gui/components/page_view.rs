// src/gui/components/page_view.rs
//
// Draws the current page block by block. Clicks and submits are queued on
// `app.events`; the controller handles them after the frame is drawn.

use eframe::egui::{self, Color32, RichText, Spinner};

use crate::config::consts::{EXPORT_LOADING, LOADING};
use crate::gui::app::App;
use crate::page::Block;

use super::{data_table, export_bar, form};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    if let Some(title) = &app.view.title {
        ui.label(RichText::new(title).weak());
    }

    // Cheap clone; keeps `app` free for the widgets below.
    let blocks = app.view.blocks.clone();
    let generation = app.ctl.page().generation();
    let mut table_ix = 0usize;

    for block in &blocks {
        match block {
            Block::Heading { level, text } => match level {
                1 => { ui.heading(text); }
                _ => { ui.label(RichText::new(text).strong().size(18.0 - f32::from(*level))); }
            },
            Block::Paragraph(text) => { ui.label(text); }
            Block::Form(view) => form::draw(ui, app, view),
            Block::Table(view) => {
                data_table::draw(ui, view, (generation, table_ix));
                table_ix += 1;
                ui.add_space(8.0);
            }
            Block::Button { id, label } => export_bar::draw(ui, app, id.as_deref(), label),
            Block::Indicator { id } => indicator(ui, app, id),
        }
    }
}

fn indicator(ui: &mut egui::Ui, app: &App, id: &str) {
    let page = app.ctl.page();
    if !page.is_visible(id) {
        return;
    }
    let text = page.text(id).unwrap_or_default();
    if id == LOADING || id == EXPORT_LOADING {
        ui.horizontal(|ui| {
            ui.add(Spinner::new());
            ui.label(text);
        });
    } else if !text.is_empty() {
        ui.label(RichText::new(text).color(Color32::from_rgb(200, 40, 40)));
    }
}

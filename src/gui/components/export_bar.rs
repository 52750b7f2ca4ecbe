// src/gui/components/export_bar.rs
//
// Page buttons. The export button also shows where the file will land.

use eframe::egui::{self, RichText};

use crate::config::consts::{EXPORT_BTN, EXPORT_FILENAME};
use crate::controller::Event;
use crate::gui::app::App;

pub fn draw(ui: &mut egui::Ui, app: &mut App, id: Option<&str>, label: &str) {
    let Some(id) = id else {
        // Not addressable, so nothing could handle a click.
        ui.add_enabled(false, egui::Button::new(label));
        return;
    };

    let enabled = !app.ctl.page().is_disabled(id);

    ui.horizontal(|ui| {
        if ui.add_enabled(enabled, egui::Button::new(label)).clicked() {
            logd!("UI: click #{}", id);
            app.events.push(Event::click(id));
        }
        if id == EXPORT_BTN {
            let target = app.options.download_dir().join(EXPORT_FILENAME);
            ui.label(RichText::new(format!("→ {}", target.display())).weak().monospace());
        }
    });
}

// src/gui/components/settings_bar.rs
//
// Server + download folder. Edits apply on "Apply" or Enter.

use eframe::egui;
use crate::gui::app::App;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let mut apply = false;

    ui.horizontal(|ui| {
        ui.label("Server:");
        let r = ui.add(
            egui::TextEdit::singleline(&mut app.server_text)
                .desired_width(260.0)
                .font(egui::TextStyle::Monospace),
        );
        apply |= r.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        ui.label("Downloads:");
        let r = ui.add(
            egui::TextEdit::singleline(&mut app.download_dir_text)
                .desired_width(220.0)
                .font(egui::TextStyle::Monospace),
        );
        apply |= r.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        apply |= ui.button("Apply").clicked();

        if ui.button("Start over").clicked() {
            logf!("UI: start page reload");
            app.reload_start_page(ui.ctx());
        }
    });

    if apply {
        app.apply_settings(ui.ctx());
    }
}

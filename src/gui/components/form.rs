// src/gui/components/form.rs
//
// A page form. Field values live in the page's input overlay, so there is no
// separate buffer to keep in sync across re-renders.

use eframe::egui;

use crate::controller::Event;
use crate::gui::app::App;
use crate::notify::Flow;
use crate::page::{FieldKind, FormView};

pub fn draw(ui: &mut egui::Ui, app: &mut App, view: &FormView) {
    let mut submit = false;

    egui::Grid::new(("form", view.id.as_deref().unwrap_or("")))
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            for field in &view.fields {
                ui.label(&field.label);
                let mut value = app.ctl.page().input(&field.name).unwrap_or_default();
                let before = value.clone();

                match &field.kind {
                    FieldKind::Select(options) => {
                        let shown = options
                            .iter()
                            .find(|(v, _)| *v == value)
                            .map(|(_, l)| l.clone())
                            .unwrap_or_else(|| value.clone());
                        egui::ComboBox::from_id_salt(("select", &field.name))
                            .selected_text(shown)
                            .show_ui(ui, |ui| {
                                for (v, l) in options {
                                    ui.selectable_value(&mut value, v.clone(), l);
                                }
                            });
                    }
                    kind => {
                        let edit = match kind {
                            FieldKind::TextArea => egui::TextEdit::multiline(&mut value),
                            _ => egui::TextEdit::singleline(&mut value),
                        };
                        let r = ui.add(
                            edit.hint_text(&field.placeholder)
                                .password(*kind == FieldKind::Password)
                                .desired_width(420.0),
                        );
                        if *kind != FieldKind::TextArea {
                            submit |= r.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                        }
                    }
                }

                if value != before {
                    app.ctl.page_mut().set_input(&field.name, value);
                }
                ui.end_row();
            }
        });

    let busy = app.is_busy(Flow::Extract);
    submit |= ui
        .add_enabled(!busy, egui::Button::new(&view.submit_label))
        .clicked();

    if submit && !busy {
        if let Some(id) = &view.id {
            app.events.push(Event::submit(id));
        }
    }
}

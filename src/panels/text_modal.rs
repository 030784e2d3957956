use egui::Align2;
use log::debug;

use crate::JournalApp;
use crate::canvas::ModalMode;

/// Text entry window for creating or editing a label
pub fn text_modal(app: &mut JournalApp, ctx: &egui::Context) {
    let Some(engine) = app.engine_mut() else {
        return;
    };
    let Some(mode) = engine.modal().map(|modal| modal.mode) else {
        return;
    };
    let editing = matches!(mode, ModalMode::Edit { .. });
    let title = if editing { "Edit text" } else { "Add text" };

    let (mut save, mut close, mut delete) = (false, false, false);
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            if let Some(text) = engine.modal_text_mut() {
                let response = ui.add(
                    egui::TextEdit::multiline(text)
                        .hint_text("Write something…")
                        .desired_rows(3)
                        .desired_width(260.0),
                );
                if !response.has_focus() && !response.lost_focus() {
                    response.request_focus();
                }
            }
            ui.horizontal(|ui| {
                save = ui.button("Save").clicked();
                close = ui.button("Cancel").clicked();
                if editing {
                    delete = ui.button("Delete").clicked();
                }
            });
        });

    if save {
        if let Err(err) = engine.save_modal() {
            debug!("Text not saved: {}", err);
        }
    } else if delete {
        engine.delete_from_modal();
    } else if close {
        engine.close_modal();
    }
}

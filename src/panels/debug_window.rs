use crate::JournalApp;

/// Live engine state and a JSON dump of the element store
pub fn debug_window(app: &mut JournalApp, ctx: &egui::Context) {
    let mut open = app.show_debug;
    egui::Window::new("Canvas Debug").open(&mut open).show(ctx, |ui| {
        let Some(engine) = app.engine() else {
            ui.label("Canvas not created yet");
            return;
        };
        let history = engine.history();
        let raster = engine.raster();

        egui::Grid::new("canvas_debug_grid")
            .num_columns(2)
            .spacing([40.0, 4.0])
            .striped(true)
            .show(ui, |ui| {
                ui.label("Tool");
                ui.label(engine.tool_type().map_or("none", |t| t.name()));
                ui.end_row();

                ui.label("State");
                ui.label(engine.current_state_name());
                ui.end_row();

                ui.label("Text");
                ui.label(engine.text_state_name());
                ui.end_row();

                ui.label("Raster");
                ui.label(format!("{}x{} @ {:.2}", raster.width(), raster.height(), raster.dpr()));
                ui.end_row();

                ui.label("Undo stack size");
                ui.label(format!("{} / {}", history.undo_len(), history.capacity()));
                ui.end_row();

                ui.label("Redo stack size");
                ui.label(history.redo_len().to_string());
                ui.end_row();

                ui.label("Snapshot pending");
                ui.label(history.is_pending().to_string());
                ui.end_row();

                ui.label("Uploads in flight");
                ui.label(engine.uploads_in_flight().to_string());
                ui.end_row();
            });

        ui.separator();
        egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
            match engine.store().to_json() {
                Ok(json) => ui.monospace(json),
                Err(err) => ui.colored_label(egui::Color32::RED, err.to_string()),
            };
        });
    });
    app.show_debug = open;
}

use crate::JournalApp;

pub fn canvas_panel(app: &mut JournalApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let canvas_rect = ui.available_rect_before_wrap();
            let response = ui.allocate_rect(canvas_rect, egui::Sense::click_and_drag());

            app.prepare_canvas(canvas_rect, ctx.pixels_per_point());
            // A window above the canvas owns the pointer
            app.handle_canvas_input(ctx, !response.contains_pointer());
            app.handle_dropped_files(ctx, canvas_rect);

            let painter = ui.painter_at(canvas_rect);
            app.paint_canvas(ctx, &painter, canvas_rect);
        });
}

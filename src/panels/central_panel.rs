use crate::PaintApp;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::drag());
            let canvas_rect = response.rect;

            if app.input_mut().set_canvas_rect(canvas_rect) {
                app.canvas_resized(canvas_rect);
            }

            // Handle input
            let commands = app.input_mut().pointer_commands(ctx, &response);
            for command in commands {
                app.dispatch(command);
            }

            // Render the canvas
            app.renderer().render(&painter, canvas_rect, app.session());
        });
}

use crate::PaintApp;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        if !app.session().has_image() {
            ui.centered_and_justified(|ui| {
                ui.heading("Drop an image here to start editing");
            });
            return;
        }

        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let Some(image_rect) = app.renderer().fit(response.rect) else {
            return;
        };
        app.renderer().paint(&painter, image_rect);
        app.handle_canvas_input(&response, image_rect);
    });
}

mod engine;
mod model;
mod ui;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Samsara",
        options,
        Box::new(|_cc| Ok(Box::new(ui::app::GameApp::new()))),
    )
}

mod app;
mod error;
mod i18n;
mod modules;
mod remote;
mod settings;
mod style;

use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 820.0])
            .with_min_inner_size([480.0, 640.0])
            .with_title("ZEditor PRO")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "ZEditor PRO",
        options,
        Box::new(|cc| Ok(Box::new(app::ZEditorApp::new(cc)?))),
    )
}

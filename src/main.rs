use eframe::egui;
use pipform::{
    gui::PipApp,
    persistence::SettingsStore,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pipform=info")))
        .init();

    info!("Starting PIP Form v{}", env!("CARGO_PKG_VERSION"));

    let store = SettingsStore::default_location();
    info!("Settings file: {}", store.path().display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("PIP Form")
            .with_inner_size([1200.0, 820.0])
            .with_min_inner_size([720.0, 520.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "PIP Form",
        options,
        Box::new(|cc| {
            let app = PipApp::new(cc, store).map_err(|e| e.to_string())?;
            Ok(Box::new(app))
        }),
    )
}

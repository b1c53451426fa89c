mod config;
mod context;
mod core;
mod rendering;
mod scene;
mod storage;
mod ui;

use tracing::error;
use tracing_subscriber::EnvFilter;

use config::game::load_game_config;
use storage::settings::UserSettings;
use ui::app::IsoverseApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match load_game_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "game.json 加载失败");
            std::process::exit(1);
        }
    };
    let settings = UserSettings::load();

    let title = config.window.title.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&title)
            .with_inner_size([config.window.width, config.window.height])
            .with_app_id("isoverse"),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Box::new(IsoverseApp::new(cc, config, settings))),
    ) {
        error!(error = %e, "窗口启动失败");
        std::process::exit(1);
    }
}

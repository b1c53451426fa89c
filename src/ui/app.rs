use eframe::egui;
use tracing::{info, warn};

use crate::config::game::{GameConfig, TileMetrics};
use crate::context::GameContext;
use crate::core::geometry::ScreenRect;
use crate::storage::settings::UserSettings;
use crate::ui::canvas_view::show_world;
use crate::ui::input_bridge::InputBridge;
use crate::ui::status_bar::show_status_bar;
use crate::ui::theme::apply_theme;

pub struct IsoverseApp {
    context: GameContext,
    bridge: InputBridge,
    tiles: TileMetrics,
    /// 最近一次写入磁盘的设置
    settings: UserSettings,
}

impl IsoverseApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: GameConfig, settings: UserSettings) -> Self {
        apply_theme(&cc.egui_ctx);

        let viewport = ScreenRect::new(0.0, 0.0, config.window.width as f64, config.window.height as f64);
        let mut context = GameContext::new(&config, viewport);
        context.apply_settings(&settings);
        info!(scene = ?context.current_scene(), "应用启动");

        Self {
            context,
            bridge: InputBridge::new(),
            tiles: config.tiles,
            settings,
        }
    }

    /// 设置有变化（切换场景、开关网格）时写回 runtime.json
    fn persist_settings(&mut self) {
        let current = self.context.capture_settings(&self.settings);
        if current == self.settings {
            return;
        }
        if let Err(e) = current.save() {
            warn!(error = %e, "保存设置失败");
        }
        self.settings = current;
    }
}

impl eframe::App for IsoverseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::bottom("status_bar")
            .resizable(false)
            .min_height(28.0)
            .show(ctx, |ui| {
                let fps = ctx.input(|i| {
                    if i.stable_dt > 0.0 {
                        1.0 / i.stable_dt
                    } else {
                        0.0
                    }
                });
                show_status_bar(ui, fps, &self.context.status_line());
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                show_world(ui, &mut self.context, &mut self.bridge, self.tiles);
            });

        self.persist_settings();

        // 轨道持续运动
        ctx.request_repaint();
    }
}

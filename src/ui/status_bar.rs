use egui::Ui;

pub fn show_status_bar(ui: &mut Ui, fps: f32, status: &str) {
    ui.horizontal_wrapped(|ui| {
        ui.label(status);
        ui.separator();
        ui.label(format!("FPS: {:.0}", fps));
        ui.separator();
        ui.weak("拖拽平移 · 滚轮缩放 · 1/2/3 切换层级 · C 居中 · I 调试信息");
    });
}

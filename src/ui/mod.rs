pub mod app;
pub mod canvas_view;
pub mod hud_view;
pub mod input_bridge;
pub mod status_bar;
pub mod theme;

pub mod camera;
pub mod geometry;
pub mod hud;
pub mod input;
pub mod router;
pub mod transform;

pub mod frame;
pub mod painter;

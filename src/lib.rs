pub mod config;
pub mod render;
pub mod scene;
pub mod utils;
pub mod window;

pub mod app;
pub mod collector;
pub mod config;
pub mod csv_loader;
pub mod logging;
pub mod render;

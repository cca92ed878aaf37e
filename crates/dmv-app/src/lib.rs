//! Application service layer - config, scenario sessions, scanning, export

pub mod app;
pub mod config;
pub mod export;
pub mod scanner;

pub mod app;
pub mod config;
pub mod controls;
pub mod engine;
pub mod input;
pub mod layout;
pub mod params;
pub mod pattern;
pub mod render;
pub mod terminal;

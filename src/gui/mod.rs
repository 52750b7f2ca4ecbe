// src/gui/mod.rs
pub mod app;
mod components;
pub mod progress;
mod worker;

pub use app::run;

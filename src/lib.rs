// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod error;

pub mod page;
pub mod records;

pub mod controller;
pub mod download;
pub mod notify;

#[cfg(feature = "cli")]
pub mod cli;
pub mod gui;

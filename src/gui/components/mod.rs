// src/gui/components/mod.rs
pub mod data_table;
pub mod export_bar;
pub mod form;
pub mod page_view;
pub mod settings_bar;

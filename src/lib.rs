pub mod app;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod editor;
pub mod helper;
pub mod insert;
pub mod keybindings;
pub mod resolver;
pub mod ui;
pub mod utils;

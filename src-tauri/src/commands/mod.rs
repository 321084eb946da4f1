pub mod analyzer;
pub mod clipboard;
pub mod config;
pub mod health;

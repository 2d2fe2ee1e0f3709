//! Filmdex server library

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod utils;

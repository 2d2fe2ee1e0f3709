//! API route handlers

pub mod health;
pub mod movies;
pub mod search;
pub mod stats;

//! Data access layer

pub mod catalog;

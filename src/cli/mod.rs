//! Terminal presentation

pub mod summary;
pub mod ui;

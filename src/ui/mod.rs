//! Rendering surface: panels, line charts and the raw table view.

pub mod panels;
pub mod plot;
pub mod table;

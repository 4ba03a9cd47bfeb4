//! Presentation: chart figures, grid specs and the page that embeds them.

pub mod charts;
pub mod layout;
pub mod tables;

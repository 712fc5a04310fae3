//! Terminal output for laid-out runs

mod indicators;
mod summary;

pub use indicators::{state_color, state_indicator};
pub use summary::render_summary;

//! Colored state indicators

use colored::{Color, ColoredString, Colorize};

use crate::models::stage::StageState;

/// Single-glyph indicator for a stage state
pub fn state_indicator(state: StageState) -> ColoredString {
    match state {
        StageState::Success => "✓".green().bold(),
        StageState::Failure => "✗".red().bold(),
        StageState::Running => "●".blue().bold(),
        StageState::Queued => "▶".cyan().bold(),
        StageState::Paused => "‖".yellow().bold(),
        StageState::Unstable => "⚠".yellow().bold(),
        StageState::Aborted => "■".red(),
        StageState::NotBuilt => "○".white().dimmed(),
        StageState::Skipped => "⊘".white().dimmed().strikethrough(),
        StageState::Unknown | StageState::Unrecognized => "?".magenta().dimmed(),
    }
}

pub fn state_color(state: StageState) -> Color {
    match state {
        StageState::Success => Color::Green,
        StageState::Failure | StageState::Aborted => Color::Red,
        StageState::Running => Color::Blue,
        StageState::Queued => Color::Cyan,
        StageState::Paused | StageState::Unstable => Color::Yellow,
        StageState::NotBuilt | StageState::Skipped => Color::White,
        StageState::Unknown | StageState::Unrecognized => Color::Magenta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_shares_unknown_bucket() {
        assert_eq!(
            state_color(StageState::Unrecognized),
            state_color(StageState::Unknown)
        );
        assert_eq!(
            state_indicator(StageState::Unrecognized).to_string(),
            state_indicator(StageState::Unknown).to_string()
        );
    }

    #[test]
    fn test_failures_are_red() {
        assert_eq!(state_color(StageState::Failure), Color::Red);
        assert_eq!(state_color(StageState::Aborted), Color::Red);
    }
}

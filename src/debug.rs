//! Debug overlay text
//!
//! Plain lines so the web layer can drop them in a `<pre>` and the native
//! demo can log them.

use crate::layout::GridLayout;
use crate::sim::{CardState, SessionState};

/// Describe the live session and the grid it is laid out on
pub fn debug_lines(state: &SessionState, grid: &GridLayout) -> Vec<String> {
    let grid_json = serde_json::to_string_pretty(grid).unwrap_or_else(|e| format!("<{e}>"));
    let held: Vec<String> = state.selection.held().iter().map(|id| id.to_string()).collect();

    let mut lines = vec![
        format!("Round: {} (seed {})", state.round, state.seed()),
        format!("Status: {}", state.status().as_str()),
        format!("Phase: {:?}", state.phase),
        format!("Cards remaining: {}", state.deck.len()),
        format!("Lives: {}", state.lives),
        format!("Can move: {}", !state.movement_locked && !state.is_terminal()),
        format!("Selected: [{}]", held.join(", ")),
        format!("Matches: {}  Mismatches: {}", state.matches, state.mismatches),
    ];

    if let Some(pending) = &state.pending {
        lines.push(format!(
            "Pending: {:?} {}+{} in {}ms",
            pending.outcome, pending.first, pending.second, pending.remaining_ms
        ));
    }

    lines.push(format!("Grid config: {grid_json}"));
    lines.push("Card positions:".to_string());
    for (id, pos) in grid.place(&state.deck) {
        let marker = match state.card(id).map(|c| c.state) {
            Some(CardState::Selected) => "*",
            Some(CardState::Matched) => "=",
            _ => " ",
        };
        lines.push(format!("{marker}{id:>3}: ({:.0}, {:.0})", pos.x, pos.y));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::{EventLog, select};

    #[test]
    fn test_lines_reflect_state() {
        let config = GameConfig::card_faces();
        let grid = config.layout();
        let mut state = SessionState::new(config, 3).unwrap();
        let mut log = EventLog::new();
        let first = state.deck[0].id;
        select(&mut state, &mut log, first);

        let lines = debug_lines(&state, &grid);
        assert!(lines.contains(&"Cards remaining: 10".to_string()));
        assert!(lines.contains(&"Lives: 10".to_string()));
        assert!(lines.contains(&"Can move: true".to_string()));
        assert!(lines.contains(&format!("Selected: [{first}]")));
        assert!(lines.iter().any(|l| l.starts_with("Grid config: {")));
        assert!(lines.iter().any(|l| l.starts_with('*')));
        assert_eq!(lines.iter().filter(|l| l.contains(": (")).count(), 10);
    }

    #[test]
    fn test_pending_line_only_while_resolving() {
        let config = GameConfig::card_faces();
        let grid = config.layout();
        let mut state = SessionState::new(config, 3).unwrap();
        assert!(!debug_lines(&state, &grid).iter().any(|l| l.starts_with("Pending")));

        let mut log = EventLog::new();
        let (a, b) = (state.deck[0].id, state.deck[1].id);
        select(&mut state, &mut log, a);
        select(&mut state, &mut log, b);
        let lines = debug_lines(&state, &grid);
        assert!(lines.iter().any(|l| l.starts_with("Pending")));
        assert!(lines.contains(&"Can move: false".to_string()));
    }
}

use crate::session::StoredSession;
use crate::ui::style;

const PREVIEW_CHARS: usize = 60;

/// Listing printed by `--list`: one line per stored session, oldest first.
pub fn render_sessions(sessions: &[StoredSession], capacity: usize) -> String {
    if capacity == 0 {
        return "Session saving is disabled (capacity 0).".to_string();
    }
    if sessions.is_empty() {
        return "No saved sessions.".to_string();
    }

    let mut lines = vec![style::title(format!(
        "Saved sessions ({}/{capacity})",
        sessions.len()
    ))];
    for stored in sessions {
        let count = stored.record.len();
        let noun = if count == 1 { "exchange" } else { "exchanges" };
        lines.push(format!(
            "  {} {} {}  {}",
            style::ordinal(stored.index),
            style::model(&stored.record.model),
            style::note(format!("({count} {noun})")),
            preview(stored.record.headline().unwrap_or_default()),
        ));
    }
    lines.join("\n")
}

fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.chars().count() <= PREVIEW_CHARS {
        return line.to_string();
    }
    let cut: String = line.chars().take(PREVIEW_CHARS - 1).collect();
    format!("{}…", cut.trim_end())
}

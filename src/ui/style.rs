//! Terminal palette. Each helper names what it marks, not the color it uses,
//! so chat, listings and search results stay consistent with each other.

use console::{Style, style};
use std::fmt::Display;

/// Welcome line of an interactive chat.
pub fn banner<D: Display>(text: D) -> String {
    style(text).magenta().bold().to_string()
}

/// `NAME:` prefix in front of a chat line.
pub fn speaker(name: &str) -> String {
    style(format!("{name}:")).cyan().bold().to_string()
}

/// `Error:` prefix for a turn or request that failed.
pub fn failure_label() -> String {
    style("Error:").red().bold().to_string()
}

/// Confirmation tick for a completed change.
pub fn tick() -> String {
    style("✓").green().bold().to_string()
}

/// A model name, as stored or as selected.
pub fn model<D: Display>(name: D) -> String {
    style(name).blue().to_string()
}

/// `N.` position marker for numbered listings.
pub fn ordinal(position: usize) -> String {
    style(format!("{position}.")).yellow().bold().to_string()
}

pub fn title<D: Display>(text: D) -> String {
    style(text).bold().to_string()
}

pub fn link<D: Display>(url: D) -> String {
    style(url).blue().underlined().to_string()
}

/// Secondary detail: counts, durations, resume and save notes.
pub fn note<D: Display>(text: D) -> String {
    Style::new().dim().italic().apply_to(text).to_string()
}

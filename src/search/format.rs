use crate::backend::{ArticleHit, SearchHit, VideoHit};
use crate::ui::style;
use std::fmt::Write;

pub const NO_RESULTS: &str = "No results found.";

/// Renders hits as a numbered listing, one block per hit.
pub fn render_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut out = String::new();
    for (position, hit) in hits.iter().enumerate() {
        if position > 0 {
            out.push('\n');
        }
        let number = style::ordinal(position + 1);
        match hit {
            SearchHit::Article(article) => render_article(&mut out, &number, article),
            SearchHit::Video(video) => render_video(&mut out, &number, video),
        }
    }
    out
}

fn render_article(out: &mut String, number: &str, hit: &ArticleHit) {
    let _ = writeln!(out, "{number} {}", style::title(&hit.title));
    let _ = writeln!(out, "   {}", style::link(&hit.url));
    if !hit.body.is_empty() {
        let _ = writeln!(out, "   {}", hit.body);
    }
}

fn render_video(out: &mut String, number: &str, hit: &VideoHit) {
    let _ = write!(out, "{number} {}", style::title(&hit.title));
    if !hit.duration.is_empty() {
        let _ = write!(out, " {}", style::note(format!("[{}]", hit.duration)));
    }
    out.push('\n');
    let _ = writeln!(out, "   {}", style::link(&hit.url));
    if let Some(views) = hit.view_count {
        let _ = writeln!(out, "   {}", style::note(format!("{} views", group_digits(views))));
    }
}

fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (position, ch) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

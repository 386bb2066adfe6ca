//! Prompt panel for the phases before browsing: probing, tool missing, login
//! required and sync in progress.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::PromptInfo;

/// Renders the prompt title and its lines, indented. Lines wider than the
/// terminal are wrapped on spaces. Returns the next available row.
pub fn render_prompt(out: &mut String, row: usize, prompt: &PromptInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row + 1, 3);
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.prompt_fg));
    out.push_str(&prompt.title);
    out.push_str(Theme::reset());

    let mut next = row + 3;
    out.push_str(&Theme::fg(&theme.colors.text_normal));
    for line in &prompt.lines {
        for wrapped in wrap(line, cols.saturating_sub(6).max(20)) {
            position_cursor(out, next, 5);
            out.push_str(&wrapped);
            next += 1;
        }
    }
    out.push_str(Theme::reset());
    next
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

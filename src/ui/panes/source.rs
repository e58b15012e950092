//! Source code pane rendering with syntax highlighting
//!
//! This module renders the editor pane: the program being replayed, or the
//! program synthesized from the build surface.
//!
//! # Features
//!
//! - Syntax highlighting for Python keywords, strings, numbers, and comments
//! - Current line highlighting for the active trace step
//! - Scroll state that keeps the highlighted line at a fixed row
//! - Line numbering

use crate::session::Editor;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Editor contents plus the highlighted line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceBuffer {
    text: String,
    highlighted: Option<usize>,
}

impl SourceBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        SourceBuffer {
            text: text.into(),
            highlighted: None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// 1-based highlighted line
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }
}

impl Editor for SourceBuffer {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
        self.highlighted = None;
    }

    fn highlight_line(&mut self, line: Option<usize>) {
        self.highlighted = line;
    }
}

/// Simple syntax highlighting for Python source
fn highlight_source_code(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (byte, c) = chars[i];

        // Comments run to the end of the line
        if c == '#' || (c == '/' && chars.get(i + 1).is_some_and(|&(_, n)| n == '/')) {
            flush_word(&mut spans, &mut current_word, false);
            spans.push(Span::styled(
                line[byte..].to_string(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            break;
        }

        if c == '"' || c == '\'' {
            flush_word(&mut spans, &mut current_word, false);
            let mut end = i + 1;
            while end < chars.len() && chars[end].1 != c {
                end += if chars[end].1 == '\\' { 2 } else { 1 };
            }
            end = (end + 1).min(chars.len());
            let end_byte = chars.get(end).map_or(line.len(), |&(b, _)| b);
            spans.push(Span::styled(
                line[byte..end_byte].to_string(),
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        if !c.is_alphanumeric() && c != '_' {
            flush_word(&mut spans, &mut current_word, c == '(');

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    flush_word(&mut spans, &mut current_word, false);
    Line::from(spans)
}

fn flush_word(spans: &mut Vec<Span<'_>>, word: &mut String, is_function: bool) {
    if !word.is_empty() {
        let style = get_keyword_style(word, is_function);
        spans.push(Span::styled(std::mem::take(word), style));
    }
}

fn get_keyword_style(word: &str, is_function: bool) -> Style {
    match word {
        "class" | "def" | "return" | "if" | "elif" | "else" | "while" | "for" | "in" | "not"
        | "and" | "or" | "is" | "import" | "from" | "pass" | "break" | "continue" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "None" | "True" | "False" | "self" => Style::default().fg(DEFAULT_THEME.number),
        "Node" | "LinkedList" | "Stack" => Style::default().fg(DEFAULT_THEME.type_name),
        _ if word.chars().all(|c| c.is_ascii_digit()) => Style::default().fg(DEFAULT_THEME.number),
        _ => {
            if is_function {
                Style::default().fg(DEFAULT_THEME.function)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            }
        }
    }
}

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    buffer: &SourceBuffer,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = buffer.as_str().lines().collect();
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Keep the highlighted line at a fixed row once one is chosen
    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    if let Some(current_line) = buffer.highlighted().filter(|&l| l > 0 && l <= total_lines) {
        scroll_state.offset = (current_line - 1).saturating_sub(target_row);
    }
    let max_scroll = total_lines.saturating_sub(visible_height);
    scroll_state.offset = scroll_state.offset.min(max_scroll);

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = buffer.highlighted() == Some(line_num);

            let num_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut content_line = highlight_source_code(line);
            if is_current {
                let bg = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content_line.spans {
                    span.style = span.style.patch(bg);
                }
            }

            let marker = if is_current { "▶" } else { " " };
            let mut final_spans = vec![Span::styled(format!("{}{:4} ", marker, line_num), num_style)];
            final_spans.extend(content_line.spans);
            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_highlighting_preserves_text() {
        for src in [
            "head = Node(\"10\")",
            "    def __init__(self, val):  # ctor",
            "s1.push('x\\'y')",
            "// Stack is empty",
            "",
        ] {
            assert_eq!(joined(&highlight_source_code(src)), src);
        }
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(joined(&highlight_source_code("x = \"abc")), "x = \"abc");
    }

    #[test]
    fn test_set_text_clears_highlight() {
        let mut buffer = SourceBuffer::new("a\nb");
        buffer.highlight_line(Some(2));
        assert_eq!(buffer.highlighted(), Some(2));
        buffer.set_text("c".to_string());
        assert_eq!(buffer.highlighted(), None);
        assert_eq!(buffer.text(), "c");
    }
}

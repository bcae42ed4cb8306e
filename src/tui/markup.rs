//! # Chat Markup
//!
//! Turns backend chat text into styled ratatui [`Text`].
//!
//! Backend content is untrusted, so terminal control characters are
//! neutralised before anything else. The remaining text gets a deliberately
//! small markup: line breaks, `**bold**` and `*italic*`. Bold is matched
//! first, both are non-greedy, and an unmatched `*` stays literal.
//!
//! ```text
//! raw ─▶ neutralise ─▶ bold pass ─▶ italic pass ─▶ lines of styled spans
//! ```

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

const TAB: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    bold: bool,
    italic: bool,
}

impl Cell {
    fn plain(ch: char) -> Self {
        Self {
            ch,
            bold: false,
            italic: false,
        }
    }

    fn style(&self, base: Style) -> Style {
        let mut style = base;
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        style
    }
}

/// Replaces control characters (other than newline) with U+FFFD and
/// expands tabs. `\r\n` becomes `\n`.
pub fn neutralize(content: &str) -> String {
    let normalized = content.replace("\r\n", "\n");
    let mut out = String::with_capacity(normalized.len());
    for ch in normalized.chars() {
        match ch {
            '\n' => out.push('\n'),
            '\t' => out.push_str(TAB),
            c if c.is_control() => out.push(char::REPLACEMENT_CHARACTER),
            c => out.push(c),
        }
    }
    out
}

/// Renders `content` with `fg` as the base colour.
pub fn render(content: &str, fg: Color) -> Text<'static> {
    let chars: Vec<char> = neutralize(content).chars().collect();
    let cells = italic_pass(bold_pass(&chars));
    into_text(&cells, Style::default().fg(fg))
}

fn bold_pass(chars: &[char]) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if is_double_star(chars, i)
            && let Some(close) = (i + 2..chars.len()).find(|&j| is_double_star(chars, j))
        {
            cells.extend(chars[i + 2..close].iter().map(|&ch| Cell {
                ch,
                bold: true,
                italic: false,
            }));
            i = close + 2;
            continue;
        }
        cells.push(Cell::plain(chars[i]));
        i += 1;
    }
    cells
}

fn is_double_star(chars: &[char], i: usize) -> bool {
    chars.get(i) == Some(&'*') && chars.get(i + 1) == Some(&'*')
}

fn italic_pass(cells: Vec<Cell>) -> Vec<Cell> {
    let mut out = Vec::with_capacity(cells.len());
    let mut i = 0;
    while i < cells.len() {
        if cells[i].ch == '*'
            && let Some(close) = (i + 1..cells.len()).find(|&j| cells[j].ch == '*')
        {
            out.extend(cells[i + 1..close].iter().map(|c| Cell {
                italic: true,
                ..*c
            }));
            i = close + 1;
            continue;
        }
        out.push(cells[i]);
        i += 1;
    }
    out
}

fn into_text(cells: &[Cell], base: Style) -> Text<'static> {
    let lines: Vec<Line<'static>> = cells
        .split(|c| c.ch == '\n')
        .map(|line| into_line(line, base))
        .collect();
    Text::from(lines)
}

fn into_line(cells: &[Cell], base: Style) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style: Option<Style> = None;

    for cell in cells {
        let style = cell.style(base);
        if run_style.is_some_and(|s| s != style) {
            spans.push(Span::styled(std::mem::take(&mut run), run_style.unwrap_or(base)));
        }
        run_style = Some(style);
        run.push(cell.ch);
    }
    if let Some(style) = run_style {
        spans.push(Span::styled(run, style));
    }
    Line::from(spans)
}

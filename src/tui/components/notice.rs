//! Modal overlays: the blocking notice (Enter dismisses) and the end-chat
//! confirmation.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};

use crate::core::state::{Notice, Tone};
use crate::tui::component::Component;

const MAX_WIDTH: u16 = 60;
/// Borders (2) + horizontal padding (2)
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Borders (2) + blank line + hint line
const VERTICAL_OVERHEAD: u16 = 4;

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Info => Color::Cyan,
        Tone::Success => Color::Green,
        Tone::Error => Color::Red,
    }
}

/// A `width` x `height` rect centred in `outer`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(outer.height))])
        .flex(Flex::Center)
        .areas(outer);
    let [area] = Layout::horizontal([Constraint::Length(width.min(outer.width))])
        .flex(Flex::Center)
        .areas(row);
    area
}

/// Box sized to fit `body` wrapped at the overlay width.
fn popup_area(body: &str, outer: Rect) -> Rect {
    let width = MAX_WIDTH.min(outer.width.saturating_sub(4)).max(HORIZONTAL_OVERHEAD + 1);
    let text_width = (width - HORIZONTAL_OVERHEAD) as usize;
    let lines = textwrap::wrap(body, textwrap::Options::new(text_width).break_words(true));
    let height = (lines.len() as u16).max(1) + VERTICAL_OVERHEAD;
    centered_rect(width, height, outer)
}

fn render_popup(frame: &mut Frame, outer: Rect, title: &str, body: &str, hint: &str, color: Color) {
    let area = popup_area(body, outer);
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .title(Line::from(title).style(Style::default().fg(color).add_modifier(Modifier::BOLD)))
        .padding(Padding::horizontal(1));

    let mut lines: Vec<Line> = textwrap::wrap(
        body,
        textwrap::Options::new(area.width.saturating_sub(HORIZONTAL_OVERHEAD) as usize)
            .break_words(true),
    )
    .into_iter()
    .map(|l| Line::from(l.into_owned()))
    .collect();
    lines.push(Line::default());
    lines.push(Line::styled(hint, Style::default().fg(Color::DarkGray)).alignment(Alignment::Right));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
}

/// Blocking notice drawn over the current screen.
pub struct NoticeOverlay<'a> {
    pub notice: &'a Notice,
}

impl<'a> Component for NoticeOverlay<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = match self.notice.tone {
            Tone::Error => " Oops ",
            Tone::Success | Tone::Info => " Mira ",
        };
        render_popup(
            frame,
            area,
            title,
            &self.notice.text,
            "Enter to continue",
            tone_color(self.notice.tone),
        );
    }
}

/// "End this conversation?" prompt shown over the chat.
pub struct ConfirmOverlay<'a> {
    pub question: &'a str,
}

impl<'a> Component for ConfirmOverlay<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        render_popup(
            frame,
            area,
            " Confirm ",
            self.question,
            "y / Enter: yes   n / Esc: no",
            Color::Yellow,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_to_text(component: &mut dyn Component, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| component.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_centered_rect_clamps_to_outer() {
        let outer = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(10, 4, outer), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect(50, 40, outer), outer);
    }

    #[test]
    fn test_popup_grows_with_text() {
        let outer = Rect::new(0, 0, 80, 24);
        let short = popup_area("Hi", outer);
        let long = popup_area(&"word ".repeat(40), outer);
        assert_eq!(short.height, 1 + VERTICAL_OVERHEAD);
        assert!(long.height > short.height);
        assert_eq!(long.width, MAX_WIDTH);
    }

    #[test]
    fn test_error_notice_renders_text_and_hint() {
        let notice = Notice::error("Please select an answer before continuing.");
        let text = render_to_text(&mut NoticeOverlay { notice: &notice }, 80, 12);
        assert!(text.contains("Oops"));
        assert!(text.contains("Please select an answer before continuing."));
        assert!(text.contains("Enter to continue"));
    }

    #[test]
    fn test_confirm_overlay() {
        let text = render_to_text(
            &mut ConfirmOverlay {
                question: "End this conversation?",
            },
            80,
            12,
        );
        assert!(text.contains("End this conversation?"));
        assert!(text.contains("y / Enter: yes"));
    }

    #[test]
    fn test_tone_colors() {
        assert_eq!(tone_color(Tone::Error), Color::Red);
        assert_eq!(tone_color(Tone::Success), Color::Green);
        assert_eq!(tone_color(Tone::Info), Color::Cyan);
    }
}

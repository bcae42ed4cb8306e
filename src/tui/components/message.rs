use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::api::{ChatMessage, Role};
use crate::core::history::format_clock;
use crate::tui::component::Component;
use crate::tui::markup;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// A single chat message in a rounded box titled with its speaker.
///
/// # Design
///
/// `Message` is a **transient component**: it's created fresh each frame from
/// a borrowed transcript entry and holds no state of its own.
///
/// User messages are green, assistant messages blue. When the entry carries
/// a parseable `created_at`, its `HH:MM` sits on the bottom border. Content goes through
/// [`markup::render`] so backend text can never emit terminal control
/// sequences.
///
/// # Height Calculation
///
/// [`calculate_height`](Self::calculate_height) asks the same `Paragraph` the
/// widget renders for its wrapped line count, so the parent `MessageList` can
/// lay out the scroll canvas without rendering every message.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub message: &'a ChatMessage,
}

impl<'a> Message<'a> {
    pub fn new(message: &'a ChatMessage) -> Self {
        Self { message }
    }

    pub fn calculate_height(message: &ChatMessage, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Too narrow for borders + padding; still occupy a row.
            return 1;
        }

        if message.content.trim().is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let lines = paragraph(message).line_count(content_width);
        u16::try_from(lines)
            .unwrap_or(u16::MAX)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }
}

fn speaker(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Assistant => "mira",
    }
}

fn role_color(role: Role) -> Color {
    match role {
        Role::User => Color::Green,
        Role::Assistant => Color::Blue,
    }
}

fn paragraph(message: &ChatMessage) -> Paragraph<'static> {
    let text: Text<'static> = markup::render(message.content.trim(), role_color(message.role));
    Paragraph::new(text).wrap(Wrap { trim: true })
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let border_style = Style::default()
            .fg(role_color(self.message.role))
            .add_modifier(Modifier::DIM);

        let block = Block::bordered()
            .title(speaker(self.message.role))
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let block = match self.message.created_at.as_deref().and_then(format_clock) {
            Some(stamp) => block.title_bottom(Line::from(stamp).right_aligned()),
            None => block,
        };

        let inner_area = block.inner(area);
        block.render(area, buf);
        paragraph(self.message).render(inner_area, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn make_message(role: Role, content: &str) -> ChatMessage {
        ChatMessage {
            role,
            content: content.to_string(),
            created_at: None,
        }
    }

    // ==========================================================================
    // calculate_height tests
    // ==========================================================================

    #[test]
    fn calculate_height_empty_content_returns_border_height() {
        let msg = make_message(Role::User, "   \n\t  ");
        assert_eq!(Message::calculate_height(&msg, 80), VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        let msg = make_message(Role::User, "Hello world");
        assert_eq!(Message::calculate_height(&msg, 0), 1);
        assert_eq!(Message::calculate_height(&msg, HORIZONTAL_OVERHEAD), 1);
    }

    #[test]
    fn calculate_height_single_line_fits() {
        let msg = make_message(Role::Assistant, "Hello");
        assert_eq!(Message::calculate_height(&msg, 80), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_wraps_at_width_boundary() {
        let msg = make_message(Role::User, "Hello world");
        // content_width = 9 - 4 = 5: "Hello" | "world"
        assert_eq!(Message::calculate_height(&msg, 9), 2 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_counts_explicit_newlines() {
        let msg = make_message(Role::Assistant, "one\ntwo\nthree");
        assert_eq!(Message::calculate_height(&msg, 80), 3 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_ignores_markup_markers() {
        // 9 visible chars once the markers are gone
        let msg = make_message(Role::Assistant, "**abcdefghi**");
        assert_eq!(Message::calculate_height(&msg, 13), 1 + VERTICAL_OVERHEAD);
    }

    // ==========================================================================
    // Rendering
    // ==========================================================================

    #[test]
    fn render_shows_speaker_and_styled_content() {
        let msg = make_message(Role::Assistant, "Take a **deep** breath");
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|f| f.render_widget(Message::new(&msg), f.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text = buffer.content().iter().map(|c| c.symbol()).collect::<String>();
        assert!(text.contains("mira"));
        assert!(text.contains("Take a deep breath"));
        assert!(!text.contains('*'));

        let bold_cell = &buffer[(9, 1)];
        assert_eq!(bold_cell.symbol(), "d");
        assert!(bold_cell.modifier.contains(Modifier::BOLD));
        assert_eq!(bold_cell.fg, Color::Blue);
    }

    #[test]
    fn render_shows_clock_stamp_on_bottom_border() {
        let mut msg = make_message(Role::User, "hi");
        msg.created_at = Some("2024-01-15 08:30:00".to_string());
        let backend = TestBackend::new(30, 3);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|f| f.render_widget(Message::new(&msg), f.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let bottom: String = (0..30).map(|x| buffer[(x, 2)].symbol()).collect();
        assert!(bottom.contains("08:30"), "{bottom:?}");
        assert!(bottom.trim_end_matches('╯').ends_with("08:30"));
    }

    #[test]
    fn render_without_stamp_leaves_border_plain() {
        let mut msg = make_message(Role::Assistant, "hi");
        msg.created_at = Some("not a time".to_string());
        let backend = TestBackend::new(30, 3);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|f| f.render_widget(Message::new(&msg), f.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let bottom: String = (0..30).map(|x| buffer[(x, 2)].symbol()).collect();
        assert!(!bottom.contains(':'));
        assert!(!bottom.contains("not"));
    }

    #[test]
    fn calculate_height_saturates_for_huge_replies() {
        let content = "x\n".repeat(70_000);
        let msg = make_message(Role::Assistant, &content);
        assert_eq!(Message::calculate_height(&msg, 80), u16::MAX);
    }

    #[test]
    fn user_messages_are_labelled_you() {
        assert_eq!(speaker(Role::User), "you");
        assert_eq!(role_color(Role::User), Color::Green);
        assert_eq!(role_color(Role::Assistant), Color::Blue);
    }
}

//! Coloured `icon label` badge for a mood.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::core::mood::{MoodClass, descriptor};

pub fn class_color(class: MoodClass) -> Color {
    match class {
        MoodClass::Happy => Color::Green,
        MoodClass::Neutral => Color::Gray,
        MoodClass::Stressed => Color::Yellow,
        MoodClass::Depressed => Color::Red,
        MoodClass::Tired => Color::Cyan,
    }
}

/// Badge for a backend label. The label is shown verbatim; icon and colour
/// come from its descriptor.
pub fn badge(label: &str) -> Vec<Span<'static>> {
    let d = descriptor(label);
    let style = Style::default()
        .fg(class_color(d.class))
        .add_modifier(Modifier::BOLD);
    vec![
        Span::raw(format!("{} ", d.icon)),
        Span::styled(label.to_string(), style),
    ]
}

use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::FeedOrigin;
use crate::tui::theme;

pub struct HeaderInfo<'a> {
    pub masjid_name: &'a str,
    pub date_line: &'a str,
    pub clock: &'a str,
    pub origin: &'a FeedOrigin,
}

pub fn render(frame: &mut Frame, area: Rect, info: &HeaderInfo) {
    let mut title = vec![
        Span::styled(
            format!("  {}  ", info.masjid_name.to_uppercase()),
            theme::gold().add_modifier(Modifier::BOLD),
        ),
        Span::styled(info.clock, theme::bold()),
    ];
    if info.origin.is_offline() {
        title.push(Span::styled(
            format!("  ⚠ {}", info.origin.label()),
            theme::amber(),
        ));
    }

    let text = vec![
        Line::from(title),
        Line::from(""),
        Line::from(Span::styled(info.date_line, theme::emerald())),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme;
use crate::utils::format::marquee_window;

pub const SHAF_REMINDER: &str = "Mari luruskan dan rapatkan shaf ✦ Matikan HP saat sholat";

/// Running text: the mosque's vision statement (when the feed has one)
/// followed by the standing reminder.
pub fn running_text(visi: Option<&str>) -> String {
    match visi.map(str::trim).filter(|v| !v.is_empty()) {
        Some(visi) => format!("{} ✦ {} ✦ ", visi, SHAF_REMINDER),
        None => format!("{} ✦ ", SHAF_REMINDER),
    }
}

pub fn render(frame: &mut Frame, area: Rect, text: &str, offset: usize, audio_on: bool) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let marquee = marquee_window(text, offset, rows[0].width as usize);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(marquee, theme::gold()))),
        rows[0],
    );

    let hints = vec![
        ("[a]", if audio_on { " audio on  " } else { " audio off  " }),
        ("[r]", " reload  "),
        ("[?]", " help  "),
        ("[q]", " quit"),
    ];

    let mut spans = Vec::new();
    for (key, label) in &hints {
        spans.push(Span::styled(*key, theme::gold()));
        spans.push(Span::styled(*label, theme::dim()));
    }

    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(paragraph, rows[1]);
}

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_big_text::{BigText, PixelSize};
use unicode_width::UnicodeWidthStr;

use crate::models::{PhaseResult, PhaseStatus};
use crate::tui::theme;

/// Quadrant glyphs are 4 cells wide and 4 rows tall.
const GLYPH_WIDTH: u16 = 4;
const GLYPH_HEIGHT: u16 = 4;

/// Rect of `width`×`height` centred inside `area`, clipped to it.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Draw `text` in block letters centred in `area`, or as a plain line when
/// the area is too small for them.
pub fn render_big(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let width = text.width() as u16 * GLYPH_WIDTH;
    if width > area.width || GLYPH_HEIGHT > area.height {
        let line = Paragraph::new(Line::from(Span::styled(text.to_string(), style)))
            .alignment(Alignment::Center);
        frame.render_widget(line, centered(area, area.width, 1));
        return;
    }

    let big = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(style)
        .lines(vec![Line::from(text.to_string())])
        .build();
    frame.render_widget(big, centered(area, width, GLYPH_HEIGHT));
}

fn caption(phase: &PhaseResult) -> String {
    match (phase.status, phase.next) {
        (PhaseStatus::Normal, Some(next)) => format!("Menuju {}", next),
        (PhaseStatus::Iqomah, Some(prayer)) => format!("Iqomah {}", prayer),
        (PhaseStatus::Adzan, _) => "Waktu Adzan".to_string(),
        (PhaseStatus::Sholat, _) => "Sholat Berlangsung".to_string(),
        (PhaseStatus::Dzikir, _) => "Dzikir Ba'da Sholat".to_string(),
        (PhaseStatus::Loading, _) => "Memuat Jadwal".to_string(),
        (_, None) => String::new(),
    }
}

/// Countdown panel on the dashboard slide.
pub fn render(frame: &mut Frame, area: Rect, phase: &PhaseResult) {
    let block = Block::default()
        .title(Span::styled(" Hitung Mundur ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if phase.status.is_alert() {
            theme::red()
        } else {
            theme::border()
        })
        .style(theme::surface());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // caption
            Constraint::Min(0),    // digits
        ])
        .split(inner);

    let caption = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(caption(phase).to_uppercase(), theme::dim())),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(caption, rows[0]);

    render_big(frame, rows[1], &phase.display_text, theme::accent(phase.status));
}

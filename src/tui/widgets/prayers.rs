use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use crate::models::{PhaseResult, PrayerSchedule};
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    schedule: &PrayerSchedule,
    phase: &PhaseResult,
    now_minute: u32,
) {
    let block = Block::default()
        .title(Span::styled(" Jadwal Sholat ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    // Upcoming entry during normal time, the prayer in progress otherwise.
    let target = phase.next;
    let items: Vec<ListItem> = schedule
        .entries()
        .into_iter()
        .map(|(name, minute)| {
            let time_str = minute
                .map(|m| format!("{:02}:{:02}", m / 60, m % 60))
                .unwrap_or_else(|| "--:--".to_string());

            let is_target = target == Some(name);
            let is_past = minute.is_some_and(|m| m < now_minute);

            let (icon, name_style) = if is_target {
                ("▸", theme::accent(phase.status))
            } else if !name.is_wajib() {
                (" ", theme::dim())
            } else if is_past {
                ("✓", theme::dim())
            } else {
                (" ", theme::bold())
            };

            let time_style = if is_target {
                theme::accent(phase.status)
            } else {
                theme::dim().add_modifier(if name.is_wajib() {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                })
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", icon), name_style),
                Span::styled(format!("{:<9}", name.display_name()), name_style),
                Span::styled(time_str, time_style),
            ]))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

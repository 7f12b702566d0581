use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::{PhaseResult, SignageConfig};
use crate::signage::Slide;
use crate::tui::theme;
use crate::tui::widgets::next_prayer::render_big;

/// Headline in block letters plus a few lines of body text. Quiet slides
/// have no headline and a single body line.
struct Notice {
    headline: String,
    body: Vec<String>,
    style: Style,
    frame: Style,
}

fn notice_for(slide: Slide, phase: &PhaseResult, signage: &SignageConfig) -> Notice {
    let prayer = phase.next.map(|p| p.display_name()).unwrap_or_default();
    match slide {
        Slide::Emergency => Notice {
            headline: "PERHATIAN".into(),
            body: vec![signage.emergency_message.clone()],
            style: theme::red().add_modifier(Modifier::BOLD),
            frame: theme::alert(),
        },
        Slide::Khutbah => Notice {
            headline: String::new(),
            body: vec!["KHUTBAH JUMAT · Harap Tenang & Dengarkan Khatib".into()],
            style: theme::quiet(),
            frame: theme::quiet(),
        },
        Slide::Adzan => Notice {
            headline: "ADZAN".into(),
            body: vec!["Waktu sholat telah tiba".into(), "Mari jawab panggilan adzan".into()],
            style: theme::red().add_modifier(Modifier::BOLD),
            frame: theme::alert(),
        },
        Slide::Iqomah => Notice {
            headline: phase.display_text.clone(),
            body: vec![
                format!("Menuju iqomah {}", prayer),
                "Mari luruskan dan rapatkan shaf".into(),
            ],
            style: theme::red().add_modifier(Modifier::BOLD),
            frame: theme::alert(),
        },
        Slide::Sholat => Notice {
            headline: String::new(),
            body: vec!["SHOLAT SEDANG BERLANGSUNG".into()],
            style: theme::quiet(),
            frame: theme::quiet(),
        },
        Slide::Dzikir => Notice {
            headline: "DZIKIR".into(),
            body: vec!["Dzikir dan doa ba'da sholat".into()],
            style: theme::emerald().add_modifier(Modifier::BOLD),
            frame: theme::base(),
        },
        Slide::Info | Slide::Dashboard => Notice {
            headline: "VISI".into(),
            body: signage.visi.iter().cloned().collect(),
            style: theme::gold().add_modifier(Modifier::BOLD),
            frame: theme::base(),
        },
    }
}

/// Full-screen slide for everything except the dashboard.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    slide: Slide,
    phase: &PhaseResult,
    signage: &SignageConfig,
) {
    let notice = notice_for(slide, phase, signage);
    if slide.is_quiet() {
        render_quiet(frame, area, &notice);
        return;
    }

    let block = Block::default()
        .title(Span::styled(format!(" {} ", slide.title()), notice.style))
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(notice.style)
        .style(notice.frame);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45), // headline
            Constraint::Min(0),         // body
        ])
        .split(inner);

    render_big(frame, rows[0], &notice.headline, notice.style);

    let mut lines = vec![Line::from("")];
    lines.extend(
        notice
            .body
            .into_iter()
            .map(|l| Line::from(Span::styled(l, theme::bold()))),
    );
    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(body, rows[1]);
}

/// Black screen, one dim line in the middle, no border.
fn render_quiet(frame: &mut Frame, area: Rect, notice: &Notice) {
    frame.render_widget(Block::default().style(notice.frame), area);
    let middle = Rect {
        y: area.y + area.height / 2,
        height: area.height.min(1),
        ..area
    };
    let line = Paragraph::new(Line::from(Span::styled(notice.body.join(" "), notice.style)))
        .alignment(Alignment::Center);
    frame.render_widget(line, middle);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PhaseStatus, PrayerName};

    #[test]
    fn iqomah_headline_is_the_countdown() {
        let phase = PhaseResult::new(PhaseStatus::Iqomah, "4:59", Some(PrayerName::Ashar));
        let notice = notice_for(Slide::Iqomah, &phase, &SignageConfig::default());
        assert_eq!(notice.headline, "4:59");
        assert_eq!(notice.body[0], "Menuju iqomah Ashar");
    }

    #[test]
    fn emergency_shows_configured_message() {
        let signage = SignageConfig {
            emergency_mode: true,
            emergency_message: "Evakuasi lewat pintu utara".into(),
            ..Default::default()
        };
        let notice = notice_for(Slide::Emergency, &PhaseResult::loading(), &signage);
        assert_eq!(notice.body, vec!["Evakuasi lewat pintu utara".to_string()]);
    }

    #[test]
    fn sholat_and_khutbah_are_a_single_dim_line() {
        let phase = PhaseResult::new(PhaseStatus::Sholat, "SHOLAT", Some(PrayerName::Dzuhur));
        for slide in [Slide::Sholat, Slide::Khutbah] {
            let notice = notice_for(slide, &phase, &SignageConfig::default());
            assert!(notice.headline.is_empty());
            assert_eq!(notice.body.len(), 1);
            assert_eq!(notice.frame, theme::quiet());
        }
    }

    #[test]
    fn quiet_slide_leaves_everything_but_one_row_blank() {
        use ratatui::{backend::TestBackend, Terminal};

        let backend = TestBackend::new(60, 11);
        let mut terminal = Terminal::new(backend).unwrap();
        let phase = PhaseResult::new(PhaseStatus::Sholat, "SHOLAT", Some(PrayerName::Ashar));
        terminal
            .draw(|f| render(f, f.area(), Slide::Sholat, &phase, &SignageConfig::default()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        for y in 0..11u16 {
            let row: String = (0..60u16).map(|x| buffer[(x, y)].symbol()).collect();
            if y == 5 {
                assert_eq!(row.trim(), "SHOLAT SEDANG BERLANGSUNG");
            } else {
                assert!(row.trim().is_empty(), "row {y} should be blank: {row:?}");
            }
        }
        assert_eq!(buffer[(0, 0)].bg, ratatui::style::Color::Black);
    }

    #[test]
    fn info_slide_carries_visi() {
        let signage = SignageConfig {
            visi: Some("Masjid yang makmur".into()),
            ..Default::default()
        };
        let notice = notice_for(Slide::Info, &PhaseResult::loading(), &signage);
        assert_eq!(notice.body, vec!["Masjid yang makmur".to_string()]);
    }
}

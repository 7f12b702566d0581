use ratatui::style::{Color, Modifier, Style};

use crate::models::PhaseStatus;

pub const BG: Color = Color::Rgb(12, 20, 18);
pub const SURFACE: Color = Color::Rgb(20, 32, 28);
pub const BORDER: Color = Color::Rgb(44, 70, 60);
pub const TEXT: Color = Color::Rgb(230, 226, 210);
pub const TEXT_DIM: Color = Color::Rgb(120, 136, 126);
pub const GOLD: Color = Color::Rgb(212, 175, 55);
pub const EMERALD: Color = Color::Rgb(46, 160, 110);
pub const AMBER: Color = Color::Rgb(222, 150, 60);
pub const RED: Color = Color::Rgb(200, 52, 52);
pub const ALERT_BG: Color = Color::Rgb(60, 10, 12);
pub const QUIET_FG: Color = Color::Rgb(16, 58, 42);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn gold() -> Style {
    Style::default().fg(GOLD)
}

pub fn emerald() -> Style {
    Style::default().fg(EMERALD)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn border() -> Style {
    Style::default().fg(BORDER)
}

/// Full-screen slides for adzan, iqomah and emergencies.
pub fn alert() -> Style {
    Style::default().fg(TEXT).bg(ALERT_BG)
}

/// Black screen while the congregation prays.
pub fn quiet() -> Style {
    Style::default().fg(QUIET_FG).bg(Color::Black)
}

/// Accent for the highlighted schedule row and the countdown.
pub fn accent(status: PhaseStatus) -> Style {
    match status {
        PhaseStatus::Adzan | PhaseStatus::Iqomah => red().add_modifier(Modifier::BOLD),
        PhaseStatus::Sholat | PhaseStatus::Dzikir => emerald().add_modifier(Modifier::BOLD),
        PhaseStatus::Normal => gold().add_modifier(Modifier::BOLD),
        PhaseStatus::Loading => dim(),
    }
}

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::{debug, info, warn};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    DefaultTerminal, Frame,
};
use rusqlite::Connection;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::models::PhaseResult;
use crate::phase::{ClockDriver, PhaseEvent, ScheduleSnapshot, SnapshotCell, Tick, TransitionTracker};
use crate::prayer_times::source::{load_feed_from, LoadedFeed};
use crate::signage::{select_slide, Playlist, Slide};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::header::HeaderInfo;
use crate::tui::widgets::{header, next_prayer, prayers, slides, statusbar};
use crate::utils::hijri::{hijri_string, masehi_string};

pub struct App {
    pub config: AppConfig,
    pub should_quit: bool,
    pub show_help: bool,
    /// Terminal bell on the last seconds of iqomah.
    pub audio_enabled: bool,
    pub status_message: Option<String>,

    feed_override: Option<PathBuf>,
    cell: SnapshotCell,
    playlist: Playlist,
    tracker: TransitionTracker,
    bell_pending: bool,
    started: Instant,
    last_reload: Instant,
    loaded_for: NaiveDate,
    marquee_offset: usize,

    // Latest tick
    now: NaiveDateTime,
    phase: PhaseResult,
    snapshot: Arc<ScheduleSnapshot>,
    slide: Slide,
}

impl App {
    pub fn new(
        config: AppConfig,
        feed_override: Option<PathBuf>,
        cell: SnapshotCell,
        now: NaiveDateTime,
    ) -> Self {
        let started = Instant::now();
        let snapshot = cell.load();
        let phase = snapshot.evaluate(now);
        let mut playlist = Playlist::new(started);
        let slide = playlist.advance(started, now, &phase, &snapshot.feed.config.signage);

        App {
            config,
            should_quit: false,
            show_help: false,
            audio_enabled: true,
            status_message: None,
            feed_override,
            cell,
            playlist,
            tracker: TransitionTracker::new(),
            bell_pending: false,
            started,
            last_reload: started,
            loaded_for: now.date(),
            marquee_offset: 0,
            now,
            phase,
            snapshot,
            slide,
        }
    }

    fn feed_path(&self) -> Option<&Path> {
        self.feed_override
            .as_deref()
            .or(self.config.masjid.feed_path.as_deref())
    }

    pub fn on_tick(&mut self, tick: Tick, conn: &Connection) {
        for event in self.tracker.observe(&tick.phase) {
            match event {
                PhaseEvent::Entered { status, prayer } => match prayer {
                    Some(p) => info!("Phase {} ({})", status, p),
                    None => info!("Phase {}", status),
                },
                PhaseEvent::IqomahBeep { seconds_left } => {
                    debug!("Iqomah beep, {}s left", seconds_left);
                    if self.audio_enabled {
                        self.bell_pending = true;
                    }
                }
            }
        }

        let signage = &tick.snapshot.feed.config.signage;
        self.slide = self
            .playlist
            .advance(Instant::now(), tick.now, &tick.phase, signage);
        self.marquee_offset = self.marquee_offset.wrapping_add(1);

        self.now = tick.now;
        self.phase = tick.phase;
        self.snapshot = tick.snapshot;

        let reload_every = Duration::from_secs(self.config.display.reload_minutes.max(1) * 60);
        if self.now.date() != self.loaded_for || self.last_reload.elapsed() >= reload_every {
            self.reload(conn);
        }
    }

    /// Re-resolve the feed and publish it as a fresh snapshot. On failure the
    /// current snapshot stays in place.
    pub fn reload(&mut self, conn: &Connection) {
        let date = self.now.date();
        let loaded: Result<LoadedFeed> = load_feed_from(self.feed_path(), &self.config, conn, date);
        match loaded {
            Ok(loaded) => {
                info!("Schedule reloaded ({})", loaded.origin.label());
                self.cell.replace(loaded.into_snapshot());
                self.snapshot = self.cell.load();
                self.phase = self.snapshot.evaluate(self.now);
                self.slide = select_slide(
                    self.now,
                    &self.phase,
                    &self.snapshot.feed.config.signage,
                    self.playlist.index(),
                );
                self.status_message = None;
            }
            Err(e) => {
                warn!("Reload failed, keeping current schedule: {:#}", e);
                self.status_message = Some(format!("Reload failed: {:#}", e));
            }
        }
        self.loaded_for = date;
        self.last_reload = Instant::now();
    }

    /// True once per beep; the caller rings the bell after drawing.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell_pending)
    }

    pub fn handle_key(&mut self, key: KeyEvent, conn: &Connection) {
        // Some terminals also send release and repeat events
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.show_help {
            self.show_help = false;
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            KeyCode::Char('a') => {
                self.audio_enabled = !self.audio_enabled;
                info!("Audio {}", if self.audio_enabled { "on" } else { "off" });
            }
            KeyCode::Char('r') => {
                self.reload(conn);
            }
            _ => {}
        }
    }

    /// Gregorian and Hijri dates take turns every `hijri_toggle_secs`.
    fn date_line(&self) -> String {
        let toggle = self.config.display.hijri_toggle_secs.max(1);
        if (self.started.elapsed().as_secs() / toggle) % 2 == 1 {
            hijri_string(self.now.date(), self.config.salah.hijri_offset)
        } else {
            masehi_string(self.now.date())
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let signage = &self.snapshot.feed.config.signage;

        if !self.slide.shows_running_text() {
            slides::render(frame, area, self.slide, &self.phase, signage);
            if self.show_help {
                self.draw_help_overlay(frame);
            }
            return;
        }

        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(2), // running text + hints
            ])
            .split(area);

        let date_line = self.date_line();
        let clock = self.now.format("%H:%M:%S").to_string();
        header::render(
            frame,
            outer_chunks[0],
            &HeaderInfo {
                masjid_name: &self.config.masjid.name,
                date_line: &date_line,
                clock: &clock,
                origin: &self.snapshot.origin,
            },
        );

        match self.slide {
            Slide::Dashboard => self.draw_dashboard(frame, outer_chunks[1]),
            slide => slides::render(frame, outer_chunks[1], slide, &self.phase, signage),
        }

        let running = match &self.status_message {
            Some(msg) => format!("{} ✦ ", msg),
            None => statusbar::running_text(signage.visi.as_deref()),
        };
        statusbar::render(
            frame,
            outer_chunks[2],
            &running,
            self.marquee_offset,
            self.audio_enabled,
        );

        if self.show_help {
            self.draw_help_overlay(frame);
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame, body: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(body);

        let now_minute = self.now.hour() * 60 + self.now.minute();
        prayers::render(
            frame,
            columns[0],
            &self.snapshot.feed.jadwal,
            &self.phase,
            now_minute,
        );
        next_prayer::render(frame, columns[1], &self.phase);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();

        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: (area.height / 2).min(10),
        };

        frame.render_widget(Clear, popup_area);

        let keys = [
            ("  [a]      ", "Toggle iqomah beep"),
            ("  [r]      ", "Reload schedule now"),
            ("  [?]      ", "Toggle help"),
            ("  [q] Esc  ", "Quit"),
        ];
        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::gold().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        help_text.extend(keys.iter().map(|(key, label)| {
            Line::from(vec![
                Span::styled(*key, theme::gold()),
                Span::styled(*label, theme::dim()),
            ])
        }));

        let block = Block::default()
            .title(Span::styled(" Help ", theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::gold())
            .style(theme::surface());

        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, popup_area);
    }
}

fn ring_bell() -> Result<()> {
    let mut out = std::io::stdout();
    out.write_all(b"\x07")?;
    out.flush()?;
    Ok(())
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    events: &EventHandler,
    conn: &Connection,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;
        if app.take_bell() {
            ring_bell()?;
        }

        match events.next()? {
            Event::Key(key) => {
                app.handle_key(key, conn);
                if app.should_quit {
                    break;
                }
            }
            Event::Tick(tick) => app.on_tick(*tick, conn),
            Event::Resize => {}
        }
    }
    Ok(())
}

/// Run the signage TUI until the user quits.
pub fn run(conn: Connection, config: AppConfig, feed_override: Option<PathBuf>) -> Result<()> {
    let now = Local::now().naive_local();
    let path = feed_override
        .as_deref()
        .or(config.masjid.feed_path.as_deref());
    let loaded = load_feed_from(path, &config, &conn, now.date())?;
    let cell = SnapshotCell::new(loaded.into_snapshot());

    let interval = Duration::from_millis(config.display.tick_ms.max(100));
    let mut app = App::new(config, feed_override, cell.clone(), now);
    let events = EventHandler::new();
    let mut driver = ClockDriver::spawn(
        cell,
        || Local::now().naive_local(),
        interval,
        events.tick_publisher(),
    );

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app, &events, &conn);
    ratatui::restore();
    driver.stop();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::{Feed, FeedOrigin, PhaseStatus, PrayerSchedule};
    use crossterm::event::KeyModifiers;

    fn db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 15)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn feed() -> Feed {
        Feed {
            jadwal: PrayerSchedule {
                subuh: Some("04:30".into()),
                dzuhur: Some("12:00".into()),
                ashar: Some("15:00".into()),
                maghrib: Some("18:00".into()),
                isya: Some("19:00".into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn app_at(now: NaiveDateTime) -> App {
        let cell = SnapshotCell::new(ScheduleSnapshot::new(feed(), FeedOrigin::File));
        App::new(AppConfig::default(), None, cell, now)
    }

    fn tick(app: &App, now: NaiveDateTime) -> Tick {
        let snapshot = app.cell.load();
        Tick {
            now,
            phase: snapshot.evaluate(now),
            snapshot,
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn starts_on_dashboard_with_countdown() {
        let app = app_at(at(12, 32, 0));
        assert_eq!(app.phase.status, PhaseStatus::Normal);
        assert_eq!(app.phase.display_text, "2:28:00");
        assert_eq!(app.slide, Slide::Dashboard);
    }

    #[test]
    fn prayer_phases_take_over_the_screen() {
        let conn = db();
        let mut app = app_at(at(11, 59, 59));
        let t = tick(&app, at(12, 0, 0));
        app.on_tick(t, &conn);
        assert_eq!(app.slide, Slide::Adzan);
        let t = tick(&app, at(12, 5, 0));
        app.on_tick(t, &conn);
        assert_eq!(app.slide, Slide::Iqomah);
        assert_eq!(app.phase.display_text, "5:00");
    }

    #[test]
    fn beep_only_when_audio_enabled() {
        let conn = db();
        let mut app = app_at(at(12, 9, 0));
        let t = tick(&app, at(12, 9, 57));
        app.on_tick(t, &conn);
        assert!(app.take_bell());
        assert!(!app.take_bell());

        app.handle_key(press(KeyCode::Char('a')), &conn);
        assert!(!app.audio_enabled);
        let t = tick(&app, at(12, 9, 58));
        app.on_tick(t, &conn);
        assert!(!app.take_bell());
    }

    #[test]
    fn help_swallows_next_key() {
        let conn = db();
        let mut app = app_at(at(9, 0, 0));
        app.handle_key(press(KeyCode::Char('?')), &conn);
        assert!(app.show_help);
        app.handle_key(press(KeyCode::Char('q')), &conn);
        assert!(!app.show_help);
        assert!(!app.should_quit);
        app.handle_key(press(KeyCode::Esc), &conn);
        assert!(app.should_quit);
    }

    #[test]
    fn reload_swaps_in_new_feed() {
        let conn = db();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"jadwal":{{"subuh":"04:30","dzuhur":"12:00"}},"config":{{"emergency_mode":true}}}}"#
        )
        .unwrap();

        let cell = SnapshotCell::new(ScheduleSnapshot::new(feed(), FeedOrigin::Calculated));
        let mut app = App::new(
            AppConfig::default(),
            Some(file.path().to_path_buf()),
            cell.clone(),
            at(9, 0, 0),
        );
        app.handle_key(press(KeyCode::Char('r')), &conn);
        assert_eq!(app.slide, Slide::Emergency);

        let snapshot = cell.load();
        assert_eq!(snapshot.origin, FeedOrigin::File);
        assert!(snapshot.feed.config.signage.emergency_mode);
        assert!(app.status_message.is_none());

        let t = tick(&app, at(9, 0, 1));
        app.on_tick(t, &conn);
        assert_eq!(app.slide, Slide::Emergency);
    }

    fn draw_rows(app: &App) -> Vec<String> {
        use ratatui::{backend::TestBackend, Terminal};

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..24u16)
            .map(|y| (0..80u16).map(|x| buffer[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn sholat_screen_has_no_header_or_running_text() {
        let app = app_at(at(12, 15, 0));
        assert_eq!(app.slide, Slide::Sholat);
        let rows = draw_rows(&app);
        for row in rows[..5].iter().chain(&rows[22..]) {
            assert!(row.trim().is_empty(), "expected blank row, got {row:?}");
        }
        assert!(rows.iter().any(|r| r.contains("SHOLAT SEDANG BERLANGSUNG")));
    }

    #[test]
    fn dashboard_keeps_header_and_running_text() {
        let app = app_at(at(9, 0, 0));
        assert_eq!(app.slide, Slide::Dashboard);
        let rows = draw_rows(&app);
        assert!(rows[..5].iter().any(|r| r.contains("MASJID")));
        assert!(!rows[22].trim().is_empty());
        assert!(rows[23].contains("[q]"));
    }
}

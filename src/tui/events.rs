use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CEvent, KeyEvent};

use crate::phase::Tick;

/// How long the key thread waits for input before checking whether the
/// receiver is still around.
const KEY_POLL: Duration = Duration::from_millis(250);

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Tick(Box<Tick>),
    Resize,
}

/// Merges keyboard input with clock ticks published from the driver thread.
pub struct EventHandler {
    tx: mpsc::Sender<Event>,
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let key_tx = tx.clone();

        thread::spawn(move || loop {
            match event::poll(KEY_POLL) {
                Ok(true) => {
                    let sent = match event::read() {
                        Ok(CEvent::Key(key)) => key_tx.send(Event::Key(key)),
                        Ok(CEvent::Resize(..)) => key_tx.send(Event::Resize),
                        Ok(_) => Ok(()),
                        Err(_) => break,
                    };
                    if sent.is_err() {
                        break;
                    }
                }
                Ok(false) => {}
                Err(_) => break,
            }
        });

        Self { tx, rx }
    }

    /// Publisher for the clock driver. Returns `false` once the UI is gone.
    pub fn tick_publisher(&self) -> impl FnMut(Tick) -> bool + Send + 'static {
        let tx = self.tx.clone();
        move |tick| tx.send(Event::Tick(Box::new(tick))).is_ok()
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}

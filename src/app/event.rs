//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background reader
//! that forwards them over a channel so the main loop stays non-blocking.
//! The reader lives exactly as long as the [`EventSubscription`] returned by
//! [`subscribe`].

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
}

/// A live terminal event feed.  Dropping it stops the reader.
pub struct EventSubscription {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    token: CancellationToken,
}

impl EventSubscription {
    pub async fn recv(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Start reading terminal events.  `poll_interval` bounds how long the reader
/// takes to notice that the subscription was dropped.
pub fn subscribe(poll_interval: Duration) -> EventSubscription {
    let (tx, rx) = mpsc::unbounded_channel();
    let token = CancellationToken::new();
    let reader_token = token.clone();

    tokio::task::spawn_blocking(move || {
        while !reader_token.is_cancelled() {
            let has_event = event::poll(poll_interval).unwrap_or(false);
            if !has_event {
                continue;
            }
            let Ok(ev) = event::read() else {
                continue;
            };
            let app_event = match ev {
                // Windows also reports releases; only presses act.
                CtEvent::Key(k) if k.kind != KeyEventKind::Release => AppEvent::Key(k),
                CtEvent::Mouse(m) => AppEvent::Mouse(m),
                CtEvent::Resize(..) => AppEvent::Resize,
                _ => continue,
            };
            if tx.send(app_event).is_err() {
                break; // receiver dropped
            }
        }
        tracing::debug!("terminal event reader stopped");
    });

    EventSubscription { rx, token }
}

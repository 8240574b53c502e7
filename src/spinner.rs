//! A terminal spinner shown while waiting on the network.

use std::io::Write;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;

use crate::consts::format_duration;

/// Globe frames, one per tick.
const FRAMES: &[&str] = &["🌍", "🌎", "🌏"];

/// Frame interval.
const INTERVAL: Duration = Duration::from_millis(250);

/// Elapsed time is shown once a wait gets this long.
const SHOW_ELAPSED_AFTER: Duration = Duration::from_secs(2);

/// A terminal spinner that runs in a background task.
///
/// Writes to stderr so it doesn't interleave with the plan on stdout.
pub struct Spinner {
    handle: JoinHandle<()>,
    cancel: tokio::sync::watch::Sender<bool>,
}

impl Spinner {
    /// Start a spinner with the given message (e.g. `"Thinking..."`).
    pub fn start(message: &str) -> Self {
        let (cancel_tx, mut cancel_rx) = tokio::sync::watch::channel(false);
        let message = message.to_string();

        let handle = tokio::spawn(async move {
            let started = Instant::now();
            let mut ticker = tokio::time::interval(INTERVAL);
            for i in 0.. {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = cancel_rx.changed() => break,
                }
                let frame = FRAMES[i % FRAMES.len()];
                let line = render(frame, &message, started.elapsed());
                // \x1b[2K clears the line, \r returns to its start
                eprint!("\x1b[2K\r{line}");
                let _ = std::io::stderr().flush();
            }
            eprint!("\x1b[2K\r");
            let _ = std::io::stderr().flush();
        });

        Self {
            handle,
            cancel: cancel_tx,
        }
    }

    /// Stop the spinner and clear its line.
    pub async fn stop(self) {
        let _ = self.cancel.send(true);
        let _ = self.handle.await;
    }
}

fn render(frame: &str, message: &str, elapsed: Duration) -> String {
    if elapsed < SHOW_ELAPSED_AFTER {
        format!("{frame} {message}")
    } else {
        format!("{frame} {message} ({})", format_duration(elapsed.as_secs()))
    }
}

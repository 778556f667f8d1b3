//! Terminal spinner shown while an estimate is being "calculated"

use colored::*;
use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;

const SPINNER_CHARS: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const SPINNER_INTERVAL: Duration = Duration::from_millis(80);
const BAR_WIDTH: usize = 20;

/// Animated progress line on stderr
///
/// Starts when created and clears its line when dropped. With an expected
/// duration it also draws a progress bar that fills up as time passes.
pub struct Spinner {
    stop_tx: Option<oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    pub fn start(message: impl Into<String>) -> Self {
        Self::spawn(message.into(), None)
    }

    /// Spinner with a progress bar reaching 100% after `expected`
    pub fn start_timed(message: impl Into<String>, expected: Duration) -> Self {
        Self::spawn(message.into(), Some(expected))
    }

    fn spawn(message: String, expected: Option<Duration>) -> Self {
        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(Self::run_spinner(message, expected, stop_rx));

        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    pub fn stop(mut self) {
        self.stop_internal();
    }

    fn stop_internal(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        // Can't await in Drop
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }

        Self::clear_line();
    }

    async fn run_spinner(
        message: String,
        expected: Option<Duration>,
        mut stop_rx: oneshot::Receiver<()>,
    ) {
        let started = Instant::now();
        let mut frame = 0;
        let mut stderr = io::stderr();

        loop {
            let spinner_char = SPINNER_CHARS[frame % SPINNER_CHARS.len()];
            match expected {
                Some(expected) => {
                    let bar = progress_bar(started.elapsed(), expected);
                    let _ = write!(
                        stderr,
                        "\r{} {} {}",
                        spinner_char.to_string().cyan(),
                        message,
                        bar.dimmed()
                    );
                }
                None => {
                    let _ = write!(stderr, "\r{} {}", spinner_char.to_string().cyan(), message);
                }
            }
            let _ = stderr.flush();

            frame += 1;

            tokio::select! {
                _ = tokio::time::sleep(SPINNER_INTERVAL) => {},
                _ = &mut stop_rx => break,
            }
        }

        Self::clear_line();
    }

    fn clear_line() {
        let mut stderr = io::stderr();
        let _ = write!(stderr, "\r\x1b[K");
        let _ = stderr.flush();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop_internal();
    }
}

fn progress_bar(elapsed: Duration, expected: Duration) -> String {
    let ratio = if expected.is_zero() {
        1.0
    } else {
        (elapsed.as_secs_f64() / expected.as_secs_f64()).min(1.0)
    };
    let filled = (ratio * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>3}%",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        (ratio * 100.0).round() as u32
    )
}

/// Run a future with a spinner on screen
pub async fn with_spinner<F, T>(message: impl Into<String>, future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let _spinner = Spinner::start(message);
    future.await
}

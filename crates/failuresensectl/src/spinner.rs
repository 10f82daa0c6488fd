//! Terminal spinner shown while a submission is in flight
//! TTY-aware: piped output gets a single status line instead of animation.

use owo_colors::OwoColorize;
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const FRAMES: &[&str] = &["|", "/", "-", "\\"];

const SPINNER_INTERVAL_MS: u64 = 200;

/// Spinner writes to stderr so stdout carries only results
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<std::thread::JoinHandle<()>>,
    start_time: Instant,
    is_tty: bool,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let is_tty = io::stderr().is_terminal();

        if !is_tty {
            eprintln!("[failuresense]  ... {}", message);
            return Self {
                running,
                handle: None,
                start_time: Instant::now(),
                is_tty: false,
            };
        }

        let running_clone = running.clone();
        let message = message.to_string();
        let handle = std::thread::spawn(move || {
            let mut frame = 0;
            while running_clone.load(Ordering::Relaxed) {
                eprint!(
                    "\r{}  {} {}",
                    "[failuresense]".bright_cyan(),
                    FRAMES[frame].bright_yellow(),
                    message.dimmed()
                );
                let _ = io::stderr().flush();
                frame = (frame + 1) % FRAMES.len();
                std::thread::sleep(Duration::from_millis(SPINNER_INTERVAL_MS));
            }
        });

        Self {
            running,
            handle: Some(handle),
            start_time: Instant::now(),
            is_tty,
        }
    }

    /// Stop spinner and return elapsed time
    pub fn stop(mut self) -> Duration {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }

        if self.is_tty {
            eprint!("\r{}\r", " ".repeat(80));
            let _ = io::stderr().flush();
        }

        self.start_time.elapsed()
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

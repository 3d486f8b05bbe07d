use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;

/// Bar currently on screen, log lines are printed around it
static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// Progress bar over a known number of seeds
///
/// Hidden when stderr is not a terminal so logs stay readable in CI.
pub fn progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{msg:>20} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    pb.set_style(style);
    pb.set_message(message.to_string());

    if let Ok(mut active) = ACTIVE.lock() {
        *active = Some(pb.clone());
    }
    pb
}

fn active_bar() -> Option<ProgressBar> {
    ACTIVE
        .lock()
        .ok()
        .and_then(|active| active.clone())
        .filter(|pb| !pb.is_finished())
}

/// Stderr writer for the fmt layer that hides the bar while a line is printed
#[derive(Debug, Clone, Copy, Default)]
pub struct LogWriter;

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        *self
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_all(buf)?;
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match active_bar() {
            Some(pb) => pb.suspend(|| io::stderr().lock().write_all(buf)),
            None => io::stderr().lock().write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

use std::io::{self, Stdout, Write};
use std::sync::{Mutex, OnceLock, PoisonError};

use tracing::warn;

/// Destination of whole lines.
pub trait Console: Send + Sync {
    /// Write `line`, which already ends with a newline, in one piece.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying stream.
    fn write_line(&self, line: &str) -> io::Result<()>;
}

impl Console for Stdout {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = self.lock();
        out.write_all(line.as_bytes())?;
        out.flush()
    }
}

/// Prints newline-terminated lines. Once activated, lines printed from
/// different threads are serialized so they never interleave.
pub struct Printer<C: Console = Stdout> {
    console: C,
    lock: OnceLock<Mutex<()>>,
}

impl Default for Printer<Stdout> {
    fn default() -> Self {
        Printer::new(io::stdout())
    }
}

impl<C: Console> Printer<C> {
    #[must_use]
    pub fn new(console: C) -> Self {
        Printer {
            console,
            lock: OnceLock::new(),
        }
    }

    /// Serialize output from now on, for use from several threads.
    pub fn activate(&self) {
        self.lock.get_or_init(|| Mutex::new(()));
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.lock.get().is_some()
    }

    #[must_use]
    pub fn console(&self) -> &C {
        &self.console
    }

    /// Print a line, adding the newline if it is missing. Failures to write
    /// are logged and otherwise ignored.
    pub fn print(&self, line: &str) {
        let mut line = line.to_owned();
        if !line.ends_with('\n') {
            line.push('\n');
        }

        let result = match self.lock.get() {
            Some(lock) => {
                let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
                self.console.write_line(&line)
            }
            None => self.console.write_line(&line),
        };
        if let Err(err) = result {
            warn!(%err, "could not print line");
        }
    }
}

#[cfg(test)]
mod test {
    use std::io;
    use std::num::NonZeroUsize;
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use super::{Console, Printer};
    use crate::parallel::scheduler::Scheduler;

    /// Writes each line with one byte per call, so unsynchronized lines from
    /// different threads would interleave.
    #[derive(Default)]
    struct Bytewise(Mutex<Vec<u8>>);

    impl Console for Bytewise {
        fn write_line(&self, line: &str) -> io::Result<()> {
            for byte in line.bytes() {
                self.0.lock().unwrap().push(byte);
                std::thread::yield_now();
            }
            Ok(())
        }
    }

    fn output(printer: &Printer<Bytewise>) -> String {
        String::from_utf8(printer.console().0.lock().unwrap().clone()).unwrap()
    }

    #[test]
    fn adds_missing_newline() {
        let printer = Printer::new(Bytewise::default());
        assert!(!printer.is_active());
        printer.print("first");
        printer.print("second\n");
        printer.print("");
        assert_eq!(output(&printer), "first\nsecond\n\n");
    }

    #[test]
    fn activated_lines_do_not_interleave() {
        let printer = Arc::new(Printer::new(Bytewise::default()));
        printer.activate();
        assert!(printer.is_active());

        let scheduler = Scheduler::new(NonZeroUsize::new(4).unwrap());
        for job in 0..8 {
            let printer = Arc::clone(&printer);
            scheduler.schedule(move || {
                for line in 0..10 {
                    printer.print(&format!("JOB #{job} line {line}"));
                }
            });
        }
        scheduler.wait();

        let out = output(&printer);
        let mut lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 80);
        lines.sort_unstable();
        let mut expected: Vec<String> = (0..8)
            .flat_map(|job| (0..10).map(move |line| format!("JOB #{job} line {line}")))
            .collect();
        expected.sort_unstable();
        assert_eq!(lines, expected);
    }
}

//! Console sink: one locked writer, usually stdout or stderr.

use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

use crate::record::LogRecord;
use crate::sink::{lock, Sink};

/// Writes encoded records to a single stream.
///
/// Each record is encoded into its own buffer first and then written with one
/// `write_all` under the lock, so concurrent records never interleave.
pub struct ConsoleSink {
    name: &'static str,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// Sink bound to the process's standard output.
    pub fn stdout() -> Self {
        Self::from_writer("stdout", io::stdout())
    }

    /// Sink bound to the process's standard error.
    pub fn stderr() -> Self {
        Self::from_writer("stderr", io::stderr())
    }

    /// Sink bound to an arbitrary writer.
    pub fn from_writer(name: &'static str, writer: impl Write + Send + 'static) -> Self {
        Self {
            name,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink").field("name", &self.name).finish()
    }
}

impl Sink for ConsoleSink {
    fn write_record(&self, record: &LogRecord<'_>) -> io::Result<()> {
        let line = record.encode_line()?;
        lock(&self.writer).write_all(&line)
    }

    fn flush(&self) -> io::Result<()> {
        lock(&self.writer).flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Severity;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writes_one_line_per_record() {
        let buf = SharedBuf::default();
        let sink = ConsoleSink::from_writer("memory", buf.clone());

        sink.write_record(&LogRecord::new(Severity::Info, "first", &[])).unwrap();
        sink.write_record(&LogRecord::new(Severity::Warn, "second", &[])).unwrap();
        sink.flush().unwrap();

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"msg\":\"first\""));
        assert!(lines[1].contains("\"level\":\"warn\""));
    }

    #[test]
    fn test_concurrent_writes_stay_whole() {
        let buf = SharedBuf::default();
        let sink = Arc::new(ConsoleSink::from_writer("memory", buf.clone()));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let sink = sink.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let msg = format!("thread {} record {}", t, i);
                        sink.write_record(&LogRecord::new(Severity::Info, &msg, &[])).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(out.lines().count(), 400);
        for line in out.lines() {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value["msg"].as_str().unwrap().starts_with("thread "));
        }
    }

    #[test]
    fn test_debug_shows_name() {
        assert!(format!("{:?}", ConsoleSink::stderr()).contains("stderr"));
    }
}

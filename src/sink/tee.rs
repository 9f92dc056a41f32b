//! Fan-out sink.

use std::io;

use crate::record::LogRecord;
use crate::sink::Sink;

/// Forwards every record to each inner sink in order.
///
/// A failing inner sink does not stop delivery to the others; the first error
/// seen is returned after all of them were tried.
#[derive(Debug, Default)]
pub struct TeeSink {
    sinks: Vec<Box<dyn Sink>>,
}

impl TeeSink {
    pub fn new(sinks: Vec<Box<dyn Sink>>) -> Self {
        Self { sinks }
    }

    /// Combine `sinks` into one, skipping the tee when there is exactly one.
    pub fn combine(mut sinks: Vec<Box<dyn Sink>>) -> Box<dyn Sink> {
        if sinks.len() == 1 {
            if let Some(only) = sinks.pop() {
                return only;
            }
        }
        Box::new(Self::new(sinks))
    }

    pub fn push(&mut self, sink: Box<dyn Sink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn each(&self, mut op: impl FnMut(&dyn Sink) -> io::Result<()>) -> io::Result<()> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = op(sink.as_ref()) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl Sink for TeeSink {
    fn write_record(&self, record: &LogRecord<'_>) -> io::Result<()> {
        self.each(|sink| sink.write_record(record))
    }

    fn flush(&self) -> io::Result<()> {
        self.each(|sink| sink.flush())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Severity;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Default)]
    struct Counting {
        writes: Arc<AtomicUsize>,
        fail: bool,
    }

    impl Sink for Counting {
        fn write_record(&self, _record: &LogRecord<'_>) -> io::Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(io::Error::other("broken"))
            } else {
                Ok(())
            }
        }

        fn flush(&self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_fans_out_past_failures() {
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));
        let tee = TeeSink::new(vec![
            Box::new(Counting { writes: a.clone(), fail: true }),
            Box::new(Counting { writes: b.clone(), fail: false }),
        ]);

        let result = tee.write_record(&LogRecord::new(Severity::Info, "x", &[]));
        assert!(result.is_err());
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
        assert!(tee.flush().is_ok());
    }

    #[test]
    fn test_combine_single_unwraps() {
        let combined = TeeSink::combine(vec![Box::new(Counting::default())]);
        assert!(format!("{:?}", combined).starts_with("Counting"));

        let combined = TeeSink::combine(vec![
            Box::new(Counting::default()),
            Box::new(Counting::default()),
        ]);
        assert!(format!("{:?}", combined).starts_with("TeeSink"));
    }
}

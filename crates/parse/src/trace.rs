//! Sinks for the production trace.
//!
//! The recognizer reports every production it applies, in order, before
//! descending into it. Tracing never influences whether a parse succeeds.

use std::io;

pub trait Trace {
    fn production(&mut self, production: &str);
}

impl Trace for Vec<String> {
    fn production(&mut self, production: &str) {
        self.push(production.to_string());
    }
}

/// Writes one production per line.
///
/// The first write failure is kept and reported by `finish`, later
/// productions are dropped.
pub struct TraceWriter<W: io::Write> {
    w: W,
    error: Option<io::Error>,
}

impl<W> TraceWriter<W> where W: io::Write {
    pub fn new(w: W) -> Self {
        Self { w, error: None }
    }

    pub fn finish(mut self) -> Result<W, io::Error> {
        match self.error.take() {
            Some(err) => Err(err),
            None => {
                self.w.flush()?;
                Ok(self.w)
            }
        }
    }
}

impl<W> Trace for TraceWriter<W> where W: io::Write {
    fn production(&mut self, production: &str) {
        if self.error.is_some() {
            return;
        }

        if let Err(err) = writeln!(self.w, "{}", production) {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct FailingWriter;

    impl io::Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_one_line_per_production() {
        let mut writer = TraceWriter::new(Vec::new());
        writer.production("type -> integer");
        writer.production("parameters2 -> ε");

        let output = writer.finish().unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "type -> integer\nparameters2 -> ε\n");
    }

    #[test]
    fn keeps_first_error() {
        let mut writer = TraceWriter::new(FailingWriter);
        writer.production("type -> integer");
        writer.production("type -> string");

        let err = writer.finish().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}

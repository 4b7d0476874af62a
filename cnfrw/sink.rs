//! Line-oriented output shared by the writers.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::trace;

use crate::error::{CnfError, Result};
use crate::util::trim_newline;

/// Output destination writing newline-terminated lines.
pub(crate) struct LineSink<W: Write> {
    inner: W,
}

impl<W: Write> LineSink<W> {
    pub(crate) fn new(inner: W) -> Self {
        LineSink { inner }
    }

    pub(crate) fn show(&mut self, line: &str) -> Result<()> {
        let line = trim_newline(line);
        trace!(line, "write");
        writeln!(self.inner, "{line}")?;
        Ok(())
    }

    pub(crate) fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Create (or truncate) the file at `path` for buffered writing.
pub(crate) fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|err| CnfError::resource(path, err))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::LineSink;

    #[test]
    fn lines_end_with_single_newline() {
        let mut sink = LineSink::new(Vec::new());
        sink.show("c first\n").unwrap();
        sink.show("1 2 0").unwrap();
        let out = sink.finish().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "c first\n1 2 0\n");
    }
}

//! Writer for CNF files whose number of variables is only known at the end.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::cnf::writer::CnfWriter;
use crate::error::{CnfError, Result};
use crate::literal::{Literal, Variable};
use crate::sink;

/// Entry of the log replayed by [`LazyCnfWriter::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Clause(Vec<Literal>),
    Comment(String),
}

/// Where the finished file goes. A path is opened with the given function.
enum Target<W> {
    Path(PathBuf, fn(&Path) -> Result<W>),
    Writer(W),
}

/// Builds a CNF while allocating variables on the fly.
///
/// Clauses and comments are logged in order. [`LazyCnfWriter::finish`] hands
/// them to a [`CnfWriter`] declaring exactly the variables allocated so far.
/// A file target is not touched before the whole log has been checked.
#[allow(clippy::module_name_repetitions)]
pub struct LazyCnfWriter<W: Write> {
    target: Target<W>,
    variable_count: usize,
    clause_count: usize,
    items: Vec<Item>,
}

impl LazyCnfWriter<BufWriter<File>> {
    /// Writer to the file at `path`. The file is only created by
    /// [`LazyCnfWriter::finish`].
    #[must_use]
    pub fn create(path: impl AsRef<Path>) -> Self {
        LazyCnfWriter::with_target(Target::Path(path.as_ref().to_path_buf(), sink::create))
    }
}

impl<W: Write> LazyCnfWriter<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        LazyCnfWriter::with_target(Target::Writer(writer))
    }

    fn with_target(target: Target<W>) -> Self {
        LazyCnfWriter {
            target,
            variable_count: 0,
            clause_count: 0,
            items: Vec::new(),
        }
    }

    /// Allocate the next variable.
    pub fn new_variable(&mut self) -> Variable {
        self.variable_count += 1;
        Variable::from(self.variable_count)
    }

    /// Allocate `n` consecutive variables.
    pub fn new_variables(&mut self, n: usize) -> Vec<Variable> {
        (0..n).map(|_| self.new_variable()).collect()
    }

    /// Number of variables allocated so far.
    #[must_use]
    pub fn vcount(&self) -> usize {
        self.variable_count
    }

    #[must_use]
    pub fn clause_count(&self) -> usize {
        self.clause_count
    }

    pub fn do_comment(&mut self, line: impl Into<String>) {
        self.items.push(Item::Comment(line.into()));
    }

    /// Log a clause and return its 1-based index. Variables are checked when
    /// the clause is replayed.
    pub fn do_clause(&mut self, literals: impl Into<Vec<Literal>>) -> usize {
        self.items.push(Item::Clause(literals.into()));
        self.clause_count += 1;
        self.clause_count
    }

    /// Clauses logged so far.
    pub fn clause_list(&self) -> impl Iterator<Item = &[Literal]> {
        self.items.iter().filter_map(|item| match item {
            Item::Clause(literals) => Some(literals.as_slice()),
            Item::Comment(_) => None,
        })
    }

    /// Replay the log into a [`CnfWriter`] and write the file.
    ///
    /// # Errors
    ///
    /// Returns [`CnfError::Validation`] if a clause mentions a variable that
    /// was never allocated, [`CnfError::Resource`] if the file cannot be
    /// created, or an I/O error.
    pub fn finish(self) -> Result<W> {
        for literals in self.clause_list() {
            if let Some(lit) = literals
                .iter()
                .find(|lit| !lit.variable().within(self.variable_count))
            {
                return Err(CnfError::validation(
                    None,
                    format!(
                        "variable {} out of range 1--{}",
                        lit.variable(),
                        self.variable_count
                    ),
                ));
            }
        }

        let out = match self.target {
            Target::Path(path, open) => open(&path)?,
            Target::Writer(writer) => writer,
        };
        let mut writer = CnfWriter::new(self.variable_count, out);
        for item in &self.items {
            match item {
                Item::Clause(literals) => {
                    writer.do_clause(literals)?;
                }
                Item::Comment(line) => writer.do_comment(line),
            }
        }

        let clauses = writer.clause_count();
        let out = writer.finish()?;
        info!(
            variables = self.variable_count,
            clauses, "wrote lazily built cnf"
        );
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::LazyCnfWriter;
    use crate::cnf::reader::read_header;
    use crate::error::CnfError;
    use crate::literal::{literals, Literal, Variable};

    #[test]
    fn header_counts_allocated_variables() {
        for k in [1, 2, 5, 40] {
            let mut writer = LazyCnfWriter::new(Vec::new());
            let vars = writer.new_variables(k);
            for pair in vars.windows(2) {
                writer.do_clause(vec![Literal::from(pair[0]), -Literal::from(pair[1])]);
            }
            let expected_clauses = writer.clause_count();
            let out = writer.finish().unwrap();

            let header = read_header(&mut out.as_slice()).unwrap();
            assert_eq!(header.nvar, k);
            assert_eq!(header.nclause, expected_clauses);
        }
    }

    #[test]
    fn replays_in_order() {
        let mut writer = LazyCnfWriter::new(Vec::new());
        let a = writer.new_variable();
        writer.do_comment("a or b");
        let b = writer.new_variable();
        assert_eq!((a, b), (Variable(1), Variable(2)));
        assert_eq!(writer.do_clause(literals([1, 2])), 1);
        writer.do_comment("not a");
        assert_eq!(writer.do_clause(literals([-1])), 2);
        assert_eq!(
            writer.clause_list().collect::<Vec<_>>(),
            vec![literals([1, 2]).as_slice(), literals([-1]).as_slice()]
        );

        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(out, "c t mc\np cnf 2 2\nc a or b\n1 2 0\nc not a\n-1 0\n");
    }

    #[test]
    fn unallocated_variable() {
        let mut writer = LazyCnfWriter::new(Vec::new());
        writer.new_variable();
        writer.do_clause(literals([1, 2]));
        assert!(matches!(
            writer.finish(),
            Err(CnfError::Validation { .. })
        ));
    }

    #[test]
    fn file_created_only_after_checks() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("cnfrw-lazy-rejected-{}.cnf", std::process::id()));
        let mut writer = LazyCnfWriter::create(&path);
        writer.new_variable();
        writer.do_clause(literals([1]));
        writer.do_clause(literals([-2]));
        assert!(!path.exists());
        match writer.finish() {
            Err(CnfError::Validation { message, .. }) => {
                assert_eq!(message, "variable 2 out of range 1--1");
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
        assert!(!path.exists());

        let missing = dir.join("cnfrw-no-such-directory").join("out.cnf");
        let mut writer = LazyCnfWriter::create(missing);
        writer.new_variable();
        writer.do_clause(literals([1]));
        assert!(matches!(writer.finish(), Err(CnfError::Resource { .. })));
    }

    #[test]
    fn nothing_allocated() {
        let writer = LazyCnfWriter::new(Vec::new());
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(out, "c t mc\np cnf 0 0\n");
    }
}

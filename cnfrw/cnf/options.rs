use bon::Builder;
use clap::ValueEnum;

/// Shape of the problem line emitted by [`crate::cnf::writer::CnfWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum HeaderMode {
    /// `p cnf NVAR NCLAUSE`
    #[default]
    Fixed,
    /// `p inccnf`, for incremental solving of clause groups.
    Incremental,
}

#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone, Builder)]
pub struct ReaderOptions {
    /// Comment lines are kept in the document when the verbosity exceeds 1.
    #[builder(default = 1)]
    pub verbosity: u8,

    /// Reject empty clauses, out-of-range variables, and repeated or
    /// opposite literals within a clause.
    #[builder(default = true)]
    pub check: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions::builder().build()
    }
}

impl ReaderOptions {
    #[must_use]
    pub(crate) fn archive_comments(&self) -> bool {
        self.verbosity > 1
    }
}

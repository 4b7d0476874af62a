//! Reader for DIMACS CNF files annotated with `t`, `show`, `forget`, and
//! `weight` comment directives.
//!
//! The reader makes a single forward pass. Directives are only honored in the
//! part of the file where they make sense: the track class before the problem
//! line, everything else after it, since their variables are checked against
//! the declared count.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::cnf::document::{CnfDocument, TrackClass, VarSet, WeightMap};
use crate::cnf::options::ReaderOptions;
use crate::error::{CnfError, Result};
use crate::literal::{Literal, Variable};
use crate::util::{fields, trim_newline};

/// Problem line of a CNF file.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Header {
    pub nvar: usize,
    pub nclause: usize,
}

/// Current state of the CNF reader.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum ReaderState {
    BeforeHeader,
    AfterHeader,
}

/// Kind of a non-empty line, decided by its first character.
enum LineKind {
    Comment,
    Header,
    Clause,
}

fn classify(line: &str) -> LineKind {
    match line.as_bytes().first() {
        Some(b'c') => LineKind::Comment,
        Some(b'p') => LineKind::Header,
        _ => LineKind::Clause,
    }
}

/// Parse `p cnf NVAR NCLAUSE`.
fn parse_header(line_number: usize, line: &str) -> Result<Header> {
    let items = fields(&line[1..]);
    if items.len() != 3 || items[0] != "cnf" {
        return Err(CnfError::header(
            line_number,
            format!("bad header line '{line}', not cnf"),
        ));
    }

    let invalid = || {
        CnfError::header(
            line_number,
            format!("bad header line '{line}', invalid number of variables or clauses"),
        )
    };
    let nvar = items[1].parse::<usize>().map_err(|_| invalid())?;
    let nclause = items[2].parse::<usize>().map_err(|_| invalid())?;
    if i32::try_from(nvar).is_err() {
        return Err(CnfError::header(
            line_number,
            format!("{nvar} variables cannot be represented as literals"),
        ));
    }

    Ok(Header { nvar, nclause })
}

/// Read only as far as the problem line.
///
/// # Errors
///
/// Returns [`CnfError::MalformedHeader`] if a clause line precedes the problem
/// line, the problem line is invalid, or there is none.
pub fn read_header(reader: &mut dyn BufRead) -> Result<Header> {
    let mut line_number = 0;
    for line in reader.lines() {
        let line = line?;
        line_number += 1;
        let line = trim_newline(&line);
        if line.trim().is_empty() {
            continue;
        }
        match classify(line) {
            LineKind::Comment => continue,
            LineKind::Header => return parse_header(line_number, line),
            LineKind::Clause => {
                return Err(CnfError::header(line_number, "no header line, not cnf"))
            }
        }
    }

    Err(CnfError::header(line_number, "no header line, not cnf"))
}

/// Read only the problem line of the file at `path`.
///
/// # Errors
///
/// Returns [`CnfError::Resource`] if the file cannot be opened, otherwise
/// as [`read_header`].
pub fn read_header_path(path: impl AsRef<Path>) -> Result<Header> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| CnfError::resource(path, err))?;
    read_header(&mut BufReader::new(file))
}

/// CNF reader.
#[derive(Debug, Clone, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct CnfReader {
    options: ReaderOptions,
}

impl CnfReader {
    #[must_use]
    pub fn new(options: ReaderOptions) -> Self {
        CnfReader { options }
    }

    /// Read a whole document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * the problem line is missing, repeated, or malformed,
    /// * a clause line is malformed, or invalid while checking is enabled,
    /// * a directive refers to a variable outside `1..=nvar`,
    /// * the number of clauses differs from the declared one,
    /// * the underlying reader fails.
    pub fn read(&self, reader: &mut dyn BufRead) -> Result<CnfDocument> {
        let mut parse = Parse::new(&self.options);
        for line in reader.lines() {
            parse.line(&line?)?;
        }
        parse.finish()
    }

    /// Read a whole document from the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CnfError::Resource`] if the file cannot be opened, otherwise
    /// as [`CnfReader::read`].
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<CnfDocument> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| CnfError::resource(path, err))?;
        debug!(path = %path.display(), "reading cnf");
        self.read(&mut BufReader::new(file))
    }
}

/// State of a single pass over the input.
struct Parse<'a> {
    options: &'a ReaderOptions,
    state: ReaderState,
    doc: CnfDocument,
    line_number: usize,
    header_line: usize,
    last_clause_line: Option<usize>,
    nclause: usize,
}

impl<'a> Parse<'a> {
    fn new(options: &'a ReaderOptions) -> Self {
        Parse {
            options,
            state: ReaderState::BeforeHeader,
            doc: CnfDocument::default(),
            line_number: 0,
            header_line: 0,
            last_clause_line: None,
            nclause: 0,
        }
    }

    fn line(&mut self, line: &str) -> Result<()> {
        self.line_number += 1;
        let line = trim_newline(line);
        if line.trim().is_empty() {
            return Ok(());
        }

        match classify(line) {
            LineKind::Comment => {
                self.comment(line)?;
                if self.options.archive_comments() {
                    self.doc.comments.push(line.to_owned());
                }
            }
            LineKind::Header => {
                if self.state == ReaderState::AfterHeader {
                    return Err(CnfError::header(self.line_number, "duplicate header line"));
                }
                let header = parse_header(self.line_number, line)?;
                debug!(nvar = header.nvar, nclause = header.nclause, "parsed header");
                self.doc.nvar = header.nvar;
                self.nclause = header.nclause;
                self.header_line = self.line_number;
                self.state = ReaderState::AfterHeader;
            }
            LineKind::Clause => {
                if self.state == ReaderState::BeforeHeader {
                    return Err(CnfError::header(self.line_number, "no header line, not cnf"));
                }
                let clause = self.clause(line)?;
                self.doc.clauses.push(clause);
                self.last_clause_line = Some(self.line_number);
            }
        }

        Ok(())
    }

    fn comment(&mut self, line: &str) -> Result<()> {
        let items = fields(line);
        match self.state {
            ReaderState::BeforeHeader => {
                if items.len() == 3 && items[1] == "t" {
                    if let Ok(class) = items[2].parse::<TrackClass>() {
                        self.doc.declared_class = Some(class);
                        // A projected class promises a show set, even an empty one.
                        if class.is_projected() {
                            self.doc.show.get_or_insert_with(VarSet::new);
                        }
                    }
                }
            }
            ReaderState::AfterHeader => {
                if items.len() < 3 || items[1] != "p" {
                    return Ok(());
                }
                match items[2] {
                    "show" => {
                        let vars = self.directive_variables(&items[3..])?;
                        self.doc.show.get_or_insert_with(VarSet::new).extend(vars);
                    }
                    "forget" => {
                        let vars = self.directive_variables(&items[3..])?;
                        self.doc.forget.get_or_insert_with(VarSet::new).extend(vars);
                    }
                    "weight" => self.weight(&items[3..])?,
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Variables of a `show` or `forget` directive, terminated by `0`.
    fn directive_variables(&self, tokens: &[&str]) -> Result<Vec<Variable>> {
        let Some((&"0", tokens)) = tokens.split_last() else {
            return Err(CnfError::validation(
                Some(self.line_number),
                "directive should end with 0",
            ));
        };

        tokens
            .iter()
            .map(|token| {
                let var = token.parse::<i64>().map_err(|_| {
                    CnfError::validation(
                        Some(self.line_number),
                        format!("couldn't parse '{token}' as number"),
                    )
                })?;
                self.variable(var)
            })
            .collect()
    }

    /// Body of `c p weight LIT WEIGHT 0`.
    fn weight(&mut self, tokens: &[&str]) -> Result<()> {
        let (lit, weight) = match tokens {
            [lit, weight, "0"] => (*lit, *weight),
            _ => {
                return Err(CnfError::validation(
                    Some(self.line_number),
                    "weight directive should be 'p weight LIT WEIGHT 0'",
                ))
            }
        };

        let lit = lit.parse::<i32>().map_err(|_| {
            CnfError::validation(
                Some(self.line_number),
                format!("couldn't parse '{lit}' as literal"),
            )
        })?;
        self.variable(i64::from(lit))?;

        self.doc
            .weights
            .get_or_insert_with(WeightMap::default)
            .insert(Literal(lit), weight.to_owned());
        Ok(())
    }

    fn variable(&self, var: i64) -> Result<Variable> {
        match u32::try_from(var.unsigned_abs()) {
            Ok(idx) if var != 0 && Variable(idx).within(self.doc.nvar) => Ok(Variable(idx)),
            _ => Err(CnfError::validation(
                Some(self.line_number),
                format!("invalid variable {var}, expected 1--{}", self.doc.nvar),
            )),
        }
    }

    fn clause(&self, line: &str) -> Result<Vec<Literal>> {
        let mut literals = line
            .split_whitespace()
            .map(|token| {
                token.parse::<i32>().map(Literal).map_err(|_| {
                    CnfError::clause(self.line_number, format!("non-integer field '{token}'"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if literals.pop() != Some(Literal(0)) {
            return Err(CnfError::clause(
                self.line_number,
                "clause line should end with 0",
            ));
        }
        if literals.contains(&Literal(0)) {
            return Err(CnfError::clause(self.line_number, "zero inside clause"));
        }

        if self.options.check {
            let mut vars: Vec<Variable> = literals.iter().map(|lit| lit.variable()).collect();
            vars.sort_unstable();
            if vars.is_empty() {
                return Err(CnfError::clause(self.line_number, "empty clause"));
            }
            if vars.iter().any(|var| !var.within(self.doc.nvar)) {
                return Err(CnfError::clause(self.line_number, "out-of-range literal"));
            }
            if vars.windows(2).any(|pair| pair[0] == pair[1]) {
                return Err(CnfError::clause(
                    self.line_number,
                    "opposite or repeated literal",
                ));
            }
        }

        Ok(literals)
    }

    fn finish(self) -> Result<CnfDocument> {
        if self.state == ReaderState::BeforeHeader {
            return Err(CnfError::header(self.line_number, "no header line, not cnf"));
        }

        let actual = self.doc.clauses.len();
        if actual != self.nclause {
            return Err(CnfError::CountMismatch {
                line: self.last_clause_line.unwrap_or(self.header_line),
                actual,
                expected: self.nclause,
            });
        }

        debug!(
            nvar = self.doc.nvar,
            nclause = actual,
            class = %self.doc.track_class(),
            "read cnf"
        );
        Ok(self.doc)
    }
}

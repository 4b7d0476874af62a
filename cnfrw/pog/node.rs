use std::fmt::Display;
use std::io::BufRead;

use crate::error::{CnfError, Result};
use crate::literal::{join, Literal, Variable};
use crate::util::{fields, trim_newline};

/// Operation of a POG node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    And,
    Or,
}

impl Gate {
    fn symbol(self) -> &'static str {
        match self {
            Gate::And => "p",
            Gate::Or => "s",
        }
    }
}

/// Gate of the trace. Arguments are input literals or (possibly negated)
/// references to earlier nodes; both share the integer space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub gate: Gate,
    pub id: Variable,
    pub args: Vec<Literal>,
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.args.is_empty() {
            write!(f, "{} {}", self.gate.symbol(), self.id)
        } else {
            write!(f, "{} {} {}", self.gate.symbol(), self.id, join(&self.args))
        }
    }
}

/// Proof-of-graph trace over `nvar` input variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PogDocument {
    nvar: usize,
    nodes: Vec<Node>,
    root: Literal,
}

impl PogDocument {
    #[must_use]
    pub fn nvar(&self) -> usize {
        self.nvar
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn root(&self) -> Literal {
        self.root
    }

    /// Node with the given id, if `id` names a node rather than an input.
    #[must_use]
    pub fn node(&self, id: Variable) -> Option<&Node> {
        (id.0 as usize)
            .checked_sub(self.nvar + 1)
            .and_then(|idx| self.nodes.get(idx))
    }

    /// Read a trace produced by [`crate::pog::writer::PogWriter`].
    ///
    /// # Errors
    ///
    /// Returns [`CnfError::MalformedClause`] on unknown lines, node ids out of
    /// sequence, or arguments referring to later nodes, and
    /// [`CnfError::Validation`] if there is not exactly one root.
    pub fn parse(nvar: usize, reader: &mut dyn BufRead) -> Result<PogDocument> {
        let mut nodes: Vec<Node> = Vec::new();
        let mut root: Option<Literal> = None;
        let mut line_number = 0;

        for line in reader.lines() {
            let line = line?;
            line_number += 1;
            let items = fields(trim_newline(&line));
            let next_id = nvar + nodes.len() + 1;

            let literal = |token: &str| -> Result<Literal> {
                match token.parse::<i32>() {
                    Ok(value) if value != 0 && (value.unsigned_abs() as usize) < next_id => {
                        Ok(Literal(value))
                    }
                    _ => Err(CnfError::clause(
                        line_number,
                        format!("invalid argument '{token}'"),
                    )),
                }
            };

            match items.as_slice() {
                [] => {}
                [comment, ..] if comment.starts_with('c') => {}
                [symbol @ ("p" | "s"), id, args @ ..] => {
                    if id.parse::<usize>().ok() != Some(next_id) {
                        return Err(CnfError::clause(
                            line_number,
                            format!("expected node {next_id}, found '{id}'"),
                        ));
                    }
                    let gate = if *symbol == "p" { Gate::And } else { Gate::Or };
                    let args = args
                        .iter()
                        .map(|token| literal(*token))
                        .collect::<Result<Vec<_>>>()?;
                    nodes.push(Node {
                        gate,
                        id: Variable::from(next_id),
                        args,
                    });
                }
                ["r", lit] => {
                    if root.is_some() {
                        return Err(CnfError::validation(Some(line_number), "second root"));
                    }
                    root = Some(literal(*lit)?);
                }
                _ => {
                    return Err(CnfError::clause(
                        line_number,
                        format!("unexpected line '{line}'"),
                    ))
                }
            }
        }

        let root = root.ok_or_else(|| CnfError::validation(None, "no root declared"))?;
        Ok(PogDocument { nvar, nodes, root })
    }
}

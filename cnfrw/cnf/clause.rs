//! Canonical form of clauses.
use crate::error::{CnfError, Result};
use crate::literal::Literal;

/// Outcome of canonicalizing a list of literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Canonical {
    /// Literals sorted by descending variable, free of duplicates. May be empty.
    Clause(Vec<Literal>),
    /// The clause contained a literal together with its negation.
    Tautology,
}

impl Canonical {
    #[must_use]
    pub fn is_tautology(&self) -> bool {
        matches!(self, Canonical::Tautology)
    }

    /// Literals of a regular clause, `None` for a tautology.
    #[must_use]
    pub fn literals(&self) -> Option<&[Literal]> {
        match self {
            Canonical::Clause(literals) => Some(literals),
            Canonical::Tautology => None,
        }
    }
}

/// Canonicalize a clause: order literals by descending variable, drop
/// repeated literals, and detect opposite literals.
///
/// [`Literal::TRUE`] turns the clause into a tautology; its negation is dropped.
#[must_use]
pub fn clean(literals: &[Literal]) -> Canonical {
    let mut sorted = literals.to_vec();
    // Stable, so a literal and its negation stay in input order and end up adjacent.
    sorted.sort_by_key(|lit| std::cmp::Reverse(lit.0.unsigned_abs()));

    let mut rest = sorted.as_slice();
    while let Some((&first, tail)) = rest.split_first() {
        if first == Literal::TRUE {
            return Canonical::Tautology;
        }
        if first != -Literal::TRUE {
            break;
        }
        rest = tail;
    }

    let mut clause: Vec<Literal> = Vec::with_capacity(rest.len());
    for &lit in rest {
        match clause.last() {
            Some(&prev) if prev == lit => continue,
            Some(&prev) if prev.eq_negated(lit) => return Canonical::Tautology,
            _ => clause.push(lit),
        }
    }

    Canonical::Clause(clause)
}

/// Canonicalize every clause of a list.
///
/// # Errors
///
/// Returns [`CnfError::Tautology`] naming the first tautologous clause (1-based)
/// when `reject_tautologies` is set.
pub fn clean_all<C: AsRef<[Literal]>>(
    clauses: &[C],
    reject_tautologies: bool,
) -> Result<Vec<Canonical>> {
    clauses
        .iter()
        .enumerate()
        .map(|(idx, clause)| {
            let canonical = clean(clause.as_ref());
            if reject_tautologies && canonical.is_tautology() {
                return Err(CnfError::Tautology {
                    index: idx + 1,
                    literals: clause.as_ref().to_vec(),
                });
            }
            Ok(canonical)
        })
        .collect()
}

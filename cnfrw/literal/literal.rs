use derive_more::derive::{Display, From};

/// Propositional variable. Variables are numbered from 1, as in DIMACS;
/// a document over `nvar` variables uses exactly `1..=nvar`.
#[derive(PartialEq, Eq, Clone, PartialOrd, Ord, Debug, Copy, Hash, From, Display)]
pub struct Variable(pub u32);

impl Variable {
    /// Check whether the variable belongs to a document declaring `nvar` variables.
    #[must_use]
    pub fn within(self, nvar: usize) -> bool {
        self.0 >= 1 && self.0 as usize <= nvar
    }

    /// Position of the variable in zero-based storage.
    #[must_use]
    pub fn index(self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }
}

impl From<usize> for Variable {
    fn from(value: usize) -> Self {
        Variable(u32::try_from(value).unwrap_or(u32::MAX))
    }
}

/// Polarity of a literal.
#[derive(Clone, Debug, Eq, PartialEq, PartialOrd, Ord, Copy)]
pub enum Polarity {
    Positive,
    Negative,
}

impl From<bool> for Polarity {
    fn from(item: bool) -> Self {
        if item {
            Polarity::Positive
        } else {
            Polarity::Negative
        }
    }
}

impl std::ops::Not for Polarity {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Polarity::Positive => Polarity::Negative,
            Polarity::Negative => Polarity::Positive,
        }
    }
}

/// Literal in DIMACS notation: a nonzero signed integer whose absolute
/// value is the [`Variable`] and whose sign is the [`Polarity`].
#[derive(PartialEq, Eq, Clone, PartialOrd, Ord, Debug, Copy, Hash, From, Display)]
pub struct Literal(pub i32);

impl Literal {
    /// Synthetic literal that is always true. A clause containing it is a
    /// tautology, and its negation is vacuous inside a clause.
    pub const TRUE: Literal = Literal(1_000_000_000);

    #[must_use]
    pub fn new(variable: Variable, polarity: Polarity) -> Literal {
        let value = i32::try_from(variable.0).unwrap_or(i32::MAX);
        match polarity {
            Polarity::Positive => Literal(value),
            Polarity::Negative => Literal(-value),
        }
    }

    #[must_use]
    pub fn variable(self) -> Variable {
        Variable(self.0.unsigned_abs())
    }

    #[must_use]
    pub fn polarity(self) -> Polarity {
        Polarity::from(self.0 > 0)
    }

    /// Check whether [`self`] is negated [`other`].
    #[must_use]
    pub fn eq_negated(self, other: Literal) -> bool {
        self.0 == -other.0 && self.0 != 0
    }
}

impl From<Variable> for Literal {
    fn from(variable: Variable) -> Self {
        Literal::new(variable, Polarity::Positive)
    }
}

impl std::ops::Neg for Literal {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Literal(-self.0)
    }
}

/// Collect plain integers into literals.
pub fn literals(values: impl IntoIterator<Item = i32>) -> Vec<Literal> {
    values.into_iter().map(Literal::from).collect()
}

/// Render literals separated by single spaces, without the terminating zero.
pub(crate) fn join<T: std::fmt::Display>(items: &[T]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&item.to_string());
    }
    out
}

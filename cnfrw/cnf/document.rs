use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;

use rustc_hash::FxHashMap;

use crate::literal::{Literal, Variable};

/// Set of variables, ordered so that directives are written deterministically.
pub type VarSet = BTreeSet<Variable>;

/// Weights indexed by literal. Weights stay decimal strings; their precision
/// is the caller's business.
pub type WeightMap = FxHashMap<Literal, String>;

/// Counting problem a document poses: (un)weighted and (un)projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum TrackClass {
    #[default]
    Mc,
    Wmc,
    Pmc,
    Pwmc,
}

impl TrackClass {
    #[must_use]
    pub fn new(weighted: bool, projected: bool) -> Self {
        match (weighted, projected) {
            (false, false) => TrackClass::Mc,
            (true, false) => TrackClass::Wmc,
            (false, true) => TrackClass::Pmc,
            (true, true) => TrackClass::Pwmc,
        }
    }

    #[must_use]
    pub fn is_weighted(self) -> bool {
        matches!(self, TrackClass::Wmc | TrackClass::Pwmc)
    }

    #[must_use]
    pub fn is_projected(self) -> bool {
        matches!(self, TrackClass::Pmc | TrackClass::Pwmc)
    }

    /// Class after a weight has been declared.
    #[must_use]
    pub fn weighted(self) -> Self {
        TrackClass::new(true, self.is_projected())
    }

    /// Class after a show set has been declared.
    #[must_use]
    pub fn projected(self) -> Self {
        TrackClass::new(self.is_weighted(), true)
    }
}

impl Display for TrackClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TrackClass::Mc => "mc",
            TrackClass::Wmc => "wmc",
            TrackClass::Pmc => "pmc",
            TrackClass::Pwmc => "pwmc",
        };
        write!(f, "{label}")
    }
}

impl FromStr for TrackClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mc" => Ok(TrackClass::Mc),
            "wmc" => Ok(TrackClass::Wmc),
            "pmc" => Ok(TrackClass::Pmc),
            "pwmc" => Ok(TrackClass::Pwmc),
            other => Err(format!("unknown track class '{other}'")),
        }
    }
}

/// CNF formula together with its annotations, as read from a file.
///
/// Clauses keep the literal order of the source; use
/// [`crate::cnf::clause::clean`] to canonicalize them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CnfDocument {
    pub(crate) nvar: usize,
    pub(crate) clauses: Vec<Vec<Literal>>,
    pub(crate) weights: Option<WeightMap>,
    pub(crate) show: Option<VarSet>,
    pub(crate) forget: Option<VarSet>,
    pub(crate) comments: Vec<String>,
    pub(crate) declared_class: Option<TrackClass>,
}

impl CnfDocument {
    /// Number of variables declared by the header.
    #[must_use]
    pub fn nvar(&self) -> usize {
        self.nvar
    }

    #[must_use]
    pub fn clauses(&self) -> &[Vec<Literal>] {
        &self.clauses
    }

    #[must_use]
    pub fn into_clauses(self) -> Vec<Vec<Literal>> {
        self.clauses
    }

    #[must_use]
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub fn weights(&self) -> Option<&WeightMap> {
        self.weights.as_ref()
    }

    #[must_use]
    pub fn weight(&self, literal: Literal) -> Option<&str> {
        self.weights
            .as_ref()
            .and_then(|weights| weights.get(&literal))
            .map(String::as_str)
    }

    /// Show set exactly as declared: `None` if the file never announced a
    /// projection, possibly empty otherwise.
    #[must_use]
    pub fn declared_show(&self) -> Option<&VarSet> {
        self.show.as_ref()
    }

    /// Variables whose assignments count. Without a projection, every variable.
    #[must_use]
    pub fn show_variables(&self) -> VarSet {
        match &self.show {
            Some(show) => show.clone(),
            None => (1..=self.nvar).map(Variable::from).collect(),
        }
    }

    #[must_use]
    pub fn forget_variables(&self) -> Option<&VarSet> {
        self.forget.as_ref()
    }

    /// Comment lines kept by a verbose read, in file order.
    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Class announced by a `c t` line, if any.
    #[must_use]
    pub fn declared_class(&self) -> Option<TrackClass> {
        self.declared_class
    }

    /// Class implied by the annotations actually present.
    #[must_use]
    pub fn track_class(&self) -> TrackClass {
        let weighted = self.weights.as_ref().is_some_and(|w| !w.is_empty());
        TrackClass::new(weighted, self.show.is_some())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{CnfDocument, TrackClass, VarSet};
    use crate::btreeset;
    use crate::literal::{Literal, Variable};

    #[test]
    fn class_promotion() {
        assert_eq!(TrackClass::Mc.weighted(), TrackClass::Wmc);
        assert_eq!(TrackClass::Mc.projected(), TrackClass::Pmc);
        assert_eq!(TrackClass::Wmc.projected(), TrackClass::Pwmc);
        assert_eq!(TrackClass::Pmc.weighted(), TrackClass::Pwmc);
        assert_eq!(TrackClass::Pwmc.weighted(), TrackClass::Pwmc);
    }

    #[test]
    fn class_labels() {
        for class in [
            TrackClass::Mc,
            TrackClass::Wmc,
            TrackClass::Pmc,
            TrackClass::Pwmc,
        ] {
            assert_eq!(class.to_string().parse::<TrackClass>(), Ok(class));
        }
        assert!("pmcc".parse::<TrackClass>().is_err());
    }

    #[test]
    fn absent_and_empty_show_differ() {
        let absent = CnfDocument {
            nvar: 3,
            ..Default::default()
        };
        assert_eq!(absent.declared_show(), None);
        assert_eq!(
            absent.show_variables(),
            btreeset!(Variable(1), Variable(2), Variable(3))
        );
        assert_eq!(absent.track_class(), TrackClass::Mc);

        let empty = CnfDocument {
            nvar: 3,
            show: Some(VarSet::new()),
            ..Default::default()
        };
        assert_eq!(empty.declared_show(), Some(&VarSet::new()));
        assert!(empty.show_variables().is_empty());
        assert_eq!(empty.track_class(), TrackClass::Pmc);
    }

    #[test]
    fn weight_lookup() {
        let mut doc = CnfDocument {
            nvar: 1,
            ..Default::default()
        };
        assert_eq!(doc.weight(Literal(1)), None);
        doc.weights = Some([(Literal(-1), "0.25".to_string())].into_iter().collect());
        assert_eq!(doc.weight(Literal(-1)), Some("0.25"));
        assert_eq!(doc.track_class(), TrackClass::Wmc);
    }
}

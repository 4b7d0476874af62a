//! Human-readable overview of a document.
use std::fmt::Display;

use tabled::{builder::Builder, grid::config::HorizontalLine, settings::Theme};

use crate::cnf::document::CnfDocument;

/// Table describing the size and annotations of a [`CnfDocument`].
pub struct Summary<'a> {
    name: String,
    doc: &'a CnfDocument,
}

impl<'a> Summary<'a> {
    #[must_use]
    pub fn new(name: impl Into<String>, doc: &'a CnfDocument) -> Self {
        Summary {
            name: name.into(),
            doc,
        }
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        let doc = self.doc;
        let literals: usize = doc.clauses().iter().map(Vec::len).sum();
        let longest = doc.clauses().iter().map(Vec::len).max().unwrap_or(0);
        let declared = doc
            .declared_class()
            .map_or_else(|| "-".to_owned(), |class| class.to_string());
        let show = match doc.declared_show() {
            Some(show) => show.len().to_string(),
            None => format!("all ({})", doc.nvar()),
        };
        let forget = doc.forget_variables().map_or(0, |forget| forget.len());
        let weights = doc.weights().map_or(0, |weights| weights.len());

        vec![
            ("variables", doc.nvar().to_string()),
            ("clauses", doc.clause_count().to_string()),
            ("literals", literals.to_string()),
            ("longest clause", longest.to_string()),
            ("class", doc.track_class().to_string()),
            ("declared class", declared),
            ("shown", show),
            ("forgotten", forget.to_string()),
            ("weights", weights.to_string()),
        ]
    }
}

impl Display for Summary<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut builder = Builder::default();
        builder.push_record([self.name.as_str(), ""]);
        for (key, value) in self.rows() {
            builder.push_record([key.to_owned(), value]);
        }

        let mut style = Theme::default();
        style.insert_horizontal_line(1, HorizontalLine::full('-', '-', ' ', ' '));
        let output = builder.build().with(style).to_string();
        write!(f, "{output}")
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::Summary;
    use crate::cnf::reader::CnfReader;

    #[test]
    fn rows() {
        let contents = "c t pmc
p cnf 4 2
c p show 1 2 0
c p weight 3 0.5 0
1 -2 3 0
4 0
";
        let doc = CnfReader::default().read(&mut contents.as_bytes()).unwrap();
        let summary = Summary::new("example.cnf", &doc);
        let rows = summary.rows();
        let value = |key: &str| {
            rows.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
                .unwrap()
        };

        assert_eq!(value("variables"), "4");
        assert_eq!(value("literals"), "4");
        assert_eq!(value("longest clause"), "3");
        assert_eq!(value("class"), "pwmc");
        assert_eq!(value("declared class"), "pmc");
        assert_eq!(value("shown"), "2");
        assert_eq!(value("weights"), "1");

        let rendered = summary.to_string();
        assert!(rendered.contains("example.cnf"));
        assert!(rendered.contains("pwmc"));
    }
}

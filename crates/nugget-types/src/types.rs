use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a source document that can support a fact
pub type DocumentId = String;

/// A single fact label together with the documents known to support it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactEntry {
    /// Fact label as it appears in the topic file
    pub label: String,
    /// Supporting documents in input order (duplicates preserved)
    pub documents: Vec<DocumentId>,
    /// Elements of the written list that were not document ids
    #[serde(default, skip_serializing_if = "is_zero")]
    pub skipped: usize,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(count: &usize) -> bool {
    *count == 0
}

impl FactEntry {
    /// Create a fact entry from a label and any iterable of document ids
    #[must_use]
    pub fn new<I, D>(label: impl Into<String>, documents: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DocumentId>,
    {
        Self {
            label: label.into(),
            documents: documents.into_iter().map(Into::into).collect(),
            skipped: 0,
        }
    }

    /// Number of usable document ids
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Length of the document list as written, skipped elements included
    #[must_use]
    pub fn listed_count(&self) -> usize {
        self.documents.len() + self.skipped
    }

    /// A fact with no supporting document can never be covered
    #[must_use]
    pub fn is_unsupportable(&self) -> bool {
        self.documents.is_empty()
    }

    /// Build a fact entry from a JSON document list.
    ///
    /// String elements are taken verbatim and integer elements are rendered in decimal.
    /// Anything else inside the array is skipped and counted in `skipped`. A value that is
    /// not an array is an error; callers decide whether to keep the fact with an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error when `value` is not a JSON array.
    pub fn from_json(label: &str, value: &serde_json::Value) -> Result<Self> {
        let serde_json::Value::Array(items) = value else {
            return Err(anyhow!(
                "Document list for fact '{}' must be an array, found {}",
                label,
                json_kind(value)
            ));
        };

        let documents: Vec<DocumentId> = items
            .iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
                _ => None,
            })
            .collect();
        let skipped = items.len() - documents.len();

        Ok(Self { label: label.to_string(), documents, skipped })
    }
}

impl fmt::Display for FactEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} docs)", self.label, self.documents.len())
    }
}

/// Discriminant of a [`Requirement`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    /// Every fact must be covered
    And,
    /// Any single alternative suffices
    Or,
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
        }
    }
}

/// A flattened requirement of a topic, in input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requirement {
    /// All listed facts are mandatory
    And {
        /// Fact question the requirement came from
        question: String,
        /// Mandatory facts, in input order
        facts: Vec<FactEntry>,
    },
    /// Exactly one alternative has to be satisfied
    Or {
        /// Fact question the requirement came from
        question: String,
        /// Substitutable facts, in input order
        alternatives: Vec<FactEntry>,
    },
}

impl Requirement {
    /// Build an AND-requirement
    #[must_use]
    pub fn and(question: impl Into<String>, facts: Vec<FactEntry>) -> Self {
        Self::And { question: question.into(), facts }
    }

    /// Build an OR-requirement
    #[must_use]
    pub fn or(question: impl Into<String>, alternatives: Vec<FactEntry>) -> Self {
        Self::Or { question: question.into(), alternatives }
    }

    /// Fact question this requirement was flattened from
    #[must_use]
    pub fn question(&self) -> &str {
        match self {
            Self::And { question, .. } | Self::Or { question, .. } => question,
        }
    }

    /// Facts (AND) or alternatives (OR) in input order
    #[must_use]
    pub fn entries(&self) -> &[FactEntry] {
        match self {
            Self::And { facts, .. } => facts,
            Self::Or { alternatives, .. } => alternatives,
        }
    }

    /// Which variant this requirement is
    #[must_use]
    pub const fn kind(&self) -> RequirementKind {
        match self {
            Self::And { .. } => RequirementKind::And,
            Self::Or { .. } => RequirementKind::Or,
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: ", self.kind(), self.question())?;
        for (i, entry) in self.entries().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Short name of a JSON value's kind, used in diagnostics
#[must_use]
pub const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fact_entry_from_json_mixed_ids() {
        let entry = FactEntry::from_json("f", &json!(["doc1", 42, true, null, "doc2"])).unwrap();
        assert_eq!(entry.documents, vec!["doc1", "42", "doc2"]);
        assert_eq!(entry.skipped, 2);
        assert_eq!(entry.document_count(), 3);
        assert_eq!(entry.listed_count(), 5);
        assert!(!entry.is_unsupportable());
    }

    #[test]
    fn test_fact_entry_of_only_non_ids_is_unsupportable() {
        let entry = FactEntry::from_json("f", &json!([1.5, true])).unwrap();
        assert!(entry.documents.is_empty());
        assert_eq!(entry.skipped, 2);
        assert!(entry.is_unsupportable());
    }

    #[test]
    fn test_fact_entry_from_json_rejects_non_array() {
        let err = FactEntry::from_json("f", &json!("doc1")).unwrap_err();
        assert!(err.to_string().contains("found string"));
    }

    #[test]
    fn test_requirement_accessors() {
        let req = Requirement::or("Q1", vec![FactEntry::new("a", ["d1"])]);
        assert_eq!(req.kind(), RequirementKind::Or);
        assert_eq!(req.question(), "Q1");
        assert_eq!(req.entries().len(), 1);
        assert_eq!(req.to_string(), "OR [Q1]: a (1 docs)");
    }

    #[test]
    fn test_requirement_serde_tag() {
        let req = Requirement::and("Q", vec![FactEntry::new("a", ["d1", "d2"])]);
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["kind"], "and");
        assert_eq!(value["facts"][0]["documents"][1], "d2");
        assert!(value["facts"][0].get("skipped").is_none());
    }
}

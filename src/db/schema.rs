//! Static schema descriptor for the inventory store.
//!
//! The descriptor is built once at process start and embedded verbatim in
//! every generation prompt. It must list exactly the relations the executor
//! is permitted to touch; the validator has no notion of allowed relations
//! beyond what appears here.

use std::fmt;

/// Semantic type of a column, as communicated to the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    /// Free text (item labels, identifiers stored as text).
    Text,
    /// Integer quantity or key.
    Integer,
    /// UTC ISO-8601 timestamp stored as text.
    TimestampText,
}

impl SemanticType {
    /// Returns the type as rendered in the prompt schema block.
    pub fn as_prompt_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Integer => "INTEGER",
            Self::TimestampText => "TEXT",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_prompt_str())
    }
}

/// A column of a queryable relation.
#[derive(Debug, Clone)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Semantic type.
    pub semantic_type: SemanticType,
}

impl Column {
    /// Creates a new column with the given name and semantic type.
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
        }
    }
}

/// A queryable relation.
#[derive(Debug, Clone)]
pub struct Relation {
    /// Relation name.
    pub name: String,

    /// Ordered columns.
    pub columns: Vec<Column>,
}

impl Relation {
    /// Creates a new relation with the given name and columns.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    fn format_for_prompt(&self) -> String {
        let cols = self
            .columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.semantic_type))
            .collect::<Vec<_>>()
            .join(", ");
        format!("- {}({})", self.name, cols)
    }
}

/// Immutable, versioned description of the queryable relations.
#[derive(Debug, Clone)]
pub struct SchemaDescriptor {
    /// Descriptor version, bumped whenever the relation set changes.
    pub version: u32,

    /// Ordered relations.
    pub relations: Vec<Relation>,
}

impl SchemaDescriptor {
    /// Builds the descriptor for the inventory store.
    ///
    /// Two relations: the current stock snapshot and the append-only
    /// detection log. Writes happen only through the ingestion path.
    pub fn inventory() -> Self {
        Self {
            version: 1,
            relations: vec![
                Relation::new(
                    "inventory_current",
                    vec![
                        Column::new("item_name", SemanticType::Text),
                        Column::new("stock_count", SemanticType::Integer),
                        Column::new("last_updated", SemanticType::TimestampText),
                    ],
                ),
                Relation::new(
                    "inventory_log",
                    vec![
                        Column::new("id", SemanticType::Integer),
                        Column::new("timestamp", SemanticType::TimestampText),
                        Column::new("image_id", SemanticType::Text),
                        Column::new("item_name", SemanticType::Text),
                        Column::new("count", SemanticType::Integer),
                    ],
                ),
            ],
        }
    }

    /// Formats the schema for inclusion in a generation prompt.
    ///
    /// One line per relation, compact column list, so the generator sees the
    /// real relation and column names rather than hallucinating them.
    pub fn format_for_prompt(&self) -> String {
        self.relations
            .iter()
            .map(Relation::format_for_prompt)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns the names of all queryable relations.
    pub fn relation_names(&self) -> Vec<&str> {
        self.relations.iter().map(|r| r.name.as_str()).collect()
    }
}

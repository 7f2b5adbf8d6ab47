use serde_json::Value;

/// One predicate on a top-level document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The field equals the value.
    Eq { field: String, value: Value },
    /// The field equals any of the values.
    In { field: String, values: Vec<Value> },
}

impl Condition {
    fn matches(&self, document: &Value) -> bool {
        match self {
            Condition::Eq { field, value } => document.get(field) == Some(value),
            Condition::In { field, values } => document
                .get(field)
                .is_some_and(|actual| values.contains(actual)),
        }
    }
}

/// Builder for document filters.
///
/// Conditions are combined with AND. An empty filter matches every document
/// in the collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Creates a filter with a single equality condition.
    pub fn field_eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and_eq(field, value)
    }

    /// Creates a filter matching any of the given values.
    pub fn field_in<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::all().and_in(field, values)
    }

    /// Adds an equality condition.
    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Adds an any-of condition.
    pub fn and_in<V: Into<Value>>(
        mut self,
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.conditions.push(Condition::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Returns true if the document satisfies every condition.
    pub fn matches(&self, document: &Value) -> bool {
        self.conditions.iter().all(|c| c.matches(document))
    }
}

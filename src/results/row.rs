use crate::model::KeyValue;

/// A named value within a row.
///
/// Values are always text, whatever the backend's native type was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
}

impl Field {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A row from a fetch, holding its fields in the order the driver returned them.
///
/// Field names need not be unique within a row (directory entries repeat
/// attributes, for example); name lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub fields: Vec<Field>,
}

impl Row {
    #[must_use]
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Append a field, keeping insertion order.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(Field::new(name, value));
    }

    /// Get the first field called `name`
    ///
    /// # Arguments
    ///
    /// * `name` - The field name, compared case-sensitively
    ///
    /// # Returns
    ///
    /// The first matching field, or None if the row has no such field
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Value of the first field called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.field(name).map(|f| f.value.as_str())
    }

    /// Get a field by position
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// True when every filter pair equals the value of the first field with that key.
    ///
    /// An empty filter matches every row.
    #[must_use]
    pub fn matches(&self, filter: &[KeyValue]) -> bool {
        filter
            .iter()
            .all(|kv| self.get(&kv.key) == Some(kv.value.as_str()))
    }

    /// Release every field in this row.
    pub fn release(&mut self) {
        self.fields.clear();
    }
}

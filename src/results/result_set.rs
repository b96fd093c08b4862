use super::row::Row;

/// Rows returned by a fetch, in driver order.
///
/// No implicit sorting happens anywhere between the driver and the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    /// The rows returned by the fetch
    pub rows: Vec<Row>,
}

impl ResultSet {
    /// Create a new result set with a known capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Add a row to the result set
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Number of rows fetched.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Release every row: fields first, then the row itself. Empty sets are a no-op.
    pub fn release(&mut self) {
        for row in &mut self.rows {
            row.release();
        }
        self.rows.clear();
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl FromIterator<Row> for ResultSet {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        ResultSet {
            rows: iter.into_iter().collect(),
        }
    }
}

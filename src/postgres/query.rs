use tokio_postgres::SimpleQueryMessage;

use crate::helpers::NULL_TEXT;
use crate::model::KeyValue;
use crate::results::{Field, ResultSet, Row};

/// Build a result set from simple-protocol messages, keeping rows that match `filter`.
///
/// Command-complete and description messages are skipped; NULL becomes empty text.
#[must_use]
pub fn build_result_set(messages: &[SimpleQueryMessage], filter: &[KeyValue]) -> ResultSet {
    let mut result_set = ResultSet::with_capacity(messages.len());

    for message in messages {
        let SimpleQueryMessage::Row(pg_row) = message else {
            continue;
        };

        let fields = pg_row
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| Field::new(col.name(), pg_row.get(idx).unwrap_or(NULL_TEXT)))
            .collect();

        let row = Row::new(fields);
        if row.matches(filter) {
            result_set.add_row(row);
        }
    }

    result_set
}

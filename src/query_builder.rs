use crate::error::DbError;
use crate::model::KeyValue;
use crate::types::BackendType;

/// Builds literal SQL for one SQL-family backend.
///
/// Values are wrapped in the backend's quote character and nothing else: embedded
/// quotes and SQL metacharacters pass through untouched. Only feed it trusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlBuilder {
    engine: BackendType,
    quote: char,
}

impl SqlBuilder {
    /// Builder for `engine`, or `None` when the variant is not in the SQL family.
    #[must_use]
    pub fn new(engine: BackendType) -> Option<Self> {
        engine
            .value_quote()
            .map(|quote| SqlBuilder { engine, quote })
    }

    #[must_use]
    pub fn engine(&self) -> BackendType {
        self.engine
    }

    #[must_use]
    pub fn quote(&self) -> char {
        self.quote
    }

    #[must_use]
    pub fn text_literal(&self, value: &str) -> String {
        format!("{q}{value}{q}", q = self.quote)
    }

    /// `INSERT INTO <resource> (<keys>) VALUES (<values>)`, keys and values in payload order.
    ///
    /// ```rust
    /// use store_middleware::prelude::*;
    ///
    /// # #[cfg(feature = "postgres")] {
    /// let payload = vec![KeyValue::new("name", "Alice"), KeyValue::new("age", "30")];
    /// let sql = SqlBuilder::new(BackendType::Postgres).unwrap().insert("users", &payload)?;
    /// assert_eq!(sql, "INSERT INTO users (name,age) VALUES ('Alice','30')");
    /// # }
    /// # Ok::<(), DbError>(())
    /// ```
    ///
    /// # Errors
    /// Returns `DbError::NullInput` for an empty resource name or payload.
    pub fn insert(&self, resource: &str, data: &[KeyValue]) -> Result<String, DbError> {
        if resource.is_empty() {
            return Err(DbError::NullInput("resource"));
        }
        if data.is_empty() {
            return Err(DbError::NullInput("insert payload"));
        }

        let mut fields = String::new();
        let mut values = String::new();
        for (i, kv) in data.iter().enumerate() {
            if i > 0 {
                fields.push(',');
                values.push(',');
            }
            fields.push_str(&kv.key);
            values.push_str(&self.text_literal(&kv.value));
        }

        let sql = format!("INSERT INTO {resource} ({fields}) VALUES ({values})");
        tracing::debug!(backend = %self.engine, sql = %sql, "built insert statement");
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn payload() -> Vec<KeyValue> {
        vec![KeyValue::new("name", "Alice"), KeyValue::new("age", "30")]
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn single_quote_family() {
        let builder = SqlBuilder::new(BackendType::Postgres).unwrap();
        assert_eq!(
            builder.insert("users", &payload()).unwrap(),
            "INSERT INTO users (name,age) VALUES ('Alice','30')"
        );
    }

    #[cfg(feature = "mysql")]
    #[test]
    fn double_quote_family() {
        let builder = SqlBuilder::new(BackendType::MySql).unwrap();
        assert_eq!(
            builder.insert("users", &payload()).unwrap(),
            r#"INSERT INTO users (name,age) VALUES ("Alice","30")"#
        );
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn embedded_quotes_are_not_escaped() {
        let builder = SqlBuilder::new(BackendType::Sqlite).unwrap();
        let sql = builder
            .insert("t", &[KeyValue::new("v", "O'Brien")])
            .unwrap();
        assert_eq!(sql, "INSERT INTO t (v) VALUES ('O'Brien')");
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn empty_inputs_are_rejected() {
        let builder = SqlBuilder::new(BackendType::Sqlite).unwrap();
        assert!(matches!(
            builder.insert("", &payload()),
            Err(DbError::NullInput("resource"))
        ));
        assert!(matches!(
            builder.insert("users", &[]),
            Err(DbError::NullInput("insert payload"))
        ));
    }

    #[cfg(feature = "mysql")]
    #[test]
    fn builder_reports_its_engine() {
        let builder = SqlBuilder::new(BackendType::MySql).unwrap();
        assert_eq!(builder.engine(), BackendType::MySql);
        assert_eq!(builder.quote(), '"');
    }

    #[cfg(feature = "lmdb")]
    #[test]
    fn no_builder_outside_sql_family() {
        assert!(SqlBuilder::new(BackendType::Lmdb).is_none());
    }

    #[cfg(feature = "postgres")]
    proptest! {
        #[test]
        fn keys_and_values_keep_payload_order(
            pairs in prop::collection::vec(("[a-z]{1,8}", "[A-Za-z0-9 ]{0,8}"), 1..10)
        ) {
            let data: Vec<KeyValue> = pairs.iter().map(|(k, v)| KeyValue::new(k.as_str(), v.as_str())).collect();
            let sql = SqlBuilder::new(BackendType::Postgres).unwrap().insert("r", &data).unwrap();
            let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
            let values: Vec<String> = pairs.iter().map(|(_, v)| format!("'{v}'")).collect();
            prop_assert_eq!(
                sql,
                format!("INSERT INTO r ({}) VALUES ({})", keys.join(","), values.join(","))
            );
        }
    }
}

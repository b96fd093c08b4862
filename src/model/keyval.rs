/// A name/value pair used as an insert payload or a fetch filter.
///
/// Callers build and own the sequence; the middleware only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for KeyValue {
    fn from((key, value): (K, V)) -> Self {
        KeyValue::new(key, value)
    }
}

/// Result of [`count_keyvals`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyValCount {
    pub total: usize,
    pub unique: usize,
}

/// Count pairs, and count keys that differ from the key immediately before them.
///
/// `unique` only compares neighbours: `[a, a, b]` gives 2 but `[a, b, a]` gives 3.
/// Grouped input (all pairs for a key adjacent) therefore yields the number of
/// distinct keys; ungrouped input does not.
/// ```rust
/// use store_middleware::prelude::*;
///
/// let kv: Vec<KeyValue> = vec![("a", "1").into(), ("b", "2").into(), ("a", "3").into()];
/// assert_eq!(count_keyvals(&kv), KeyValCount { total: 3, unique: 3 });
/// ```
#[must_use]
pub fn count_keyvals(kv: &[KeyValue]) -> KeyValCount {
    let Some(first) = kv.first() else {
        return KeyValCount::default();
    };

    let mut last = first.key.as_str();
    let mut unique = 1;
    for pair in &kv[1..] {
        if pair.key != last {
            last = pair.key.as_str();
            unique += 1;
        }
    }

    KeyValCount {
        total: kv.len(),
        unique,
    }
}

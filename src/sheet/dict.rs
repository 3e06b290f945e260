use indexmap::IndexMap;

use super::Table;
use crate::error::Error;

/// Stand-in for an absent cell wherever values reach the template.
pub const MISSING: &str = "None";

pub type Record = IndexMap<String, String>;
pub type Dict = IndexMap<String, Record>;

/// Keys `items` by `key_of`, keeping the first item for each key.
///
/// Duplicate keys are a data-quality problem, not a failure: they are
/// reported once through `log::warn!` and the later items are dropped.
pub fn index_by_key<T>(
    items: impl IntoIterator<Item = T>,
    column: &str,
    key_of: impl Fn(&T) -> String,
) -> IndexMap<String, T> {
    let mut out = IndexMap::new();
    let mut duplicates: Vec<String> = Vec::new();
    for item in items {
        let key = key_of(&item);
        if out.contains_key(&key) {
            if !duplicates.contains(&key) {
                duplicates.push(key);
            }
            continue;
        }
        out.insert(key, item);
    }
    if !duplicates.is_empty() {
        log::warn!(
            "Duplicate values in key column '{}': {:?}. Keeping first occurrence of each.",
            column,
            duplicates
        );
    }
    out
}

impl Table {
    /// Maps each value of `key` to the remaining columns of its row.
    pub fn to_dict(&self, key: &str) -> Result<Dict, Error> {
        let key_col = self.column(key)?;
        let records = self.rows().map(|row| {
            let key = row.text(key_col).unwrap_or_else(|| MISSING.to_string());
            let record: Record = self
                .columns()
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != key_col)
                .map(|(i, name)| {
                    let value = row.text(i).unwrap_or_else(|| MISSING.to_string());
                    (name.clone(), value)
                })
                .collect();
            (key, record)
        });
        Ok(index_by_key(records, key, |(k, _)| k.clone())
            .into_iter()
            .map(|(k, (_, record))| (k, record))
            .collect())
    }
}

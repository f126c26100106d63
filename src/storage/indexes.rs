//! Named index declarations for the tasks collection.
//!
//! Each declaration pairs a unique name with a field -> sort-order key spec,
//! realized as a redb table of sortable composite string keys. Applying a
//! declaration whose name is already recorded with the same key spec is a
//! no-op, so the admin script can be re-run safely.

use chrono::{DateTime, Utc};
use redb::{ReadableTable, TableDefinition};

use super::db::{Database, DatabaseError};
use super::models::TaskRecord;
use super::tables::*;

/// Separator between encoded fields in a composite key. Sorts below every
/// printable character so prefix scans terminate correctly.
pub(crate) const KEY_SEP: char = '\u{1f}';

pub(crate) type IndexTable = TableDefinition<'static, &'static str, &'static str>;

/// A single index declaration: name plus (field, order) pairs, where order
/// uses the 1 / -1 ascending / descending convention.
pub struct IndexSpec {
    pub name: &'static str,
    pub keys: &'static [(&'static str, i32)],
    table: IndexTable,
}

pub const INDEX_SPECS: &[IndexSpec] = &[
    IndexSpec {
        name: "idx_created_at",
        keys: &[("created_at", -1)],
        table: IDX_CREATED_AT,
    },
    IndexSpec {
        name: "idx_status",
        keys: &[("status", 1)],
        table: IDX_STATUS,
    },
    IndexSpec {
        name: "idx_tasks_title",
        keys: &[("title", 1)],
        table: IDX_TITLE,
    },
    IndexSpec {
        name: "idx_tasks_status_createdAt_desc",
        keys: &[("status", 1), ("created_at", -1)],
        table: IDX_STATUS_CREATED_AT,
    },
];

impl IndexSpec {
    /// Canonical string form of the key spec, recorded in `index_meta` to
    /// detect a same-name declaration with a different shape.
    pub fn fingerprint(&self) -> String {
        self.keys
            .iter()
            .map(|(field, order)| format!("{field}:{order}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Build the composite key for a task. Keys are stored in ascending byte
    /// order regardless of the declared direction; descending readers walk
    /// the table in reverse.
    fn key_for(&self, task: &TaskRecord) -> String {
        let mut key = String::new();
        for (field, _) in self.keys {
            let encoded = match *field {
                "created_at" => encode_timestamp(&task.created_at),
                "status" => task.status.as_str().to_string(),
                "title" => encode_title(&task.title),
                other => unreachable!("unknown index field: {other}"),
            };
            key.push_str(&encoded);
            key.push(KEY_SEP);
        }
        // Id suffix keeps keys unique across tasks with equal field values
        key.push_str(&task.id);
        key
    }
}

/// Encode a timestamp so lexicographic order matches chronological order.
pub(crate) fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    format!("{:020}", ts.timestamp_micros())
}

/// Titles are indexed case-insensitively.
pub(crate) fn encode_title(title: &str) -> String {
    title.to_lowercase()
}

/// All index entries for a task, in declaration order. The write paths use
/// this to keep every secondary index in step with the primary table.
pub(crate) fn entries_for(task: &TaskRecord) -> Vec<(IndexTable, String)> {
    INDEX_SPECS
        .iter()
        .map(|spec| (spec.table, spec.key_for(task)))
        .collect()
}

/// Outcome of applying the declarations against a database.
#[derive(Debug, Default)]
pub struct EnsureReport {
    pub created: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
}

impl Database {
    /// Apply every index declaration, backfilling new indexes from existing
    /// tasks. Idempotent: a declaration already recorded under the same name
    /// and key spec is skipped. A name recorded with a different key spec is
    /// an error rather than a silent rebuild.
    pub fn ensure_indexes(&self) -> Result<EnsureReport, DatabaseError> {
        let write_txn = self.begin_write()?;
        let mut report = EnsureReport::default();

        for spec in INDEX_SPECS {
            let fingerprint = spec.fingerprint();

            let existing: Option<String> = {
                let meta = write_txn.open_table(INDEX_META)?;
                let recorded = meta.get(spec.name)?.map(|v| v.value().to_string());
                recorded
            };

            match existing {
                Some(recorded) if recorded == fingerprint => {
                    report.skipped.push(spec.name);
                    continue;
                }
                Some(recorded) => {
                    return Err(DatabaseError::IndexConflict(format!(
                        "index '{}' already exists with keys [{recorded}], declared [{fingerprint}]",
                        spec.name
                    )));
                }
                None => {}
            }

            // Create the table and backfill from the primary table
            {
                let mut index_table = write_txn.open_table(spec.table)?;
                let tasks = write_txn.open_table(TASKS)?;
                for row in tasks.iter()? {
                    let (_, value) = row?;
                    let task: TaskRecord = rmp_serde::from_slice(value.value())?;
                    let key = spec.key_for(&task);
                    index_table.insert(key.as_str(), task.id.as_str())?;
                }
            }
            {
                let mut meta = write_txn.open_table(INDEX_META)?;
                meta.insert(spec.name, fingerprint.as_str())?;
            }

            report.created.push(spec.name);
        }

        write_txn.commit()?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprints_are_stable() {
        let by_name: Vec<(&str, String)> = INDEX_SPECS
            .iter()
            .map(|s| (s.name, s.fingerprint()))
            .collect();

        assert_eq!(
            by_name,
            vec![
                ("idx_created_at", "created_at:-1".to_string()),
                ("idx_status", "status:1".to_string()),
                ("idx_tasks_title", "title:1".to_string()),
                (
                    "idx_tasks_status_createdAt_desc",
                    "status:1,created_at:-1".to_string()
                ),
            ]
        );
    }

    #[test]
    fn timestamp_encoding_preserves_order() {
        let earlier = Utc::now();
        let later = earlier + chrono::Duration::seconds(1);
        assert!(encode_timestamp(&earlier) < encode_timestamp(&later));
    }
}

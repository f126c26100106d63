use chrono::Utc;
use redb::{ReadableTable, TableDefinition};

use super::db::{Database, DatabaseError};
use super::indexes::{self, KEY_SEP};
use super::models::{SortField, SortOrder, TaskQuery, TaskRecord, TaskStatus};
use super::tables::*;

impl Database {
    // ========================================================================
    // Task operations
    // ========================================================================

    /// Store a task record and add it to every secondary index
    pub fn put_task(&self, task: &TaskRecord) -> Result<(), DatabaseError> {
        debug_assert!(!task.id.is_empty(), "task id must not be empty");

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(TASKS)?;
            let data = rmp_serde::to_vec_named(task)?;
            table.insert(task.id.as_str(), data.as_slice())?;

            for (def, key) in indexes::entries_for(task) {
                let mut index_table = write_txn.open_table(def)?;
                index_table.insert(key.as_str(), task.id.as_str())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a task by its UUID
    pub fn get_task(&self, id: &str) -> Result<Option<TaskRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(TASKS)?;

        match table.get(id)? {
            Some(data) => {
                let task: TaskRecord = rmp_serde::from_slice(data.value())?;
                Ok(Some(task))
            }
            None => Ok(None),
        }
    }

    /// Delete a task by its UUID and remove its secondary index entries
    pub fn delete_task(&self, id: &str) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;

        let existing: Option<TaskRecord> = {
            let table = write_txn.open_table(TASKS)?;
            // Decoded into a local so the guard borrowing the table is
            // released before the block's value escapes
            let found = match table.get(id)? {
                Some(data) => Some(rmp_serde::from_slice(data.value())?),
                None => None,
            };
            found
        };

        let deleted = match existing {
            Some(task) => {
                {
                    let mut table = write_txn.open_table(TASKS)?;
                    table.remove(id)?;
                }
                for (def, key) in indexes::entries_for(&task) {
                    let mut index_table = write_txn.open_table(def)?;
                    index_table.remove(key.as_str())?;
                }
                true
            }
            None => false,
        };

        write_txn.commit()?;
        Ok(deleted)
    }

    /// Replace a task's mutable fields, refreshing `updated_at` and keeping
    /// the secondary indexes in step. Returns the updated record, or `None`
    /// if no task exists under the id.
    pub fn update_task(
        &self,
        id: &str,
        title: &str,
        description: &str,
        status: TaskStatus,
    ) -> Result<Option<TaskRecord>, DatabaseError> {
        let write_txn = self.begin_write()?;

        let existing: Option<TaskRecord> = {
            let table = write_txn.open_table(TASKS)?;
            let found = match table.get(id)? {
                Some(data) => Some(rmp_serde::from_slice(data.value())?),
                None => None,
            };
            found
        };

        let updated = match existing {
            Some(mut task) => {
                // Drop index entries keyed on the old field values
                for (def, key) in indexes::entries_for(&task) {
                    let mut index_table = write_txn.open_table(def)?;
                    index_table.remove(key.as_str())?;
                }

                task.title = title.to_string();
                task.description = description.to_string();
                task.status = status;
                task.updated_at = Utc::now();

                let serialized = rmp_serde::to_vec_named(&task)?;
                {
                    let mut table = write_txn.open_table(TASKS)?;
                    table.insert(id, serialized.as_slice())?;
                }
                for (def, key) in indexes::entries_for(&task) {
                    let mut index_table = write_txn.open_table(def)?;
                    index_table.insert(key.as_str(), task.id.as_str())?;
                }
                Some(task)
            }
            None => None,
        };

        write_txn.commit()?;
        Ok(updated)
    }

    /// List tasks with filtering, search, sorting and pagination. Returns the
    /// requested page and the total match count before pagination.
    ///
    /// Sorting walks the narrowest matching index: the composite
    /// status/created_at index when both apply, a single-field index
    /// otherwise. Descending order reads the index in reverse.
    pub fn list_tasks(&self, query: &TaskQuery) -> Result<(Vec<TaskRecord>, u64), DatabaseError> {
        let read_txn = self.begin_read()?;
        let tasks_table = read_txn.open_table(TASKS)?;

        let field = query.sort_by.unwrap_or(SortField::CreatedAt);
        // An unsorted listing defaults to newest-first
        let order = query.order.unwrap_or(if query.sort_by.is_none() {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        });

        let search = query
            .search
            .as_deref()
            .map(str::to_lowercase)
            .filter(|s| !s.is_empty());

        let ids: Vec<String> = match (field, query.status) {
            (SortField::CreatedAt, Some(status)) => {
                let index = read_txn.open_table(IDX_STATUS_CREATED_AT)?;
                let prefix = format!("{}{KEY_SEP}", status.as_str());
                let mut ids = Vec::new();
                for row in index.range(prefix.as_str()..)? {
                    let (key, value) = row?;
                    if !key.value().starts_with(&prefix) {
                        break;
                    }
                    ids.push(value.value().to_string());
                }
                if order == SortOrder::Desc {
                    ids.reverse();
                }
                ids
            }
            (SortField::CreatedAt, None) => scan_index(&read_txn, IDX_CREATED_AT, order)?,
            (SortField::Status, _) => scan_index(&read_txn, IDX_STATUS, order)?,
            (SortField::Title, _) => scan_index(&read_txn, IDX_TITLE, order)?,
        };

        let mut matched = Vec::new();
        for id in ids {
            let Some(data) = tasks_table.get(id.as_str())? else {
                continue;
            };
            let task: TaskRecord = rmp_serde::from_slice(data.value())?;

            if let Some(status) = query.status {
                if task.status != status {
                    continue;
                }
            }
            if let Some(ref needle) = search {
                if !task.title.to_lowercase().contains(needle.as_str()) {
                    continue;
                }
            }
            matched.push(task);
        }

        let total = matched.len() as u64;
        let items = if query.limit > 0 {
            let page = query.page.max(1);
            // A page far past the end is an empty page, never an overflow
            let offset = (page - 1).saturating_mul(query.limit);
            matched
                .into_iter()
                .skip(offset as usize)
                .take(query.limit as usize)
                .collect()
        } else {
            matched
        };

        Ok((items, total))
    }
}

/// Read every id out of a single-field index, in the requested direction.
fn scan_index(
    read_txn: &redb::ReadTransaction,
    def: TableDefinition<'static, &'static str, &'static str>,
    order: SortOrder,
) -> Result<Vec<String>, DatabaseError> {
    let table = read_txn.open_table(def)?;
    let mut ids = Vec::new();
    match order {
        SortOrder::Asc => {
            for row in table.iter()? {
                let (_, value) = row?;
                ids.push(value.value().to_string());
            }
        }
        SortOrder::Desc => {
            for row in table.iter()?.rev() {
                let (_, value) = row?;
                ids.push(value.value().to_string());
            }
        }
    }
    Ok(ids)
}

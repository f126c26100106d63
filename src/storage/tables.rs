use redb::TableDefinition;

/// Task records: uuid -> TaskRecord (msgpack)
pub const TASKS: TableDefinition<&str, &[u8]> = TableDefinition::new("tasks");

/// Applied index declarations: index name -> key fingerprint
pub const INDEX_META: TableDefinition<&str, &str> = TableDefinition::new("index_meta");

/// Secondary index tables. Entries map a sortable composite key (encoded
/// field values joined with 0x1f, id-suffixed for uniqueness) to the task id.
pub const IDX_CREATED_AT: TableDefinition<&str, &str> = TableDefinition::new("idx_created_at");
pub const IDX_STATUS: TableDefinition<&str, &str> = TableDefinition::new("idx_status");
pub const IDX_TITLE: TableDefinition<&str, &str> = TableDefinition::new("idx_tasks_title");
pub const IDX_STATUS_CREATED_AT: TableDefinition<&str, &str> =
    TableDefinition::new("idx_tasks_status_createdAt_desc");

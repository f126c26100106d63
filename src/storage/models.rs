use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    /// Parse a status from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(TaskStatus::Todo),
            "in_progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

/// A task record stored in redb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sort direction, using the 1 / -1 convention the list endpoint accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn from_order(order: i32) -> Self {
        // Anything other than -1 sorts ascending
        if order == -1 {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn as_i32(&self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

/// Fields the list endpoint can sort by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    Status,
    Title,
}

impl SortField {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created_at" => Some(SortField::CreatedAt),
            "status" => Some(SortField::Status),
            "title" => Some(SortField::Title),
            _ => None,
        }
    }
}

/// Query shape accepted by the storage-level listing
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    /// 1-based page, applied together with `limit`
    pub page: u64,
    pub limit: u64,
    /// Case-insensitive substring match against the title
    pub search: Option<String>,
    pub status: Option<TaskStatus>,
    pub sort_by: Option<SortField>,
    pub order: Option<SortOrder>,
}

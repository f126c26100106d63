mod admin;
mod auth;
mod tasks;

pub use admin::health;
pub use auth::{login, AuthResponse, LoginRequest};
pub use tasks::{
    create_task, delete_task, get_task, list_tasks, update_task, TaskBody, TaskResponse,
};

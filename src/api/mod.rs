mod handlers;
pub mod middleware;
pub mod response;
mod routes;

pub use handlers::{AuthResponse, LoginRequest, TaskBody, TaskResponse};
pub use routes::create_router;

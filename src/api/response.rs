use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// ============================================================================
// Response envelopes
// ============================================================================

/// Success envelope: `{"data": ...}`
#[derive(Debug, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T: Serialize> DataEnvelope<T> {
    pub fn success(data: T) -> Json<DataEnvelope<T>> {
        Json(DataEnvelope { data })
    }
}

/// List envelope: `{"meta": {...}, "data": [...]}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    pub meta: ListMeta,
    pub data: Vec<T>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

impl<T: Serialize> ListEnvelope<T> {
    pub fn success(data: Vec<T>, meta: ListMeta) -> Json<ListEnvelope<T>> {
        Json(ListEnvelope { meta, data })
    }
}

/// Error envelope: `{"error": "..."}`. The 401 body with the literal message
/// `invalid token` is a wire contract the client's response policy keys on.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// ============================================================================
// Unified error type for handlers
// ============================================================================

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

// ============================================================================
// Custom extractors (reject with the error envelope)
// ============================================================================

/// Drop-in replacement for `axum::Json` that rejects with `{"error": ...}`.
pub struct AppJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                let message = match rejection {
                    JsonRejection::JsonDataError(err) => {
                        format!("Invalid request body: {}", err.body_text())
                    }
                    JsonRejection::JsonSyntaxError(_) => "Malformed JSON in request body".into(),
                    JsonRejection::MissingJsonContentType(_) => {
                        "Missing Content-Type: application/json header".into()
                    }
                    _ => "Failed to read request body".into(),
                };
                Err(ApiError::bad_request(message))
            }
        }
    }
}

/// Drop-in replacement for `axum::extract::Query` that rejects with
/// `{"error": ...}`.
pub struct AppQuery<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, ApiError> {
        let query = parts.uri.query().unwrap_or_default();
        serde_qs::from_str(query)
            .map(AppQuery)
            .map_err(|e| ApiError::bad_request(friendly_query_error(&e.to_string())))
    }
}

/// Translate serde/serde_qs error messages into human-friendly descriptions.
fn friendly_query_error(raw: &str) -> String {
    let cleaned = raw
        .replace("u32", "non-negative integer")
        .replace("u64", "non-negative integer")
        .replace("i32", "integer")
        .replace("i64", "integer");

    format!("Invalid query parameter: {cleaned}")
}

//! API response helpers

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;

use crate::shortener::LinkError;

/// Hold data for a successful API interaction
pub struct Success<V>
where
    V: Serialize,
{
    status_code: StatusCode,
    data: V,
}

impl<V> Success<V>
where
    V: Serialize,
{
    pub fn ok(data: V) -> Self {
        Self {
            status_code: StatusCode::OK,
            data,
        }
    }

    pub fn created(data: V) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            data,
        }
    }
}

#[derive(Serialize)]
struct DataWrapper<D>
where
    D: Serialize,
{
    success: bool,
    data: D,
}

impl<V> IntoResponse for Success<V>
where
    V: Serialize,
{
    fn into_response(self) -> Response {
        (
            self.status_code,
            Json(DataWrapper {
                success: true,
                data: self.data,
            }),
        )
            .into_response()
    }
}

/// Hold data for a failed API interaction
#[derive(Debug)]
pub struct Error {
    status_code: StatusCode,
    message: String,
    kind: Option<&'static str>,
    description: Option<String>,
}

impl Error {
    fn new<M>(status_code: StatusCode, message: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code,
            message: message.to_string(),
            kind: None,
            description: None,
        }
    }

    pub fn bad_request<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn forbidden<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal_server_error<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_description<M>(self, description: M) -> Self
    where
        M: ToString,
    {
        Self {
            description: Some(description.to_string()),
            ..self
        }
    }

    fn with_kind(self, kind: &'static str) -> Self {
        Self {
            kind: Some(kind),
            ..self
        }
    }
}

impl From<LinkError> for Error {
    fn from(err: LinkError) -> Self {
        let status_code = match err {
            LinkError::InvalidUrl(_)
            | LinkError::InvalidSlugFormat
            | LinkError::SlugConflict
            | LinkError::QuotaExceeded => StatusCode::BAD_REQUEST,
            LinkError::PlanRequired => StatusCode::FORBIDDEN,
            LinkError::NotFoundOrForbidden => StatusCode::NOT_FOUND,
            LinkError::SlugExhausted(_)
            | LinkError::DuplicateKey(_)
            | LinkError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status_code.is_server_error() {
            tracing::error!("Link operation failed: {err}");
        }

        Self::new(status_code, &err).with_kind(err.kind())
    }
}

#[derive(Serialize)]
struct ErrorWrapper {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            self.status_code,
            Json(ErrorWrapper {
                success: false,
                message: self.message,
                kind: self.kind,
                description: self.description,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_error_status_codes() {
        let cases = [
            (LinkError::InvalidUrl(String::new()), StatusCode::BAD_REQUEST),
            (LinkError::InvalidSlugFormat, StatusCode::BAD_REQUEST),
            (LinkError::SlugConflict, StatusCode::BAD_REQUEST),
            (LinkError::QuotaExceeded, StatusCode::BAD_REQUEST),
            (LinkError::PlanRequired, StatusCode::FORBIDDEN),
            (LinkError::NotFoundOrForbidden, StatusCode::NOT_FOUND),
            (LinkError::SlugExhausted(20), StatusCode::INTERNAL_SERVER_ERROR),
            (LinkError::DuplicateKey("identifier"), StatusCode::INTERNAL_SERVER_ERROR),
            (LinkError::StoreUnavailable(String::new()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status_code) in cases {
            let kind = err.kind();
            let error = Error::from(err);

            assert_eq!(status_code, error.status_code);
            assert_eq!(Some(kind), error.kind);
        }
    }
}

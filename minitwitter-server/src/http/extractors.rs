//! Custom Axum extractors

use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::request::Parts;

use super::error::ApiError;
use crate::models::ValidationError;

/// Extract and validate a positive integer id from path
pub struct ValidId(pub i64);

impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        parse_id(&id).map(Self)
    }
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::Validation(ValidationError::InvalidFormat {
            field: "id",
            reason: "must be a positive integer",
        })),
    }
}

/// `Json` whose rejection is rendered as an [`ApiError`]
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_ids() {
        assert_eq!(parse_id("1").unwrap(), 1);
        assert_eq!(parse_id("9007199254740993").unwrap(), 9_007_199_254_740_993);
    }

    #[test]
    fn rejects_non_positive_and_garbage() {
        for raw in ["0", "-3", "abc", "1.5", ""] {
            assert!(
                matches!(parse_id(raw), Err(ApiError::Validation(_))),
                "{raw} should be rejected"
            );
        }
    }
}

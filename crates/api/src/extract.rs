//! Request extractors.

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON body extractor whose rejections use the API's error format.
///
/// Axum's own [`Json`] answers malformed or mistyped bodies with plain-text
/// 400/415/422 responses; this wrapper turns every such rejection into an
/// [`AppError::BadRequest`] so clients always get the JSON envelope.
///
/// Handlers that must check the addressed record before looking at the
/// body take `Result<ApiJson<T>, AppError>` and apply `?` afterwards.
///
/// ```ignore
/// async fn create(ApiJson(input): ApiJson<CreateRole>) -> AppResult<Json<RoleDetail>> {
///     // input is fully deserialized here
/// }
/// ```
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}

/// Path extractor whose rejections use the API's error format.
///
/// A segment that does not parse (e.g. `/roles/abc`) cannot name any
/// record, so it is reported as 404 rather than axum's plain-text 400.
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => Err(AppError::NotFound(rejection.body_text())),
        }
    }
}

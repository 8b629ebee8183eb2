//! Photo handlers.

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::IntoResponse;

use crate::dto::ItemResponse;
use crate::error::HttpError;
use crate::state::AppState;
use crate::upload::Upload;

/// Serve the photo bound to an item.
///
/// Always labelled JPEG; the bytes are returned as uploaded.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let bytes = state.inventory.photo(&id).await?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes))
}

/// Replace an item's photo with the `photo` part of a multipart form.
pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ItemResponse>, HttpError> {
    let mut upload = Upload::read(multipart?, state.assets.as_ref()).await?;

    let Some(photo) = upload.take_photo() else {
        state.inventory.get(&id).await?;
        return Err(HttpError::BadRequest("Photo required".to_string()));
    };

    Ok(Json(state.inventory.replace_photo(&id, photo).await?.into()))
}

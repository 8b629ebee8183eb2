//! Item handlers - register, read, update and delete records.

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use inventory_core::{ItemUpdate, NewItem};

use crate::dto::{DeleteResponse, ItemResponse};
use crate::error::HttpError;
use crate::state::AppState;
use crate::upload::Upload;

/// Register a new item from a multipart form.
pub async fn register(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ItemResponse>), HttpError> {
    let mut upload = Upload::read(multipart?, state.assets.as_ref()).await?;
    let new = NewItem {
        name: upload.take_text("inventory_name"),
        description: upload.take_text("description"),
    };

    let item = state.inventory.register(new, upload.take_photo()).await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

/// List all items.
pub async fn list(State(state): State<AppState>) -> Json<Vec<ItemResponse>> {
    let items = state.inventory.list().await;
    Json(items.into_iter().map(ItemResponse::from).collect())
}

/// Get a single item by ID.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>, HttpError> {
    Ok(Json(state.inventory.get(&id).await?.into()))
}

/// Update name and/or description from a JSON body.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ItemUpdate>, JsonRejection>,
) -> Result<Json<ItemResponse>, HttpError> {
    let update = match body {
        Ok(Json(update)) => update,
        Err(rejection) => {
            // An unknown item is reported before a bad body.
            state.inventory.get(&id).await?;
            return Err(rejection.into());
        }
    };

    Ok(Json(state.inventory.update(&id, update).await?.into()))
}

/// Delete an item and its photo.
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, HttpError> {
    state.inventory.remove(&id).await?;
    Ok(Json(DeleteResponse::deleted()))
}

//! Search-by-id handler backing `SearchForm.html`.

use axum::Json;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use inventory_core::SearchHit;

use crate::dto::SearchRequest;
use crate::error::HttpError;
use crate::state::AppState;

/// Look up an item by the form's `id`, optionally appending a photo link to
/// its description.
pub async fn search(
    State(state): State<AppState>,
    form: Result<Form<SearchRequest>, FormRejection>,
) -> Result<Json<SearchHit>, HttpError> {
    let Form(req) = form?;
    let id = req.id.as_deref().unwrap_or_default();
    Ok(Json(state.inventory.search(id, req.wants_photo_hint()).await?))
}

//! Static HTML forms.

use axum::response::Html;

const REGISTER_FORM: &str = include_str!("../../static/RegisterForm.html");
const SEARCH_FORM: &str = include_str!("../../static/SearchForm.html");

/// Form for registering an item with an optional photo.
pub async fn register_form() -> Html<&'static str> {
    Html(REGISTER_FORM)
}

/// Form for looking up an item by id.
pub async fn search_form() -> Html<&'static str> {
    Html(SEARCH_FORM)
}

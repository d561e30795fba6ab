use axum::{
    extract::Path,
    response::{Html, Redirect},
    routing::get,
    Router,
};

use crate::{state::AppState, views};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/gallery", get(gallery))
        .route("/gallery/:title", get(gallery_recipe))
}

pub async fn home() -> Html<String> {
    views::home_page()
}

pub async fn gallery() -> Html<String> {
    views::gallery_page()
}

/// Old gallery links point at a recipe by title; send them to the list.
pub async fn gallery_recipe(Path(title): Path<String>) -> Redirect {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("recipe_title", &title)
        .finish();
    Redirect::to(&format!("/read?{query}"))
}

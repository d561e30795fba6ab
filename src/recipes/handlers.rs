use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderValue},
    response::{Html, IntoResponse, Redirect},
    routing::get,
    Router,
};
use tracing::{info, instrument};

use super::{
    form::{parse_create, parse_edit, RecipeForm, RecipeFormValues},
    model::{content_type_for, Recipe},
};
use crate::{
    error::{parse_id, AppError},
    state::AppState,
    views,
};

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024; // 20MB

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/read", get(list_recipes))
        .route("/create", get(create_form).post(create_recipe))
        .route("/edit/:id", get(edit_form).post(update_recipe))
        .route("/delete/:id", get(delete_confirm).post(delete_recipe))
        .route("/recipes/:id/image", get(recipe_image))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

async fn load(state: &AppState, raw_id: &str) -> Result<Recipe, AppError> {
    let id = parse_id(raw_id)?;
    state
        .recipes
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound(id))
}

/// GET /read, newest first. A `recipe_title` query is accepted and ignored.
#[instrument(skip(state))]
pub async fn list_recipes(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let recipes = state.recipes.list_all().await?;
    Ok(views::read_page(&recipes))
}

pub async fn create_form() -> Html<String> {
    views::create_page()
}

#[instrument(skip(state, mp))]
pub async fn create_recipe(
    State(state): State<AppState>,
    mp: Result<Multipart, MultipartRejection>,
) -> Result<Redirect, AppError> {
    let recipe = parse_create(RecipeForm::from_multipart(mp?).await?)?;
    let id = state.recipes.insert(recipe).await?;
    info!(%id, "recipe created");
    Ok(Redirect::to("/read"))
}

#[instrument(skip(state))]
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let recipe = load(&state, &id).await?;
    Ok(views::edit_page(recipe.id, &RecipeFormValues::from(&recipe)))
}

#[instrument(skip(state, mp))]
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mp: Result<Multipart, MultipartRejection>,
) -> Result<Redirect, AppError> {
    let existing = load(&state, &id).await?;
    let recipe = parse_edit(RecipeForm::from_multipart(mp?).await?, &existing)?;
    // deleted between the read and the write
    if !state.recipes.replace_fields(existing.id, recipe).await? {
        return Err(AppError::NotFound(existing.id));
    }
    info!(id = %existing.id, "recipe updated");
    Ok(Redirect::to("/read"))
}

#[instrument(skip(state))]
pub async fn delete_confirm(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let recipe = load(&state, &id).await?;
    Ok(views::delete_confirm_page(&recipe))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id)?;
    if !state.recipes.delete_by_id(id).await? {
        return Err(AppError::NotFound(id));
    }
    info!(%id, "recipe deleted");
    Ok(Redirect::to("/read"))
}

#[instrument(skip(state))]
pub async fn recipe_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let recipe = load(&state, &id).await?;
    match (recipe.image_name, recipe.image_data) {
        (Some(name), Some(data)) if !data.is_empty() => {
            // uploads are untrusted; never let the browser render them as a document
            Ok((
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static(content_type_for(&name))),
                    (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
                    (header::CONTENT_SECURITY_POLICY, HeaderValue::from_static("sandbox")),
                ],
                data,
            ))
        }
        _ => Err(AppError::NotFound(recipe.id)),
    }
}

use axum::extract::Multipart;

use super::model::{NewRecipe, Recipe, RecipeImage};
use crate::error::AppError;

pub const TITLE: &str = "recipe_title";
pub const DESCRIPTION: &str = "recipe_description";
pub const INGREDIENTS: &str = "recipe_ingredients";
pub const INSTRUCTIONS: &str = "recipe_instructions";
pub const IMAGE: &str = "dish_image";

/// Raw multipart submission, before required fields are checked.
#[derive(Debug, Default)]
pub struct RecipeForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub image: Option<RecipeImage>,
}

impl RecipeForm {
    pub async fn from_multipart(mut mp: Multipart) -> Result<Self, AppError> {
        let mut form = RecipeForm::default();
        while let Some(field) = mp.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            match name.as_str() {
                TITLE => form.title = Some(field.text().await?),
                DESCRIPTION => form.description = Some(field.text().await?),
                INGREDIENTS => form.ingredients = Some(field.text().await?),
                INSTRUCTIONS => form.instructions = Some(field.text().await?),
                IMAGE => {
                    let file_name = field.file_name().unwrap_or_default().to_owned();
                    let data = field.bytes().await?;
                    // browsers send an empty filename when no file was chosen
                    if !file_name.is_empty() {
                        form.image = Some(RecipeImage {
                            name: file_name,
                            data,
                        });
                    }
                }
                _ => {}
            }
        }
        Ok(form)
    }
}

pub fn parse_create(form: RecipeForm) -> Result<NewRecipe, AppError> {
    Ok(NewRecipe {
        title: required(form.title, TITLE)?,
        description: required(form.description, DESCRIPTION)?,
        ingredients: required(form.ingredients, INGREDIENTS)?,
        instructions: required(form.instructions, INSTRUCTIONS)?,
        image: form.image,
    })
}

/// Like [`parse_create`], but keeps the existing image when none was uploaded.
pub fn parse_edit(form: RecipeForm, existing: &Recipe) -> Result<NewRecipe, AppError> {
    let mut recipe = parse_create(form)?;
    if recipe.image.is_none() {
        recipe.image = match (&existing.image_name, &existing.image_data) {
            (Some(name), Some(data)) => Some(RecipeImage {
                name: name.clone(),
                data: data.clone().into(),
            }),
            _ => None,
        };
    }
    Ok(recipe)
}

fn required(value: Option<String>, field: &'static str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::MissingField(field)),
    }
}

/// Values used to pre-fill the create/edit form.
#[derive(Debug, Default)]
pub struct RecipeFormValues {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub image_name: Option<String>,
}

impl From<&Recipe> for RecipeFormValues {
    fn from(r: &Recipe) -> Self {
        Self {
            title: r.title.clone(),
            description: r.description.clone(),
            ingredients: r.ingredients.clone(),
            instructions: r.instructions.clone(),
            image_name: r.image_name.clone(),
        }
    }
}

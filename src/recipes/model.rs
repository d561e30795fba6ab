use bytes::Bytes;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A stored recipe, as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub image_name: Option<String>,
    pub image_data: Option<Vec<u8>>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A list row: every recipe field except the image bytes.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub image_name: Option<String>,
    pub has_image: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<&Recipe> for RecipeSummary {
    fn from(r: &Recipe) -> Self {
        Self {
            id: r.id,
            title: r.title.clone(),
            description: r.description.clone(),
            ingredients: r.ingredients.clone(),
            instructions: r.instructions.clone(),
            image_name: r.image_name.clone(),
            has_image: r.image_data.as_ref().is_some_and(|d| !d.is_empty()),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Every writable field of a recipe. Used for both insert and full replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub instructions: String,
    pub image: Option<RecipeImage>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeImage {
    pub name: String,
    pub data: Bytes,
}

/// Guesses an image content type from the uploaded filename.
pub fn content_type_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

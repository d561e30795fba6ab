use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::model::{NewRecipe, Recipe, RecipeSummary};

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Persists a new recipe and returns its freshly assigned id.
    async fn insert(&self, recipe: NewRecipe) -> anyhow::Result<Uuid>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Recipe>>;
    /// All recipes, newest `created_at` first. Image bytes are not loaded.
    async fn list_all(&self) -> anyhow::Result<Vec<RecipeSummary>>;
    /// Replaces every field except `id` and `created_at`. Returns `false`
    /// when no recipe has that id.
    async fn replace_fields(&self, id: Uuid, recipe: NewRecipe) -> anyhow::Result<bool>;
    /// Returns `false` when no recipe has that id.
    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgRecipeStore {
    db: PgPool,
}

impl PgRecipeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn insert(&self, recipe: NewRecipe) -> anyhow::Result<Uuid> {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let (image_name, image_data) = split_image(recipe.image);

        sqlx::query(
            r#"
            INSERT INTO recipes (id, title, description, ingredients, instructions,
                                 image_name, image_data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            "#,
        )
        .bind(id)
        .bind(recipe.title)
        .bind(recipe.description)
        .bind(recipe.ingredients)
        .bind(recipe.instructions)
        .bind(image_name)
        .bind(image_data)
        .bind(now)
        .execute(&self.db)
        .await
        .context("insert recipe")?;

        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Recipe>> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, description, ingredients, instructions,
                   image_name, image_data, created_at, updated_at
              FROM recipes
             WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find recipe by id")?;
        Ok(recipe)
    }

    async fn list_all(&self) -> anyhow::Result<Vec<RecipeSummary>> {
        let rows = sqlx::query_as::<_, RecipeSummary>(
            r#"
            SELECT id, title, description, ingredients, instructions, image_name,
                   (image_data IS NOT NULL AND octet_length(image_data) > 0) AS has_image,
                   created_at, updated_at
              FROM recipes
             ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list recipes")?;
        Ok(rows)
    }

    async fn replace_fields(&self, id: Uuid, recipe: NewRecipe) -> anyhow::Result<bool> {
        let (image_name, image_data) = split_image(recipe.image);
        let res = sqlx::query(
            r#"
            UPDATE recipes
               SET title = $2,
                   description = $3,
                   ingredients = $4,
                   instructions = $5,
                   image_name = $6,
                   image_data = $7,
                   updated_at = $8
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(recipe.title)
        .bind(recipe.description)
        .bind(recipe.ingredients)
        .bind(recipe.instructions)
        .bind(image_name)
        .bind(image_data)
        .bind(OffsetDateTime::now_utc())
        .execute(&self.db)
        .await
        .context("update recipe")?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete recipe")?;
        Ok(res.rows_affected() > 0)
    }
}

fn split_image(image: Option<super::model::RecipeImage>) -> (Option<String>, Option<Vec<u8>>) {
    match image {
        Some(img) => (Some(img.name), Some(img.data.to_vec())),
        None => (None, None),
    }
}

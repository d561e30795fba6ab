use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::model::{NewRecipe, Recipe, RecipeSummary};
use super::repo::RecipeStore;

/// Process-local store backing `AppState::fake()`.
#[derive(Default)]
pub struct MemoryRecipeStore {
    // insertion order; newest last
    rows: Mutex<Vec<Recipe>>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts with an explicit creation time.
    pub fn insert_at(&self, recipe: NewRecipe, created_at: OffsetDateTime) -> Uuid {
        let id = Uuid::new_v4();
        let (image_name, image_data) = match recipe.image {
            Some(img) => (Some(img.name), Some(img.data.to_vec())),
            None => (None, None),
        };
        let row = Recipe {
            id,
            title: recipe.title,
            description: recipe.description,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
            image_name,
            image_data,
            created_at,
            updated_at: created_at,
        };
        self.rows.lock().unwrap().push(row);
        id
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn insert(&self, recipe: NewRecipe) -> anyhow::Result<Uuid> {
        Ok(self.insert_at(recipe, OffsetDateTime::now_utc()))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Recipe>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.id == id).cloned())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<RecipeSummary>> {
        let mut out: Vec<RecipeSummary> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .map(RecipeSummary::from)
            .collect();
        // stable: equal timestamps keep the newest insert first
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn replace_fields(&self, id: Uuid, recipe: NewRecipe) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        row.title = recipe.title;
        row.description = recipe.description;
        row.ingredients = recipe.ingredients;
        row.instructions = recipe.instructions;
        match recipe.image {
            Some(img) => {
                row.image_name = Some(img.name);
                row.image_data = Some(img.data.to_vec());
            }
            None => {
                row.image_name = None;
                row.image_data = None;
            }
        }
        row.updated_at = OffsetDateTime::now_utc();
        Ok(true)
    }

    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() != before)
    }
}

#[cfg(test)]
mod store_tests {
    use bytes::Bytes;
    use time::Duration;

    use super::*;
    use crate::recipes::model::RecipeImage;

    fn recipe(title: &str, image: Option<(&str, &[u8])>) -> NewRecipe {
        NewRecipe {
            title: title.into(),
            description: format!("{title} description"),
            ingredients: "water\nsalt".into(),
            instructions: "boil".into(),
            image: image.map(|(name, data)| RecipeImage {
                name: name.into(),
                data: Bytes::copy_from_slice(data),
            }),
        }
    }

    #[tokio::test]
    async fn insert_then_find_returns_same_fields() {
        let store = MemoryRecipeStore::new();
        let id = store
            .insert(recipe("Soup", Some(("soup.png", &b"\x89PNG"[..]))))
            .await
            .unwrap();

        let got = store.find_by_id(id).await.unwrap().expect("recipe exists");
        assert_eq!(got.id, id);
        assert_eq!(got.title, "Soup");
        assert_eq!(got.description, "Soup description");
        assert_eq!(got.ingredients, "water\nsalt");
        assert_eq!(got.instructions, "boil");
        assert_eq!(got.image_name.as_deref(), Some("soup.png"));
        assert_eq!(got.image_data.as_deref(), Some(&b"\x89PNG"[..]));
        assert_eq!(got.created_at, got.updated_at);
    }

    #[tokio::test]
    async fn find_unknown_id_is_none() {
        let store = MemoryRecipeStore::new();
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_all_is_newest_first() {
        let store = MemoryRecipeStore::new();
        let t0 = OffsetDateTime::now_utc();
        let a = store.insert_at(recipe("A", None), t0);
        let c = store.insert_at(recipe("C", None), t0 + Duration::seconds(2));
        let b = store.insert_at(recipe("B", None), t0 + Duration::seconds(1));

        let ids: Vec<Uuid> = store.list_all().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![c, b, a]);
    }

    #[tokio::test]
    async fn list_all_reports_images_without_bytes() {
        let store = MemoryRecipeStore::new();
        let with = store.insert(recipe("With", Some(("a.png", &b"png"[..])))).await.unwrap();
        let empty = store.insert(recipe("Empty", Some(("b.png", &b""[..])))).await.unwrap();
        let without = store.insert(recipe("Without", None)).await.unwrap();

        let all = store.list_all().await.unwrap();
        let has = |id: Uuid| all.iter().find(|r| r.id == id).unwrap().has_image;
        assert!(has(with));
        assert!(!has(empty));
        assert!(!has(without));
        assert_eq!(
            all.iter().find(|r| r.id == with).unwrap().image_name.as_deref(),
            Some("a.png")
        );
    }

    #[tokio::test]
    async fn equal_timestamps_list_latest_insert_first() {
        let store = MemoryRecipeStore::new();
        let t = OffsetDateTime::now_utc();
        let first = store.insert_at(recipe("first", None), t);
        let second = store.insert_at(recipe("second", None), t);

        let ids: Vec<Uuid> = store.list_all().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    async fn replace_keeps_id_and_created_at() {
        let store = MemoryRecipeStore::new();
        let t0 = OffsetDateTime::now_utc() - Duration::hours(1);
        let id = store.insert_at(recipe("Soup", Some(("soup.png", &b"img"[..]))), t0);

        let replaced = store
            .replace_fields(id, recipe("Stew", Some(("stew.jpg", &b"new"[..]))))
            .await
            .unwrap();
        assert!(replaced);

        let got = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(got.title, "Stew");
        assert_eq!(got.image_name.as_deref(), Some("stew.jpg"));
        assert_eq!(got.image_data.as_deref(), Some(&b"new"[..]));
        assert_eq!(got.created_at, t0);
        assert!(got.updated_at > t0);
    }

    #[tokio::test]
    async fn replace_unknown_id_is_noop() {
        let store = MemoryRecipeStore::new();
        store.insert(recipe("Soup", None)).await.unwrap();
        let replaced = store
            .replace_fields(Uuid::new_v4(), recipe("Ghost", None))
            .await
            .unwrap();
        assert!(!replaced);
        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Soup");
    }

    #[tokio::test]
    async fn delete_removes_exactly_one() {
        let store = MemoryRecipeStore::new();
        let a = store.insert(recipe("A", None)).await.unwrap();
        let b = store.insert(recipe("B", None)).await.unwrap();

        assert!(store.delete_by_id(b).await.unwrap());
        assert!(store.find_by_id(b).await.unwrap().is_none());
        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, a);

        assert!(!store.delete_by_id(b).await.unwrap());
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }
}

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::StorageError;
use crate::recipe_model::Recipe;
use crate::storage::{KeyValueStore, FAVORITES_KEY};

/// Saved recipes in the order they were loved, mirrored to storage on every change.
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    recipes: Vec<Arc<Recipe>>,
}

impl FavoritesStore {
    /// Best-effort load; anything unreadable starts an empty list.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let recipes = match store.get(FAVORITES_KEY) {
            None => Vec::new(),
            Some(raw) if raw.trim().is_empty() => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<Recipe>>(&raw) {
                Ok(recipes) => dedup_by_id(recipes),
                Err(e) => {
                    warn!(error = %e, "discarding unreadable favorites");
                    Vec::new()
                }
            },
        };
        debug!(count = recipes.len(), "favorites loaded");
        Self { store, recipes }
    }

    pub fn list(&self) -> &[Arc<Recipe>] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.recipes.iter().any(|r| r.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Recipe>> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Removes the recipe if it is already saved, appends it otherwise.
    /// Returns whether it is a favorite afterwards.
    pub fn toggle(&mut self, recipe: &Arc<Recipe>) -> Result<bool, StorageError> {
        let now_favorite = match self.position(&recipe.id) {
            Some(index) => {
                self.recipes.remove(index);
                false
            }
            None => {
                self.recipes.push(Arc::clone(recipe));
                true
            }
        };
        self.persist()?;
        Ok(now_favorite)
    }

    /// No-op for ids that are not saved.
    pub fn remove(&mut self, id: &str) -> Result<bool, StorageError> {
        match self.position(id) {
            Some(index) => {
                self.recipes.remove(index);
                self.persist()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.recipes.iter().position(|r| r.id == id)
    }

    fn persist(&self) -> Result<(), StorageError> {
        let recipes: Vec<&Recipe> = self.recipes.iter().map(|r| r.as_ref()).collect();
        let json = serde_json::to_string(&recipes)?;
        self.store.set(FAVORITES_KEY, &json)
    }
}

fn dedup_by_id(recipes: Vec<Recipe>) -> Vec<Arc<Recipe>> {
    let mut out: Vec<Arc<Recipe>> = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        if !out.iter().any(|r| r.id == recipe.id) {
            out.push(Arc::new(recipe));
        }
    }
    out
}

//! View state for the whole app and the transitions between screens.

pub mod cooking;

use std::sync::Arc;

use tracing::{debug, error, info};

pub use cooking::{CookingWizard, RecipeTab};

use crate::error::{ChefError, StorageError};
use crate::favorites::FavoritesStore;
use crate::i18n::Language;
use crate::recipe_generator::{RecipeGenerator, RecipeRequest};
use crate::recipe_model::{Diet, Recipe, RecipeImage};
use crate::storage::{KeyValueStore, API_KEY_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenMode {
    #[default]
    Idle,
    Loading,
    Complete,
    Error,
    Favorites,
}

/// What the user has typed or attached so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputDraft {
    pub ingredients: String,
    pub image: Option<RecipeImage>,
    pub diet: Diet,
}

impl InputDraft {
    pub fn is_empty(&self) -> bool {
        self.ingredients.trim().is_empty() && self.image.is_none()
    }
}

/// Why a submit did not start a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    /// A request is in flight or a recipe is on screen.
    NotAccepting,
    MissingCredential,
    MissingInput,
}

/// An issued request. Its result is only applied while its generation is current.
#[derive(Debug, Clone)]
pub struct RecipeTicket {
    generation: u64,
    request: RecipeRequest,
}

impl RecipeTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &RecipeRequest {
        &self.request
    }
}

/// Synchronous user actions. Submitting is async and goes through
/// [`AppController::submit`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum UserIntent {
    SetIngredients(String),
    AttachImage(RecipeImage),
    ClearImage,
    SelectDiet(Diet),
    ToggleLanguage,
    OpenSettings,
    CloseSettings,
    SaveCredential(String),
    ToggleFavoritesView,
    SelectFavorite(String),
    RemoveFavorite(String),
    ToggleFavorite,
    SelectTab(RecipeTab),
    NextStep,
    PreviousStep,
    Reset,
}

pub struct AppController {
    store: Arc<dyn KeyValueStore>,
    favorites: FavoritesStore,
    mode: ScreenMode,
    show_favorites: bool,
    generation: u64,
    pending: Option<u64>,
    error: Option<String>,
    draft: InputDraft,
    language: Language,
    credential: String,
    settings_open: bool,
    recipe: Option<Arc<Recipe>>,
    tab: RecipeTab,
    wizard: CookingWizard,
}

impl AppController {
    /// A credential persisted in `store` wins over `default_credential`.
    pub fn new(store: Arc<dyn KeyValueStore>, default_credential: Option<String>, language: Language) -> Self {
        let favorites = FavoritesStore::load(Arc::clone(&store));
        let credential = store
            .get(API_KEY_KEY)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .or_else(|| default_credential.map(|k| k.trim().to_string()))
            .unwrap_or_default();

        Self {
            store,
            favorites,
            mode: ScreenMode::Idle,
            show_favorites: false,
            generation: 0,
            pending: None,
            error: None,
            draft: InputDraft::default(),
            language,
            credential,
            settings_open: false,
            recipe: None,
            tab: RecipeTab::Menu,
            wizard: CookingWizard::default(),
        }
    }

    pub fn screen_mode(&self) -> ScreenMode {
        if self.show_favorites {
            ScreenMode::Favorites
        } else {
            self.mode
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn has_credential(&self) -> bool {
        !self.credential.trim().is_empty()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn draft(&self) -> &InputDraft {
        &self.draft
    }

    pub fn current_recipe(&self) -> Option<&Arc<Recipe>> {
        self.recipe.as_ref()
    }

    pub fn tab(&self) -> RecipeTab {
        self.tab
    }

    pub fn wizard(&self) -> &CookingWizard {
        &self.wizard
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn pending_generation(&self) -> Option<u64> {
        self.pending
    }

    /// Recomputed from the favorites store on every call.
    pub fn is_current_favorite(&self) -> bool {
        self.recipe
            .as_ref()
            .map(|r| self.favorites.is_favorite(&r.id))
            .unwrap_or(false)
    }

    fn accepts_input(&self) -> bool {
        matches!(self.mode, ScreenMode::Idle | ScreenMode::Error)
    }

    /// Runs the submit checks in order and, if they pass, moves to Loading and
    /// hands back the request to run.
    pub fn begin_submit(&mut self) -> Result<RecipeTicket, SubmitRejection> {
        if !self.accepts_input() {
            debug!(mode = ?self.mode, "submit ignored");
            return Err(SubmitRejection::NotAccepting);
        }
        let t = self.language.strings();
        if !self.has_credential() {
            self.settings_open = true;
            self.error = Some(t.error_configure_key.to_string());
            return Err(SubmitRejection::MissingCredential);
        }
        if self.draft.is_empty() {
            self.error = Some(t.error_missing.to_string());
            return Err(SubmitRejection::MissingInput);
        }

        self.show_favorites = false;
        self.mode = ScreenMode::Loading;
        self.error = None;
        self.generation += 1;
        self.pending = Some(self.generation);

        let ticket = RecipeTicket {
            generation: self.generation,
            request: RecipeRequest {
                ingredients: self.draft.ingredients.clone(),
                diet: self.draft.diet,
                language: self.language,
                credential: self.credential.clone(),
                image: self.draft.image.clone(),
            },
        };
        info!(generation = ticket.generation, "recipe requested");
        Ok(ticket)
    }

    /// Applies a finished request. Returns `false` when the ticket was superseded
    /// and the result was dropped.
    pub fn finish_submit(&mut self, ticket: &RecipeTicket, result: Result<Recipe, ChefError>) -> bool {
        if self.pending != Some(ticket.generation) || self.mode != ScreenMode::Loading {
            debug!(generation = ticket.generation, current = self.generation, "discarding stale recipe result");
            return false;
        }
        self.pending = None;

        match result {
            Ok(recipe) => {
                self.show_recipe(Arc::new(recipe));
            }
            Err(e) => {
                if matches!(e, ChefError::MissingCredential(_)) {
                    self.settings_open = true;
                }
                self.error = Some(e.to_string());
                self.mode = ScreenMode::Error;
            }
        }
        true
    }

    /// Whole submit cycle against `generator`.
    pub async fn submit<G>(&mut self, generator: &G) -> Result<(), SubmitRejection>
    where
        G: RecipeGenerator + ?Sized,
    {
        let ticket = self.begin_submit()?;
        let result = generator.generate_recipe(ticket.request()).await;
        self.finish_submit(&ticket, result);
        Ok(())
    }

    fn show_recipe(&mut self, recipe: Arc<Recipe>) {
        self.recipe = Some(recipe);
        self.tab = RecipeTab::Menu;
        self.wizard.reset();
        self.error = None;
        self.mode = ScreenMode::Complete;
    }

    /// Start over. Favorites, credential and language survive.
    pub fn reset(&mut self) {
        self.recipe = None;
        self.draft = InputDraft::default();
        self.error = None;
        self.show_favorites = false;
        self.mode = ScreenMode::Idle;
        self.generation += 1;
        self.pending = None;
        self.tab = RecipeTab::Menu;
        self.wizard.reset();
    }

    pub fn set_ingredients(&mut self, text: impl Into<String>) {
        self.draft.ingredients = text.into();
    }

    pub fn attach_image(&mut self, image: RecipeImage) {
        self.draft.image = Some(image);
    }

    pub fn clear_image(&mut self) {
        self.draft.image = None;
    }

    pub fn select_diet(&mut self, diet: Diet) {
        self.draft.diet = diet;
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn toggle_language(&mut self) {
        self.language = self.language.toggled();
    }

    pub fn open_settings(&mut self) {
        self.settings_open = true;
    }

    pub fn close_settings(&mut self) {
        self.settings_open = false;
    }

    /// Stored as-is; the next request is what validates it.
    pub fn save_credential(&mut self, key: &str) -> Result<(), StorageError> {
        self.credential = key.trim().to_string();
        self.store.set(API_KEY_KEY, &self.credential)
    }

    pub fn toggle_favorites_view(&mut self) {
        self.show_favorites = !self.show_favorites;
    }

    /// Opens a saved recipe without asking the model. Returns `false` for unknown ids.
    pub fn select_favorite(&mut self, id: &str) -> bool {
        let Some(recipe) = self.favorites.get(id).cloned() else {
            return false;
        };
        self.pending = None;
        self.show_favorites = false;
        self.show_recipe(recipe);
        true
    }

    pub fn remove_favorite(&mut self, id: &str) -> Result<bool, StorageError> {
        self.favorites.remove(id)
    }

    /// `None` when there is no recipe on screen.
    pub fn toggle_favorite(&mut self) -> Option<Result<bool, StorageError>> {
        let recipe = self.recipe.clone()?;
        Some(self.favorites.toggle(&recipe))
    }

    pub fn select_tab(&mut self, tab: RecipeTab) {
        self.tab = tab;
    }

    pub fn next_step(&mut self) -> bool {
        match &self.recipe {
            Some(recipe) => self.wizard.next(recipe),
            None => false,
        }
    }

    pub fn previous_step(&mut self) -> bool {
        self.wizard.previous()
    }

    /// Routes a synchronous intent. Storage failures are logged, the in-memory
    /// change is kept.
    pub fn apply(&mut self, intent: UserIntent) {
        let persisted = match intent {
            UserIntent::SetIngredients(text) => {
                self.set_ingredients(text);
                Ok(())
            }
            UserIntent::AttachImage(image) => {
                self.attach_image(image);
                Ok(())
            }
            UserIntent::ClearImage => {
                self.clear_image();
                Ok(())
            }
            UserIntent::SelectDiet(diet) => {
                self.select_diet(diet);
                Ok(())
            }
            UserIntent::ToggleLanguage => {
                self.toggle_language();
                Ok(())
            }
            UserIntent::OpenSettings => {
                self.open_settings();
                Ok(())
            }
            UserIntent::CloseSettings => {
                self.close_settings();
                Ok(())
            }
            UserIntent::SaveCredential(key) => {
                let saved = self.save_credential(&key);
                self.close_settings();
                saved
            }
            UserIntent::ToggleFavoritesView => {
                self.toggle_favorites_view();
                Ok(())
            }
            UserIntent::SelectFavorite(id) => {
                self.select_favorite(&id);
                Ok(())
            }
            UserIntent::RemoveFavorite(id) => self.remove_favorite(&id).map(|_| ()),
            UserIntent::ToggleFavorite => self.toggle_favorite().unwrap_or(Ok(false)).map(|_| ()),
            UserIntent::SelectTab(tab) => {
                self.select_tab(tab);
                Ok(())
            }
            UserIntent::NextStep => {
                self.next_step();
                Ok(())
            }
            UserIntent::PreviousStep => {
                self.previous_step();
                Ok(())
            }
            UserIntent::Reset => {
                self.reset();
                Ok(())
            }
        };
        if let Err(e) = persisted {
            error!(error = %e, "failed to persist change");
        }
    }
}

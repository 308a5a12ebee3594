use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use chef_gourmet::api_connection::GeminiProvider;
use chef_gourmet::cli::{parse_args, Command, FavoritesAction};
use chef_gourmet::config::AppConfig;
use chef_gourmet::controller::{AppController, CookingWizard, RecipeTab, ScreenMode};
use chef_gourmet::presentation::{favorites_grid, recipe_view, render_screen};
use chef_gourmet::recipe_book::{answer_question, load_book, ChefQuestion, RecipeBook, StaticEmbedder};
use chef_gourmet::recipe_generator::ChefRecipeGenerator;
use chef_gourmet::recipe_model::{Diet, RecipeImage};
use chef_gourmet::shell::run_interactive;
use chef_gourmet::storage::FileKeyValueStore;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chef_gourmet=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn ask(
    app: &mut AppController,
    generator: &ChefRecipeGenerator<GeminiProvider>,
    ingredients: String,
    image: Option<&Path>,
    diet: Diet,
    save: bool,
    cook: bool,
) -> Result<()> {
    app.set_ingredients(ingredients);
    app.select_diet(diet);
    if let Some(path) = image {
        app.attach_image(RecipeImage::load(path).await?);
    }

    if app.submit(generator).await.is_err() || app.screen_mode() == ScreenMode::Error {
        let message = app.error().unwrap_or(app.language().strings().error_kitchen).to_string();
        bail!(message);
    }
    if save {
        if let Some(saved) = app.toggle_favorite() {
            saved.context("Failed to save the recipe to your loved ones")?;
        }
    }
    if cook {
        app.select_tab(RecipeTab::Cooking);
    }
    println!("{}", render_screen(app));
    Ok(())
}

fn favorites(app: &mut AppController, action: Option<FavoritesAction>) -> Result<()> {
    let language = app.language();
    let id_at = |app: &AppController, position: usize| {
        position
            .checked_sub(1)
            .and_then(|i| app.favorites().list().get(i))
            .map(|r| r.id.clone())
            .ok_or_else(|| anyhow!("No saved recipe at position {}", position))
    };

    match action.unwrap_or(FavoritesAction::List) {
        FavoritesAction::List => {
            println!("{}", favorites_grid::render(app.favorites().list(), language));
        }
        FavoritesAction::Show { position } => {
            let id = id_at(app, position)?;
            let recipe = app
                .favorites()
                .get(&id)
                .ok_or_else(|| anyhow!("No saved recipe at position {}", position))?;
            println!(
                "{}",
                recipe_view::render(recipe, RecipeTab::Menu, &CookingWizard::default(), language, true)
            );
        }
        FavoritesAction::Remove { position } => {
            let id = id_at(app, position)?;
            app.remove_favorite(&id)
                .context("Failed to update saved recipes")?;
            println!("{}", favorites_grid::render(app.favorites().list(), language));
        }
    }
    Ok(())
}

async fn ask_chef(
    app: &AppController,
    generator: &ChefRecipeGenerator<GeminiProvider>,
    config: &AppConfig,
    question: String,
    book: Option<&Path>,
    top_k: usize,
) -> Result<()> {
    let strings = app.language().strings();
    let book_path = book.map(Path::to_path_buf).unwrap_or_else(|| config.recipe_book_path());
    if !book_path.exists() {
        warn!(path = %book_path.display(), "recipe book not found");
        println!("{}", strings.recipe_book_missing);
        return Ok(());
    }

    let text = load_book(&book_path).await?;
    let embedder = StaticEmbedder::from_pretrained(&config.embedding_model)
        .with_context(|| format!("Failed to load embedding model {}", config.embedding_model))?;
    let recipe_book = RecipeBook::open_or_build(&text, &config.recipe_book_index_path(), &embedder)?;
    let passages = recipe_book.retrieve(&question, &embedder, top_k)?;
    if passages.is_empty() {
        println!("{}", strings.no_passages);
        return Ok(());
    }

    let request = ChefQuestion {
        question,
        language: app.language(),
        credential: app.credential().to_string(),
    };
    let answer = answer_question(generator.backend(), &config.models.text_model, &request, &passages).await?;
    println!("{}:\n\n{}", strings.chef_answer, answer);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = parse_args();
    let mut config = AppConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(language) = cli.lang {
        config.language = language;
    }
    debug!(data_dir = %config.data_dir.display(), language = %config.language, "configuration loaded");

    let store = Arc::new(FileKeyValueStore::new(config.data_dir.clone()));
    let mut app = AppController::new(store, config.default_api_key.clone(), config.language);

    let provider = GeminiProvider::new(config.api_base_url.clone(), config.request_timeout)
        .context("Failed to build the HTTP client")?;
    let generator = ChefRecipeGenerator::new(provider, config.models.clone());

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => run_interactive(&mut app, &generator).await?,
        Command::Ask {
            ingredients,
            image,
            diet,
            save,
            cook,
        } => ask(&mut app, &generator, ingredients, image.as_deref(), diet, save, cook).await?,
        Command::Favorites { action } => favorites(&mut app, action)?,
        Command::AskChef { question, book, top_k } => {
            ask_chef(&app, &generator, &config, question.join(" "), book.as_deref(), top_k).await?
        }
        Command::SetKey { key } => {
            app.save_credential(&key)
                .with_context(|| format!("Failed to store the API key in '{}'", config.data_dir.display()))?;
            info!("api key saved");
            println!("{} ✓", app.language().strings().api_key_label);
        }
    }

    Ok(())
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::i18n::Language;
use crate::recipe_book::DEFAULT_TOP_K;
use crate::recipe_model::Diet;

#[derive(Parser, Debug)]
#[command(author, version, about = "A Michelin-star chef for whatever is in your fridge", long_about = None)]
pub struct Cli {
    /// Directory holding saved favorites and the API key
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Language the chef writes in (en, pt)
    #[arg(short, long, global = true)]
    pub lang: Option<Language>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Interactive kitchen (default)
    Shell,

    /// Ask for a single recipe and print it
    Ask {
        /// Ingredients and notes for the chef
        #[arg(short, long, default_value = "")]
        ingredients: String,

        /// Photo of your ingredients or fridge
        #[arg(long)]
        image: Option<PathBuf>,

        /// Standard, Vegan, Vegetarian, Keto, "Gluten Free" or Paleo
        #[arg(short, long, default_value = "Standard")]
        diet: Diet,

        /// Add the recipe to your loved ones
        #[arg(long)]
        save: bool,

        /// Print the cooking steps instead of the menu
        #[arg(long)]
        cook: bool,
    },

    /// Browse saved recipes
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },

    /// Ask the chef a question answered from your recipe book
    AskChef {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Plain-text recipe book (defaults to <data-dir>/recipe_book.txt)
        #[arg(long)]
        book: Option<PathBuf>,

        /// How many book passages the chef reads
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },

    /// Save the Gemini API key on this device
    SetKey { key: String },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum FavoritesAction {
    List,
    /// Show the recipe at a 1-based position
    Show { position: usize },
    /// Remove the recipe at a 1-based position
    Remove { position: usize },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

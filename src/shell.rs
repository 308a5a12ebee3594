//! Line-oriented front end: each line becomes one user intent.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use crate::controller::{AppController, RecipeTab, UserIntent};
use crate::i18n::Language;
use crate::presentation::render_screen;
use crate::recipe_generator::RecipeGenerator;
use crate::recipe_model::{Diet, RecipeImage};

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Intent(UserIntent),
    AttachImage(PathBuf),
    Submit,
    /// 1-based position in the favorites grid.
    OpenFavorite(usize),
    RemoveFavorite(usize),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
ingredients <text>   what you have (alias: i)
image <path>         attach a photo
clear-image          drop the photo
diet <name>          Standard, Vegan, Vegetarian, Keto, Gluten Free, Paleo
lang                 switch between English and Portuguese
ask                  send everything to the chef
menu | cook          switch recipe tabs
next | prev          move through cooking steps
fav                  love / unlove the current recipe
favorites            show or hide your loved ones
open <n> | remove <n>
settings | close     open or close the settings dialog
key <value>          save your Gemini API key
reset                start over
show | help | quit";

pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let position = |arg: &str| {
        arg.parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| format!("Expected a position starting at 1, got '{}'", arg))
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" | "show" => ShellCommand::Show,
        "i" | "ingredients" => ShellCommand::Intent(UserIntent::SetIngredients(rest.to_string())),
        "image" if !rest.is_empty() => ShellCommand::AttachImage(PathBuf::from(rest)),
        "clear-image" => ShellCommand::Intent(UserIntent::ClearImage),
        "diet" => ShellCommand::Intent(UserIntent::SelectDiet(rest.parse::<Diet>()?)),
        "lang" => ShellCommand::Intent(UserIntent::ToggleLanguage),
        "ask" | "submit" => ShellCommand::Submit,
        "menu" => ShellCommand::Intent(UserIntent::SelectTab(RecipeTab::Menu)),
        "cook" => ShellCommand::Intent(UserIntent::SelectTab(RecipeTab::Cooking)),
        "next" | "n" => ShellCommand::Intent(UserIntent::NextStep),
        "prev" | "p" => ShellCommand::Intent(UserIntent::PreviousStep),
        "fav" => ShellCommand::Intent(UserIntent::ToggleFavorite),
        "favorites" => ShellCommand::Intent(UserIntent::ToggleFavoritesView),
        "open" => ShellCommand::OpenFavorite(position(rest)?),
        "remove" => ShellCommand::RemoveFavorite(position(rest)?),
        "settings" => ShellCommand::Intent(UserIntent::OpenSettings),
        "close" => ShellCommand::Intent(UserIntent::CloseSettings),
        "key" if !rest.is_empty() => ShellCommand::Intent(UserIntent::SaveCredential(rest.to_string())),
        "reset" | "new" => ShellCommand::Intent(UserIntent::Reset),
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
    };
    Ok(command)
}

fn favorite_id_at(app: &AppController, position: usize) -> Option<String> {
    app.favorites()
        .list()
        .get(position.checked_sub(1)?)
        .map(|r| r.id.clone())
}

/// Runs until `quit` or end of input.
pub async fn run_shell<G, R, W>(
    app: &mut AppController,
    generator: &G,
    input: R,
    out: &mut W,
) -> Result<()>
where
    G: RecipeGenerator + ?Sized,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}\n", render_screen(app))?;
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{}", message)?;
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                writeln!(out, "{}", HELP)?;
                continue;
            }
            ShellCommand::Show => {}
            ShellCommand::Intent(intent) => app.apply(intent),
            ShellCommand::AttachImage(path) => match RecipeImage::load(&path).await {
                Ok(image) => app.attach_image(image),
                Err(e) => {
                    warn!(error = %e, "could not attach image");
                    writeln!(out, "{:#}", e)?;
                    continue;
                }
            },
            ShellCommand::OpenFavorite(position) => match favorite_id_at(app, position) {
                Some(id) => app.apply(UserIntent::SelectFavorite(id)),
                None => {
                    writeln!(out, "No saved recipe at position {}", position)?;
                    continue;
                }
            },
            ShellCommand::RemoveFavorite(position) => match favorite_id_at(app, position) {
                Some(id) => app.apply(UserIntent::RemoveFavorite(id)),
                None => {
                    writeln!(out, "No saved recipe at position {}", position)?;
                    continue;
                }
            },
            ShellCommand::Submit => {
                if let Ok(ticket) = app.begin_submit() {
                    writeln!(out, "{}\n", render_screen(app))?;
                    out.flush()?;
                    let result = generator.generate_recipe(ticket.request()).await;
                    app.finish_submit(&ticket, result);
                }
            }
        }
        writeln!(out, "{}\n", render_screen(app))?;
    }
    Ok(())
}

/// Interactive session on stdin/stdout.
pub async fn run_interactive<G>(app: &mut AppController, generator: &G) -> Result<()>
where
    G: RecipeGenerator + ?Sized,
{
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    if app.language() == Language::En {
        writeln!(stdout, "Type 'help' for commands.")?;
    } else {
        writeln!(stdout, "Digite 'help' para ver os comandos.")?;
    }
    run_shell(app, generator, stdin, &mut stdout).await
}

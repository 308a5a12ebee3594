//! Text rendering of controller state. Nothing here mutates anything.

pub mod favorites_grid;
pub mod nutrition_chart;
pub mod recipe_view;
pub mod settings_dialog;

use crate::controller::{AppController, ScreenMode};
use crate::recipe_model::Diet;

pub fn render_screen(app: &AppController) -> String {
    let language = app.language();
    let t = language.strings();
    let mut sections = vec![format!(
        "👨‍🍳 {}    ♥ {} ({})    [{}]",
        t.nav_title,
        t.my_loved_ones,
        app.favorites().len(),
        t.lang_toggle
    )];

    if app.settings_open() {
        sections.push(settings_dialog::render(app.credential(), language));
    }

    let body = match app.screen_mode() {
        ScreenMode::Idle | ScreenMode::Error => render_input_form(app),
        ScreenMode::Loading => format!("{}\n{}", t.thinking, t.analyzing),
        ScreenMode::Complete => match app.current_recipe() {
            Some(recipe) => recipe_view::render(
                recipe,
                app.tab(),
                app.wizard(),
                language,
                app.is_current_favorite(),
            ),
            None => render_input_form(app),
        },
        ScreenMode::Favorites => favorites_grid::render(app.favorites().list(), language),
    };
    sections.push(body);
    sections.join("\n\n")
}

fn render_input_form(app: &AppController) -> String {
    let t = app.language().strings();
    let draft = app.draft();

    let image_line = match &draft.image {
        Some(image) => format!(
            "{} ({})",
            t.upload_placeholder_active,
            image.file_name.as_deref().unwrap_or(&image.mime_type)
        ),
        None => t.upload_placeholder.to_string(),
    };
    let ingredients_line = if draft.ingredients.trim().is_empty() {
        format!("<{}>", t.ingredients_placeholder)
    } else {
        draft.ingredients.clone()
    };
    let diets: Vec<String> = Diet::ALL
        .iter()
        .map(|d| {
            let label = t.diet_label(*d);
            if *d == draft.diet {
                format!("[{}]", label)
            } else {
                label.to_string()
            }
        })
        .collect();

    let mut out = vec![
        t.hero_title.to_string(),
        t.hero_subtitle.to_string(),
        String::new(),
        format!("{}: {}", t.visual_inspection, image_line),
        format!("{}: {}", t.ingredients_notes, ingredients_line),
        format!("{}: {}", t.dietary_preferences, diets.join("  ")),
    ];
    if let Some(error) = app.error() {
        out.push(String::new());
        out.push(format!("! {}", error));
    }
    out.push(String::new());
    out.push(format!("» {}", t.ask_chef));
    out.join("\n")
}

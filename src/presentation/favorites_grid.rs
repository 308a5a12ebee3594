use std::sync::Arc;

use crate::i18n::Language;
use crate::recipe_model::Recipe;

/// Numbered cards, 1-based so the shell can refer to them by position.
pub fn render(favorites: &[Arc<Recipe>], language: Language) -> String {
    let t = language.strings();
    if favorites.is_empty() {
        return format!("♥ {}\n\n{}", t.my_loved_ones, t.no_favorites);
    }

    let mut out = vec![format!("♥ {}", t.my_loved_ones), String::new()];
    for (index, recipe) in favorites.iter().enumerate() {
        out.push(format!("{:>2}. {}", index + 1, recipe.title));
        if !recipe.description.is_empty() {
            out.push(format!("    {}", truncate(&recipe.description, 90)));
        }
        out.push(format!("    [{}] [{}]", recipe.prep_time, recipe.difficulty));
    }
    out.push(String::new());
    out.push(format!("open <n>: {}   remove <n>: {}", t.view_recipe, t.remove));
    out.join("\n")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe_model::{Difficulty, Nutrition};

    fn favorite(id: &str, title: &str) -> Arc<Recipe> {
        Arc::new(Recipe {
            id: id.to_string(),
            title: title.to_string(),
            description: "x".repeat(120),
            prep_time: "15 mins".to_string(),
            cook_time: String::new(),
            difficulty: Difficulty::MichelinStar,
            ingredients: Vec::new(),
            instructions: Vec::new(),
            nutrition: Nutrition::default(),
            chef_notes: String::new(),
        })
    }

    #[test]
    fn test_empty_state() {
        let text = render(&[], Language::En);
        assert!(text.contains("My Loved Ones"));
        assert!(text.contains("haven't saved any recipes"));
    }

    #[test]
    fn test_cards_are_numbered_in_order() {
        let text = render(&[favorite("a", "Paella"), favorite("b", "Tiramisu")], Language::En);
        assert!(text.contains(" 1. Paella"));
        assert!(text.contains(" 2. Tiramisu"));
        assert!(text.contains("[15 mins] [Michelin Star]"));
        assert!(text.contains('…'));
        assert!(text.find("Paella").unwrap() < text.find("Tiramisu").unwrap());
    }
}

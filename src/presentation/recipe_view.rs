use crate::controller::{CookingWizard, RecipeTab};
use crate::i18n::Language;
use crate::recipe_model::Recipe;

use super::nutrition_chart;

pub fn render(
    recipe: &Recipe,
    tab: RecipeTab,
    wizard: &CookingWizard,
    language: Language,
    is_favorite: bool,
) -> String {
    let t = language.strings();
    let tab_label = |label: &str, active: bool| {
        if active {
            format!("[{}]", label)
        } else {
            format!(" {} ", label)
        }
    };

    let mut out = vec![
        format!(
            "← {}    {} {}",
            t.new_order,
            tab_label(t.the_menu, tab == RecipeTab::Menu),
            tab_label(t.cooking_mode, tab == RecipeTab::Cooking)
        ),
        String::new(),
        format!(
            "{} {}",
            recipe.title,
            if is_favorite { "♥" } else { "♡" }
        ),
        format!("  ({})", if is_favorite { t.remove_favorite } else { t.add_favorite }),
    ];
    if !recipe.description.is_empty() {
        out.push(recipe.description.clone());
    }
    out.push(format!(
        "⏱ {}: {}   🔥 {}: {}   👨‍🍳 {}: {}",
        t.prep, recipe.prep_time, t.cook, recipe.cook_time, t.difficulty, recipe.difficulty
    ));
    out.push(String::new());

    match tab {
        RecipeTab::Menu => out.push(render_menu(recipe, language)),
        RecipeTab::Cooking => out.push(render_cooking(recipe, wizard, language)),
    }
    out.join("\n")
}

fn render_menu(recipe: &Recipe, language: Language) -> String {
    let t = language.strings();
    let mut out = vec![t.ingredients.to_string()];
    let name_width = recipe
        .ingredients
        .iter()
        .map(|i| i.name.chars().count())
        .max()
        .unwrap_or(0);
    for ingredient in &recipe.ingredients {
        out.push(format!(
            "  • {:<w$}  {}",
            ingredient.name,
            ingredient.amount,
            w = name_width
        ));
    }
    if !recipe.chef_notes.is_empty() {
        out.push(String::new());
        out.push(t.chef_notes.to_string());
        out.push(format!("  \"{}\"", recipe.chef_notes));
    }
    out.push(String::new());
    out.push(nutrition_chart::render(&recipe.nutrition, language));
    out.push(String::new());
    out.push(t.summary.to_string());
    out.push(format!("  {}", t.summary_text));
    out.push(String::new());
    out.push(format!("» {}", t.start_cooking));
    out.join("\n")
}

fn render_cooking(recipe: &Recipe, wizard: &CookingWizard, language: Language) -> String {
    let t = language.strings();
    let Some(step) = wizard.current_step(recipe) else {
        return t.no_steps.to_string();
    };
    let total = recipe.instructions.len();

    let mut out = vec![
        format!("{} {} / {}", t.step.to_uppercase(), wizard.index() + 1, total),
        String::new(),
        step.instruction.clone(),
    ];
    if let Some(duration) = step.duration.as_deref().filter(|d| !d.trim().is_empty()) {
        out.push(format!("⏳ {}", duration));
    }
    out.push(String::new());

    let dots: String = (0..total)
        .map(|i| if i == wizard.index() { '●' } else { '○' })
        .collect();
    let previous = if wizard.can_previous() {
        format!("← {}", t.previous)
    } else {
        String::new()
    };
    let next = if wizard.is_last(recipe) {
        t.bon_appetit.to_string()
    } else {
        format!("{} →", t.next_step)
    };
    out.push(format!("{}   {}   {}", previous, dots, next));
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe_model::{Difficulty, Ingredient, Nutrition, Step};

    fn recipe(steps: u32) -> Recipe {
        Recipe {
            id: "r".to_string(),
            title: "Lemon Chicken".to_string(),
            description: "Bright and juicy".to_string(),
            prep_time: "10 mins".to_string(),
            cook_time: "25 mins".to_string(),
            difficulty: Difficulty::Hard,
            ingredients: vec![
                Ingredient {
                    name: "Chicken".to_string(),
                    amount: "2 breasts".to_string(),
                },
                Ingredient {
                    name: "Lemon".to_string(),
                    amount: "1".to_string(),
                },
            ],
            instructions: (1..=steps)
                .map(|n| Step {
                    step_number: n,
                    instruction: format!("instruction {}", n),
                    duration: if n == 1 { Some("5 mins".to_string()) } else { None },
                })
                .collect(),
            nutrition: Nutrition {
                calories: 420.0,
                protein: 40.0,
                carbs: 10.0,
                fat: 20.0,
            },
            chef_notes: "Rest the meat.".to_string(),
        }
    }

    #[test]
    fn test_menu_tab() {
        let text = render(&recipe(2), RecipeTab::Menu, &CookingWizard::default(), Language::En, false);
        assert!(text.contains("[The Menu]"));
        assert!(text.contains("Lemon Chicken ♡"));
        assert!(text.contains("Add to Loved Ones"));
        assert!(text.contains("Difficulty: Hard"));
        assert!(text.contains("• Chicken  2 breasts"));
        assert!(text.contains("\"Rest the meat.\""));
        assert!(text.contains("420 kcal"));
        assert!(!text.contains("STEP 1"));
    }

    #[test]
    fn test_cooking_tab_first_and_last_step() {
        let r = recipe(2);
        let mut wizard = CookingWizard::default();
        let first = render(&r, RecipeTab::Cooking, &wizard, Language::En, true);
        assert!(first.contains("[Cooking Mode]"));
        assert!(first.contains("STEP 1 / 2"));
        assert!(first.contains("⏳ 5 mins"));
        assert!(first.contains("●○"));
        assert!(first.contains("Next Step →"));
        assert!(!first.contains("← Previous"));

        wizard.next(&r);
        let last = render(&r, RecipeTab::Cooking, &wizard, Language::En, true);
        assert!(last.contains("STEP 2 / 2"));
        assert!(last.contains("← Previous"));
        assert!(last.contains("Bon Appétit!"));
    }

    #[test]
    fn test_cooking_tab_without_steps() {
        let text = render(&recipe(0), RecipeTab::Cooking, &CookingWizard::default(), Language::Pt, false);
        assert!(text.contains(Language::Pt.strings().no_steps));
    }
}

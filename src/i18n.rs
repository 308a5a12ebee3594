use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::recipe_model::Diet;

/// Languages the chef can write recipes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pt,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Pt];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Pt => "pt",
        }
    }

    /// Name used inside prompts when telling the model which language to write in.
    pub fn prompt_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Pt => "Portuguese (Brazil)",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::En => Language::Pt,
            Language::Pt => Language::En,
        }
    }

    pub fn strings(self) -> &'static Translations {
        match self {
            Language::En => &EN,
            Language::Pt => &PT,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Language::En),
            "pt" | "pt-br" | "portuguese" | "português" => Ok(Language::Pt),
            other => Err(format!("Unsupported language: {}", other)),
        }
    }
}

/// Every user-facing string, per language.
#[derive(Debug)]
pub struct Translations {
    pub nav_title: &'static str,
    pub settings: &'static str,
    pub my_loved_ones: &'static str,
    pub lang_toggle: &'static str,
    pub hero_title: &'static str,
    pub hero_subtitle: &'static str,
    pub visual_inspection: &'static str,
    pub upload_placeholder: &'static str,
    pub upload_placeholder_active: &'static str,
    pub ingredients_notes: &'static str,
    pub ingredients_placeholder: &'static str,
    pub dietary_preferences: &'static str,
    pub ask_chef: &'static str,
    pub thinking: &'static str,
    pub analyzing: &'static str,
    pub error_missing: &'static str,
    pub error_configure_key: &'static str,
    pub error_api_key_missing: &'static str,
    pub error_kitchen: &'static str,
    pub new_order: &'static str,
    pub the_menu: &'static str,
    pub cooking_mode: &'static str,
    pub prep: &'static str,
    pub cook: &'static str,
    pub difficulty: &'static str,
    pub ingredients: &'static str,
    pub chef_notes: &'static str,
    pub nutrition_title: &'static str,
    pub protein: &'static str,
    pub carbs: &'static str,
    pub fat: &'static str,
    pub summary: &'static str,
    pub summary_text: &'static str,
    pub start_cooking: &'static str,
    pub step: &'static str,
    pub previous: &'static str,
    pub next_step: &'static str,
    pub bon_appetit: &'static str,
    pub no_steps: &'static str,
    pub add_favorite: &'static str,
    pub remove_favorite: &'static str,
    pub no_favorites: &'static str,
    pub view_recipe: &'static str,
    pub remove: &'static str,
    pub api_key_label: &'static str,
    pub api_key_placeholder: &'static str,
    pub api_key_help: &'static str,
    pub save: &'static str,
    pub cancel: &'static str,
    pub recipe_book_missing: &'static str,
    pub chef_answer: &'static str,
    pub no_passages: &'static str,
    /// Indexed in `Diet::ALL` order.
    pub diet_labels: [&'static str; 6],
}

impl Translations {
    pub fn diet_label(&self, diet: Diet) -> &'static str {
        self.diet_labels[diet.index()]
    }
}

pub static EN: Translations = Translations {
    nav_title: "Chef Gourmet AI",
    settings: "Settings",
    my_loved_ones: "My Loved Ones",
    lang_toggle: "PT",
    hero_title: "Turn your ingredients into a masterpiece",
    hero_subtitle: "Show the chef what you have. Receive a Michelin-worthy recipe.",
    visual_inspection: "Visual Inspection",
    upload_placeholder: "Attach a photo of your ingredients or fridge",
    upload_placeholder_active: "Photo attached",
    ingredients_notes: "Ingredients & Notes",
    ingredients_placeholder: "e.g. chicken breast, lemon, rosemary, leftover rice...",
    dietary_preferences: "Dietary Preferences",
    ask_chef: "Ask the Chef",
    thinking: "The Chef is thinking...",
    analyzing: "Analyzing ingredients and composing your menu",
    error_missing: "Please provide ingredients or upload a photo.",
    error_configure_key: "Please configure your API Key.",
    error_api_key_missing: "API Key is missing.",
    error_kitchen: "The Chef is having trouble in the kitchen. Please try again.",
    new_order: "New Order",
    the_menu: "The Menu",
    cooking_mode: "Cooking Mode",
    prep: "Prep",
    cook: "Cook",
    difficulty: "Difficulty",
    ingredients: "Ingredients",
    chef_notes: "Chef's Notes",
    nutrition_title: "Nutrition per Serving",
    protein: "Protein",
    carbs: "Carbs",
    fat: "Fat",
    summary: "Summary",
    summary_text: "A balanced dish crafted from what you have on hand. Switch to cooking mode for guided, step-by-step preparation.",
    start_cooking: "Start Cooking",
    step: "Step",
    previous: "Previous",
    next_step: "Next Step",
    bon_appetit: "Bon Appétit!",
    no_steps: "The chef did not provide any steps for this recipe.",
    add_favorite: "Add to Loved Ones",
    remove_favorite: "Remove from Loved Ones",
    no_favorites: "You haven't saved any recipes yet. Love a recipe to keep it here.",
    view_recipe: "View Recipe",
    remove: "Remove",
    api_key_label: "Gemini API Key",
    api_key_placeholder: "Paste your API key",
    api_key_help: "Your key is stored only on this device and sent only to the Gemini API.",
    save: "Save",
    cancel: "Cancel",
    recipe_book_missing: "The Chef's recipe book is missing.",
    chef_answer: "The Chef says",
    no_passages: "Nothing in the recipe book matches that question.",
    diet_labels: ["Standard", "Vegan", "Vegetarian", "Keto", "Gluten Free", "Paleo"],
};

pub static PT: Translations = Translations {
    nav_title: "Chef Gourmet IA",
    settings: "Configurações",
    my_loved_ones: "Meus Queridinhos",
    lang_toggle: "EN",
    hero_title: "Transforme seus ingredientes em uma obra-prima",
    hero_subtitle: "Mostre ao chef o que você tem. Receba uma receita digna de estrela Michelin.",
    visual_inspection: "Inspeção Visual",
    upload_placeholder: "Anexe uma foto dos seus ingredientes ou da geladeira",
    upload_placeholder_active: "Foto anexada",
    ingredients_notes: "Ingredientes e Observações",
    ingredients_placeholder: "ex.: peito de frango, limão, alecrim, sobra de arroz...",
    dietary_preferences: "Preferências Alimentares",
    ask_chef: "Pergunte ao Chef",
    thinking: "O Chef está pensando...",
    analyzing: "Analisando ingredientes e compondo seu menu",
    error_missing: "Por favor, informe ingredientes ou envie uma foto.",
    error_configure_key: "Por favor, configure sua chave API.",
    error_api_key_missing: "Chave de API ausente.",
    error_kitchen: "O Chef está com problemas na cozinha. Por favor, tente novamente.",
    new_order: "Novo Pedido",
    the_menu: "O Menu",
    cooking_mode: "Modo Cozinha",
    prep: "Preparo",
    cook: "Cozimento",
    difficulty: "Dificuldade",
    ingredients: "Ingredientes",
    chef_notes: "Notas do Chef",
    nutrition_title: "Nutrição por Porção",
    protein: "Proteína",
    carbs: "Carboidratos",
    fat: "Gordura",
    summary: "Resumo",
    summary_text: "Um prato equilibrado criado com o que você tem em mãos. Mude para o modo cozinha para um preparo guiado, passo a passo.",
    start_cooking: "Começar a Cozinhar",
    step: "Passo",
    previous: "Anterior",
    next_step: "Próximo Passo",
    bon_appetit: "Bom Apetite!",
    no_steps: "O chef não forneceu nenhum passo para esta receita.",
    add_favorite: "Adicionar aos Queridinhos",
    remove_favorite: "Remover dos Queridinhos",
    no_favorites: "Você ainda não salvou nenhuma receita. Favorite uma receita para guardá-la aqui.",
    view_recipe: "Ver Receita",
    remove: "Remover",
    api_key_label: "Chave da API Gemini",
    api_key_placeholder: "Cole sua chave de API",
    api_key_help: "Sua chave fica salva apenas neste dispositivo e é enviada somente para a API Gemini.",
    save: "Salvar",
    cancel: "Cancelar",
    recipe_book_missing: "O livro de receitas do Chef não foi encontrado.",
    chef_answer: "O Chef responde",
    no_passages: "Nada no livro de receitas corresponde a essa pergunta.",
    diet_labels: ["Padrão", "Vegano", "Vegetariano", "Cetogênica", "Sem Glúten", "Paleolítica"],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parsing() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!("PT-BR".parse::<Language>().unwrap(), Language::Pt);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_toggle_round_trips() {
        for lang in Language::ALL {
            assert_eq!(lang.toggled().toggled(), lang);
        }
    }

    #[test]
    fn test_tables_differ_per_language() {
        assert_ne!(Language::En.strings().error_kitchen, Language::Pt.strings().error_kitchen);
        assert_eq!(Language::Pt.strings().diet_label(Diet::Vegan), "Vegano");
        assert_eq!(Language::En.strings().diet_label(Diet::GlutenFree), "Gluten Free");
    }
}

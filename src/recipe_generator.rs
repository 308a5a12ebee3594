//! Turns what the user has in the kitchen into a request for the model, and the
//! model's answer back into a [`Recipe`].

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::api_connection::endpoints::{
    Content, GenerateContentRequest, GenerationConfig, Part, ResponseSchema, SchemaType,
    DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL,
};
use crate::api_connection::GenerativeBackend;
use crate::error::ChefError;
use crate::i18n::Language;
use crate::recipe_model::{Diet, Recipe, RecipeDraft, RecipeImage};

/// Everything the chef needs for one recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRequest {
    pub ingredients: String,
    pub diet: Diet,
    pub language: Language,
    pub credential: String,
    pub image: Option<RecipeImage>,
}

#[async_trait]
pub trait RecipeGenerator: Send + Sync {
    async fn generate_recipe(&self, request: &RecipeRequest) -> Result<Recipe, ChefError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    /// Schema-aware model used for text-only requests.
    pub text_model: String,
    /// Multimodal model used when a photo is attached.
    pub image_model: String,
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self {
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

/// How a request is phrased and how its answer is read back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GenerationStrategy<'a> {
    /// Text only: the model is handed a response schema and returns bare JSON.
    SchemaEnforced,
    /// Photo attached: the image model has no schema support, so the JSON shape
    /// travels inside the prompt and the answer may come wrapped in code fences.
    PromptEmbedded { image: &'a RecipeImage },
}

impl<'a> GenerationStrategy<'a> {
    pub fn for_request(request: &'a RecipeRequest) -> Self {
        match &request.image {
            Some(image) => GenerationStrategy::PromptEmbedded { image },
            None => GenerationStrategy::SchemaEnforced,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GenerationStrategy::SchemaEnforced => "schema",
            GenerationStrategy::PromptEmbedded { .. } => "image",
        }
    }

    pub fn model<'m>(&self, models: &'m ModelSelection) -> &'m str {
        match self {
            GenerationStrategy::SchemaEnforced => &models.text_model,
            GenerationStrategy::PromptEmbedded { .. } => &models.image_model,
        }
    }

    pub fn build_request(&self, request: &RecipeRequest) -> GenerateContentRequest {
        let system_instruction = Some(Content::system(system_prompt(request.diet, request.language)));
        match self {
            GenerationStrategy::SchemaEnforced => GenerateContentRequest {
                system_instruction,
                contents: vec![Content::user(vec![Part::text(text_prompt(request))])],
                generation_config: Some(GenerationConfig {
                    response_mime_type: Some("application/json".to_string()),
                    response_schema: Some(recipe_response_schema()),
                    temperature: None,
                }),
            },
            GenerationStrategy::PromptEmbedded { image } => GenerateContentRequest {
                system_instruction,
                contents: vec![Content::user(vec![
                    Part::inline_data(
                        image.mime_type.clone(),
                        general_purpose::STANDARD.encode(&image.bytes),
                    ),
                    Part::text(image_prompt(request)),
                ])],
                generation_config: None,
            },
        }
    }
}

pub fn system_prompt(diet: Diet, language: Language) -> String {
    let lang = language.prompt_name();
    format!(
        "You are a world-renowned Michelin-star chef, known for creativity and elegance.
Create a gourmet recipe based on the provided ingredients.
The recipe should adhere to the '{diet}' diet.
If the ingredients are scarce, be creative and suggest a \"Chef's Special\" with pantry staples.

IMPORTANT: The content of the recipe (Title, Description, Instructions, Ingredients, Notes) MUST be written in {lang}.
The difficulty field always uses one of these English labels: Easy, Medium, Hard, Michelin Star.

Tone: Sophisticated, encouraging, and professional.",
        diet = diet.tag(),
        lang = lang,
    )
}

fn text_prompt(request: &RecipeRequest) -> String {
    format!(
        "User ingredients: {}. Diet: {}. Create a full recipe in {}.",
        request.ingredients.trim(),
        request.diet.tag(),
        request.language.prompt_name()
    )
}

fn image_prompt(request: &RecipeRequest) -> String {
    let lang = request.language.prompt_name();
    format!(
        "Analyze this image of ingredients/fridge contents.
Also consider these user notes: \"{notes}\".
Diet: {diet}.

IMPORTANT: Return ONLY valid JSON matching this structure. Do not add any text before or after it:
{{
  \"title\": \"Recipe Name ({lang})\",
  \"description\": \"Short appetizing description ({lang})\",
  \"prepTime\": \"e.g. 15 mins\",
  \"cookTime\": \"e.g. 30 mins\",
  \"difficulty\": \"Easy/Medium/Hard/Michelin Star\",
  \"ingredients\": [{{\"name\": \"Item\", \"amount\": \"Qty\"}}],
  \"instructions\": [{{\"stepNumber\": 1, \"instruction\": \"Do this\", \"duration\": \"5 mins\"}}],
  \"nutrition\": {{\"calories\": 500, \"protein\": 20, \"carbs\": 30, \"fat\": 15}},
  \"chefNotes\": \"A tip from the chef ({lang})\"
}}",
        notes = request.ingredients.trim(),
        diet = request.diet.tag(),
        lang = lang,
    )
}

pub fn recipe_response_schema() -> ResponseSchema {
    let string = || ResponseSchema::scalar(SchemaType::String);
    let number = || ResponseSchema::scalar(SchemaType::Number);

    ResponseSchema::object(
        vec![
            ("title", string()),
            ("description", string()),
            ("prepTime", string()),
            ("cookTime", string()),
            ("difficulty", string()),
            (
                "ingredients",
                ResponseSchema::array_of(ResponseSchema::object(
                    vec![("name", string()), ("amount", string())],
                    &[],
                )),
            ),
            (
                "instructions",
                ResponseSchema::array_of(ResponseSchema::object(
                    vec![
                        ("stepNumber", ResponseSchema::scalar(SchemaType::Integer)),
                        ("instruction", string()),
                        ("duration", string()),
                    ],
                    &[],
                )),
            ),
            (
                "nutrition",
                ResponseSchema::object(
                    vec![
                        ("calories", number()),
                        ("protein", number()),
                        ("carbs", number()),
                        ("fat", number()),
                    ],
                    &[],
                ),
            ),
            ("chefNotes", string()),
        ],
        &["title", "ingredients", "instructions", "nutrition"],
    )
}

/// Removes a surrounding ```json ... ``` or ``` ... ``` block, if any.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed;
    };
    without_open
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

pub fn decode_recipe_draft(raw: &str) -> Result<RecipeDraft, serde_json::Error> {
    serde_json::from_str(strip_code_fences(raw))
}

/// Timestamp plus randomness, both in base 36. Unique enough for one device.
pub fn generate_recipe_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let random: u64 = rand::thread_rng().gen();
    format!("{}{}", to_base36(millis), to_base36(random))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// The adapter between user input and a generative backend.
pub struct ChefRecipeGenerator<B> {
    backend: B,
    models: ModelSelection,
}

impl<B: GenerativeBackend> ChefRecipeGenerator<B> {
    pub fn new(backend: B, models: ModelSelection) -> Self {
        Self { backend, models }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[async_trait]
impl<B: GenerativeBackend> RecipeGenerator for ChefRecipeGenerator<B> {
    async fn generate_recipe(&self, request: &RecipeRequest) -> Result<Recipe, ChefError> {
        let language = request.language;
        if request.credential.trim().is_empty() {
            return Err(ChefError::MissingCredential(language));
        }

        let strategy = GenerationStrategy::for_request(request);
        let model = strategy.model(&self.models);
        let payload = strategy.build_request(request);
        info!(strategy = strategy.name(), model, diet = %request.diet, "asking the chef for a recipe");

        let raw = self
            .backend
            .generate_content(&request.credential, model, &payload)
            .await
            .map_err(|e| {
                warn!(strategy = strategy.name(), error = %e, "recipe request failed");
                ChefError::Request(language)
            })?;
        debug!(raw = %raw, "raw model response");

        let draft = decode_recipe_draft(&raw).map_err(|e| {
            warn!(strategy = strategy.name(), error = %e, "model response is not a valid recipe");
            ChefError::Request(language)
        })?;

        let recipe = draft.into_recipe(generate_recipe_id());
        info!(id = %recipe.id, title = %recipe.title, "recipe ready");
        Ok(recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn text_request() -> RecipeRequest {
        RecipeRequest {
            ingredients: "eggs, spinach".to_string(),
            diet: Diet::Vegetarian,
            language: Language::Pt,
            credential: "key".to_string(),
            image: None,
        }
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```  "), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```"), "");
    }

    #[test]
    fn test_decode_rejects_non_json() {
        assert!(decode_recipe_draft("not json").is_err());
        assert!(decode_recipe_draft("```json\nnot json\n```").is_err());
    }

    #[test]
    fn test_decode_accepts_nulls_and_string_numbers() {
        let raw = r#"```json
{"title": "Tortilla", "description": null, "difficulty": null, "chefNotes": null,
 "ingredients": [{"name": "Potato", "amount": "3"}],
 "instructions": [{"stepNumber": 1, "instruction": "Fry"}],
 "nutrition": {"calories": "500", "protein": "12", "carbs": 40, "fat": null}}
```"#;
        let draft = decode_recipe_draft(raw).unwrap();
        assert_eq!(draft.title, "Tortilla");
        assert_eq!(draft.nutrition.calories, 500.0);
        assert_eq!(draft.nutrition.protein, 12.0);
        assert!(draft.chef_notes.is_empty());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: HashSet<String> = (0..10_000).map(|_| generate_recipe_id()).collect();
        assert_eq!(ids.len(), 10_000);
        assert!(ids.iter().all(|id| !id.is_empty()));
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_strategy_follows_image_presence() {
        let mut request = text_request();
        assert_eq!(GenerationStrategy::for_request(&request), GenerationStrategy::SchemaEnforced);

        request.image = Some(RecipeImage::new(vec![1, 2, 3], "image/jpeg"));
        let strategy = GenerationStrategy::for_request(&request);
        assert!(matches!(strategy, GenerationStrategy::PromptEmbedded { .. }));
        assert_eq!(strategy.model(&ModelSelection::default()), DEFAULT_IMAGE_MODEL);
    }

    #[test]
    fn test_schema_request_shape() {
        let request = text_request();
        let payload = GenerationStrategy::SchemaEnforced.build_request(&request);
        let config = payload.generation_config.expect("schema requests carry a config");
        let schema = config.response_schema.expect("schema present");
        assert_eq!(
            schema.required,
            vec!["title", "ingredients", "instructions", "nutrition"]
        );
        assert!(schema.properties.as_ref().unwrap().contains_key("chefNotes"));

        let system = payload.system_instruction.unwrap().parts[0].text.clone().unwrap();
        assert!(system.contains("Portuguese (Brazil)"));
        assert!(system.contains("'Vegetarian'"));
        let user = payload.contents[0].parts[0].text.clone().unwrap();
        assert!(user.contains("eggs, spinach"));
    }

    #[test]
    fn test_image_request_embeds_shape_and_image() {
        let mut request = text_request();
        request.image = Some(RecipeImage::new(b"abc".to_vec(), "image/png"));
        let strategy = GenerationStrategy::for_request(&request);
        let payload = strategy.build_request(&request);
        assert!(payload.generation_config.is_none());

        let parts = &payload.contents[0].parts;
        let inline = parts[0].inline_data.as_ref().unwrap();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(inline.data, "YWJj");
        let prompt = parts[1].text.as_deref().unwrap();
        assert!(prompt.contains("Return ONLY valid JSON"));
        assert!(prompt.contains("\"chefNotes\""));
        assert!(prompt.contains("eggs, spinach"));
    }
}

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `310`, `"310"`, `"310 kcal"` or `null`. Anything unreadable is 0.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => leading_number(&s).unwrap_or(0.0),
        _ => 0.0,
    })
}

fn leading_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let end = trimmed
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.' || *c == '-'))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ingredient {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Informational only; cooking mode follows sequence order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub step_number: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instruction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// Model-generated and never validated.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct Nutrition {
    #[serde(deserialize_with = "lenient_number")]
    pub calories: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub protein: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub carbs: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub fat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    MichelinStar,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::MichelinStar => "Michelin Star",
        }
    }

    /// Lenient parse of whatever the model wrote. Compound answers such as
    /// "Easy/Medium/Hard" resolve to their first recognized token.
    pub fn from_model_text(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        if lowered.contains("michelin") {
            return Difficulty::MichelinStar;
        }
        lowered
            .split(|c: char| c == '/' || c == '|' || c == ',' || c.is_whitespace())
            .find_map(|token| match token {
                "easy" | "fácil" | "facil" => Some(Difficulty::Easy),
                "medium" | "médio" | "medio" | "média" | "media" => Some(Difficulty::Medium),
                "hard" | "difícil" | "dificil" => Some(Difficulty::Hard),
                _ => None,
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Difficulty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Difficulty::from_model_text(&raw))
    }
}

/// A recipe as decoded from the model, before it is given an identity.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prep_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cook_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub difficulty: Difficulty,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<Step>,
    pub nutrition: Nutrition,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chef_notes: String,
}

impl RecipeDraft {
    pub fn into_recipe(self, id: String) -> Recipe {
        Recipe {
            id,
            title: self.title,
            description: self.description,
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            difficulty: self.difficulty,
            ingredients: self.ingredients,
            instructions: self.instructions,
            nutrition: self.nutrition,
            chef_notes: self.chef_notes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prep_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cook_time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<Step>,
    #[serde(default)]
    pub nutrition: Nutrition,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chef_notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Diet {
    #[default]
    Standard,
    Vegan,
    Vegetarian,
    Keto,
    #[serde(rename = "Gluten Free")]
    GlutenFree,
    Paleo,
}

impl Diet {
    pub const ALL: [Diet; 6] = [
        Diet::Standard,
        Diet::Vegan,
        Diet::Vegetarian,
        Diet::Keto,
        Diet::GlutenFree,
        Diet::Paleo,
    ];

    /// Tag sent to the model.
    pub fn tag(self) -> &'static str {
        match self {
            Diet::Standard => "Standard",
            Diet::Vegan => "Vegan",
            Diet::Vegetarian => "Vegetarian",
            Diet::Keto => "Keto",
            Diet::GlutenFree => "Gluten Free",
            Diet::Paleo => "Paleo",
        }
    }

    pub fn index(self) -> usize {
        Diet::ALL.iter().position(|d| *d == self).unwrap_or(0)
    }
}

impl FromStr for Diet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "standard" | "none" | "padrão" | "padrao" => Ok(Diet::Standard),
            "vegan" | "vegano" => Ok(Diet::Vegan),
            "vegetarian" | "vegetariano" => Ok(Diet::Vegetarian),
            "keto" | "cetogênica" | "cetogenica" => Ok(Diet::Keto),
            "glutenfree" | "semglúten" | "semgluten" => Ok(Diet::GlutenFree),
            "paleo" | "paleolítica" | "paleolitica" => Ok(Diet::Paleo),
            _ => Err(format!("Unknown diet: {}", s.trim())),
        }
    }
}

impl fmt::Display for Diet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A photo of ingredients to send along with the request.
#[derive(Clone, PartialEq)]
pub struct RecipeImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: Option<String>,
}

impl fmt::Debug for RecipeImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipeImage")
            .field("bytes", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

impl RecipeImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            file_name: None,
        }
    }

    pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "webp" => Some("image/webp"),
            "gif" => Some("image/gif"),
            "heic" => Some("image/heic"),
            "heif" => Some("image/heif"),
            _ => None,
        }
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let mime_type = Self::mime_type_for_path(path)
            .ok_or_else(|| anyhow!("Unsupported image type: {:?}", path))?;
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read image file {:?}", path))?;
        if bytes.is_empty() {
            return Err(anyhow!("Image file {:?} is empty", path));
        }
        Ok(Self {
            bytes,
            mime_type: mime_type.to_string(),
            file_name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
        })
    }
}

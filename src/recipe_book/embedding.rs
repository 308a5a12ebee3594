use anyhow::Result;
use model2vec_rs::model::StaticModel;

pub const DEFAULT_EMBEDDING_MODEL: &str = "minishlab/potion-base-32M";

/// Turns passages and questions into vectors.
pub trait Embedder {
    /// Identifies the vector space; an index built by another model is rebuilt.
    fn model_id(&self) -> &str;

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No embedding produced for: {}", text))
    }
}

/// Local static embeddings from a model2vec checkpoint.
pub struct StaticEmbedder {
    model: StaticModel,
    model_id: String,
}

impl StaticEmbedder {
    /// Loads the model from the Hugging Face hub or the local cache.
    pub fn from_pretrained(model_id: &str) -> Result<Self> {
        let model = StaticModel::from_pretrained(model_id, None, None, None)?;
        Ok(Self {
            model,
            model_id: model_id.to_string(),
        })
    }
}

impl Embedder for StaticEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.model.encode(texts))
    }
}

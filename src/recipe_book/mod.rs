//! Answers cooking questions from a local recipe book: the book is split into
//! passages, embedded into a [`VectorStore`], and the closest passages are
//! handed to the model together with the question.

pub mod embedding;
pub mod passages;
pub mod vector_store;

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::api_connection::endpoints::{Content, GenerateContentRequest, GenerationConfig, Part};
use crate::api_connection::GenerativeBackend;
use crate::error::ChefError;
use crate::i18n::Language;

pub use embedding::{Embedder, StaticEmbedder, DEFAULT_EMBEDDING_MODEL};
pub use passages::{load_book, split_passages, Passage, DEFAULT_PASSAGE_CHARS};
pub use vector_store::{Entry, SearchHit, VectorStore};

/// Passages handed to the model per question.
pub const DEFAULT_TOP_K: usize = 4;
const ANSWER_TEMPERATURE: f32 = 0.2;

/// The recipe book, indexed for retrieval.
#[derive(Debug, Clone)]
pub struct RecipeBook {
    store: VectorStore,
}

impl RecipeBook {
    /// Splits and embeds `text` from scratch.
    pub fn build(text: &str, embedder: &dyn Embedder) -> Result<Self> {
        let passages = split_passages(text, DEFAULT_PASSAGE_CHARS);
        if passages.is_empty() {
            return Ok(Self {
                store: VectorStore::new(0, embedder.model_id()),
            });
        }

        let texts: Vec<String> = passages.iter().map(|p| p.text.clone()).collect();
        let vectors = embedder.embed(&texts)?;
        if vectors.len() != passages.len() {
            anyhow::bail!(
                "Embedder returned {} vectors for {} passages",
                vectors.len(),
                passages.len()
            );
        }

        let dim = vectors.first().map(Vec::len).unwrap_or(0);
        let mut store = VectorStore::new(dim, embedder.model_id());
        for (passage, vector) in passages.into_iter().zip(vectors) {
            store.insert(
                Entry {
                    id: passage.id,
                    text: passage.text,
                },
                &vector,
            )?;
        }
        info!(passages = store.len(), dim, "Indexed recipe book");
        Ok(Self { store })
    }

    /// Reuses the index at `index_path` when it was built from the same text
    /// with the same model; otherwise rebuilds it and writes it back.
    pub fn open_or_build(text: &str, index_path: &Path, embedder: &dyn Embedder) -> Result<Self> {
        match VectorStore::load(index_path) {
            Ok(Some(store)) if Self::is_current(&store, text, embedder) => {
                debug!(path = %index_path.display(), "Reusing recipe book index");
                return Ok(Self { store });
            }
            Ok(_) => {}
            Err(err) => warn!(path = %index_path.display(), "Ignoring unreadable index: {:#}", err),
        }

        let book = Self::build(text, embedder)?;
        if let Err(err) = book.store.save(index_path) {
            warn!(path = %index_path.display(), "Could not save recipe book index: {:#}", err);
        }
        Ok(book)
    }

    fn is_current(store: &VectorStore, text: &str, embedder: &dyn Embedder) -> bool {
        if store.model_id() != embedder.model_id() {
            return false;
        }
        let fresh = split_passages(text, DEFAULT_PASSAGE_CHARS);
        fresh.len() == store.len()
            && fresh
                .iter()
                .zip(store.entries())
                .all(|(p, e)| p.id == e.id && p.text == e.text)
    }

    /// The passages closest to `question`, best first.
    pub fn retrieve(&self, question: &str, embedder: &dyn Embedder, top_k: usize) -> Result<Vec<SearchHit>> {
        if self.store.is_empty() {
            return Ok(Vec::new());
        }
        let vector = embedder.embed_one(question)?;
        Ok(self.store.query(&vector, top_k))
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChefQuestion {
    pub question: String,
    pub language: Language,
    pub credential: String,
}

/// Stuffs the retrieved passages and the question into one request.
pub fn answer_prompt(question: &ChefQuestion, passages: &[SearchHit]) -> GenerateContentRequest {
    let system = format!(
        "You are a professional Michelin-star Chef. Answer the question using only the recipe book \
         excerpts provided. If the excerpts do not contain the answer, say you don't know rather than \
         inventing one. Keep the answer short and practical. Respond in {}.",
        question.language.prompt_name()
    );

    let mut context = String::new();
    for hit in passages {
        context.push_str(&format!("[{}]\n{}\n\n", hit.entry.id, hit.entry.text));
    }
    let user = format!(
        "Recipe book excerpts:\n\n{}Question: {}",
        context,
        question.question.trim()
    );

    GenerateContentRequest {
        system_instruction: Some(Content::system(system)),
        contents: vec![Content::user(vec![Part::text(user)])],
        generation_config: Some(GenerationConfig {
            temperature: Some(ANSWER_TEMPERATURE),
            ..Default::default()
        }),
    }
}

/// Asks the model to answer `question` from the retrieved passages.
pub async fn answer_question<B: GenerativeBackend + ?Sized>(
    backend: &B,
    model: &str,
    question: &ChefQuestion,
    passages: &[SearchHit],
) -> Result<String, ChefError> {
    let lang = question.language;
    if question.credential.trim().is_empty() {
        return Err(ChefError::MissingCredential(lang));
    }
    if question.question.trim().is_empty() {
        return Err(ChefError::MissingInput(lang));
    }

    let request = answer_prompt(question, passages);
    info!(model, passages = passages.len(), "Asking the chef");
    match backend.generate_content(&question.credential, model, &request).await {
        Ok(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        Ok(_) => {
            warn!("Chef answered with empty text");
            Err(ChefError::Request(lang))
        }
        Err(err) => {
            warn!("Chef question failed: {}", err);
            Err(ChefError::Request(lang))
        }
    }
}

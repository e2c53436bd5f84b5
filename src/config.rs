//! TOML configuration parsing and validation.
//!
//! Word-count bounds are validated here, at the configuration boundary —
//! the chunking functions themselves assume sane bounds and never re-check
//! them mid-algorithm. Secrets (OpenAI and Qdrant API keys) come from the
//! environment, never from the config file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::split::Bounds;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub chunking: ChunkingConfig,
    pub embedding: EmbeddingConfig,
    pub qdrant: QdrantConfig,
    pub retrieval: RetrievalConfig,
    pub generation: GenerationConfig,
    pub batch: BatchConfig,
}

/// Word-count bounds per document profile.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ProfileConfig {
    pub target_words: usize,
    pub max_words: usize,
    pub min_words: usize,
}

impl ProfileConfig {
    pub fn bounds(&self) -> Bounds {
        Bounds {
            target_words: self.target_words,
            max_words: self.max_words,
            min_words: self.min_words,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_cv_profile")]
    pub cv: ProfileConfig,
    #[serde(default = "default_blog_profile")]
    pub blog: ProfileConfig,
    #[serde(default = "default_readme_profile")]
    pub readme: ProfileConfig,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            cv: default_cv_profile(),
            blog: default_blog_profile(),
            readme: default_readme_profile(),
        }
    }
}

fn default_cv_profile() -> ProfileConfig {
    ProfileConfig {
        target_words: 100,
        max_words: 150,
        min_words: 15,
    }
}
fn default_blog_profile() -> ProfileConfig {
    ProfileConfig {
        target_words: 200,
        max_words: 400,
        min_words: 50,
    }
}
fn default_readme_profile() -> ProfileConfig {
    ProfileConfig {
        target_words: 150,
        max_words: 200,
        min_words: 10,
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub dims: Option<usize>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "disabled".to_string(),
            model: None,
            dims: None,
            batch_size: 50,
            max_retries: 5,
            timeout_secs: 30,
        }
    }
}

impl EmbeddingConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

fn default_provider() -> String {
    "disabled".to_string()
}
fn default_batch_size() -> usize {
    50
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct QdrantConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            collection: default_collection(),
        }
    }
}

fn default_collection() -> String {
    "personal_docs".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_min_score")]
    pub min_score: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_score: default_min_score(),
        }
    }
}

fn default_top_k() -> usize {
    5
}
fn default_min_score() -> f32 {
    0.7
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_chat_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Name used in the assistant persona prompt.
    #[serde(default = "default_persona")]
    pub persona: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_chat_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            persona: default_persona(),
        }
    }
}

fn default_chat_model() -> String {
    "gpt-3.5-turbo".to_string()
}
fn default_max_tokens() -> u32 {
    500
}
fn default_temperature() -> f32 {
    0.7
}
fn default_persona() -> String {
    "the candidate".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct BatchConfig {
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
        }
    }
}

fn default_include_globs() -> Vec<String> {
    vec![
        "**/*.md".to_string(),
        "**/*.markdown".to_string(),
        "**/*.txt".to_string(),
        "**/*.pdf".to_string(),
    ]
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Load the config file if it exists, otherwise fall back to defaults.
/// Used by the offline chunking commands, which work fine without a file;
/// a present-but-broken config is still an error.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::default())
    }
}

fn validate(config: &Config) -> Result<()> {
    for (name, profile) in [
        ("cv", &config.chunking.cv),
        ("blog", &config.chunking.blog),
        ("readme", &config.chunking.readme),
    ] {
        if profile.max_words == 0 {
            anyhow::bail!("chunking.{}.max_words must be > 0", name);
        }
        if profile.min_words > profile.max_words {
            anyhow::bail!("chunking.{}.min_words must be <= max_words", name);
        }
        if profile.target_words > profile.max_words {
            anyhow::bail!("chunking.{}.target_words must be <= max_words", name);
        }
    }

    if config.retrieval.top_k < 1 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }
    if !(0.0..=1.0).contains(&config.retrieval.min_score) {
        anyhow::bail!("retrieval.min_score must be in [0.0, 1.0]");
    }

    if config.embedding.is_enabled() {
        if config.embedding.dims.is_none() || config.embedding.dims == Some(0) {
            anyhow::bail!(
                "embedding.dims must be > 0 when provider is '{}'",
                config.embedding.provider
            );
        }
        if config.embedding.model.is_none() {
            anyhow::bail!(
                "embedding.model must be specified when provider is '{}'",
                config.embedding.provider
            );
        }
    }

    match config.embedding.provider.as_str() {
        "disabled" | "openai" => {}
        other => anyhow::bail!(
            "Unknown embedding provider: '{}'. Must be disabled or openai.",
            other
        ),
    }

    if config.generation.max_tokens == 0 {
        anyhow::bail!("generation.max_tokens must be >= 1");
    }

    Ok(())
}

//! The `cvc ask` command: retrieval-augmented answering.
//!
//! Retrieves the top chunks for a question, builds a grounded persona
//! prompt, and calls the chat-completions API. The model is told to answer
//! only from the provided context.

use anyhow::{bail, Context, Result};
use std::time::Duration;

use crate::config::Config;
use crate::qdrant::ScoredHit;
use crate::search;

const CHAT_TIMEOUT_SECS: u64 = 60;

pub async fn run_ask(config: &Config, question: &str) -> Result<()> {
    if question.trim().is_empty() {
        bail!("Question must not be empty");
    }

    let hits = search::retrieve(config, question, None, None).await?;
    if hits.is_empty() {
        println!("No relevant context found — has the corpus been embedded?");
        return Ok(());
    }

    let context = format_contexts(&hits);
    let system = system_prompt(&config.generation.persona, &context);
    let user = format!(
        "Question: {}\n\nPlease provide a helpful answer based on the context above.",
        question
    );

    let answer = chat_completion(config, &system, &user).await?;

    println!("{}", answer.trim());
    println!();
    println!("Sources:");
    for hit in &hits {
        println!(
            "  - {} ({}, score {:.2})",
            hit.record.heading, hit.record.source, hit.score
        );
    }
    Ok(())
}

/// Numbered context blocks, highest-scoring first, as handed to the model.
fn format_contexts(hits: &[ScoredHit]) -> String {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            format!(
                "[Context {} — {} (relevance: {:.2})]:\n{}",
                i + 1,
                hit.record.heading,
                hit.score,
                hit.record.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn system_prompt(persona: &str, context: &str) -> String {
    format!(
        "You are the friendly and knowledgeable AI assistant of {persona}. You help \
         recruiters, hiring managers, and other professionals learn about {persona}'s \
         background, experience, and expertise using information from their CV, blog \
         posts, GitHub projects, and other documents.\n\
         \n\
         Instructions:\n\
         - Use ONLY the provided context to answer questions. Don't guess or make \
         anything up.\n\
         - Include specific examples from the context where possible.\n\
         - If a question goes beyond the available context, say so politely and offer \
         to help with what is available.\n\
         - Keep answers clear, concise, and informative.\n\
         - Never include personal opinions, speculation, or assumptions beyond what is \
         in the context.\n\
         - If a question is irrelevant or inappropriate, respond respectfully and \
         decline to answer.\n\
         \n\
         Context Information:\n\
         {context}\n\
         \n\
         Remember: you are representing {persona}. Be accurate and grounded.",
        persona = persona,
        context = context,
    )
}

async fn chat_completion(config: &Config, system: &str, user: &str) -> Result<String> {
    let api_key =
        std::env::var("OPENAI_API_KEY").map_err(|_| anyhow::anyhow!("OPENAI_API_KEY not set"))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(CHAT_TIMEOUT_SECS))
        .build()?;

    let body = serde_json::json!({
        "model": config.generation.model,
        "messages": [
            { "role": "system", "content": system },
            { "role": "user", "content": user },
        ],
        "temperature": config.generation.temperature,
        "max_tokens": config.generation.max_tokens,
        "top_p": 0.9,
    });

    let resp = client
        .post("https://api.openai.com/v1/chat/completions")
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .context("Chat completion request failed")?;

    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        bail!("OpenAI API error {}: {}", status, text);
    }

    let json: serde_json::Value = resp.json().await?;
    json.pointer("/choices/0/message/content")
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("Invalid chat response: missing message content"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChunkKind, ChunkRecord};
    use std::collections::BTreeMap;

    fn hit(heading: &str, text: &str, score: f32) -> ScoredHit {
        ScoredHit {
            score,
            record: ChunkRecord {
                id: "cv-0".to_string(),
                chunk_index: 0,
                text: text.to_string(),
                source: "cv".to_string(),
                heading: heading.to_string(),
                chunk_type: ChunkKind::Experience,
                word_count: crate::models::word_count(text),
                parent_heading: String::new(),
                metadata: BTreeMap::new(),
            },
        }
    }

    #[test]
    fn contexts_are_numbered_and_labeled() {
        let hits = vec![
            hit("Company X", "built dashboards", 0.91),
            hit("Company Y", "payment systems", 0.82),
        ];
        let formatted = format_contexts(&hits);
        assert!(formatted.contains("[Context 1 — Company X (relevance: 0.91)]"));
        assert!(formatted.contains("[Context 2 — Company Y (relevance: 0.82)]"));
        assert!(formatted.contains("built dashboards"));
    }

    #[test]
    fn system_prompt_embeds_persona_and_context() {
        let prompt = system_prompt("Jane Doe", "[Context 1]");
        assert!(prompt.contains("Jane Doe"));
        assert!(prompt.contains("[Context 1]"));
        assert!(prompt.contains("ONLY the provided context"));
    }
}

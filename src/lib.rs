//! # cv-corpus
//!
//! A chunking, embedding, and retrieval pipeline for a personal-CV chatbot
//! corpus: CVs, blog posts, GitHub repositories, and Q&A documents are
//! segmented into retrieval-sized passages, embedded, and indexed for
//! semantic search and grounded question answering.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌───────────┐
//! │  Documents    │──▶│   Chunking    │──▶│   JSONL   │
//! │ CV/blog/gh/qa │   │ sections+size │   │  records  │
//! └──────────────┘   └───────────────┘   └─────┬─────┘
//!                                              │
//!                             embed (OpenAI) ──┤
//!                                              ▼
//!                                      ┌──────────────┐
//!                                      │    Qdrant     │
//!                                      └──────┬───────┘
//!                                             │
//!                            search / ask ◀───┘
//! ```
//!
//! The chunking stage is pure, synchronous text transformation — no I/O, no
//! shared state — so documents can be processed independently. Everything
//! downstream of the JSONL files is a thin wrapper over hosted APIs.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`normalize`] | Whitespace and table-artifact cleanup |
//! | [`sections`] | Structural marker detection and section splitting |
//! | [`classify`] | Heading → CV category classification |
//! | [`chunk`] | Chunking pipeline and category sub-chunkers |
//! | [`split`] | Size-bounded paragraph/sentence splitting |
//! | [`records`] | Record assembly and JSONL interchange |
//! | [`qa`] | Q&A document chunking |
//! | [`blog`] | Blog export chunking |
//! | [`github`] | GitHub export chunking |
//! | [`loader`] | PDF/markdown/text loading |
//! | [`config`] | TOML configuration parsing |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`qdrant`] | Qdrant REST wrapper |
//! | [`search`] | Semantic retrieval |
//! | [`ask`] | Retrieval-augmented answering |

pub mod ask;
pub mod blog;
pub mod chunk;
pub mod classify;
pub mod config;
pub mod embed_cmd;
pub mod embedding;
pub mod github;
pub mod ingest;
pub mod loader;
pub mod models;
pub mod normalize;
pub mod qa;
pub mod qdrant;
pub mod records;
pub mod search;
pub mod sections;
pub mod split;
pub mod stats;

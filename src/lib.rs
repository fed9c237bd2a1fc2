//! # Moked
//!
//! A Hebrew FAQ matching engine: free-text questions in, the best
//! pre-authored answer out.
//!
//! The FAQ source is a plain-text file of question/variant/answer blocks.
//! At startup it is parsed into an in-memory corpus; at query time the
//! query is normalized, intent-tagged, fuzzy-scored against every question
//! and variant, and — when fuzzy matching is inconclusive — compared
//! against an embedding index of the same corpus. An arbiter picks the
//! winner or reports "not found".
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌────────┐   ┌───────────────────────┐
//! │ FAQ text │──▶│ Parser │──▶│ Corpus + link table    │
//! └──────────┘   └────────┘   └───────┬───────────────┘
//!                                     │ (embed once)
//!                 query               ▼
//!             ┌───────────┐   ┌───────────────┐
//!             │ Normalize │──▶│ Lexical match │──threshold──▶ answer
//!             │ + intent  │   └───────┬───────┘
//!             └───────────┘           │ below threshold
//!                                     ▼
//!                             ┌───────────────┐
//!                             │ Semantic k-NN │──threshold──▶ answer
//!                             └───────┬───────┘               + related
//!                                     │ too far
//!                                     ▼
//!                                "not found"
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`normalize`] | Hebrew text canonicalization |
//! | [`parse`] | FAQ block grammar parser |
//! | [`intent`] | add/delete/update keyword tagging |
//! | [`lexical`] | Token-sort-ratio fuzzy scoring |
//! | [`embedding`] | Embedding backend abstraction |
//! | [`index`] | In-memory semantic vector index |
//! | [`answer`] | Answer assembly and link expansion |
//! | [`engine`] | Arbiter and corpus lifecycle |
//! | [`source`] | FAQ source provider (file or URL) |

pub mod answer;
pub mod config;
pub mod embedding;
pub mod engine;
pub mod index;
pub mod intent;
pub mod lexical;
pub mod models;
pub mod normalize;
pub mod parse;
pub mod source;

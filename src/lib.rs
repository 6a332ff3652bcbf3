//! deckgen - Generate slide-deck JSON from a free-text topic
//!
//! A three-stage LLM pipeline (plan, draft, review) that turns a topic into
//! a deck of slide records conforming to caller-supplied layout schemas.
//! Supports a primary and a secondary provider behind a shared call budget
//! and always degrades to a deterministic offline deck when live calls fail.

pub mod cli;
pub mod config;
pub mod context;
pub mod deck;
pub mod error;
pub mod extract;
pub mod llm;
pub mod pipeline;
pub mod schema;
pub mod stub;
pub mod util;

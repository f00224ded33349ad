//! context-stash: collect files, line ranges, and notes into an ordered
//! context set and export it as a single LLM-ready prompt document.
//!
//! The pipeline: the [`store::ContextStore`] owns the ordered item set;
//! [`optimize`] strips comments and blank lines to save token budget;
//! [`tokens`] estimates the cost against a target tokenizer;
//! [`export::assemble`] concatenates everything with headers and runs the
//! [`redact`] scrubber over the final document; [`tree::build_tree`] turns the
//! stashed paths into a readable hierarchy.

pub mod cli;
pub mod config;
pub mod domain;
pub mod export;
pub mod optimize;
pub mod redact;
pub mod source;
pub mod store;
pub mod tokens;
pub mod tree;
pub mod utils;

//! License text classification and normalization.
//!
//! - [`tokenizer`]: canonical token stream for training and matching.
//! - [`patterns`]: regex fast path for short strings (manifest fields, badges).
//! - [`aliases`]: maps the many spellings of a license onto one canonical name.
//! - [`splitter`]: breaks dual/multi-license expressions into their parts.
//! - [`corpus`] / [`classifier`]: reference texts and the naive Bayes model
//!   trained on them.
//! - [`pipeline`]: combines the above into a single `resolve` step.

pub mod aliases;
pub mod classifier;
pub mod corpus;
pub mod patterns;
pub mod pipeline;
pub mod splitter;
pub mod tokenizer;

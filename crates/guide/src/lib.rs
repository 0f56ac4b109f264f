//! # Examscope Guide
//!
//! Study-guide generation: topic analysis, per-topic explanations, and
//! markdown/PDF rendering.
//!
//! The LLM does the heavy lifting; this crate owns the prompts, the
//! JSON-from-response extraction, the topic tree, and the output document.
//! Retrieval context is advisory throughout; a failed or empty lookup
//! never blocks explanation generation.

mod error;
mod explain;
mod json_extract;
mod model;
mod output;
mod render;
mod topics;

pub use error::{GuideError, Result};
pub use explain::ExplanationGenerator;
pub use json_extract::{extract_json_array, extract_json_object};
pub use model::{topic_paths, ExampleQuestion, Explanation, GuideAnalysis, Topic};
pub use output::OutputGenerator;
pub use render::render_markdown;
pub use topics::TopicAnalyzer;

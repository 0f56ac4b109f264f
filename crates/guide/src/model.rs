use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A node in the hierarchical topic outline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// Topic name
    pub name: String,

    /// Brief topic description
    #[serde(default)]
    pub description: String,

    /// Hierarchy level (0 = top level)
    #[serde(default)]
    pub level: u32,

    /// Nested subtopics
    #[serde(default)]
    pub subtopics: Vec<Topic>,
}

/// An example question mined from an exam document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleQuestion {
    /// The question text
    pub question: String,

    /// Source exam filename
    pub source_file: String,

    /// Page number in the source, when known
    #[serde(default)]
    pub page_number: Option<u32>,
}

/// Generated explanation for one topic path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    /// Full topic path being explained
    pub topic_name: String,

    /// Detailed explanation text
    pub explanation: String,

    /// Intuitive examples
    #[serde(default)]
    pub examples: Vec<String>,

    /// Key concepts to remember
    #[serde(default)]
    pub key_concepts: Vec<String>,

    /// Related exam questions
    #[serde(default)]
    pub related_questions: Vec<ExampleQuestion>,
}

/// Complete analysis result consumed by the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideAnalysis {
    /// Hierarchical topic outline
    pub topics: Vec<Topic>,

    /// Explanations keyed by topic path
    pub explanations: HashMap<String, Explanation>,

    /// Analyzed exam filenames
    pub source_exams: Vec<String>,
}

/// Flatten a topic forest into `(path, node)` pairs in depth-first order.
///
/// Paths join ancestor names with `" > "`. Topics form a strict tree, so
/// the traversal needs no cycle handling.
#[must_use]
pub fn topic_paths(topics: &[Topic]) -> Vec<(String, &Topic)> {
    let mut paths = Vec::new();
    for topic in topics {
        collect_paths(topic, None, &mut paths);
    }
    paths
}

fn collect_paths<'a>(topic: &'a Topic, parent: Option<&str>, out: &mut Vec<(String, &'a Topic)>) {
    let path = match parent {
        Some(parent) => format!("{parent} > {}", topic.name),
        None => topic.name.clone(),
    };
    out.push((path.clone(), topic));
    for subtopic in &topic.subtopics {
        collect_paths(subtopic, Some(&path), out);
    }
}

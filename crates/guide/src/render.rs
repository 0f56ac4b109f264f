use crate::model::{Explanation, GuideAnalysis, Topic};
use std::collections::HashMap;
use std::fmt::Write as _;

/// Render the complete analysis to a markdown study guide.
///
/// Pure string construction: PDF conversion lives in
/// [`OutputGenerator`](crate::OutputGenerator) so rendering stays testable
/// without a document toolchain.
#[must_use]
pub fn render_markdown(analysis: &GuideAnalysis) -> String {
    let mut md = String::new();

    md.push_str("# Exam Study Guide\n\n");
    let _ = writeln!(md, "*Generated from {} exam(s)*\n", analysis.source_exams.len());
    md.push_str("---\n\n");

    md.push_str("## Table of Contents\n\n");
    for topic in &analysis.topics {
        let _ = writeln!(md, "- [{}](#{})", topic.name, anchor(&topic.name));
        for subtopic in &topic.subtopics {
            let _ = writeln!(md, "  - [{}](#{})", subtopic.name, anchor(&subtopic.name));
        }
    }
    md.push_str("\n---\n\n");

    for topic in &analysis.topics {
        md.push_str(&topic_to_markdown(topic, &analysis.explanations, 1, ""));
        md.push_str("\n---\n\n");
    }

    md.push_str("## Source Exams\n\n");
    for exam in &analysis.source_exams {
        let _ = writeln!(md, "- {exam}");
    }

    md
}

fn anchor(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

fn topic_to_markdown(
    topic: &Topic,
    explanations: &HashMap<String, Explanation>,
    level: usize,
    parent_path: &str,
) -> String {
    let topic_path = if parent_path.is_empty() {
        topic.name.clone()
    } else {
        format!("{parent_path} > {}", topic.name)
    };

    let mut md = String::new();
    let _ = writeln!(md, "{} {}\n", "#".repeat(level), topic.name);

    if !topic.description.is_empty() {
        let _ = writeln!(md, "*{}*\n", topic.description);
    }

    if let Some(explanation) = explanations.get(&topic_path) {
        let _ = writeln!(md, "\n{}\n", explanation.explanation);

        if !explanation.key_concepts.is_empty() {
            md.push_str("\n**Key Concepts:**\n");
            for concept in &explanation.key_concepts {
                let _ = writeln!(md, "- {concept}");
            }
        }

        if !explanation.examples.is_empty() {
            md.push_str("\n**Examples:**\n");
            for (i, example) in explanation.examples.iter().enumerate() {
                let _ = writeln!(md, "\n{}. {example}", i + 1);
            }
        }

        if !explanation.related_questions.is_empty() {
            md.push_str("\n**Example Questions:**\n");
            for question in &explanation.related_questions {
                let _ = writeln!(md, "\n> **From {}:**", question.source_file);
                let _ = writeln!(md, "> {}", question.question);
            }
        }
    }

    for subtopic in &topic.subtopics {
        md.push('\n');
        md.push_str(&topic_to_markdown(subtopic, explanations, level + 1, &topic_path));
    }

    md
}

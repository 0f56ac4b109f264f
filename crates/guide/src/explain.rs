use crate::error::Result;
use crate::json_extract::extract_json_object;
use crate::model::{ExampleQuestion, Explanation, Topic};
use examscope_extract::Document;
use examscope_llm::{ChatMessage, LlmClient};
use examscope_retrieval::Retriever;
use serde::Deserialize;

const SYSTEM_PROMPT: &str = "You are an expert educator creating comprehensive study materials. Your task is to provide detailed, intuitive explanations of academic topics.

For each topic, provide:
1. A thorough explanation of the concept
2. Key concepts and principles to remember
3. Intuitive examples and analogies to aid understanding
4. Practical applications when relevant

Make your explanations clear, engaging, and accessible. Use analogies and real-world examples to make complex concepts easier to grasp.";

const EXPLANATION_TEMPERATURE: f32 = 0.7;

/// Chunks of reference material fetched per topic
const RAG_TOP_K: usize = 3;

/// Example questions kept per topic
const MAX_RELATED_QUESTIONS: usize = 3;

#[derive(Deserialize)]
struct ExplanationPayload {
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    key_concepts: Vec<String>,
    #[serde(default)]
    examples: Vec<String>,
}

/// Generates per-topic explanations, optionally enriched with retrieved
/// reference material
pub struct ExplanationGenerator<'a> {
    llm: &'a LlmClient,
    retriever: Option<&'a Retriever>,
}

impl<'a> ExplanationGenerator<'a> {
    pub fn new(llm: &'a LlmClient, retriever: Option<&'a Retriever>) -> Self {
        Self { llm, retriever }
    }

    /// Generate the explanation for a single topic path.
    ///
    /// Retrieval context is advisory: an empty or failed lookup simply
    /// produces a prompt without reference material. A response whose JSON
    /// cannot be parsed degrades to using the raw response text as the
    /// explanation body rather than failing the run.
    pub async fn generate_explanation(
        &self,
        topic_path: &str,
        topic: &Topic,
        exam_docs: &[Document],
    ) -> Result<Explanation> {
        let rag_context = match self.retriever {
            Some(retriever) => retriever.search(&topic.name, RAG_TOP_K).await.join("\n\n"),
            None => String::new(),
        };

        let mut user_prompt = format!(
            "Topic: {topic_path}\nDescription: {}",
            topic.description
        );
        if !rag_context.is_empty() {
            user_prompt.push_str(&format!("\n\nReference Material:\n{rag_context}"));
        }
        user_prompt.push_str(
            "\n\nProvide a detailed explanation in JSON format:\n{\n  \"explanation\": \"Detailed explanation text\",\n  \"key_concepts\": [\"concept1\", \"concept2\", ...],\n  \"examples\": [\"example1\", \"example2\", ...]\n}\n\nReturn ONLY the JSON object, no additional text.",
        );

        let response = self
            .llm
            .chat(
                &[ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user_prompt)],
                EXPLANATION_TEMPERATURE,
                None,
            )
            .await?;

        let related_questions = find_related_questions(&topic.name, exam_docs);

        match parse_payload(&response) {
            Some(payload) => Ok(Explanation {
                topic_name: topic_path.to_string(),
                explanation: payload.explanation,
                examples: payload.examples,
                key_concepts: payload.key_concepts,
                related_questions,
            }),
            None => {
                log::warn!("Failed to parse explanation JSON for {}, keeping raw text", topic.name);
                Ok(Explanation {
                    topic_name: topic_path.to_string(),
                    explanation: response,
                    examples: Vec::new(),
                    key_concepts: Vec::new(),
                    related_questions,
                })
            }
        }
    }
}

fn parse_payload(response: &str) -> Option<ExplanationPayload> {
    let payload = extract_json_object(response)?;
    serde_json::from_str(payload).ok()
}

/// Mine exam questions related to a topic by keyword match.
///
/// Documents are split into blank-line-delimited blocks; a block counts
/// as related when any whitespace-separated word of the topic name appears
/// in it (case-insensitive). At most [`MAX_RELATED_QUESTIONS`] are kept.
fn find_related_questions(topic_name: &str, exam_docs: &[Document]) -> Vec<ExampleQuestion> {
    let keywords: Vec<String> = topic_name
        .to_lowercase()
        .split_whitespace()
        .map(ToString::to_string)
        .collect();
    if keywords.is_empty() {
        return Vec::new();
    }

    let mut questions = Vec::new();
    'outer: for doc in exam_docs {
        let mut current: Vec<&str> = Vec::new();
        for line in doc.text.lines().chain(std::iter::once("")) {
            let line = line.trim();
            if line.is_empty() {
                if !current.is_empty() {
                    let block = current.join(" ");
                    let lowered = block.to_lowercase();
                    if keywords.iter().any(|keyword| lowered.contains(keyword)) {
                        questions.push(ExampleQuestion {
                            question: block,
                            source_file: doc.filename.clone(),
                            page_number: None,
                        });
                        if questions.len() == MAX_RELATED_QUESTIONS {
                            break 'outer;
                        }
                    }
                    current.clear();
                }
            } else {
                current.push(line);
            }
        }
    }

    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(filename: &str, text: &str) -> Document {
        Document::new(filename, text, 1)
    }

    #[test]
    fn related_questions_match_topic_keywords() {
        let docs = vec![doc(
            "midterm.pdf",
            "Q1: State the chain rule\nand prove it.\n\nQ2: Compute the determinant.\n\nQ3: Apply the chain rule to f(g(x)).",
        )];

        let questions = find_related_questions("Chain Rule", &docs);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question, "Q1: State the chain rule and prove it.");
        assert_eq!(questions[0].source_file, "midterm.pdf");
        assert_eq!(questions[1].question, "Q3: Apply the chain rule to f(g(x)).");
    }

    #[test]
    fn matching_is_case_insensitive_per_keyword() {
        let docs = vec![doc("final.pdf", "Discuss ENTROPY in closed systems.")];
        let questions = find_related_questions("entropy", &docs);
        assert_eq!(questions.len(), 1);
    }

    #[test]
    fn related_questions_are_capped() {
        let text = (0..10)
            .map(|i| format!("Q{i}: integral of x^{i}"))
            .collect::<Vec<_>>()
            .join("\n\n");
        let docs = vec![doc("exam.pdf", &text)];
        let questions = find_related_questions("integral", &docs);
        assert_eq!(questions.len(), MAX_RELATED_QUESTIONS);
    }

    #[test]
    fn unrelated_documents_yield_nothing() {
        let docs = vec![doc("exam.pdf", "Q1: Balance the chemical equation.")];
        assert!(find_related_questions("Fourier transform", &docs).is_empty());
    }

    #[test]
    fn payload_parses_from_prose_wrapped_response() {
        let response = "Here is the explanation:\n{\"explanation\":\"Limits describe...\",\"key_concepts\":[\"epsilon-delta\"],\"examples\":[\"speedometer\"]}";
        let payload = parse_payload(response).unwrap();
        assert_eq!(payload.explanation, "Limits describe...");
        assert_eq!(payload.key_concepts, vec!["epsilon-delta".to_string()]);
    }

    #[test]
    fn unparseable_payload_is_none() {
        assert!(parse_payload("no braces at all").is_none());
    }
}

use crate::error::{snippet, GuideError, Result};
use crate::json_extract::extract_json_array;
use crate::model::Topic;
use examscope_extract::Document;
use examscope_llm::{ChatMessage, LlmClient};

const SYSTEM_PROMPT: &str = "You are an expert academic analyst. Your task is to analyze university exam questions and extract a comprehensive, hierarchical list of all topics and concepts covered.

For each topic:
1. Identify the main topic area
2. Break it down into relevant subtopics
3. Provide a brief description of what each topic covers

Return your response as a JSON array of topics with this structure:
[
  {
    \"name\": \"Topic Name\",
    \"description\": \"Brief description of the topic\",
    \"level\": 0,
    \"subtopics\": [
      {
        \"name\": \"Subtopic Name\",
        \"description\": \"Brief description\",
        \"level\": 1,
        \"subtopics\": []
      }
    ]
  }
]

Be thorough and comprehensive. Include all concepts, theories, methods, and techniques mentioned or implied by the exam questions.";

/// Lower temperature keeps the outline structure consistent across runs.
const TOPIC_TEMPERATURE: f32 = 0.3;

/// Extracts a hierarchical topic outline from exam documents
pub struct TopicAnalyzer<'a> {
    llm: &'a LlmClient,
}

impl<'a> TopicAnalyzer<'a> {
    pub fn new(llm: &'a LlmClient) -> Self {
        Self { llm }
    }

    /// Ask the LLM for the topic outline covering all exam documents
    pub async fn analyze_exams(&self, exam_docs: &[Document]) -> Result<Vec<Topic>> {
        log::info!("Analyzing {} exam(s) to extract topics", exam_docs.len());

        let combined = combine_exam_texts(exam_docs);
        let user_prompt = format!(
            "Analyze the following exam questions and extract all topics in a hierarchical structure:\n\n{combined}\n\nReturn ONLY the JSON array, no additional text."
        );

        let response = self
            .llm
            .chat(
                &[ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user_prompt)],
                TOPIC_TEMPERATURE,
                None,
            )
            .await?;

        let topics = parse_topics(&response)?;
        log::info!("Extracted {} main topics", topics.len());
        Ok(topics)
    }
}

fn combine_exam_texts(exam_docs: &[Document]) -> String {
    exam_docs
        .iter()
        .map(|doc| format!("EXAM: {}\n{}", doc.filename, doc.text))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

fn parse_topics(response: &str) -> Result<Vec<Topic>> {
    let payload = extract_json_array(response).ok_or_else(|| GuideError::JsonMissing {
        expected: "array",
        snippet: snippet(response),
    })?;

    serde_json::from_str(payload).map_err(|e| GuideError::JsonParse {
        expected: "topic array",
        reason: e.to_string(),
        snippet: snippet(response),
    })
}

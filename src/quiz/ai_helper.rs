use async_trait::async_trait;
use chatgpt::client::ChatGPT;
use chatgpt::types::CompletionResponse;

use crate::quiz::provider::{ProviderError, QuestionProvider};
use crate::quiz::{Difficulty, QuizQuestion, Subject, QUESTIONS_PER_QUIZ};

/// Question provider backed by the ChatGPT completion API.
///
/// Built without a client when no API key is configured; every call then
/// reports the provider as unavailable and the quiz falls back locally.
pub struct QuizHelper {
    chat_gpt: Option<ChatGPT>,
}

#[derive(Debug, serde::Deserialize)]
struct GenerateQuestionsResponse {
    #[serde(default)]
    questions: Vec<QuizQuestion>,
}

impl QuizHelper {
    pub fn new(chat_gpt: Option<ChatGPT>) -> Self {
        Self { chat_gpt }
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let chat_gpt = self
            .chat_gpt
            .as_ref()
            .ok_or_else(|| ProviderError::Unavailable("no API key configured".to_string()))?;

        log::debug!("Prompt: {:?}", prompt);
        let response: CompletionResponse = chat_gpt.send_message(prompt).await?;
        let content = response.message().content.clone();
        log::debug!("Completion: {:?}", content);

        Ok(content)
    }
}

#[async_trait]
impl QuestionProvider for QuizHelper {
    async fn fetch_questions(
        &self,
        subject: Subject,
        difficulty: Difficulty,
        topic: Option<&str>,
    ) -> Result<Vec<QuizQuestion>, ProviderError> {
        log::info!(
            "Generating questions: {} / {} / {}",
            subject,
            difficulty,
            topic.unwrap_or("mixed")
        );
        let content = self
            .complete(&questions_prompt(subject, difficulty, topic))
            .await?;
        parse_questions(&content)
    }

    async fn fetch_encouragement(
        &self,
        is_correct: bool,
        subject: Subject,
    ) -> Result<String, ProviderError> {
        let content = self
            .complete(&encouragement_prompt(is_correct, subject))
            .await?;
        Ok(encouragement_or_default(&content, is_correct))
    }
}

/// A blank completion is a success with nothing to say; fill in a cheer.
fn encouragement_or_default(content: &str, is_correct: bool) -> String {
    let content = content.trim();
    if !content.is_empty() {
        return content.to_string();
    }
    if is_correct { "Awesome job!" } else { "Keep trying!" }.to_string()
}

fn questions_prompt(subject: Subject, difficulty: Difficulty, topic: Option<&str>) -> String {
    let topic_line = topic
        .map(|topic| format!("Specific Topic: {}\n", topic))
        .unwrap_or_default();

    format!(
        "Create a fun, engaging, and educational quiz for children.
Subject: {subject}
Difficulty Level: {difficulty}
{topic_line}
Generate {count} multiple-choice questions.
The tone should be encouraging and playful.
Ensure the 'options' array contains 4 distinct choices, one of which is exactly the 'correctAnswer'.
The 'explanation' should be a short, fun fact explaining why the answer is correct, suitable for a child.
The 'hint' should be a helpful nudge without giving the answer away.

Reply with JSON only, in exactly this shape:
{{\"questions\": [{{\"id\": string, \"questionText\": string, \"options\": [string, string, string, string], \"correctAnswer\": string, \"explanation\": string, \"hint\": string}}]}}",
        subject = subject,
        difficulty = difficulty,
        topic_line = topic_line,
        count = QUESTIONS_PER_QUIZ,
    )
}

fn encouragement_prompt(is_correct: bool, subject: Subject) -> String {
    if is_correct {
        format!(
            "Write a short, super enthusiastic 1-sentence celebration for a child who just got a {} question right!",
            subject
        )
    } else {
        format!(
            "Write a short, kind, and encouraging 1-sentence message for a child who got a {} question wrong, telling them it's okay to make mistakes.",
            subject
        )
    }
}

/// Parses a `{"questions": [...]}` reply. Models like to wrap JSON in a
/// Markdown fence, so one is stripped if present.
fn parse_questions(content: &str) -> Result<Vec<QuizQuestion>, ProviderError> {
    let body = strip_code_fence(content);
    if body.is_empty() {
        return Ok(Vec::new());
    }
    let response: GenerateQuestionsResponse = serde_json::from_str(body)?;
    Ok(response.questions)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_end();
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    // Drop the info string ("json") on the opening line, if any.
    let body = match rest.split_once('\n') {
        Some((info, body)) if !info.trim_start().starts_with(['{', '[']) => body,
        _ => {
            let rest = rest.trim_start();
            rest.strip_prefix("json").unwrap_or(rest)
        }
    };
    body.trim()
}

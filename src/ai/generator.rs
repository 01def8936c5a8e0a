use crate::ai::client::{CompletionRequest, LlmProvider};
use crate::ai::prompts::{
    clarification_prompt, quiz_prompt, quiz_schema, summary_prompt, ClarificationContext,
    GenerationOptions, QUIZ_SYSTEM, SUMMARY_SYSTEM, TUTOR_SYSTEM,
};
use crate::error::GenerationError;
use crate::models::{DifficultyLevel, Question, QuestionKind, OPTION_COUNT};
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const CLARIFICATION_FALLBACK: &str =
    "I'm sorry, I couldn't generate a clarification at this time.";
pub const SUMMARY_FALLBACK: &str = "Could not generate summary.";

/// Strip markdown fences around a JSON reply.
fn clean_json_response(response: &str) -> String {
    let cleaned = response.trim();

    if cleaned.starts_with("```") {
        let lines: Vec<&str> = cleaned.lines().collect();
        if lines.len() > 2 {
            return lines[1..lines.len() - 1].join("\n").trim().to_string();
        }
    }

    cleaned.to_string()
}

/// Parse the reply as a JSON array, falling back to each `[` that starts an
/// array running to the last `]` when prose surrounds it.
fn extract_json_array<T: DeserializeOwned>(cleaned: &str) -> Result<Vec<T>, serde_json::Error> {
    let first_error = match serde_json::from_str(cleaned) {
        Ok(items) => return Ok(items),
        Err(e) => e,
    };
    let Some(end) = cleaned.rfind(']') else {
        return Err(first_error);
    };
    cleaned
        .match_indices('[')
        .take_while(|(start, _)| *start < end)
        .find_map(|(start, _)| serde_json::from_str(&cleaned[start..=end]).ok())
        .ok_or(first_error)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    question: String,
    options: Vec<String>,
    correct_answer_index: i64,
    explanation: String,
    #[serde(default)]
    code_example: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<QuestionKind>,
}

impl RawQuestion {
    fn into_question(self, index: usize) -> Result<Question, GenerationError> {
        let invalid = |reason: String| GenerationError::InvalidQuestion { index, reason };

        if self.question.trim().is_empty() {
            return Err(invalid("question text is empty".to_string()));
        }
        let options: [String; OPTION_COUNT] = self.options.try_into().map_err(|o: Vec<String>| {
            invalid(format!("expected {} options, got {}", OPTION_COUNT, o.len()))
        })?;
        let correct_answer_index = usize::try_from(self.correct_answer_index)
            .ok()
            .filter(|i| *i < OPTION_COUNT)
            .ok_or_else(|| {
                invalid(format!(
                    "correctAnswerIndex {} is out of range",
                    self.correct_answer_index
                ))
            })?;
        let code_example = self.code_example.filter(|c| !c.trim().is_empty());

        Ok(Question {
            id: format!("q-{}", index),
            question: self.question,
            options,
            correct_answer_index,
            explanation: self.explanation,
            code_example,
            kind: self.kind,
        })
    }
}

/// Parse a raw quiz reply into questions with sequential ids.
pub fn parse_quiz_response(response: &str) -> Result<Vec<Question>, GenerationError> {
    if response.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let cleaned = clean_json_response(response);
    let raw: Vec<RawQuestion> = extract_json_array(&cleaned)?;
    if raw.is_empty() {
        return Err(GenerationError::NoQuestions);
    }

    raw.into_iter()
        .enumerate()
        .map(|(index, q)| q.into_question(index))
        .collect()
}

/// Ask the model for `count` questions about `source_text`.
pub async fn generate_quiz<P: LlmProvider + ?Sized>(
    provider: &P,
    source_text: &str,
    difficulty: DifficultyLevel,
    count: usize,
    options: GenerationOptions,
) -> Result<Vec<Question>, GenerationError> {
    tracing::info!(difficulty = difficulty.label(), count, "generating quiz");
    let request = CompletionRequest {
        system: QUIZ_SYSTEM.to_string(),
        prompt: quiz_prompt(source_text, difficulty, count, options),
        response_schema: Some(quiz_schema(count, options)),
    };

    let response = provider.complete(&request).await?;
    let questions = parse_quiz_response(&response).inspect_err(|e| {
        tracing::error!(error = %e, raw_len = response.len(), "quiz reply rejected");
    })?;

    if questions.len() != count {
        tracing::warn!(
            requested = count,
            received = questions.len(),
            "model returned a different number of questions"
        );
    }
    Ok(questions)
}

/// Ask the tutor a follow-up question about one quiz question.
pub async fn get_clarification<P: LlmProvider + ?Sized>(
    provider: &P,
    question: &Question,
    user_query: &str,
    context: &ClarificationContext,
) -> Result<String, GenerationError> {
    tracing::info!(question_id = %question.id, "requesting clarification");
    let request = CompletionRequest {
        system: TUTOR_SYSTEM.to_string(),
        prompt: clarification_prompt(question, user_query, context),
        response_schema: None,
    };

    let response = provider.complete(&request).await?;
    Ok(non_empty_or(response, CLARIFICATION_FALLBACK))
}

/// Build the markdown study guide for a finished session.
pub async fn generate_summary<P: LlmProvider + ?Sized>(
    provider: &P,
    questions: &[Question],
    difficulty: DifficultyLevel,
) -> Result<String, GenerationError> {
    tracing::info!(questions = questions.len(), "requesting summary");
    let request = CompletionRequest {
        system: SUMMARY_SYSTEM.to_string(),
        prompt: summary_prompt(questions, difficulty),
        response_schema: None,
    };

    let response = provider.complete(&request).await?;
    Ok(non_empty_or(response, SUMMARY_FALLBACK))
}

fn non_empty_or(response: String, fallback: &str) -> String {
    if response.trim().is_empty() {
        fallback.to_string()
    } else {
        response
    }
}

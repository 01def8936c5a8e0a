//! Prompt templates for the three model exchanges.

use crate::models::{ConfidenceLevel, DifficultyLevel, Question, OPTION_COUNT};
use serde_json::{json, Value};

pub const QUIZ_SYSTEM: &str =
    "You are a senior technical interviewer writing multiple-choice questions. Respond ONLY with valid JSON.";
pub const TUTOR_SYSTEM: &str =
    "You are a patient technical interview coach. Guide the student Socratically and use markdown for code.";
pub const SUMMARY_SYSTEM: &str =
    "You write concise, well-structured study guides in Markdown for engineers preparing for interviews.";

/// Switches that shape the quiz prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Ask the model to tag each question as `logic` or `conceptual`.
    pub tag_question_kind: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            tag_question_kind: true,
        }
    }
}

/// What the tutor should know about the learner's session.
#[derive(Debug, Clone, PartialEq)]
pub struct ClarificationContext {
    pub difficulty: DifficultyLevel,
    pub topics: Vec<String>,
    pub answered_correctly: bool,
    pub chosen_option: Option<String>,
    pub confidence: Option<ConfidenceLevel>,
    pub score: usize,
    pub total: usize,
}

/// JSON schema for the quiz reply: an array of question objects.
pub fn quiz_schema(count: usize, options: GenerationOptions) -> Value {
    let mut properties = json!({
        "question": { "type": "string" },
        "options": {
            "type": "array",
            "items": { "type": "string" },
            "minItems": OPTION_COUNT,
            "maxItems": OPTION_COUNT
        },
        "correctAnswerIndex": {
            "type": "integer",
            "minimum": 0,
            "maximum": OPTION_COUNT - 1
        },
        "explanation": { "type": "string" },
        "codeExample": { "type": "string" }
    });
    let mut required = vec!["question", "options", "correctAnswerIndex", "explanation"];
    if options.tag_question_kind {
        properties["type"] = json!({ "type": "string", "enum": ["logic", "conceptual"] });
        required.push("type");
    }

    json!({
        "type": "array",
        "minItems": count,
        "maxItems": count,
        "items": {
            "type": "object",
            "properties": properties,
            "required": required
        }
    })
}

pub fn difficulty_guidance(difficulty: DifficultyLevel) -> &'static str {
    match difficulty {
        DifficultyLevel::Junior => {
            "Focus on foundational concepts, standard syntax, and basic problem-solving expected of a Junior Developer."
        }
        DifficultyLevel::Medium => {
            "Focus on design patterns, intermediate concepts, performance considerations, and industry practices."
        }
        DifficultyLevel::Senior => {
            "Focus on high-level architecture, scalability, complex edge cases, and advanced optimization."
        }
    }
}

pub fn quiz_prompt(
    source_text: &str,
    difficulty: DifficultyLevel,
    count: usize,
    options: GenerationOptions,
) -> String {
    let type_field = if options.tag_question_kind {
        ",\n        \"type\": \"logic\" | \"conceptual\""
    } else {
        ""
    };
    let type_rule = if options.tag_question_kind {
        "\n5. Classify each question with \"type\": \"logic\" when it requires reasoning about code or behaviour, \"conceptual\" when it tests definitions or theory."
    } else {
        ""
    };

    format!(
        r#"Based on the following technical study material, generate a technical interview quiz.

Material:
{source_text}

Target Difficulty: {difficulty}
Guidance: {guidance}

Requirements:
1. Generate exactly {count} multiple-choice questions.
2. Every question has exactly {OPTION_COUNT} options and exactly one correct option.
3. "correctAnswerIndex" is the 0-based index of the correct option (0 to {max_index}).
4. Provide a detailed explanation, and a Markdown-fenced code example in "codeExample" when it helps (use an empty string otherwise).{type_rule}

Respond ONLY with a JSON array (no markdown, no extra text) of objects shaped like:
[
    {{
        "question": string,
        "options": [string, string, string, string],
        "correctAnswerIndex": integer,
        "explanation": string,
        "codeExample": string{type_field}
    }}
]
"#,
        difficulty = difficulty.label(),
        guidance = difficulty_guidance(difficulty),
        max_index = OPTION_COUNT - 1,
    )
}

pub fn clarification_prompt(
    question: &Question,
    user_query: &str,
    context: &ClarificationContext,
) -> String {
    let outcome = if context.answered_correctly {
        "answered this question correctly"
    } else {
        "answered this question incorrectly"
    };
    let chosen = context.chosen_option.as_deref().unwrap_or("(no answer)");
    let confidence = context
        .confidence
        .map(|c| c.label())
        .unwrap_or("not recorded");
    let topics = if context.topics.is_empty() {
        "(none)".to_string()
    } else {
        context
            .topics
            .iter()
            .map(|t| format!("- {}", t))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"A student is reviewing a quiz question and needs further clarification.

Session:
- Level: {difficulty}
- Running score: {score}/{total}
- Topics covered in this quiz:
{topics}

Question: {question}
Correct Answer: {correct}
Original Explanation: {explanation}

The student {outcome}. They chose: {chosen}. Stated confidence: {confidence}.

Student's specific question: "{user_query}"

Task: Respond Socratically. Start from what the student seems to believe, point out the step where their reasoning breaks (or confirm why it holds), then explain the concept clearly. Use markdown for any code snippets and stay focused on the technical concept behind their question."#,
        difficulty = context.difficulty.label(),
        score = context.score,
        total = context.total,
        question = question.question,
        correct = question.correct_option(),
        explanation = question.explanation,
    )
}

pub fn summary_prompt(questions: &[Question], difficulty: DifficultyLevel) -> String {
    let context = questions
        .iter()
        .map(|q| format!("Concept: {}\nKey Detail: {}", q.question, q.explanation))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"Based on the following quiz topics and explanations, create a study guide in Markdown format.

Target Level: {difficulty}

Content Context:
{context}

Requirements:
1. Start with a title like "# Interview Mastery Guide: [Topics Name]".
2. Use clear Markdown headings (##, ###) and organize concepts logically.
3. For each topic provide:
   - **Mental hook**: a memorable one-line analogy.
   - **Recall cue**: a short trigger phrase to remember it under pressure.
   - **Senior usage note**: how an experienced engineer applies or discusses it.
4. End with one merged code example that ties the overall patterns of the quiz together.
5. Keep it professional, concise, and scannable."#,
        difficulty = difficulty.label(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_question;

    #[test]
    fn test_quiz_prompt_embeds_material_and_constraints() {
        let prompt = quiz_prompt(
            "Closures capture their environment.",
            DifficultyLevel::Senior,
            5,
            GenerationOptions::default(),
        );
        assert!(prompt.contains("Closures capture their environment."));
        assert!(prompt.contains("Senior Developer"));
        assert!(prompt.contains(difficulty_guidance(DifficultyLevel::Senior)));
        assert!(prompt.contains("exactly 5 multiple-choice questions"));
        assert!(prompt.contains("exactly 4 options"));
        assert!(prompt.contains("\"type\""));
    }

    #[test]
    fn test_quiz_schema_shape() {
        let schema = quiz_schema(5, GenerationOptions::default());
        assert_eq!(schema["type"], "array");
        assert_eq!(schema["minItems"], 5);
        assert_eq!(schema["maxItems"], 5);
        let item = &schema["items"];
        assert_eq!(item["properties"]["options"]["minItems"], 4);
        assert_eq!(item["properties"]["correctAnswerIndex"]["maximum"], 3);
        assert_eq!(item["properties"]["type"]["enum"][1], "conceptual");
        assert!(item["required"].as_array().unwrap().contains(&json!("type")));
    }

    #[test]
    fn test_quiz_schema_without_kind_tagging() {
        let schema = quiz_schema(
            3,
            GenerationOptions {
                tag_question_kind: false,
            },
        );
        assert!(schema["items"]["properties"].get("type").is_none());
        assert!(!schema["items"]["required"]
            .as_array()
            .unwrap()
            .contains(&json!("type")));
    }

    #[test]
    fn test_quiz_prompt_without_kind_tagging() {
        let prompt = quiz_prompt(
            "notes",
            DifficultyLevel::Junior,
            10,
            GenerationOptions {
                tag_question_kind: false,
            },
        );
        assert!(!prompt.contains("\"type\""));
        assert!(prompt.contains("\"codeExample\""));
    }

    #[test]
    fn test_clarification_prompt_includes_session_context() {
        let question = sample_question(0, 1);
        let context = ClarificationContext {
            difficulty: DifficultyLevel::Medium,
            topics: vec!["Question 1?".to_string(), "Question 2?".to_string()],
            answered_correctly: false,
            chosen_option: Some("Option A".to_string()),
            confidence: Some(ConfidenceLevel::High),
            score: 1,
            total: 2,
        };
        let prompt = clarification_prompt(&question, "Why not A?", &context);
        assert!(prompt.contains("Correct Answer: Option B"));
        assert!(prompt.contains("answered this question incorrectly"));
        assert!(prompt.contains("They chose: Option A"));
        assert!(prompt.contains("Stated confidence: high"));
        assert!(prompt.contains("Running score: 1/2"));
        assert!(prompt.contains("- Question 2?"));
        assert!(prompt.contains("\"Why not A?\""));
    }

    #[test]
    fn test_summary_prompt_lists_every_question() {
        let questions = vec![sample_question(0, 0), sample_question(1, 1)];
        let prompt = summary_prompt(&questions, DifficultyLevel::Junior);
        assert!(prompt.contains("Concept: Question 1?\nKey Detail: Because of reason 1."));
        assert!(prompt.contains("Concept: Question 2?"));
        assert!(prompt.contains("Mental hook"));
        assert!(prompt.contains("Recall cue"));
        assert!(prompt.contains("Senior usage note"));
    }
}

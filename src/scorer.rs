use log::{info, warn};
use serde_json::Value;

use crate::gemini::GeminiClient;
use crate::models::Evaluation;

/// Scores candidate answers. Delegates to Gemini when a key is configured;
/// otherwise, or on any evaluator problem, degrades to a deterministic
/// word-count heuristic. Never fails.
pub struct AnswerScorer {
    client: Option<GeminiClient>,
}

impl AnswerScorer {
    pub fn new(api_key: Option<String>) -> Self {
        match api_key {
            Some(key) => {
                info!("Gemini evaluator initialized successfully");
                Self {
                    client: Some(GeminiClient::new(key)),
                }
            }
            None => {
                warn!("Gemini evaluator not available - using fallback evaluation");
                Self { client: None }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    pub async fn evaluate(
        &self,
        question: &str,
        answer: &str,
        expected_answer: &str,
        category: &str,
    ) -> Evaluation {
        let Some(client) = &self.client else {
            return fallback_evaluation(answer);
        };

        let prompt = build_evaluation_prompt(question, answer, expected_answer, category);
        match client.generate_content(&prompt).await {
            Ok(raw) => match parse_evaluation(&raw) {
                Some(evaluation) => {
                    info!("Successfully parsed evaluation: score {}/5", evaluation.score);
                    evaluation
                }
                None => {
                    warn!("No valid JSON in evaluator response: {:.200}", raw);
                    fallback_evaluation(answer)
                }
            },
            Err(e) => {
                warn!("Evaluator call failed: {}", e);
                fallback_evaluation(answer)
            }
        }
    }
}

fn build_evaluation_prompt(
    question: &str,
    answer: &str,
    expected_answer: &str,
    category: &str,
) -> String {
    format!(
        r#"You are an Excel skills interviewer. Evaluate this candidate's answer.

Question: {question}
Category: {category}
Candidate's Answer: {answer}
Expected Answer: {expected_answer}

IMPORTANT: Respond ONLY with valid JSON in exactly this format:

{{
    "score": <number from 1 to 5>,
    "feedback": "<brief 2-3 sentence evaluation>",
    "strengths": ["<strength1>", "<strength2>"],
    "improvements": ["<improvement1>", "<improvement2>"]
}}

Rules:
- Score must be 1, 2, 3, 4, or 5 only
- Feedback must be 2-3 sentences maximum
- Strengths: 0-3 items (more for higher scores)
- Improvements: 1-3 items
- Return ONLY the JSON object, no other text

Example response:
{{
    "score": 4,
    "feedback": "Good understanding of Excel functions with correct syntax. Could benefit from explaining the rationale behind the approach.",
    "strengths": ["Correct function usage", "Proper syntax"],
    "improvements": ["Explain reasoning", "Consider alternative approaches"]
}}"#
    )
}

/// Extracts the first top-level JSON object span from the raw response,
/// tolerating leading/trailing commentary, and coerces the fields into a
/// well-formed evaluation. `None` when no parseable JSON object exists.
fn parse_evaluation(raw: &str) -> Option<Evaluation> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }

    let value: Value = serde_json::from_str(&raw[start..=end]).ok()?;

    let score = value
        .get("score")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or(3)
        .clamp(1, 5) as u8;

    let feedback = value
        .get("feedback")
        .and_then(Value::as_str)
        .unwrap_or("Good effort on your answer.")
        .to_string();

    let strengths = string_list(value.get("strengths")).unwrap_or_default();
    let improvements = string_list(value.get("improvements"))
        .unwrap_or_else(|| vec!["Continue practicing Excel skills".to_string()]);

    Some(Evaluation {
        score,
        feedback,
        strengths,
        improvements,
    })
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect(),
    )
}

/// Deterministic evaluation from the answer's word count.
pub fn fallback_evaluation(answer: &str) -> Evaluation {
    let words = answer.split_whitespace().count();

    let (score, feedback) = match words {
        0 => (1, "No answer provided."),
        1..=4 => (2, "Brief answer provided but lacks detail."),
        5..=14 => (3, "Reasonable answer with some relevant information."),
        15..=29 => (4, "Good detailed answer with relevant explanations."),
        _ => (5, "Comprehensive answer with thorough explanations."),
    };

    Evaluation {
        score,
        feedback: feedback.to_string(),
        strengths: if score >= 3 {
            vec!["Clear communication".to_string()]
        } else {
            Vec::new()
        },
        improvements: vec![
            "Provide more specific examples".to_string(),
            "Explain reasoning in more detail".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer_of(words: usize) -> String {
        vec!["word"; words].join(" ")
    }

    #[test]
    fn fallback_word_count_brackets() {
        let cases = [(0, 1), (3, 2), (10, 3), (20, 4), (40, 5)];
        for (words, expected) in cases {
            let evaluation = fallback_evaluation(&answer_of(words));
            assert_eq!(evaluation.score, expected, "{} words", words);
        }
    }

    #[test]
    fn fallback_strengths_depend_on_score() {
        assert!(fallback_evaluation(&answer_of(2)).strengths.is_empty());
        assert_eq!(
            fallback_evaluation(&answer_of(10)).strengths,
            vec!["Clear communication".to_string()]
        );
        assert_eq!(fallback_evaluation("").improvements.len(), 2);
    }

    #[test]
    fn fallback_is_deterministic() {
        let a = fallback_evaluation(&answer_of(20));
        let b = fallback_evaluation(&answer_of(20));
        assert_eq!(a.score, b.score);
        assert_eq!(a.feedback, b.feedback);
    }

    #[test]
    fn parse_tolerates_surrounding_commentary() {
        let raw = r#"Sure! Here is my evaluation:
{"score": 4, "feedback": "Solid answer.", "strengths": ["Correct syntax"], "improvements": ["Add examples"]}
Hope this helps."#;
        let evaluation = parse_evaluation(raw).unwrap();
        assert_eq!(evaluation.score, 4);
        assert_eq!(evaluation.feedback, "Solid answer.");
        assert_eq!(evaluation.strengths, vec!["Correct syntax".to_string()]);
    }

    #[test]
    fn parse_clamps_and_defaults() {
        let evaluation = parse_evaluation(r#"{"score": 9}"#).unwrap();
        assert_eq!(evaluation.score, 5);
        assert_eq!(evaluation.feedback, "Good effort on your answer.");
        assert!(evaluation.strengths.is_empty());
        assert_eq!(
            evaluation.improvements,
            vec!["Continue practicing Excel skills".to_string()]
        );

        assert_eq!(parse_evaluation(r#"{"score": -2}"#).unwrap().score, 1);
        assert_eq!(parse_evaluation(r#"{"score": 3.7}"#).unwrap().score, 3);
        // Non-numeric score coerces to the middle of the range.
        assert_eq!(parse_evaluation(r#"{"score": "high"}"#).unwrap().score, 3);
    }

    #[test]
    fn parse_rejects_non_json() {
        assert!(parse_evaluation("I would rate this a 4 out of 5.").is_none());
        assert!(parse_evaluation("").is_none());
        assert!(parse_evaluation("} backwards {").is_none());
    }

    #[test]
    fn parse_ignores_non_list_collections() {
        let evaluation =
            parse_evaluation(r#"{"score": 2, "strengths": "none", "improvements": 5}"#).unwrap();
        assert!(evaluation.strengths.is_empty());
        assert_eq!(
            evaluation.improvements,
            vec!["Continue practicing Excel skills".to_string()]
        );
    }

    #[tokio::test]
    async fn unconfigured_scorer_uses_fallback() {
        let scorer = AnswerScorer::new(None);
        assert!(!scorer.is_available());

        let evaluation = scorer
            .evaluate("What is SUM?", &answer_of(20), "Adds values.", "Basic Formulas")
            .await;
        assert_eq!(evaluation.score, 4);
    }
}

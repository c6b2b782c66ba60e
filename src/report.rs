use log::{info, warn};

use crate::gemini::GeminiClient;
use crate::models::{Interview, QuestionRecord};

/// Composes the final interview report. Delegates to Gemini when available;
/// otherwise, or on any failure, falls back to a deterministic template.
/// Never fails: a report call always returns some text.
pub struct ReportGenerator {
    client: Option<GeminiClient>,
}

impl ReportGenerator {
    pub fn new(api_key: Option<String>) -> Self {
        match api_key {
            Some(key) => Self {
                client: Some(GeminiClient::new(key)),
            },
            None => {
                warn!("Gemini not available - using templated reports");
                Self { client: None }
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    pub async fn generate(&self, interview: &Interview, questions: &[QuestionRecord]) -> String {
        if let Some(client) = &self.client {
            let prompt = build_report_prompt(interview, questions);
            match client.generate_content(&prompt).await {
                Ok(text) => {
                    info!("Generated narrative report for session {}", interview.session_id);
                    return text;
                }
                Err(e) => warn!("Report generation failed: {}", e),
            }
        }
        fallback_report(interview)
    }
}

fn build_report_prompt(interview: &Interview, questions: &[QuestionRecord]) -> String {
    let question_summaries: Vec<String> = questions
        .iter()
        .map(|q| {
            format!(
                "Q: {}\nA: {}\nScore: {}/5",
                q.text,
                q.user_answer.as_deref().unwrap_or("No answer"),
                q.score.unwrap_or(0)
            )
        })
        .collect();

    format!(
        r#"Generate a professional interview report for an Excel skills assessment:

Candidate: {}
Experience Level: {}
Total Questions: {}
Average Score: {:.1}/5

Questions and Answers:
{}

Create a comprehensive report with:
1. Overall performance summary
2. Key strengths demonstrated
3. Areas needing improvement
4. Specific recommendations for skill development
5. Next steps for the candidate

Keep the report professional, constructive, and actionable."#,
        interview.user_name,
        interview.experience_level.as_str(),
        interview.total_questions,
        interview.average_score(),
        question_summaries.join("\n\n")
    )
}

/// Templated report used when no narrative capability is configured.
pub fn fallback_report(interview: &Interview) -> String {
    let avg_score = interview.average_score();

    let performance = if avg_score >= 4.0 {
        "Excellent"
    } else if avg_score >= 3.0 {
        "Good"
    } else if avg_score >= 2.0 {
        "Fair"
    } else {
        "Needs Improvement"
    };

    format!(
        r#"## Interview Report for {name}

**Overall Performance:** {performance} ({avg:.1}/5.0)
**Questions Completed:** {count}
**Experience Level:** {level}

### Summary
The candidate completed {count} questions with an average score of {avg:.1}/5.
This indicates {performance_lower} understanding of Excel concepts and skills.

### Recommendations
- Continue practicing Excel functions and formulas
- Focus on real-world applications of Excel skills
- Consider additional training in advanced Excel features

### Next Steps
- Review areas where scores were below 3/5
- Practice with hands-on Excel exercises
- Consider pursuing Excel certification"#,
        name = interview.user_name,
        performance = performance,
        performance_lower = performance.to_lowercase(),
        avg = avg_score,
        count = interview.total_questions,
        level = interview.experience_level.title(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExperienceLevel, InterviewStatus};
    use chrono::Utc;
    use std::collections::HashSet;

    fn completed_interview(final_score: f64) -> Interview {
        Interview {
            session_id: "s1".to_string(),
            user_name: "Priya".to_string(),
            experience_level: ExperienceLevel::Intermediate,
            status: InterviewStatus::Completed,
            total_questions: 10,
            total_score: final_score * 10.0,
            final_score: Some(final_score),
            current_difficulty: 4,
            started_at: Utc::now(),
            completed_at: Some(Utc::now()),
            used_entries: HashSet::new(),
        }
    }

    #[test]
    fn fallback_performance_buckets() {
        let cases = [
            (4.2, "Excellent"),
            (3.0, "Good"),
            (2.5, "Fair"),
            (1.4, "Needs Improvement"),
        ];
        for (score, expected) in cases {
            let report = fallback_report(&completed_interview(score));
            assert!(
                report.contains(expected),
                "score {} should map to {}",
                score,
                expected
            );
        }
    }

    #[test]
    fn fallback_interpolates_candidate_details() {
        let report = fallback_report(&completed_interview(3.5));
        assert!(report.contains("Interview Report for Priya"));
        assert!(report.contains("**Questions Completed:** 10"));
        assert!(report.contains("**Experience Level:** Intermediate"));
        assert!(report.contains("(3.5/5.0)"));
    }

    #[test]
    fn report_prompt_lists_every_question() {
        let interview = completed_interview(4.0);
        let questions = vec![
            QuestionRecord {
                id: "q1".to_string(),
                session_id: "s1".to_string(),
                number: 1,
                text: "What is SUM?".to_string(),
                category: "Basic Formulas".to_string(),
                difficulty: 1,
                expected_answer: "Adds values.".to_string(),
                user_answer: Some("It adds a range.".to_string()),
                score: Some(4),
                feedback: Some("Good.".to_string()),
            },
            QuestionRecord {
                id: "q2".to_string(),
                session_id: "s1".to_string(),
                number: 2,
                text: "Explain VLOOKUP.".to_string(),
                category: "Functions".to_string(),
                difficulty: 2,
                expected_answer: "Looks up values.".to_string(),
                user_answer: None,
                score: None,
                feedback: None,
            },
        ];

        let prompt = build_report_prompt(&interview, &questions);
        assert!(prompt.contains("Q: What is SUM?"));
        assert!(prompt.contains("A: It adds a range."));
        assert!(prompt.contains("Q: Explain VLOOKUP."));
        assert!(prompt.contains("A: No answer"));
        assert!(prompt.contains("Score: 0/5"));
    }

    #[tokio::test]
    async fn unconfigured_generator_returns_template() {
        let generator = ReportGenerator::new(None);
        assert!(!generator.is_available());

        let report = generator.generate(&completed_interview(4.0), &[]).await;
        assert!(report.contains("Excellent"));
    }
}

//! Interactive console runner for a full interview session. Useful for
//! exercising the pipeline end to end; without API keys configured it runs
//! entirely on the deterministic fallbacks.

use std::io::{self, BufRead, Write};

use excel_interviewer::api::{self, StartRequest, SubmitRequest};
use excel_interviewer::models::ExperienceLevel;
use excel_interviewer::ServiceState;

#[tokio::main]
async fn main() {
    env_logger::init();

    let state = ServiceState::from_env();
    let health = api::health(&state);
    println!("🎬 Excel AI Mock Interviewer");
    println!(
        "   evaluator: {}  transcription: {}",
        if health.services.llm { "Gemini" } else { "fallback" },
        if health.services.audio { "AssemblyAI" } else { "disabled" },
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let name = prompt(&mut lines, "Your name: ");
    let level = match prompt(&mut lines, "Experience level (beginner/intermediate/advanced): ")
        .to_lowercase()
        .as_str()
    {
        "intermediate" => ExperienceLevel::Intermediate,
        "advanced" => ExperienceLevel::Advanced,
        _ => ExperienceLevel::Beginner,
    };

    let started = match api::start_interview(
        &state,
        StartRequest {
            name: Some(name),
            experience: Some(level),
        },
    ) {
        Ok(response) => response,
        Err(e) => {
            eprintln!("Failed to start interview: {}", e);
            return;
        }
    };

    let session_id = started.session_id;
    let mut question = started.question;

    loop {
        println!("\n[{}] {}", question.category, question.text);
        let answer = prompt(&mut lines, "> ");

        let response = match api::submit_answer(
            &state,
            SubmitRequest {
                session_id: session_id.clone(),
                question_id: question.id.clone(),
                answer_text: answer,
                audio: None,
            },
        )
        .await
        {
            Ok(response) => response,
            Err(e) => {
                eprintln!("⚠️  {}", e);
                continue;
            }
        };

        println!(
            "Score: {}/5 - {}",
            response.evaluation.score, response.evaluation.feedback
        );

        if response.interview_complete {
            println!(
                "\n🏁 Interview complete! Final score: {:.1}/5 over {} questions",
                response.final_score.unwrap_or(0.0),
                response.total_questions.unwrap_or(0)
            );
            break;
        }
        question = response.next_question.expect("continuing interview has a next question");
    }

    match api::get_report(&state, &session_id).await {
        Ok(report) => println!("\n{}", report.report),
        Err(e) => eprintln!("Failed to generate report: {}", e),
    }
}

fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>, label: &str) -> String {
    print!("{}", label);
    let _ = io::stdout().flush();
    lines
        .next()
        .and_then(|line| line.ok())
        .unwrap_or_default()
        .trim()
        .to_string()
}

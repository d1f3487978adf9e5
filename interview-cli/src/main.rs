use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use interview_core::types::ExperienceLevel;
use interview_engine::controller::TurnOutcome;
use interview_engine::session::Session;
use interview_runtime::config_store::ConfigStore;
use interview_runtime::defaults::{apply_env_overrides, default_config_path, default_transcript_dir};
use interview_runtime::resume::load_resume_text;
use interview_runtime::runtime_engine::InterviewRuntime;
use interview_runtime::secrets::{SecretKey, set_secret};
use interview_runtime::transcript_store::TranscriptStore;

/// CLI wrapper for ExperienceLevel (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliLevel {
    #[default]
    Entry,
    Mid,
    Senior,
}

impl From<CliLevel> for ExperienceLevel {
    fn from(cli: CliLevel) -> Self {
        match cli {
            CliLevel::Entry => ExperienceLevel::Entry,
            CliLevel::Mid => ExperienceLevel::Mid,
            CliLevel::Senior => ExperienceLevel::Senior,
        }
    }
}

#[derive(Parser)]
#[command(name = "interview-cli")]
#[command(about = "Run a mock job interview in the terminal, then print a scored report")]
#[command(after_help = "During the interview type /end to finish and get feedback, or /quit to discard.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Job title to interview for
    #[arg(short, long, env = "INTERVIEW_ROLE", default_value = "Software Engineer")]
    role: String,

    /// Candidate experience level
    #[arg(short, long, env = "INTERVIEW_LEVEL", value_enum, default_value = "entry", ignore_case = true)]
    level: CliLevel,

    /// Plain-text resume used to target questions
    #[arg(long, env = "INTERVIEW_RESUME")]
    resume: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Read an API key from stdin and store it in the OS keyring
    SetKey,
}

fn set_key() -> anyhow::Result<()> {
    print!("API key: ");
    std::io::stdout().flush()?;
    let mut key = String::new();
    std::io::stdin().read_line(&mut key)?;
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("no key entered");
    }
    set_secret(SecretKey::LlmApiKey, key)?;
    println!("stored.");
    Ok(())
}

fn print_outcome(outcome: &TurnOutcome) {
    match outcome.tag {
        Some(tag) => println!("\nInterviewer [{}]: {}\n", tag.as_str(), outcome.utterance),
        None => println!("\nInterviewer: {}\n", outcome.utterance),
    }
    if let Some(a) = &outcome.assessment {
        log::debug!(
            "kind={:?} score={} words={} persona={:?}",
            outcome.kind,
            a.score,
            a.word_count,
            outcome.persona
        );
    }
}

async fn finish(runtime: &InterviewRuntime, session: &mut Session) -> anyhow::Result<()> {
    println!("\nInterviewer: {}\n", runtime.controller.end_interview(session));

    let report = runtime.evaluator.evaluate_session(session).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    let store = TranscriptStore::at_dir(default_transcript_dir());
    let path = store.save(&session.to_record())?;
    println!("\ntranscript saved to {}", path.display());

    let stats = runtime.controller.client().stats();
    log::info!(
        "requests: {} total, {} successful",
        stats.total_requests,
        stats.successful_requests
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Some(Command::SetKey) = cli.command {
        return set_key();
    }

    let mut cfg = ConfigStore::at_path(default_config_path()).load_or_default()?;
    apply_env_overrides(&mut cfg);

    let runtime = InterviewRuntime::from_config_with_stored_key(&cfg)?;
    let mut session = runtime
        .controller
        .new_session(&cli.role, cli.level.into());

    let resume = cli
        .resume
        .as_deref()
        .map(load_resume_text)
        .unwrap_or_default();
    let greeting = runtime
        .controller
        .start_interview(&mut session, Some(&resume))
        .await;
    println!("\nInterviewer: {greeting}\n");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        match line.trim() {
            "" => continue,
            "/end" => break,
            "/quit" => {
                println!("discarded session {}", session.id());
                return Ok(());
            }
            answer => {
                let outcome = runtime.controller.process_turn(&mut session, answer).await;
                print_outcome(&outcome);
            }
        }
    }

    finish(&runtime, &mut session).await
}

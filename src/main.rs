use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use log::debug;
use quiz_deck::config::Config;
use quiz_deck::driver::Pacer;
use quiz_deck::library;
use quiz_deck::quiz::handoff::consume_handoff;
use quiz_deck::quiz::{Phase, Question, Selection, Session, SessionEvent};
use quiz_deck::storage::{JsonFileStore, PathSource};
use tokio::io::{AsyncBufReadExt, BufReader};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a quiz document and add it to the store.
    Import { path: PathBuf },
    /// Show the stored quizzes.
    List {
        /// Only show quizzes filed under this folder.
        #[arg(long)]
        folder: Option<String>,
    },
    /// Queue a stored quiz for the next `play`.
    Select { id: String },
    /// Remove a stored quiz.
    Delete { id: String },
    /// Take a quiz from a document, or the one queued with `select`.
    Play {
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

/// What the input loop should do after a line was handled.
enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> HandlerResult {
    dotenv().ok();
    pretty_env_logger::init();

    let cli = Cli::parse();
    let store = JsonFileStore::new(&cli.config.store_path);
    debug!("Using store at {}", store.path().display());

    match cli.command {
        Command::Import { path } => import(&store, path).await,
        Command::List { folder } => list(&store, folder.as_deref()).await,
        Command::Select { id } => select(&store, &id).await,
        Command::Delete { id } => delete(&store, &id).await,
        Command::Play { file } => play(&cli.config, &store, file).await,
    }
}

async fn import(store: &JsonFileStore, path: PathBuf) -> HandlerResult {
    match library::import_document(&PathSource::new(path), store).await {
        Ok(Some(file)) => println!(
            "Uploaded \"{}\" with {} questions (id {})",
            file.name,
            file.data.len(),
            file.id
        ),
        Ok(None) => println!("Nothing selected."),
        Err(e) => println!("Could not import the quiz: {}", e),
    }
    Ok(())
}

async fn list(store: &JsonFileStore, folder: Option<&str>) -> HandlerResult {
    let files = match folder {
        Some(folder) => library::files_in_folder(store, Some(folder)).await?,
        None => library::list_files(store).await?,
    };
    if files.is_empty() {
        match folder {
            Some(folder) => println!("No quiz files in folder {}.", folder),
            None => println!("No quiz files yet. Import a JSON quiz file to get started."),
        }
        return Ok(());
    }

    for file in files {
        println!(
            "{}  {}  ({} questions, added {})",
            file.id,
            file.name,
            file.data.len(),
            file.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

async fn select(store: &JsonFileStore, id: &str) -> HandlerResult {
    match library::select_for_quiz(store, id).await {
        Ok(file) => println!(
            "Quiz ready: \"{}\" ({} questions). Run `play` to start!",
            file.name,
            file.data.len()
        ),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

async fn delete(store: &JsonFileStore, id: &str) -> HandlerResult {
    match library::delete_file(store, id).await {
        Ok(file) => println!("Deleted \"{}\"", file.name),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

async fn play(config: &Config, store: &JsonFileStore, file: Option<PathBuf>) -> HandlerResult {
    let mut session = Session::new(config.advance_delay()?);

    let questions: Vec<Question> = match file {
        Some(path) => match library::open_document(&PathSource::new(path)).await {
            Ok(Some(loaded)) => {
                println!("Loaded {} questions from {}", loaded.questions.len(), loaded.name);
                session.start(&loaded.questions)?;
                loaded.questions
            }
            Ok(None) => return Ok(()),
            Err(e) => {
                println!("Could not load the quiz: {}", e);
                return Ok(());
            }
        },
        None => match consume_handoff(store, &mut session).await {
            Ok(Some(handoff)) => {
                println!("Starting \"{}\"", handoff.name);
                if handoff.dropped > 0 {
                    println!(
                        "Skipped {} malformed questions, {} left.",
                        handoff.dropped,
                        handoff.questions.len()
                    );
                }
                handoff.questions
            }
            Ok(None) => {
                println!("No quiz selected. Use `select <id>` or `play --file <path>`.");
                return Ok(());
            }
            Err(e) => {
                println!("The selected quiz could not be used: {}", e);
                return Ok(());
            }
        },
    };

    println!(
        "Answer with the number of your choice, `x` to exit. Next question after {}.",
        session.delay()
    );
    show_question(&session);

    let mut pacer = Pacer::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            events = pacer.wait(&mut session) => {
                for event in events {
                    show_event(&session, event);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                for event in pacer.sync(&mut session) {
                    show_event(&session, event);
                }
                if let Flow::Quit = handle_line(&mut session, &questions, line.trim()) {
                    break;
                }
            }
        }
    }
    Ok(())
}

fn handle_line(session: &mut Session, questions: &[Question], line: &str) -> Flow {
    match (session.phase(), line) {
        (_, "x") | (Phase::Completed, "q") | (Phase::Idle, _) => {
            session.reset();
            Flow::Quit
        }
        (Phase::Completed, "r") => {
            if let Err(e) = session.start(questions) {
                println!("{}", e);
                return Flow::Quit;
            }
            show_question(session);
            Flow::Continue
        }
        (Phase::Completed, _) => {
            println!("Type `r` to start again or `q` to quit.");
            Flow::Continue
        }
        (Phase::Running, _) if session.awaiting_advance() => {
            println!("Next question in {}s...", session.remaining_secs());
            Flow::Continue
        }
        (Phase::Running, input) => {
            let Some(index) = input.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) else {
                println!("Please enter the number of an answer.");
                return Flow::Continue;
            };
            match session.select_answer(index) {
                Ok(Selection::Answered {
                    correct: true,
                    ..
                }) => println!("Correct! Score: {}", session.score()),
                Ok(Selection::Answered { .. }) => {
                    let answer = session
                        .current_question()
                        .and_then(|q| q.correct_answer())
                        .unwrap_or_default();
                    println!("Wrong! The answer was: {}", answer);
                }
                Ok(Selection::Ignored) => {}
                Err(_) => println!("Please enter a number shown next to an answer."),
            }
            Flow::Continue
        }
    }
}

fn show_event(session: &Session, event: SessionEvent) {
    match event {
        SessionEvent::Tick { remaining } if remaining > 0 => println!("Next in: {}s", remaining),
        SessionEvent::Tick { .. } => {}
        SessionEvent::Advanced { .. } => show_question(session),
        SessionEvent::Completed { score, total } => {
            println!("\nQuiz Completed!");
            println!("Score: {}/{}", score, total);
            if let Some(percentage) = session.percentage() {
                println!("{}%", percentage);
            }
            println!("Type `r` to start again or `q` to quit.");
        }
    }
}

fn show_question(session: &Session) {
    let snapshot = session.snapshot();
    let Some(question) = snapshot.question else {
        return;
    };

    println!(
        "\nQuestion {} of {}    Score: {}",
        snapshot.index + 1,
        snapshot.total,
        snapshot.score
    );
    println!("{}", question.text);
    for (i, answer) in question.answers.iter().enumerate() {
        println!("  {}) {}", i + 1, answer);
    }
}

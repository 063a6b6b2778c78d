//! Task management and timed sessions.

use std::io::{BufRead, Write};
use std::sync::mpsc::{self as std_mpsc, RecvTimeoutError};

use chrono::{Local, Utc};
use clap::Subcommand;
use tokio::sync::mpsc;

use tempo_core::assistant;
use tempo_core::audio::{CueSink, SilentSink};
use tempo_core::timer::{format_clock, Effect, Phase};
use tempo_core::{
    App, Completion, Config, DriverCommand, Event, Language, Session, SessionDriver, Task, VoiceChoice,
};

use super::calendar::parse_day;
use super::{assistant as assistant_client, block_on, open_app, print_json};
use crate::terminal::TerminalSink;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task; the assistant breaks it into steps and estimates it
    Add {
        /// Task title
        title: String,
        /// Your own estimate in minutes
        #[arg(long)]
        minutes: Option<i64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List tasks
    List {
        /// Only pending tasks
        #[arg(long)]
        pending: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a task with its steps
    Show {
        /// Task ID (a unique prefix is enough)
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Tick or untick one step of a task
    Step {
        /// Task ID
        id: String,
        /// Step ID
        step: String,
    },
    /// Put a task on the weekly calendar
    Schedule {
        /// Task ID
        id: String,
        /// Day: 0-6 (Monday first), a weekday name, or "today"
        #[arg(long, default_value = "today")]
        day: String,
    },
    /// Time a task. Type p to pause, r to resume, d (or close stdin) when done
    Run {
        /// Task ID
        id: String,
        /// Skip the bell
        #[arg(long)]
        quiet: bool,
        /// Print events as JSON lines instead of a live clock
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut app = open_app(&config)?;

    match action {
        TaskAction::Add { title, minutes, json } => {
            let client = assistant_client(&config)?;
            let added = block_on(app.add_task(&client, &title, minutes))??;
            if json {
                print_json(&added.task)?;
            } else {
                print_task(&added.task);
                if let Some(conv) = &added.conversation {
                    for msg in conv.transcript() {
                        println!("\nassistant: {}", msg.text);
                    }
                }
            }
        }
        TaskAction::List { pending, json } => {
            let tasks: Vec<&Task> = if pending {
                app.tasks().pending().collect()
            } else {
                app.tasks().all().iter().collect()
            };
            if json {
                print_json(&tasks)?;
            } else if tasks.is_empty() {
                println!("no tasks");
            } else {
                for t in tasks {
                    let status = match (t.completed, t.on_time) {
                        (false, _) => "todo",
                        (true, Some(false)) => "late",
                        (true, _) => "done",
                    };
                    println!(
                        "{:<8}  {:<4}  {:>3} min  {}",
                        short_id(&t.id),
                        status,
                        t.duration_minutes,
                        t.title
                    );
                }
            }
        }
        TaskAction::Show { id, json } => {
            let task = app.tasks().get(&id)?;
            if json {
                print_json(task)?;
            } else {
                print_task(task);
            }
        }
        TaskAction::Delete { id } => {
            let task = app.delete_task(&id)?;
            println!("deleted: {}", task.title);
        }
        TaskAction::Step { id, step } => {
            let done = app.toggle_step(&id, &step)?;
            println!("{}", if done { "done" } else { "not done" });
        }
        TaskAction::Schedule { id, day } => {
            let day = parse_day(&day)?;
            let entry = app.schedule_task(&id, day)?;
            println!("scheduled {} on day {} at {}", entry.title, entry.day, entry.time);
        }
        TaskAction::Run { id, quiet, json } => {
            run_session(&config, &mut app, &id, quiet, json)?;
        }
    }
    Ok(())
}

fn run_session(
    config: &Config,
    app: &mut App,
    id: &str,
    quiet: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let started = app.start_task(id)?;
    let (profile, lang, voice) = (app.profile(), app.language(), app.voice());

    if let Some(conv) = &started.conversation {
        for msg in conv.transcript() {
            eprintln!("assistant: {}", msg.text);
        }
    }
    if json {
        for event in app.drain_events() {
            println!("{}", serde_json::to_string(&event)?);
        }
    } else {
        println!(
            "{} ({}). p = pause, r = resume, d = done",
            started.task.title,
            format_clock(started.session.initial_work_secs())
        );
    }

    // Lines go to the driver while it runs; afterwards any line closes the
    // celebration. The thread ends at EOF, which drops both senders.
    let (tx, rx) = mpsc::channel(8);
    let (dismiss_tx, dismiss_rx) = std_mpsc::channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let cmd = match line.trim() {
                "p" | "pause" => Some(DriverCommand::Pause),
                "r" | "resume" => Some(DriverCommand::Resume),
                "d" | "done" => Some(DriverCommand::Complete),
                _ => None,
            };
            if tx.is_closed() {
                if dismiss_tx.send(()).is_err() {
                    break;
                }
            } else if let Some(cmd) = cmd {
                if tx.blocking_send(cmd).is_err() && dismiss_tx.send(()).is_err() {
                    break;
                }
            }
        }
    });

    let observed_id = started.task.id.clone();
    let mut was_running = true;
    let observe = move |session: &Session, effects: &[Effect]| {
        let now = Utc::now();
        let mut events: Vec<Event> = effects
            .iter()
            .filter_map(|e| Event::from_effect(&observed_id, e, now))
            .collect();
        if session.completion().is_none() && session.is_running() != was_running {
            was_running = session.is_running();
            let task_id = observed_id.clone();
            let work_secs_remaining = session.total_work_secs_remaining();
            events.push(if was_running {
                Event::SessionResumed { task_id, work_secs_remaining, at: now }
            } else {
                Event::SessionPaused { task_id, work_secs_remaining, at: now }
            });
        }

        if json {
            for event in &events {
                if let Ok(line) = serde_json::to_string(event) {
                    println!("{line}");
                }
            }
        } else if session.completion().is_none() {
            let label = match session.phase() {
                Phase::Work => "work ",
                Phase::Break => "break",
            };
            let paused = if session.is_running() { "" } else { " (paused)" };
            print!("\r{label} {:>6}{paused}   ", format_clock(session.displayed_secs()));
            let _ = std::io::stdout().flush();
        }
    };

    // JSON output stays machine-readable: no cue lines on stdout.
    let completion = if json {
        drive(started.session, SilentSink, lang, voice, rx, observe)?
    } else {
        drive(started.session, TerminalSink::new(quiet), lang, voice, rx, observe)?
    };

    let outcome = app.complete_active(&completion, Utc::now())?;
    if json {
        for event in app.drain_events() {
            println!("{}", serde_json::to_string(&event)?);
        }
        celebrate(app, &dismiss_rx);
        for event in app.drain_events() {
            println!("{}", serde_json::to_string(&event)?);
        }
        return Ok(());
    }

    println!();
    if completion.on_time {
        println!("on time! +{} coins (balance {})", outcome.reward.amount, outcome.reward.balance);
        if outcome.reward.celebration.is_some() {
            println!("*** \u{1F389} well done! \u{1F389} ***  (enter to close)");
            celebrate(app, &dismiss_rx);
        }
    } else {
        println!("time ran out. +{} coins (balance {})", outcome.reward.amount, outcome.reward.balance);
    }

    let client = assistant_client(config)?;
    let (phrase, rewards) = block_on(async {
        let phrase = assistant::positive_phrase(&client, profile, lang).await;
        let rewards =
            assistant::suggest_rewards(&client, profile, &started.task.title, lang, Local::now().date_naive())
                .await;
        (phrase, rewards)
    })?;
    println!("{phrase}");
    println!("treat yourself:");
    for r in rewards {
        println!("  {} {}", r.icon, r.text);
    }
    Ok(())
}

/// Hold the celebration until a stdin line (or EOF) dismisses it or its
/// time is up.
fn celebrate(app: &mut App, dismiss: &std_mpsc::Receiver<()>) {
    while let Some(celebration) = app.celebration(Utc::now()) {
        let left = (celebration.ends_at - Utc::now()).to_std().unwrap_or_default();
        match dismiss.recv_timeout(left) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                app.dismiss_celebration();
            }
            Err(RecvTimeoutError::Timeout) => {}
        }
    }
    app.expire_celebration(Utc::now());
}

fn drive<S, F>(
    session: Session,
    sink: S,
    lang: Language,
    voice: VoiceChoice,
    commands: mpsc::Receiver<DriverCommand>,
    observe: F,
) -> Result<Completion, Box<dyn std::error::Error>>
where
    S: CueSink,
    F: FnMut(&Session, &[Effect]),
{
    let driver = SessionDriver::new(session, sink, lang, voice);
    let (completion, _, _) = block_on(driver.run(commands, observe))?;
    Ok(completion)
}

fn print_task(task: &Task) {
    println!("{}  {}", short_id(&task.id), task.title);
    println!(
        "  planned {} min, assistant estimate {} min",
        task.duration_minutes, task.ai_estimated_minutes
    );
    if !task.ai_feedback.is_empty() {
        println!("  {}", task.ai_feedback);
    }
    for step in &task.steps {
        let mark = if step.completed { "x" } else { " " };
        println!("  [{mark}] {}  {}", step.id, step.text);
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

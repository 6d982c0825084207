use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use todolist_cli::cli::{Cli, Command};
use todolist_core::error::AppError;
use todolist_core::model::Todo;
use todolist_core::refresh::RefreshScheduler;
use todolist_core::sort;
use todolist_core::storage::JsonFileStore;
use todolist_core::store::TodoStore;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Tabled)]
struct TodoRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "priority")]
    priority: String,
    #[tabled(rename = "done")]
    done: String,
    #[tabled(rename = "deadline")]
    deadline: String,
    #[tabled(rename = "status")]
    status: String,
}

fn stars(priority: u8) -> String {
    "★".repeat(4u8.saturating_sub(priority) as usize)
}

fn deadline_label(todo: &Todo) -> String {
    todo.deadline
        .and_then(|deadline| deadline.format(&Rfc3339).ok())
        .unwrap_or_else(|| "-".to_string())
}

fn status_label(todo: &Todo) -> &'static str {
    if todo.is_overdue {
        "overdue"
    } else if todo.is_due_soon {
        "due soon"
    } else {
        ""
    }
}

fn render_listing(todos: &[Todo]) {
    if todos.is_empty() {
        println!("No tasks");
    } else {
        let rows: Vec<TodoRow> = todos
            .iter()
            .map(|todo| TodoRow {
                id: todo.id.clone(),
                name: todo.name.clone(),
                priority: stars(todo.priority),
                done: (if todo.is_done { "x" } else { "" }).to_string(),
                deadline: deadline_label(todo),
                status: status_label(todo).to_string(),
            })
            .collect();
        println!("{}", Table::new(rows).with(Style::sharp()));
    }

    let remaining = todos.iter().filter(|todo| !todo.is_done).count();
    println!("{remaining} task(s) remaining");
}

fn print_todos_json(todos: &[Todo]) {
    let payload: Vec<serde_json::Value> = todos.iter().map(todo_json).collect();
    println!("{}", serde_json::Value::Array(payload));
}

fn todo_json(todo: &Todo) -> serde_json::Value {
    serde_json::json!({
        "id": todo.id,
        "name": todo.name,
        "isDone": todo.is_done,
        "priority": todo.priority,
        "deadline": todo.deadline.and_then(|deadline| deadline.format(&Rfc3339).ok()),
        "isOverdue": todo.is_overdue,
        "isDueSoon": todo.is_due_soon,
    })
}

fn parse_deadline(raw: &str) -> Result<OffsetDateTime, AppError> {
    let trimmed = raw.trim();
    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Ok(parsed);
    }

    let date_only = format_description!("[year]-[month]-[day]");
    if let Ok(date) = Date::parse(trimmed, &date_only) {
        return Ok(date.midnight().assume_utc());
    }

    Err(AppError::invalid_input(
        "deadline must be RFC3339 or YYYY-MM-DD",
    ))
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if in_quotes => match chars.next() {
                Some(next @ ('"' | '\\')) => current.push(next),
                Some(next) => {
                    current.push('\\');
                    current.push(next);
                }
                None => current.push('\\'),
            },
            '"' => in_quotes = !in_quotes,
            ch if ch.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            ch => current.push(ch),
        }
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
    println!("Session commands: sort (toggle deadline order), help, exit");
}

fn run_command(cli: Cli, store: &mut TodoStore, sort_by_deadline: bool) -> Result<(), AppError> {
    match cli.command {
        Command::Add {
            name,
            priority,
            deadline,
        } => {
            let deadline = deadline.as_deref().map(parse_deadline).transpose()?;
            let todo = store.create(&name, priority, deadline)?;
            if cli.json {
                println!("{}", todo_json(&todo));
            } else {
                println!("Added task: {} ({})", todo.name, todo.id);
            }
        }
        Command::Edit {
            id,
            name,
            priority,
            deadline,
            clear_deadline,
        } => {
            let current = store
                .get(&id)
                .cloned()
                .ok_or_else(|| AppError::not_found(format!("no task with id {id}")))?;
            let priority = priority.unwrap_or(current.priority);
            let deadline = if clear_deadline {
                None
            } else if let Some(raw) = deadline {
                Some(parse_deadline(&raw)?)
            } else {
                current.deadline
            };

            let todo = store.edit(&id, &name, priority, deadline)?;
            if cli.json {
                println!("{}", todo_json(&todo));
            } else {
                println!("Updated task: {} ({})", todo.name, todo.id);
            }
        }
        Command::Done { id } => {
            let todo = store.set_done(&id, true)?;
            if cli.json {
                println!("{}", todo_json(&todo));
            } else {
                println!("Completed task: {} ({})", todo.name, todo.id);
            }
        }
        Command::Reopen { id } => {
            let todo = store.set_done(&id, false)?;
            if cli.json {
                println!("{}", todo_json(&todo));
            } else {
                println!("Reopened task: {} ({})", todo.name, todo.id);
            }
        }
        Command::Delete { id } => {
            let deleted = store.remove(&id)?;
            if cli.json {
                println!("{}", serde_json::json!({ "id": id, "deleted": deleted }));
            } else if deleted {
                println!("Deleted task: {id}");
            } else {
                println!("Nothing to delete: {id}");
            }
        }
        Command::Clear => {
            let removed = store.remove_completed()?;
            if cli.json {
                println!("{}", serde_json::json!({ "removed": removed }));
            } else {
                println!("Removed {removed} completed task(s)");
            }
        }
        Command::List { by_deadline } => {
            store.recompute_due_flags(OffsetDateTime::now_utc());
            let todos = if by_deadline || sort_by_deadline {
                sort::by_deadline_ascending(store.todos())
            } else {
                store.todos().to_vec()
            };
            if cli.json {
                print_todos_json(&todos);
            } else {
                render_listing(&todos);
            }
        }
    }

    Ok(())
}

fn run_one_shot(cli: Cli) -> Result<(), AppError> {
    let persistence = JsonFileStore::at_default_path()?;
    let mut store = TodoStore::open(Box::new(persistence))?;
    run_command(cli, &mut store, false)
}

fn run_interactive() -> Result<(), AppError> {
    let persistence = JsonFileStore::at_default_path()?;
    let store = Arc::new(Mutex::new(TodoStore::open(Box::new(persistence))?));
    let sort_by_deadline = Arc::new(AtomicBool::new(false));

    {
        let sort_flag = Arc::clone(&sort_by_deadline);
        let mut guard = store
            .lock()
            .map_err(|_| AppError::io("store lock poisoned"))?;
        guard.subscribe(Box::new(move |todos| {
            let view = if sort_flag.load(Ordering::Relaxed) {
                sort::by_deadline_ascending(todos)
            } else {
                todos.to_vec()
            };
            render_listing(&view);
        }));
    }

    let scheduler = RefreshScheduler::start(Arc::clone(&store), REFRESH_INTERVAL);

    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        if line.eq_ignore_ascii_case("sort") {
            let enabled = !sort_by_deadline.load(Ordering::Relaxed);
            sort_by_deadline.store(enabled, Ordering::Relaxed);
            println!("Deadline sort {}", if enabled { "on" } else { "off" });
            if let Ok(mut guard) = store.lock() {
                guard.recompute_due_flags(OffsetDateTime::now_utc());
            }
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("todolist".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        // The session renders through the store subscription, so a list
        // request only needs fresh due flags.
        if let Command::List { by_deadline } = &cli.command {
            if *by_deadline {
                sort_by_deadline.store(true, Ordering::Relaxed);
            }
            if let Ok(mut guard) = store.lock() {
                guard.recompute_due_flags(OffsetDateTime::now_utc());
            }
            continue;
        }

        let view_sorted = sort_by_deadline.load(Ordering::Relaxed);
        let mut guard = store
            .lock()
            .map_err(|_| AppError::io("store lock poisoned"))?;
        if let Err(err) = run_command(cli, &mut guard, view_sorted) {
            eprintln!("ERROR: {}", err);
        }
    }

    scheduler.stop();
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() {
    init_tracing();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive() {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            let _ = err.print();
            return;
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_one_shot(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}

use clap::{Parser, Subcommand};
use todolist_core::model::PRIORITY_LOWEST;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: todolist add "Buy milk" --priority 1
    /// Example: todolist add "Buy milk" --deadline 2026-01-15T12:00:00Z
    Add {
        name: String,
        /// Priority from 1 (highest) to 3 (lowest)
        #[arg(long, default_value_t = PRIORITY_LOWEST, value_parser = clap::value_parser!(u8).range(1..=3))]
        priority: u8,
        /// Deadline as RFC3339 or YYYY-MM-DD (midnight UTC)
        #[arg(long)]
        deadline: Option<String>,
    },
    /// Edit a task's name, priority, and deadline
    ///
    /// Example: todolist edit todo-1 "Buy organic milk" --priority 2
    Edit {
        id: String,
        name: String,
        /// New priority; keeps the current one when omitted
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
        priority: Option<u8>,
        /// New deadline; keeps the current one when omitted
        #[arg(long)]
        deadline: Option<String>,
        /// Drop the task's deadline
        #[arg(long, conflicts_with = "deadline")]
        clear_deadline: bool,
    },
    /// Mark a task as done
    ///
    /// Example: todolist done todo-1
    Done {
        id: String,
    },
    /// Reopen a completed task
    ///
    /// Example: todolist reopen todo-1
    Reopen {
        id: String,
    },
    /// Delete a task (no-op when the id does not exist)
    ///
    /// Example: todolist delete todo-1
    Delete {
        id: String,
    },
    /// Delete all completed tasks
    ///
    /// Example: todolist clear
    Clear,
    /// List tasks with the remaining count
    ///
    /// Example: todolist list
    /// Example: todolist list --by-deadline
    List {
        /// Sort by deadline, earliest first, tasks without a deadline last
        #[arg(long)]
        by_deadline: bool,
    },
}

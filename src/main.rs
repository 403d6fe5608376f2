use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use taskcal::calendar::calendar_entries;
use taskcal::config::Configuration;
use taskcal::content_parser::parse_entry;
use taskcal::database::{self, Direction, PageRequest, SortKey};
use taskcal::service::TaskService;
use taskcal::task::{Task, TaskId};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cmd {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task. TEXT may start with a [YYYY-MM-DD] due date tag.
    Add {
        #[arg(short, long, value_name = "DATE")]
        due: Option<NaiveDate>,
        #[arg(value_name = "TEXT")]
        text: String,
    },
    /// List one page of tasks.
    List {
        #[arg(short, long, default_value_t = 0)]
        page: u32,
        #[arg(short, long)]
        size: Option<u32>,
        #[arg(long, value_enum, default_value_t = SortArg::Id)]
        sort: SortArg,
        #[arg(long)]
        desc: bool,
        #[arg(long)]
        by_priority: bool,
    },
    /// Mark a task as done.
    Done { id: i64 },
    /// Mark a task as not done.
    Undone { id: i64 },
    /// Export every task as an iCalendar file.
    Export {
        #[arg(short, long, value_name = "FILE", default_value = "tasks.ics")]
        output: PathBuf,
    },
    /// Show tasks with a due date as all-day calendar entries.
    Agenda {},
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Id,
    Description,
    Created,
    Due,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Id => SortKey::Id,
            SortArg::Description => SortKey::Description,
            SortArg::Created => SortKey::CreationDate,
            SortArg::Due => SortKey::DueDate,
        }
    }
}

async fn add(service: &TaskService, due: Option<NaiveDate>, text: &str) -> Result<()> {
    let entry = parse_entry(text);
    let task = service
        .create_task(&entry.description, due.or(entry.due_date))
        .await?;
    let id = task.id().ok_or_else(|| eyre!("Task saved without an id"))?;
    println!("Task {} added", id);
    Ok(())
}

fn print_tasks(tasks: &[Task]) {
    let today = Local::now().date_naive();
    println!(
        "{:>5}  {:<40}  {:<10}  {:<16}  {:<4}  {}",
        "ID", "DESCRIPTION", "DUE", "CREATED", "DONE", "PRIORITY"
    );
    for task in tasks {
        let id = task.id().map(|id| id.to_string()).unwrap_or_default();
        let due = task
            .due_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "Never".to_string());
        let created = task
            .creation_date()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M");
        println!(
            "{:>5}  {:<40}  {:<10}  {:<16}  {:<4}  {}",
            id,
            task.description().chars().take(40).collect::<String>(),
            due,
            created,
            if task.is_done() { "x" } else { "" },
            task.priority(today),
        );
    }
}

async fn set_done(service: &TaskService, id: i64, done: bool) -> Result<()> {
    service.update_task_done(TaskId(id), done).await?;
    let task = service
        .find_task(TaskId(id))
        .await?
        .ok_or_else(|| eyre!("Task {} disappeared", id))?;
    println!("Task updated: {}", task.description());
    Ok(())
}

async fn export(service: &TaskService, output: &Path) -> Result<()> {
    let document = service.export_tasks_to_ics(&Local).await?;
    if output.as_os_str() == "-" {
        print!("{}", document);
    } else {
        fs::write(output, document)?;
        println!("Tasks exported to {}", output.display());
    }
    Ok(())
}

async fn agenda(service: &TaskService) -> Result<()> {
    let tasks = service.find_all().await?;
    for entry in calendar_entries(&tasks) {
        println!("{}  {}  {}", entry.start, entry.color, entry.title);
    }
    Ok(())
}

/// Directives from `RUST_LOG` when set and valid, `warn` otherwise.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cmds = Cmd::parse();
    let cfg = Configuration::new()?;
    let pool = database::connect(&cfg.taskcal.database).await?;
    let service = TaskService::new(pool, cfg.taskcal.prod_id);

    match &cmds.commands {
        Commands::Add { due, text } => add(&service, *due, text).await,
        Commands::List {
            page,
            size,
            sort,
            desc,
            by_priority,
        } => {
            let direction = if *desc {
                Direction::Descending
            } else {
                Direction::Ascending
            };
            let request = PageRequest::page(*page, size.unwrap_or(cfg.taskcal.page_size))
                .sorted_by((*sort).into(), direction);
            let tasks = if *by_priority {
                service
                    .list_sorted_by_priority(&request, Local::now().date_naive())
                    .await?
            } else {
                service.list(&request).await?
            };
            print_tasks(&tasks);
            Ok(())
        }
        Commands::Done { id } => set_done(&service, *id, true).await,
        Commands::Undone { id } => set_done(&service, *id, false).await,
        Commands::Export { output } => export(&service, output).await,
        Commands::Agenda {} => agenda(&service).await,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use taskcal::database;
    use taskcal::ics::DEFAULT_PROD_ID;
    use taskcal::service::TaskService;

    use super::{add, log_filter};

    #[tokio::test]
    async fn test_add_reads_date_tag() {
        let dir = tempfile::tempdir().unwrap();
        let db_file = dir.path().join("taskcal.db");
        let pool = database::connect(db_file.to_str().unwrap()).await.unwrap();
        let service = TaskService::new(pool, DEFAULT_PROD_ID);

        add(&service, None, "[2025-03-31] Pay rent").await.unwrap();

        let tasks = service.find_all().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].description(), "Pay rent");
        assert_eq!(tasks[0].due_date(), NaiveDate::from_ymd_opt(2025, 3, 31));
    }

    #[tokio::test]
    async fn test_add_failure_hook_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let db_file = dir.path().join("taskcal.db");
        let pool = database::connect(db_file.to_str().unwrap()).await.unwrap();
        let service = TaskService::new(pool, DEFAULT_PROD_ID);

        assert!(add(&service, None, "fail").await.is_err());
        assert!(service.find_all().await.unwrap().is_empty());
    }

    #[test]
    fn test_log_filter_defaults_to_warn() {
        assert_eq!(log_filter(None).to_string(), "warn");
        assert_eq!(log_filter(Some("")).to_string(), "warn");
    }

    #[test]
    fn test_log_filter_follows_rust_log() {
        assert_eq!(log_filter(Some("debug")).to_string(), "debug");
        assert_eq!(log_filter(Some("taskcal=info")).to_string(), "taskcal=info");
    }
}

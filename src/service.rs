//! Task operations on top of the database: creation with validation,
//! paging, priority ordering, completion and calendar export.
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rand::Rng;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::database::{self, PageRequest};
use crate::error::{Error, Result};
use crate::ics::export_calendar;
use crate::task::{Task, TaskId};

/// Test hook: creating a task with exactly this description always fails
/// with [`Error::FailureHook`], so error paths can be exercised end to end.
pub const FAILURE_HOOK_DESCRIPTION: &str = "fail";

pub struct TaskService {
    pool: SqlitePool,
    prod_id: String,
}

impl TaskService {
    pub fn new(pool: SqlitePool, prod_id: impl Into<String>) -> Self {
        TaskService {
            pool,
            prod_id: prod_id.into(),
        }
    }

    pub async fn create_task(&self, description: &str, due_date: Option<NaiveDate>) -> Result<Task> {
        let task = draft_task(description, due_date, Utc::now(), &mut rand::thread_rng())?;
        self.save(task).await
    }

    async fn save(&self, task: Task) -> Result<Task> {
        let id = database::insert_task(&self.pool, &task).await?;
        info!(%id, "task created");
        Ok(task.with_id(id))
    }

    pub async fn list(&self, page: &PageRequest) -> Result<Vec<Task>> {
        database::list_page(&self.pool, page).await
    }

    /// Same page as [`TaskService::list`], reordered by priority as of
    /// `today`. Tasks of equal priority keep their page order.
    pub async fn list_sorted_by_priority(&self, page: &PageRequest, today: NaiveDate) -> Result<Vec<Task>> {
        let mut tasks = self.list(page).await?;
        tasks.sort_by_key(|task| task.priority(today));
        Ok(tasks)
    }

    pub async fn find_all(&self) -> Result<Vec<Task>> {
        database::list_all(&self.pool).await
    }

    pub async fn find_task(&self, id: TaskId) -> Result<Option<Task>> {
        database::find_task(&self.pool, id).await
    }

    pub async fn update_task_done(&self, id: TaskId, done: bool) -> Result<()> {
        database::update_done(&self.pool, id, done).await?;
        info!(%id, done, "task updated");
        Ok(())
    }

    /// Exports every stored task. Tasks added after the read are not included.
    pub async fn export_tasks_to_ics<Tz: TimeZone>(&self, tz: &Tz) -> Result<String> {
        let tasks = self.find_all().await?;
        let document = export_calendar(&tasks, tz, &self.prod_id)?;
        info!(tasks = tasks.len(), "tasks exported");
        Ok(document)
    }
}

/// Validates input and builds an unsaved task.
fn draft_task<R: Rng + ?Sized>(
    description: &str,
    due_date: Option<NaiveDate>,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<Task> {
    if description == FAILURE_HOOK_DESCRIPTION {
        warn!("failure hook triggered");
        return Err(Error::FailureHook);
    }
    let mut task = Task::new(description, now, rng)?;
    task.set_due_date(due_date);
    Ok(task)
}

//! SQLite task store. Pages are read with `LIMIT/OFFSET`, ordered by a
//! [`SortKey`] column with `task_id` as the tie-break, so consecutive pages
//! never repeat or skip a task.
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{Error, Result};
use crate::task::{Task, TaskId};

/// Column a page of tasks is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Id,
    Description,
    CreationDate,
    DueDate,
}

impl SortKey {
    fn column(&self) -> &'static str {
        match self {
            SortKey::Id => "task_id",
            SortKey::Description => "description",
            SortKey::CreationDate => "creation_date",
            SortKey::DueDate => "due_date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub key: SortKey,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u32,
    pub limit: u32,
    pub sort: Option<Sort>,
}

impl PageRequest {
    /// Zero-based page `number` of `size` tasks each.
    pub fn page(number: u32, size: u32) -> Self {
        PageRequest {
            offset: number.saturating_mul(size),
            limit: size,
            sort: None,
        }
    }

    pub fn sorted_by(mut self, key: SortKey, direction: Direction) -> Self {
        self.sort = Some(Sort { key, direction });
        self
    }

    /// `task_id` always breaks ties so pages never overlap.
    fn order_by(&self) -> String {
        let sort = self.sort.unwrap_or_default();
        let direction = match sort.direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        match sort.key {
            SortKey::Id => format!("task_id {direction}"),
            key => format!("{} {direction}, task_id asc", key.column()),
        }
    }
}

/// Opens (creating if needed) the SQLite file and applies the migrations.
pub async fn connect(db_file: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(db_file)
        .create_if_missing(true);
    let pool = SqlitePool::connect_lazy_with(options);
    sqlx::migrate!().run(&pool).await?;
    debug!(db_file, "database ready");
    Ok(pool)
}

/// Fresh migrated database living only as long as the pool.
#[cfg(test)]
pub(crate) async fn connect_in_memory() -> Result<SqlitePool> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    sqlx::migrate!().run(&pool).await?;
    Ok(pool)
}

/// Inserts a task into the DB and returns the generated Id or
/// error if the insert fails.
pub async fn insert_task(pool: &SqlitePool, task: &Task) -> Result<TaskId> {
    let insert_stmt = r#"
            insert into task(description, creation_date, due_date, color, done)
            values($1, $2, $3, $4, $5)
        "#;
    let res = sqlx::query(insert_stmt)
        .bind(task.description())
        .bind(task.creation_date())
        .bind(task.due_date())
        .bind(task.color())
        .bind(task.is_done())
        .execute(pool)
        .await?;
    Ok(TaskId(res.last_insert_rowid()))
}

pub async fn list_page(pool: &SqlitePool, page: &PageRequest) -> Result<Vec<Task>> {
    let select_stmt = format!(
        "select * from task order by {} limit $1 offset $2",
        page.order_by()
    );
    debug!(%select_stmt, offset = page.offset, limit = page.limit, "listing page");
    let rows = sqlx::query(&select_stmt)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await?;
    rows.iter().map(task_from_row).collect()
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Task>> {
    let select_stmt = r#"
        select * from task order by task_id
        "#;
    let rows = sqlx::query(select_stmt).fetch_all(pool).await?;
    rows.iter().map(task_from_row).collect()
}

pub async fn find_task(pool: &SqlitePool, id: TaskId) -> Result<Option<Task>> {
    let row = sqlx::query("select * from task where task_id = $1")
        .bind(id.0)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(task_from_row).transpose()
}

/// Sets the done flag. Fails with [`Error::NotFound`] for an unknown id.
pub async fn update_done(pool: &SqlitePool, id: TaskId, done: bool) -> Result<()> {
    let res = sqlx::query("update task set done = $1 where task_id = $2")
        .bind(done)
        .bind(id.0)
        .execute(pool)
        .await?;
    if res.rows_affected() == 0 {
        return Err(Error::NotFound(id));
    }
    Ok(())
}

fn task_from_row(row: &SqliteRow) -> Result<Task> {
    Ok(Task::from_parts(
        TaskId(row.try_get::<i64, _>("task_id")?),
        row.try_get::<String, _>("description")?,
        row.try_get::<DateTime<Utc>, _>("creation_date")?,
        row.try_get::<Option<NaiveDate>, _>("due_date")?,
        row.try_get::<String, _>("color")?,
        row.try_get::<bool, _>("done")?,
    ))
}

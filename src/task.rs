use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;

use crate::color::{is_valid_color, random_color};
use crate::error::{Error, Result};

pub const DESCRIPTION_MAX_LENGTH: usize = 300;

/// Store-assigned task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Urgency derived from how close the due date is.
///
/// Declaration order is the sort order: `High` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn for_due_date(due_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        let Some(due_date) = due_date else {
            return Priority::Low;
        };
        let days_until_due = (due_date - today).num_days();
        if days_until_due <= 2 {
            Priority::High
        } else if days_until_due <= 5 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }

    /// Severity tag used when presenting the priority.
    pub fn theme_variant(&self) -> &'static str {
        match self {
            Priority::High => "danger",
            Priority::Medium => "warning",
            Priority::Low => "success",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct Task {
    id: Option<TaskId>,
    description: String,
    creation_date: DateTime<Utc>,
    due_date: Option<NaiveDate>,
    color: String,
    done: bool,
}

impl Task {
    pub fn new<R: Rng + ?Sized>(
        description: &str,
        creation_date: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Self> {
        check_description(description)?;
        Ok(Task {
            id: None,
            description: description.to_string(),
            creation_date,
            due_date: None,
            color: random_color(rng),
            done: false,
        })
    }

    /// Rebuilds a task read back from the store.
    pub(crate) fn from_parts(
        id: TaskId,
        description: String,
        creation_date: DateTime<Utc>,
        due_date: Option<NaiveDate>,
        color: String,
        done: bool,
    ) -> Self {
        Task {
            id: Some(id),
            description,
            creation_date,
            due_date,
            color,
            done,
        }
    }

    pub(crate) fn with_id(mut self, id: TaskId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<TaskId> {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: &str) -> Result<()> {
        check_description(description)?;
        self.description = description.to_string();
        Ok(())
    }

    pub fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn set_due_date(&mut self, due_date: Option<NaiveDate>) {
        self.due_date = due_date;
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn set_color(&mut self, color: &str) -> Result<()> {
        if !is_valid_color(color) {
            return Err(Error::InvalidColor(color.to_string()));
        }
        self.color = color.to_string();
        Ok(())
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn set_done(&mut self, done: bool) {
        self.done = done;
    }

    /// Recomputed on every call, never cached.
    pub fn priority(&self, today: NaiveDate) -> Priority {
        Priority::for_due_date(self.due_date, today)
    }
}

/// Saved tasks are equal when their ids match. An unsaved task is equal only
/// to itself.
impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || matches!((self.id, other.id), (Some(a), Some(b)) if a == b)
    }
}

fn check_description(description: &str) -> Result<()> {
    let length = description.chars().count();
    if length > DESCRIPTION_MAX_LENGTH {
        return Err(Error::DescriptionTooLong {
            length,
            max: DESCRIPTION_MAX_LENGTH,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Days, TimeZone};
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
    }

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 12, 9, 30, 0).unwrap()
    }

    fn priority_in(days: i64) -> Priority {
        let due = if days >= 0 {
            today().checked_add_days(Days::new(days as u64))
        } else {
            today().checked_sub_days(Days::new(days.unsigned_abs()))
        };
        Priority::for_due_date(due, today())
    }

    #[test]
    fn test_priority_boundaries() {
        assert_eq!(priority_in(0), Priority::High);
        assert_eq!(priority_in(2), Priority::High);
        assert_eq!(priority_in(3), Priority::Medium);
        assert_eq!(priority_in(5), Priority::Medium);
        assert_eq!(priority_in(6), Priority::Low);
        assert_eq!(priority_in(365), Priority::Low);
    }

    #[test]
    fn test_overdue_is_high() {
        assert_eq!(priority_in(-1), Priority::High);
        assert_eq!(priority_in(-30), Priority::High);
    }

    #[test]
    fn test_no_due_date_is_low() {
        assert_eq!(Priority::for_due_date(None, today()), Priority::Low);
    }

    #[test]
    fn test_priority_labels() {
        assert_eq!(Priority::High.label(), "HIGH");
        assert_eq!(Priority::Medium.theme_variant(), "warning");
        assert_eq!(Priority::Low.theme_variant(), "success");
        assert_eq!(Priority::High.to_string(), "HIGH");
    }

    #[test]
    fn test_priority_order_follows_declaration() {
        let mut levels = vec![Priority::Low, Priority::High, Priority::Medium];
        levels.sort();
        assert_eq!(levels, vec![Priority::High, Priority::Medium, Priority::Low]);
    }

    #[test]
    fn test_priority_tracks_due_date_changes() {
        let mut task = Task::new("Water plants", created(), &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(task.priority(today()), Priority::Low);
        task.set_due_date(today().checked_add_days(Days::new(1)));
        assert_eq!(task.priority(today()), Priority::High);
        task.set_due_date(today().checked_add_days(Days::new(4)));
        assert_eq!(task.priority(today()), Priority::Medium);
    }

    #[test]
    fn test_description_length_limit() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(Task::new(&"x".repeat(300), created(), &mut rng).is_ok());
        assert!(matches!(
            Task::new(&"x".repeat(301), created(), &mut rng),
            Err(Error::DescriptionTooLong { length: 301, max: 300 })
        ));
        assert!(Task::new("", created(), &mut rng).is_ok());
    }

    #[test]
    fn test_set_description_keeps_old_value_on_error() {
        let mut task = Task::new("Short", created(), &mut StdRng::seed_from_u64(3)).unwrap();
        assert!(task.set_description(&"y".repeat(301)).is_err());
        assert_eq!(task.description(), "Short");
    }

    #[test]
    fn test_new_task_defaults() {
        let task = Task::new("Buy milk", created(), &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(task.id(), None);
        assert_eq!(task.creation_date(), created());
        assert_eq!(task.due_date(), None);
        assert!(!task.is_done());
        assert!(is_valid_color(task.color()));
    }

    #[test]
    fn test_set_color_validates() {
        let mut task = Task::new("Paint", created(), &mut StdRng::seed_from_u64(5)).unwrap();
        task.set_color("#123abc").unwrap();
        assert_eq!(task.color(), "#123abc");
        assert!(matches!(task.set_color("red"), Err(Error::InvalidColor(_))));
        assert_eq!(task.color(), "#123abc");
    }

    #[test]
    fn test_equality_by_id() {
        let mut rng = StdRng::seed_from_u64(11);
        let unsaved = Task::new("Same", created(), &mut rng).unwrap();
        let other_unsaved = unsaved.clone();
        assert_ne!(unsaved, other_unsaved);
        let itself = &unsaved;
        assert_eq!(&unsaved, itself);

        let saved = unsaved.clone().with_id(TaskId(1));
        let renamed = Task::new("Different", created(), &mut rng)
            .unwrap()
            .with_id(TaskId(1));
        assert_eq!(saved, renamed);
        assert_ne!(saved, unsaved);
        assert_ne!(saved, Task::new("Same", created(), &mut rng).unwrap().with_id(TaskId(2)));
    }
}

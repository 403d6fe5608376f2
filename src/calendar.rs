use chrono::{Days, NaiveDate};

use crate::task::Task;

pub const DONE_COLOR: &str = "#28a745";
pub const PENDING_COLOR: &str = "#6c757d";

/// All-day calendar entry for a task with a due date.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEntry {
    pub title: String,
    pub start: NaiveDate,
    /// Exclusive, the day after `start`.
    pub end: NaiveDate,
    pub color: &'static str,
}

/// Tasks without a due date have no place on the calendar and are skipped.
pub fn calendar_entries(tasks: &[Task]) -> Vec<CalendarEntry> {
    tasks
        .iter()
        .filter_map(|task| {
            let start = task.due_date()?;
            Some(CalendarEntry {
                title: task.description().to_string(),
                start,
                end: start.checked_add_days(Days::new(1))?,
                color: if task.is_done() { DONE_COLOR } else { PENDING_COLOR },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn task(description: &str, due_date: Option<NaiveDate>, done: bool) -> Task {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let mut task = Task::new(description, created, &mut StdRng::seed_from_u64(0)).unwrap();
        task.set_due_date(due_date);
        task.set_done(done);
        task
    }

    #[test]
    fn test_calendar_entries() {
        let due = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let tasks = vec![
            task("Undated", None, false),
            task("Pending", Some(due), false),
            task("Finished", Some(due), true),
        ];

        let entries = calendar_entries(&tasks);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Pending");
        assert_eq!(entries[0].start, due);
        assert_eq!(entries[0].end, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert_eq!(entries[0].color, PENDING_COLOR);
        assert_eq!(entries[1].color, DONE_COLOR);
    }
}

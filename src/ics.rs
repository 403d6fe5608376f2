//! Renders tasks as an iCalendar (RFC 5545) document, one VEVENT per task.
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

use crate::error::{Error, Result};
use crate::task::Task;

pub const DEFAULT_PROD_ID: &str = "-//taskcal//Task Export 1.0//EN";

const MAX_LINE_OCTETS: usize = 75;

/// Builds the calendar for `tasks`, keeping their order.
///
/// Due dates become the local start of day in `tz`. Every task must have
/// been saved; a single task without an id fails the whole export.
pub fn export_calendar<Tz: TimeZone>(tasks: &[Task], tz: &Tz, prod_id: &str) -> Result<String> {
    let mut out = String::new();
    write_line(&mut out, "BEGIN:VCALENDAR");
    write_line(&mut out, &format!("PRODID:{}", escape_text(prod_id)));
    write_line(&mut out, "VERSION:2.0");
    write_line(&mut out, "CALSCALE:GREGORIAN");

    for task in tasks {
        let id = task.id().ok_or(Error::MissingId)?;
        let start = task.creation_date();
        let end = match task.due_date() {
            Some(due_date) => start_of_day(due_date, tz),
            None => start + TimeDelta::hours(24),
        };

        write_line(&mut out, "BEGIN:VEVENT");
        write_line(&mut out, &format!("DTSTAMP:{}", format_utc(start)));
        write_line(&mut out, &format!("SUMMARY:{}", escape_text(task.description())));
        write_line(&mut out, &format!("DTSTART:{}", format_utc(start)));
        write_line(&mut out, &format!("DTEND:{}", format_utc(end)));
        write_line(&mut out, &format!("UID:{}", id));
        write_line(&mut out, "END:VEVENT");
    }

    write_line(&mut out, "END:VCALENDAR");
    Ok(out)
}

/// Local midnight of `date` in `tz`. When midnight falls into a DST gap the
/// first valid local time after it is used; an ambiguous midnight takes the
/// earlier instant.
fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=16)
        .find_map(|step| {
            tz.from_local_datetime(&(midnight + TimeDelta::minutes(15 * step)))
                .earliest()
        })
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

fn format_utc(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push_str("\\n");
            }
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Appends a CRLF-terminated content line, folded so no physical line is
/// longer than 75 octets.
fn write_line(out: &mut String, line: &str) {
    let mut width = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(ch);
        width += len;
    }
    out.push_str("\r\n");
}

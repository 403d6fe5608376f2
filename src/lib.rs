//! Task tracking core: tasks with derived priority, SQLite storage and
//! iCalendar export.
pub mod calendar;
pub mod color;
pub mod config;
pub mod content_parser;
pub mod database;
pub mod error;
pub mod ics;
pub mod service;
pub mod task;

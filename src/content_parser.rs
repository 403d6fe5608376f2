//! Quick-entry syntax for new tasks: an optional leading `[YYYY-MM-DD]`
//! tag sets the due date, everything after it is the description.
use chrono::NaiveDate;
use winnow::Result;
use winnow::ascii::multispace0;
use winnow::combinator::{delimited, opt, preceded};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

#[derive(Debug, PartialEq)]
pub struct QuickEntry {
    pub due_date: Option<NaiveDate>,
    pub description: String,
}

pub fn parse_entry(input: &str) -> QuickEntry {
    let mut rest = input;
    match preceded(multispace0, opt(parse_date_tag)).parse_next(&mut rest) {
        Ok(due_date) => QuickEntry {
            due_date,
            description: rest.trim().to_string(),
        },
        Err(_) => QuickEntry {
            due_date: None,
            description: input.trim().to_string(),
        },
    }
}

fn parse_date_tag(input: &mut &str) -> Result<NaiveDate> {
    delimited('[', parse_date, ']').parse_next(input)
}

fn parse_date(input: &mut &str) -> Result<NaiveDate> {
    (
        parse_year,
        parse_separator,
        parse_two_digits,
        parse_separator,
        parse_two_digits,
    )
        .verify_map(|(year, _, month, _, day)| NaiveDate::from_ymd_opt(year, month, day))
        .parse_next(input)
}

fn parse_year(input: &mut &str) -> Result<i32> {
    take_while(4usize, '0'..='9')
        .try_map(str::parse::<i32>)
        .parse_next(input)
}

fn parse_two_digits(input: &mut &str) -> Result<u32> {
    take_while(2usize, '0'..='9')
        .try_map(str::parse::<u32>)
        .parse_next(input)
}

fn parse_separator(input: &mut &str) -> Result<char> {
    one_of(['-', '/']).parse_next(input)
}

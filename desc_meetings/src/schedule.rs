//! Recover meeting dates and times from the normalized text of the DESC schedule PDF.
//!
//! The schedule is a table, but after text extraction there are no reliable delimiters left.
//! Dates (`July 14`) and time windows (`1:00 pm - 2:30 pm`) are found independently by pattern,
//! and the n-th date is assumed to go with the n-th time window. If the counts differ that assumption
//! is broken and nothing is produced.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;
use crate::error::ScrapeError;

/// Fragment of the street address expected somewhere in the schedule. If it vanishes, DESC has probably moved
/// and the layout (and [crate::meeting::desc_office]) can't be trusted.
pub const LOCATION_CANARY : &'static str = "440";

static YEAR : Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{4}").unwrap());
static TIME_WINDOW : Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2}:\d{2}\s*[apAP][mM]).*?(\d{1,2}:\d{2}\s*[apAP][mM])").unwrap());
/// A month name, possibly with a stray space or `|` inside it, then the day. Must not be followed by a digit, checked in [find_date_strs].
static DATE : Lazy<Regex> = Lazy::new(|| Regex::new(r"[JFMASOND][a-z|]{0,8}\s?[a-z]{1,8}\s+\d{1,2}").unwrap());

const DATETIME_FORMAT : &'static str = "%B %d %Y %I:%M %p";
/// Only used to check that the date part of a string parses.
const PROBE_TIME : &'static str = "10:30 am";
/// chrono's `%B` also takes `Jun` or `Sep`; the schedule always spells months out.
const MONTH_NAMES : [&'static str; 12] = ["january","february","march","april","may","june","july","august","september","october","november","december"];

/// One meeting from the schedule. Times are local to the agency, without a timezone attached.
#[derive(Serialize,Debug,Clone,Copy,PartialEq,Eq)]
pub struct ScheduleEntry {
    pub start : NaiveDateTime,
    pub end : NaiveDateTime,
}

/// A start and end clock time as written in the PDF, e.g. `9:00 am`.
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct TimeWindow {
    pub start : String,
    pub end : String,
}

/// A date string paired with its time window, before any parsing.
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct DatedWindow {
    pub date : String,
    pub window : TimeWindow,
}

/// The first run of four digits is the year the schedule is for.
pub fn find_year(text:&str) -> Result<&str,ScrapeError> {
    YEAR.find(text).map(|m|m.as_str()).ok_or(ScrapeError::NoYear)
}

pub fn validate_location(text:&str) -> Result<(),ScrapeError> {
    if text.contains(LOCATION_CANARY) { Ok(()) } else { Err(ScrapeError::LocationChanged) }
}

/// Find every `H:MM am ... H:MM pm` pair, in document order.
pub fn find_time_windows(text:&str) -> Vec<TimeWindow> {
    TIME_WINDOW.captures_iter(text).map(|c|TimeWindow{ start: c[1].to_string(), end: c[2].to_string() }).collect()
}

/// Find every month-and-day string, in document order.
/// A candidate whose day runs into further digits (`Schedule 440`) is rejected, and the search resumes one character later.
pub fn find_date_strs(text:&str) -> Vec<&str> {
    let mut res = Vec::new();
    let mut pos = 0;
    while let Some(m) = DATE.find_at(text,pos) {
        if text[m.end()..].starts_with(|c:char|c.is_ascii_digit()) {
            pos = m.start()+text[m.start()..].chars().next().map_or(1,|c|c.len_utf8());
        } else {
            res.push(m.as_str());
            pos = m.end();
        }
    }
    res
}

/// Pair the n-th date with the n-th time window. Fails unless there are exactly as many of each.
pub fn pair_dates_with_windows(dates:Vec<&str>,windows:Vec<TimeWindow>) -> Result<Vec<DatedWindow>,ScrapeError> {
    if dates.len()!=windows.len() { return Err(ScrapeError::Misaligned { dates: dates.len(), times: windows.len() }) }
    Ok(dates.into_iter().zip(windows).map(|(date,window)|DatedWindow{ date: date.to_string(), window }).collect())
}

/// Undo a line join that left a space inside the month name (`J uly 9`).
/// If the date parses as is it is returned unchanged, otherwise the first space is removed.
pub fn resolve_date_str(date:&str,year:&str) -> String {
    if parse_datetime(PROBE_TIME,date,year).is_ok() { date.to_string() }
    else { date.replacen(' ',"",1) }
}

/// Does the date string start with a full month name, in any case?
fn has_full_month_name(date:&str) -> bool {
    let month = date.trim_start().split(|c:char|!c.is_alphabetic()).next().unwrap_or("");
    MONTH_NAMES.iter().any(|name|name.eq_ignore_ascii_case(month))
}

/// Write a clock time as `H:MM am`, whatever spacing and case the PDF used.
fn canonical_clock(time:&str) -> String {
    match time.find(|c:char|c.is_ascii_alphabetic()) {
        Some(split) => format!("{} {}",time[..split].trim(),time[split..].trim().to_lowercase()),
        None => time.trim().to_string(),
    }
}

/// Parse a date string (`July 14`), year and clock time (`1:00 pm`) into a naive local time.
pub fn parse_datetime(time:&str,date:&str,year:&str) -> Result<NaiveDateTime,ScrapeError> {
    let input = format!("{} {} {}",date,year,canonical_clock(time));
    if !has_full_month_name(date) { return Err(ScrapeError::DateParse { input, source: None }) }
    NaiveDateTime::parse_from_str(&input,DATETIME_FORMAT).map_err(|source|ScrapeError::DateParse { input, source: Some(source) })
}

/// Turn one paired date and time window into a [ScheduleEntry].
pub fn resolve_entry(dated:&DatedWindow,year:&str) -> Result<ScheduleEntry,ScrapeError> {
    let date = resolve_date_str(&dated.date,year);
    Ok(ScheduleEntry{
        start: parse_datetime(&dated.window.start,&date,year)?,
        end: parse_datetime(&dated.window.end,&date,year)?,
    })
}

/// Extract all meetings from normalized schedule text (see [crate::normalize::normalize]), in the order they appear.
pub fn extract_schedule(text:&str) -> Result<Vec<ScheduleEntry>,ScrapeError> {
    let year = find_year(text)?;
    validate_location(text)?;
    let windows = find_time_windows(text);
    let dates = find_date_strs(text);
    debug!("Schedule for {} has {} dates and {} time windows",year,dates.len(),windows.len());
    pair_dates_with_windows(dates,windows)?.iter().map(|dated|resolve_entry(dated,year)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(month:u32,day:u32,hour:u32,min:u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022,month,day).unwrap().and_hms_opt(hour,min,0).unwrap()
    }

    #[test]
    fn test_find_year() {
        assert_eq!("2022", find_year("Meetings for 2022 at 440 E. Congress").unwrap());
        assert!(matches!(find_year("no year here, just 440"),Err(ScrapeError::NoYear)));
    }

    #[test]
    fn test_location_canary() {
        assert!(validate_location("DESC, 440 E. Congress, Detroit").is_ok());
        assert!(matches!(validate_location("DESC, 115 Erskine, Detroit"),Err(ScrapeError::LocationChanged)));
    }

    #[test]
    fn test_find_time_windows() {
        let windows = find_time_windows("June 9 9:00 am - 10:00 am July 14 1:00PM to 2:30 pm");
        assert_eq!(vec![
            TimeWindow{ start: "9:00 am".to_string(), end: "10:00 am".to_string() },
            TimeWindow{ start: "1:00PM".to_string(), end: "2:30 pm".to_string() },
        ], windows);
    }

    #[test]
    fn test_find_date_strs() {
        assert_eq!(vec!["June 9","July 14"], find_date_strs("2022 Schedule 440 E. Congress June 9 9:00 am July 14 1:00 pm"));
        assert_eq!(vec!["J uly 9"], find_date_strs("J uly 9 10:00 am"));
        assert_eq!(vec!["Sept|ember 12"], find_date_strs("Sept|ember 12 noon"));
        assert!(find_date_strs("Schedule 440").is_empty());
        assert!(find_date_strs("May 123").is_empty());
    }

    #[test]
    fn test_pairing_requires_equal_counts() {
        let windows = find_time_windows("9:00 am - 10:00 am 1:00 pm - 2:00 pm");
        match pair_dates_with_windows(vec!["June 9"],windows) {
            Err(ScrapeError::Misaligned { dates, times }) => { assert_eq!(1,dates); assert_eq!(2,times); }
            other => panic!("Expected misalignment, got {:?}",other),
        }
    }

    #[test]
    fn test_resolve_spurious_space() {
        assert_eq!("July 9", resolve_date_str("J uly 9","2022"));
        assert_eq!("July 9", resolve_date_str("July 9","2022"));
        let split = parse_datetime("9:00 am",&resolve_date_str("J uly 9","2022"),"2022").unwrap();
        let joined = parse_datetime("9:00 am",&resolve_date_str("July9","2022"),"2022").unwrap();
        let inner = parse_datetime("9:00 am",&resolve_date_str("Jul y 9","2022"),"2022").unwrap();
        assert_eq!(at(7,9,9,0), split);
        assert_eq!(split, joined);
        assert_eq!(split, inner);
    }

    #[test]
    fn test_abbreviated_month_is_rejected() {
        assert!(matches!(parse_datetime("9:00 am","Jun 9","2022"),Err(ScrapeError::DateParse { source: None, .. })));
        assert!(matches!(parse_datetime("9:00 am","Sep 12","2022"),Err(ScrapeError::DateParse { .. })));
        assert_eq!("Jun9", resolve_date_str("Jun 9","2022"));
        assert!(matches!(extract_schedule("2022 440 Jun 9 9:00 am - 10:00 am"),Err(ScrapeError::DateParse { .. })));
        assert_eq!(at(6,9,9,0), parse_datetime("9:00 am","JUNE 9","2022").unwrap());
    }

    #[test]
    fn test_parse_datetime() {
        assert_eq!(at(6,9,21,15), parse_datetime("9:15PM","June 9","2022").unwrap());
        assert_eq!(at(6,9,12,0), parse_datetime("12:00 pm","June 9","2022").unwrap());
        assert!(matches!(parse_datetime("9:00 am","Smarch 9","2022"),Err(ScrapeError::DateParse { .. })));
    }

    #[test]
    fn test_extract_schedule() {
        let text = "2022 Board Schedule 440 E. Congress June 9 9:00 am - 10:00 am J uly 14 1:00 pm - 2:30 pm";
        assert_eq!(vec![
            ScheduleEntry{ start: at(6,9,9,0), end: at(6,9,10,0) },
            ScheduleEntry{ start: at(7,14,13,0), end: at(7,14,14,30) },
        ], extract_schedule(text).unwrap());
    }

    #[test]
    fn test_extract_schedule_fatal_conditions() {
        assert!(matches!(extract_schedule("June 9 9:00 am - 10:00 am"),Err(ScrapeError::NoYear)));
        assert!(matches!(extract_schedule("2022 June 9 9:00 am - 10:00 am"),Err(ScrapeError::LocationChanged)));
        assert!(matches!(extract_schedule("2022 440 E. Congress June 9 July 14 9:00 am - 10:00 am"),Err(ScrapeError::Misaligned { dates: 2, times: 1 })));
    }
}

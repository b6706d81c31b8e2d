//! Meetings as published: schedule entries joined with titles and minutes links.

use chrono::{Datelike, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize,Deserialize};
use crate::documents::{DocumentIndex, LinkRecord};
use crate::schedule::ScheduleEntry;

pub const AGENCY_NAME : &'static str = "Detroit Employment Solutions Corporation";
/// Prefix of every meeting id.
pub const SCRAPER_NAME : &'static str = "det_employment_solutions_corp";

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq)]
pub enum Classification {
    Board,
    Committee,
    #[serde(rename = "Not classified")]
    NotClassified,
}

impl Classification {
    /// `Board` takes precedence over `Committee`. Case sensitive.
    pub fn from_title(title:&str) -> Self {
        if title.contains("Board") { Classification::Board }
        else if title.contains("Committee") { Classification::Committee }
        else { Classification::NotClassified }
    }
}

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Cancelled,
    Tentative,
    Passed,
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Eq)]
pub struct Location {
    pub name : String,
    pub address : String,
}

/// Where every DESC meeting is held.
pub fn desc_office() -> Location {
    Location { name: "DESC".to_string(), address: "440 E. Congress, Detroit, MI 48226".to_string() }
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct MeetingRecord {
    pub title : String,
    pub description : String,
    pub classification : Classification,
    pub start : NaiveDateTime,
    pub end : NaiveDateTime,
    pub all_day : bool,
    pub time_notes : String,
    pub location : Location,
    pub links : Vec<LinkRecord>,
    pub source : String,
    pub status : Status,
    pub id : String,
}

/// Cancelled if the text mentions it, otherwise passed or tentative depending on `now` (agency local time).
pub fn meeting_status(title:&str,description:&str,start:NaiveDateTime,now:NaiveDateTime) -> Status {
    let text = format!("{} {}",title,description).to_lowercase();
    if ["cancel","rescheduled","postpone"].iter().any(|word|text.contains(word)) { Status::Cancelled }
    else if start<now { Status::Passed }
    else { Status::Tentative }
}

static NOT_ID_CHARS : Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9^]+").unwrap());
static WHITESPACE : Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// e.g. `det_employment_solutions_corp/202206090900/x/board_meeting`
pub fn meeting_id(title:&str,start:NaiveDateTime) -> String {
    let spaced = NOT_ID_CHARS.replace_all(title," ");
    let underscored = WHITESPACE.replace_all(&spaced,"_");
    let underscore_title = underscored.trim_matches('_').to_lowercase();
    format!("{}/{}/x/{}",SCRAPER_NAME,start.format("%Y%m%d%H%M"),underscore_title)
}

/// Build one record per schedule entry, in schedule order. Entries are never merged.
/// Months with nothing on the minutes page get the agency name as title and no links.
pub fn assemble_meetings(entries:&[ScheduleEntry],index:&DocumentIndex,source:&str,now:NaiveDateTime) -> Vec<MeetingRecord> {
    entries.iter().map(|entry|{
        let key = (entry.start.month(),entry.start.year());
        let title = index.title_for(key).unwrap_or(AGENCY_NAME).to_string();
        let description = String::new();
        MeetingRecord {
            classification: Classification::from_title(&title),
            start: entry.start,
            end: entry.end,
            all_day: false,
            time_notes: String::new(),
            location: desc_office(),
            links: index.links_for(key),
            source: source.to_string(),
            status: meeting_status(&title,&description,entry.start,now),
            id: meeting_id(&title,entry.start),
            description,
            title,
        }
    }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::documents::DocumentRow;

    fn at(month:u32,day:u32,hour:u32,min:u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022,month,day).unwrap().and_hms_opt(hour,min,0).unwrap()
    }

    #[test]
    fn test_classification() {
        assert_eq!(Classification::Board, Classification::from_title("Board of Directors Meeting"));
        assert_eq!(Classification::Committee, Classification::from_title("Finance Committee"));
        assert_eq!(Classification::NotClassified, Classification::from_title("Staff Update"));
        assert_eq!(Classification::Board, Classification::from_title("Board Committee Joint"));
        assert_eq!(Classification::NotClassified, Classification::from_title("board meeting"));
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!("\"Not classified\"", serde_json::to_string(&Classification::NotClassified).unwrap());
        assert_eq!("\"Board\"", serde_json::to_string(&Classification::Board).unwrap());
        assert_eq!("\"passed\"", serde_json::to_string(&Status::Passed).unwrap());
    }

    #[test]
    fn test_meeting_status() {
        let now = at(7,1,0,0);
        assert_eq!(Status::Passed, meeting_status("Board Meeting","",at(6,9,9,0),now));
        assert_eq!(Status::Tentative, meeting_status("Board Meeting","",at(7,14,13,0),now));
        assert_eq!(Status::Cancelled, meeting_status("Board Meeting - CANCELLED","",at(7,14,13,0),now));
        assert_eq!(Status::Cancelled, meeting_status("Board Meeting","Postponed to August",at(6,9,9,0),now));
    }

    #[test]
    fn test_meeting_id() {
        assert_eq!("det_employment_solutions_corp/202206090900/x/board_meeting", meeting_id("Board Meeting",at(6,9,9,0)));
        assert_eq!("det_employment_solutions_corp/202207141300/x/finance_audit_committee", meeting_id(" Finance & Audit Committee! ",at(7,14,13,0)));
    }

    #[test]
    fn test_unmatched_month_falls_back() {
        let mut index = DocumentIndex::default();
        index.add(DocumentRow{ date: NaiveDate::from_ymd_opt(2022,6,9).unwrap(), title: "Finance Committee".to_string(), href: "/min1.pdf".to_string() });
        let entries = [
            ScheduleEntry{ start: at(6,23,9,0), end: at(6,23,10,0) },
            ScheduleEntry{ start: at(8,11,9,0), end: at(8,11,10,0) },
        ];
        let meetings = assemble_meetings(&entries,&index,"https://example.org/",at(1,1,0,0));
        assert_eq!(2, meetings.len());
        assert_eq!("Finance Committee", meetings[0].title);
        assert_eq!(Classification::Committee, meetings[0].classification);
        assert_eq!(1, meetings[0].links.len());
        assert_eq!(AGENCY_NAME, meetings[1].title);
        assert_eq!(Classification::NotClassified, meetings[1].classification);
        assert!(meetings[1].links.is_empty());
        assert_eq!(Status::Tentative, meetings[1].status);
        assert_eq!(desc_office(), meetings[1].location);
        assert!(!meetings[1].all_day);
    }
}

//! Parse the DESC minutes page into links and titles keyed by month and year.

use std::collections::HashMap;
use anyhow::anyhow;
use chrono::{Datelike, NaiveDate};
use scraper::{ElementRef, Html, Selector};
use serde::{Serialize,Deserialize};
use tracing::debug;
use crate::error::ScrapeError;

/// Join key between the schedule and the minutes page.
pub type MonthYear = (u32,i32);

/// A document attached to a meeting.
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Eq)]
pub struct LinkRecord {
    pub title : String,
    pub href : String,
}

/// One block on the minutes page.
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct DocumentRow {
    pub date : NaiveDate,
    pub title : String,
    pub href : String,
}

/// Links and titles from the minutes page. The two maps miss differently: no links is an empty list,
/// no title is `None` so the caller can substitute a fallback.
#[derive(Debug,Default)]
pub struct DocumentIndex {
    links : HashMap<MonthYear,Vec<LinkRecord>>,
    titles : HashMap<MonthYear,String>,
}

impl DocumentIndex {
    /// Add a row. Links for the same month accumulate in row order; the title of the last row for a month wins.
    pub fn add(&mut self,row:DocumentRow) {
        let key = (row.date.month(),row.date.year());
        self.links.entry(key).or_insert_with(Vec::new).push(LinkRecord{ title: "Minutes".to_string(), href: row.href });
        self.titles.insert(key,row.title);
    }

    pub fn links_for(&self,key:MonthYear) -> Vec<LinkRecord> {
        self.links.get(&key).cloned().unwrap_or_default()
    }

    /// The title for a month, if there is a non-empty one.
    pub fn title_for(&self,key:MonthYear) -> Option<&str> {
        self.titles.get(&key).map(|s|s.as_str()).filter(|s|!s.is_empty())
    }
}

/// Parse `M/D/YYYY`.
pub fn parse_document_date(text:&str) -> Result<NaiveDate,ScrapeError> {
    let bad = || ScrapeError::BadDocumentDate(text.to_string());
    let parts : Vec<&str> = text.trim().split('/').collect();
    if parts.len()!=3 { return Err(bad()) }
    let month : u32 = parts[0].trim().parse().map_err(|_|bad())?;
    let day : u32 = parts[1].trim().parse().map_err(|_|bad())?;
    let year : i32 = parts[2].trim().parse().map_err(|_|bad())?;
    NaiveDate::from_ymd_opt(year,month,day).ok_or_else(bad)
}

/// The first text node directly inside any of the elements, ignoring text nested in child elements.
fn first_own_text<'a>(elements:impl Iterator<Item=ElementRef<'a>>) -> Option<&'a str> {
    elements.flat_map(|e|e.children().filter_map(|c|c.value().as_text().map(|t|&**t))).next()
}

fn selector(s:&str) -> anyhow::Result<Selector> {
    Selector::parse(s).map_err(|e|anyhow!("Could not parse selector `{}` error {:?}",s,e))
}

/// Parse minutes page html.
/// A typical block will look like
/// ```text
/// <div class="meeting-min_inner-wrapper">
///     <p>6/9/2022</p>
///     <h3>Board of Directors Meeting</h3>
///     <a href="https://www.descmiworks.com/wp-content/uploads/Board-Minutes-June-2022.pdf">Download</a>
/// </div>
/// ```
/// Only text directly inside `p` and `h3` counts. A block without a date is an error. A missing link gives an empty href and a missing heading an empty title.
pub fn parse_document_rows(html:&str) -> anyhow::Result<Vec<DocumentRow>> {
    let html = Html::parse_document(html);
    let select_row = selector(r#"div[class="meeting-min_inner-wrapper"]"#)?;
    let select_p = selector("p")?;
    let select_h3 = selector("h3")?;
    let select_a = selector("a")?;
    let mut rows = Vec::new();
    for div in html.select(&select_row) {
        let date_text = first_own_text(div.select(&select_p)).ok_or_else(||anyhow!("Could not find date in minutes block"))?;
        let date = parse_document_date(date_text)?;
        let title = first_own_text(div.select(&select_h3)).unwrap_or("").trim().to_string();
        let href = div.select(&select_a).find_map(|a|a.value().attr("href")).unwrap_or("").to_string();
        rows.push(DocumentRow{ date, title, href });
    }
    Ok(rows)
}

pub fn build_document_index(html:&str) -> anyhow::Result<DocumentIndex> {
    let mut index = DocumentIndex::default();
    let rows = parse_document_rows(html)?;
    debug!("Found {} minutes blocks",rows.len());
    for row in rows { index.add(row); }
    Ok(index)
}

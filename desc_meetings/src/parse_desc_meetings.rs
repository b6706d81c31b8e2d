//! Crawl the public meetings of the Detroit Employment Solutions Corporation, https://www.descmiworks.com/about-us/public-meetings/.
//!
//! The crawl has three steps, each fetching one page and handing what it learned to the next:
//! * the entry page gives the URLs of the schedule PDF and the minutes page ([EntryLinks]);
//! * the schedule PDF gives the meeting times ([ScheduledCrawl]);
//! * the minutes page gives titles and links, which are joined to the times by month and year.
//!
//! Any failure aborts the whole crawl. A partial list would mean dates and times that might be misaligned.

use std::path::Path;
use anyhow::{anyhow, Context};
use chrono::{NaiveDateTime, Utc};
use itertools::Itertools;
use scraper::{Html, Selector};
use tracing::info;
use crate::config::Config;
use crate::documents::build_document_index;
use crate::error::ScrapeError;
use crate::meeting::{assemble_meetings, MeetingRecord};
use crate::normalize::normalize;
use crate::parse_pdf_util::extract_pdf_text;
use crate::parse_util::{download_to_file, relative_url, Fetcher};
use crate::schedule::{extract_schedule, ScheduleEntry};

/// Where to find the schedule and the minutes, resolved against the entry page.
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct EntryLinks {
    pub schedule_url : String,
    pub documents_url : String,
}

/// Parse the entry page. A link whose text mentions `Schedule` is the schedule PDF, otherwise one mentioning
/// `Minutes` is the minutes page. If there are several, the last one wins. Such a link without a `href` is an error.
pub fn parse_entry_page(html:&str,page_url:&str) -> anyhow::Result<EntryLinks> {
    let html = Html::parse_document(html);
    let select_a = Selector::parse("a").map_err(|e|anyhow!("Could not parse selector `a` error {:?}",e))?;
    let mut schedule : Option<&str> = None;
    let mut minutes : Option<&str> = None;
    for a in html.select(&select_a) {
        let link_text = a.text().join(" ");
        if link_text.contains("Schedule") {
            schedule = Some(a.value().attr("href").ok_or(ScrapeError::MissingLinks { schedule: false, minutes: minutes.is_some() })?);
        } else if link_text.contains("Minutes") {
            minutes = Some(a.value().attr("href").ok_or(ScrapeError::MissingLinks { schedule: schedule.is_some(), minutes: false })?);
        }
    }
    match (schedule,minutes) {
        (Some(schedule),Some(minutes)) if !schedule.is_empty() && !minutes.is_empty() => Ok(EntryLinks{
            schedule_url: relative_url(page_url,schedule.trim())?,
            documents_url: relative_url(page_url,minutes.trim())?,
        }),
        (schedule,minutes) => Err(ScrapeError::MissingLinks { schedule: schedule.map_or(false,|s|!s.is_empty()), minutes: minutes.map_or(false,|s|!s.is_empty()) }.into()),
    }
}

/// The meeting times from the schedule, waiting for the minutes page.
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct ScheduledCrawl {
    pub documents_url : String,
    pub entries : Vec<ScheduleEntry>,
}

impl EntryLinks {
    /// Extract the schedule from the raw text of the schedule PDF.
    pub fn with_schedule(self,raw_pdf_text:&str) -> Result<ScheduledCrawl,ScrapeError> {
        let entries = extract_schedule(&normalize(raw_pdf_text))?;
        Ok(ScheduledCrawl{ documents_url: self.documents_url, entries })
    }
}

impl ScheduledCrawl {
    /// Join the schedule with the minutes page. `source` is recorded in each meeting; `now` is agency local time.
    pub fn into_meetings(self,documents_html:&str,source:&str,now:NaiveDateTime) -> anyhow::Result<Vec<MeetingRecord>> {
        let index = build_document_index(documents_html)?;
        Ok(assemble_meetings(&self.entries,&index,source,now))
    }
}

async fn fetch_text<F:Fetcher>(fetcher:&F,url:&str) -> anyhow::Result<String> {
    let bytes = fetcher.fetch(url).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Crawl with a custom way of getting text out of the downloaded schedule PDF.
pub async fn crawl_with<F:Fetcher>(fetcher:&F,config:&Config,now:NaiveDateTime,pdf_to_text:impl Fn(&Path)->anyhow::Result<String>) -> anyhow::Result<Vec<MeetingRecord>> {
    let start_url = config.start_url.as_str();
    let entry_page = fetch_text(fetcher,start_url).await.with_context(||start_url.to_string())?;
    let links = parse_entry_page(&entry_page,start_url).with_context(||start_url.to_string())?;

    let schedule_url = links.schedule_url.clone();
    let pdf_file = download_to_file(fetcher,&schedule_url,Path::new(&config.temp_dir)).await.with_context(||schedule_url.clone())?;
    let raw_text = pdf_to_text(pdf_file.path()).with_context(||schedule_url.clone())?;
    let scheduled = links.with_schedule(&raw_text).with_context(||schedule_url.clone())?;
    info!("Found {} meetings in schedule {}",scheduled.entries.len(),schedule_url);

    let documents_url = scheduled.documents_url.clone();
    let documents_page = fetch_text(fetcher,&documents_url).await.with_context(||documents_url.clone())?;
    let meetings = scheduled.into_meetings(&documents_page,start_url,now).with_context(||documents_url.clone())?;
    info!("Produced {} meetings",meetings.len());
    Ok(meetings)
}

/// Crawl the live site (or whatever `fetcher` provides), judging past meetings by the current time in the agency's timezone.
pub async fn crawl<F:Fetcher>(fetcher:&F,config:&Config) -> anyhow::Result<Vec<MeetingRecord>> {
    let now = Utc::now().with_timezone(&config.timezone).naive_local();
    crawl_with(fetcher,config,now,extract_pdf_text).await
}

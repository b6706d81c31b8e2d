pub mod config;
pub mod error;
pub mod normalize;
pub mod schedule;
pub mod documents;
pub mod meeting;
mod parse_pdf_util;
pub mod parse_util;
pub mod parse_desc_meetings;

//! Clean up text pulled out of the DESC schedule PDF.
//!
//! A naive text extraction of that PDF has two kinds of damage:
//! * some pairs of glyphs come out twice in a row, e.g. `1414` for `14`;
//! * lines are broken in the middle of tokens, e.g. `J\nuly`.
//!
//! [normalize] undoes both and returns everything on one line with single spaces.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE : Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Characters that the extractor is known to double up.
fn is_doubled_glyph(c:char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c==':' || c=='\n' || c==' '
}

/// A line break after one of these is a split in the middle of a token.
fn ends_broken_token(c:char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c==':'
}

/// Replace any two doubled-glyph characters immediately followed by the same two characters with a single copy.
/// Scans left to right without overlap, so `ABABAB` becomes `ABAB`.
pub fn collapse_repeated_pairs(text:&str) -> String {
    let chars : Vec<char> = text.chars().collect();
    let mut res = String::with_capacity(text.len());
    let mut i = 0;
    while i<chars.len() {
        if i+3<chars.len() && is_doubled_glyph(chars[i]) && is_doubled_glyph(chars[i+1]) && chars[i]==chars[i+2] && chars[i+1]==chars[i+3] {
            res.push(chars[i]);
            res.push(chars[i+1]);
            i+=4;
        } else {
            res.push(chars[i]);
            i+=1;
        }
    }
    res
}

/// Delete line breaks that directly follow an uppercase letter, digit or colon, and turn every other line break into a space.
/// The preceding character is looked up in the input, so in `A\n\n` only the first break is deleted.
pub fn join_broken_lines(text:&str) -> String {
    let mut res = String::with_capacity(text.len());
    let mut previous : Option<char> = None;
    for c in text.chars() {
        if c=='\n' {
            if !previous.map_or(false,ends_broken_token) { res.push(' '); }
        } else {
            res.push(c);
        }
        previous=Some(c);
    }
    res
}

/// Full clean up of raw PDF text, giving a single line.
pub fn normalize(raw:&str) -> String {
    let text = collapse_repeated_pairs(raw);
    let text = join_broken_lines(&text);
    WHITESPACE.replace_all(&text," ").into_owned()
}

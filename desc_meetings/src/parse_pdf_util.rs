use std::path::Path;
use pdf::content::Operation;
use pdf::primitive::Primitive;

fn push_pdf_string(res:&mut String,p:&Primitive) {
    if let Ok(s) = p.as_string().and_then(|s|s.as_str()) { res.push_str(&s); }
}

/// The text shown by a text operator. `TJ` has an array mixing strings with kerning numbers,
/// `Tj` and `'` a single string, `"` two spacing numbers then a string. Numbers are dropped.
fn shown_text(op:&Operation) -> String {
    let mut res = String::new();
    for operand in &op.operands {
        match operand.as_array() {
            Ok(parts) => for part in parts { push_pdf_string(&mut res,part) },
            Err(_) => push_pdf_string(&mut res,operand),
        }
    }
    res
}

/// Append what a naive extractor makes of one content stream operator:
/// `TJ` and `T*` end a line, `'` and `"` start one, `Tj` just adds text.
fn push_operator_text(res:&mut String,operator:&str,shown:impl FnOnce()->String) {
    match operator {
        "Tj" => res.push_str(&shown()),
        "TJ" => { res.push_str(&shown()); res.push('\n'); }
        "T*" => res.push('\n'),
        "'" | "\"" => { res.push('\n'); res.push_str(&shown()); }
        _ => {}
    }
}

/// Take a PDF file and extract all its text, page after page, the way a naive extractor does.
/// Kerning inside `TJ` is ignored, so words can come out split or glued together.
/// See [crate::normalize] for cleaning this up.
pub(crate) fn extract_pdf_text(path:&Path) -> anyhow::Result<String> {
    let mut res = String::new();
    let pdf = pdf::file::File::open(path)?;
    for page in pdf.pages() {
        let page = page?;
        if let Some(content) = &page.contents {
            for op in &content.operations {
                push_operator_text(&mut res,&op.operator,||shown_text(op));
            }
        }
    }
    Ok(res)
}

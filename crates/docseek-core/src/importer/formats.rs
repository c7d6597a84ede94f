use std::path::Path;

use crate::error::{DocseekError, Result};

/// RTF groups whose contents are metadata, not body text.
const RTF_SKIPPED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "header",
    "footer",
    "listtable",
    "listoverridetable",
    "generator",
];

pub(super) fn plain_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{FEFF}').unwrap_or(&text).to_string()
}

#[cfg(feature = "markdown")]
pub(super) fn markdown_text(content: &str) -> String {
    use pulldown_cmark::{Event, Options, Parser, TagEnd};

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut out = String::with_capacity(content.len());
    for event in Parser::new_ext(content, options) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::TableRow
                | TagEnd::TableHead,
            ) => out.push('\n'),
            Event::End(TagEnd::TableCell) => out.push(' '),
            _ => {}
        }
    }
    out.trim().to_string()
}

#[cfg(not(feature = "markdown"))]
pub(super) fn markdown_text(content: &str) -> String {
    content.trim().to_string()
}

pub(super) fn rtf_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() / 2);
    let mut chars = raw.chars().peekable();
    let mut group_skips = Vec::new();
    let mut skipping = false;
    let mut unicode_fallback = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '{' => group_skips.push(skipping),
            '}' => skipping = group_skips.pop().unwrap_or(false),
            '\\' => {
                let Some(&next) = chars.peek() else {
                    break;
                };
                if next.is_ascii_alphabetic() {
                    let mut word = String::new();
                    while let Some(&ch) = chars.peek().filter(|ch| ch.is_ascii_alphabetic()) {
                        word.push(ch);
                        chars.next();
                    }
                    let mut param = String::new();
                    if chars.peek() == Some(&'-') {
                        param.push('-');
                        chars.next();
                    }
                    while let Some(&ch) = chars.peek().filter(|ch| ch.is_ascii_digit()) {
                        param.push(ch);
                        chars.next();
                    }
                    if chars.peek() == Some(&' ') {
                        chars.next();
                    }
                    if skipping {
                        continue;
                    }
                    match word.as_str() {
                        "par" | "line" | "row" | "sect" | "page" => out.push('\n'),
                        "tab" | "cell" => out.push('\t'),
                        "u" => {
                            if let Some(ch) = param
                                .parse::<i32>()
                                .ok()
                                .map(|code| if code < 0 { code + 0x1_0000 } else { code })
                                .and_then(|code| u32::try_from(code).ok())
                                .and_then(char::from_u32)
                            {
                                out.push(ch);
                            }
                            unicode_fallback = 1;
                        }
                        word if RTF_SKIPPED_DESTINATIONS.contains(&word) => skipping = true,
                        _ => {}
                    }
                } else {
                    chars.next();
                    match next {
                        '\'' => {
                            let hex = chars.by_ref().take(2).collect::<String>();
                            if skipping {
                                continue;
                            }
                            if unicode_fallback > 0 {
                                unicode_fallback -= 1;
                                continue;
                            }
                            if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                                out.push(char::from(byte));
                            }
                        }
                        '*' => skipping = true,
                        '\\' | '{' | '}' if !skipping => out.push(next),
                        '~' if !skipping => out.push(' '),
                        '\n' | '\r' if !skipping => out.push('\n'),
                        _ => {}
                    }
                }
            }
            '\r' | '\n' => {}
            _ if skipping => {}
            _ if unicode_fallback > 0 => unicode_fallback -= 1,
            _ => out.push(c),
        }
    }

    out.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(feature = "docx")]
pub(super) fn docx_text(path: &Path, limit: u64) -> Result<String> {
    use std::io::Read;

    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut entry = match archive.by_name("word/document.xml") {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(DocseekError::Validation(format!(
                "docx has no word/document.xml: {}",
                path.display()
            )));
        }
        Err(err) => return Err(err.into()),
    };
    let mut xml = Vec::new();
    (&mut entry).take(limit).read_to_end(&mut xml)?;
    Ok(word_xml_text(&String::from_utf8_lossy(&xml)))
}

#[cfg(not(feature = "docx"))]
pub(super) fn docx_text(path: &Path, _limit: u64) -> Result<String> {
    Err(DocseekError::Unsupported(format!(
        "built without docx support: {}",
        path.display()
    )))
}

/// Body text of a WordprocessingML part: one line per `w:p`, tags dropped,
/// entities decoded.
pub(super) fn word_xml_text(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len() / 4);
    let mut run = String::new();
    let mut rest = xml;

    while let Some(open) = rest.find('<') {
        run.push_str(&rest[..open]);
        let Some(close) = rest[open..].find('>') else {
            rest = "";
            break;
        };
        let tag = &rest[open + 1..open + close];
        let name = tag
            .trim_end_matches('/')
            .split_whitespace()
            .next()
            .unwrap_or_default();
        match name {
            "/w:p" => {
                out.push_str(&decode_xml_entities(&run));
                out.push('\n');
                run.clear();
            }
            "w:tab" => run.push('\t'),
            "w:br" | "w:cr" => run.push('\n'),
            _ => {}
        }
        rest = &rest[open + close + 1..];
    }
    run.push_str(rest);
    out.push_str(&decode_xml_entities(&run));

    out.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_xml_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let Some(semi) = tail.find(';').filter(|idx| *idx <= 10) else {
            out.push('&');
            rest = &tail[1..];
            continue;
        };
        let entity = &tail[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };
        match decoded {
            Some(ch) => {
                out.push(ch);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

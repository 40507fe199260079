//! Splitting one markdown document into per-table files.
//!
//! Large sourcebooks often keep dozens of tables in a single document. Each
//! `#` heading becomes a directory; every `##`/`###` section under it becomes
//! its own table file named after the heading path.

use std::path::PathBuf;

/// A table file produced by [`split_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitFile {
    /// Path relative to the output directory.
    pub path: PathBuf,
    /// The section's non-blank lines.
    pub content: String,
}

#[derive(Default)]
struct Headings {
    h1: String,
    h2: String,
    h3: String,
}

impl Headings {
    fn file_name(&self) -> String {
        let mut name = if self.h1.is_empty() {
            String::new()
        } else {
            format!("{0}/{0}", self.h1)
        };
        for heading in [&self.h2, &self.h3] {
            if heading.is_empty() {
                continue;
            }
            if !name.is_empty() {
                name.push_str(" - ");
            }
            name.push_str(heading);
        }
        if name.is_empty() {
            name.push_str("Table");
        }
        name
    }
}

/// Split a document into table files at its headings. Blank lines are
/// dropped and sections without content produce no file.
pub fn split_document<S: AsRef<str>>(lines: &[S], extension: &str) -> Vec<SplitFile> {
    let mut files = Vec::new();
    let mut headings = Headings::default();
    let mut section: Vec<&str> = Vec::new();

    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        let (level, title) = if let Some(title) = line.strip_prefix("###") {
            (3, title)
        } else if let Some(title) = line.strip_prefix("##") {
            (2, title)
        } else if let Some(title) = line.strip_prefix('#') {
            (1, title)
        } else {
            section.push(line);
            continue;
        };

        flush(&headings, &mut section, extension, &mut files);
        let title = title.trim_start_matches('#').trim().to_string();
        match level {
            1 => {
                headings = Headings {
                    h1: title,
                    ..Headings::default()
                }
            }
            2 => {
                headings.h2 = title;
                headings.h3.clear();
            }
            _ => headings.h3 = title,
        }
    }
    flush(&headings, &mut section, extension, &mut files);
    files
}

fn flush(headings: &Headings, section: &mut Vec<&str>, extension: &str, files: &mut Vec<SplitFile>) {
    if section.is_empty() {
        return;
    }
    let name = sanitize_file_name(&headings.file_name());
    let mut parts: Vec<&str> = name.split('/').filter(|part| !part.is_empty()).collect();
    let file = format!("{}.{extension}", parts.pop().unwrap_or("Table"));
    let mut path: PathBuf = parts.into_iter().collect();
    path.push(file);
    let mut content = section.join("\n");
    content.push('\n');
    section.clear();
    files.push(SplitFile { path, content });
}

/// Strip characters that are awkward in file names and title-case the rest.
pub fn sanitize_file_name(name: &str) -> String {
    let mut name = name.replace(['?', '\'', '"', '&', ','], "").replace(':', "-");
    while name.contains("  ") {
        name = name.replace("  ", " ");
    }
    let titled = title_case(&name);
    titled
        .split('/')
        .map(str::trim)
        .filter(|part| !part.is_empty() && part.chars().any(|c| c != '.'))
        .collect::<Vec<_>>()
        .join("/")
}

/// Uppercase the first letter of every word and lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;
    for c in s.chars() {
        if c.is_alphanumeric() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}

//! Heading-delimited sections of a knowledge base document.
//!
//! A section starts after a markdown heading line (`#` to `######`) and runs up to the
//! next heading of the same or a higher level, so sub-headings stay inside their parent.

use regex::Regex;
use std::sync::LazyLock;

pub const MEDICATIONS: &str = "Medications";
pub const VITAL_SIGNS: &str = "Target Vital Signs";
pub const DAILY_ROUTINE: &str = "Daily Health Routine";
pub const EMERGENCY_CONTACTS: &str = "Emergency Contacts";
pub const APPOINTMENTS: &str = "Upcoming Appointments";

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(#{1,6})[ \t]+(.*?)(?:[ \t]+#+)?[ \t]*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heading<'a> {
    pub level: usize,
    pub label: &'a str,
}

/// Parse a single line as a markdown heading.
pub fn parse_heading(line: &str) -> Option<Heading<'_>> {
    let caps = HEADING.captures(line)?;
    let level = caps.get(1)?.as_str().len();
    let label = caps.get(2)?.as_str().trim();

    Some(Heading { level, label })
}

/// ```` ``` ```` or `~~~` opening or closing a fenced code block.
fn fence_marker(line: &str) -> Option<char> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    if trimmed.starts_with("```") {
        Some('`')
    } else if trimmed.starts_with("~~~") {
        Some('~')
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub level: usize,
    pub label: &'a str,
    pub body: &'a str,
}

/// All sections of a document, in document order.
#[derive(Debug, Clone, Default)]
pub struct Sections<'a> {
    sections: Vec<Section<'a>>,
}

impl<'a> Sections<'a> {
    pub fn split(document: &'a str) -> Self {
        // (line start, heading, body start) for every heading line.
        let mut headings: Vec<(usize, Heading<'a>, usize)> = Vec::new();
        let mut offset = 0;

        // Marker of the open code fence; `#` lines inside one are not headings.
        let mut fence: Option<char> = None;

        for line in document.split_inclusive('\n') {
            let content = line.trim_end_matches(['\n', '\r']);
            if let Some(marker) = fence_marker(content) {
                match fence {
                    None => fence = Some(marker),
                    Some(open) if open == marker => fence = None,
                    Some(_) => {}
                }
            } else if fence.is_none() {
                if let Some(heading) = parse_heading(content) {
                    headings.push((offset, heading, offset + line.len()));
                }
            }
            offset += line.len();
        }

        let sections = headings
            .iter()
            .enumerate()
            .map(|(i, (_, heading, body_start))| {
                let body_end = headings[i + 1..]
                    .iter()
                    .find(|(_, next, _)| next.level <= heading.level)
                    .map(|(line_start, _, _)| *line_start)
                    .unwrap_or(document.len());

                Section {
                    level: heading.level,
                    label: heading.label,
                    body: &document[*body_start..body_end],
                }
            })
            .collect();

        Self { sections }
    }

    /// Body of the first section whose heading is exactly `label`, or `""`.
    pub fn get(&self, label: &str) -> &'a str {
        self.sections
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.body)
            .unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section<'a>> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Text under the heading `label` up to the next heading of the same or higher level.
pub fn extract_section<'a>(document: &'a str, label: &str) -> &'a str {
    Sections::split(document).get(label)
}

/// Split a section body into `(sub-heading, body)` blocks. Text before the first
/// sub-heading is dropped.
pub fn sub_blocks(body: &str) -> Vec<(&str, &str)> {
    let sections = Sections::split(body);
    let Some(level) = sections.iter().map(|s| s.level).min() else {
        return Vec::new();
    };

    sections
        .iter()
        .filter(|s| s.level == level)
        .map(|s| (s.label, s.body))
        .collect()
}

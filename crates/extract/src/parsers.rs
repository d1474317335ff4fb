//! Line-pattern extractors. Each takes a block of text and returns whatever records it
//! can find; lines that don't fit are skipped.

use regex::Regex;
use std::sync::LazyLock;

use crate::schema::{
    Activity, Appointment, ContactRole, EmergencyContact, Medication, PersonalInfo,
    VitalSignsUpdate,
};
use crate::sections::sub_blocks;

/// `Label: value`, optionally bulleted and/or bold (`**Label:**`, `**Label**:`).
static FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[ \t]*(?:[-*+][ \t]+)?(?:\*\*)?([A-Za-z][A-Za-z0-9 ()/-]*?)(?:\*\*)?[ \t]*:(?:\*\*)?[ \t]*(.*?)[ \t]*$",
    )
    .unwrap()
});

/// `- <time>: <name> (<duration>)`
static ACTIVITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*-[ \t]+(.+?):[ \t]+(.+?)[ \t]+\(([^()]+)\)[ \t]*$").unwrap()
});

/// `- <doctor> (<specialty>): <date>`
static APPOINTMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*-[ \t]+(.+?)[ \t]+\(([^()]+)\):[ \t]+(.+?)[ \t]*$").unwrap()
});

const HEART_RATE: &[&str] = &["Heart Rate"];
const BLOOD_PRESSURE: &[&str] = &["Blood Pressure"];
const TEMPERATURE: &[&str] = &["Temperature"];
const OXYGEN: &[&str] = &["Oxygen Level", "Oxygen Saturation", "Oxygen"];
const GLUCOSE: &[&str] = &["Glucose Level", "Blood Glucose", "Glucose"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub label: &'a str,
    pub value: &'a str,
}

pub fn parse_field(line: &str) -> Option<Field<'_>> {
    let caps = FIELD.captures(line)?;
    Some(Field {
        label: caps.get(1)?.as_str().trim(),
        value: caps.get(2)?.as_str(),
    })
}

fn fields(block: &str) -> impl Iterator<Item = Field<'_>> {
    block.lines().filter_map(parse_field)
}

/// Value of the first non-empty line labelled with any of `labels`.
pub fn first_value(block: &str, labels: &[&str]) -> Option<String> {
    fields(block)
        .find(|f| labels.contains(&f.label) && !f.value.is_empty())
        .map(|f| f.value.to_string())
}

/// Sub-heading blocks with a `Dosage:` and a `Schedule:` line. Blocks missing either are skipped.
pub fn parse_medications(section: &str) -> Vec<Medication> {
    sub_blocks(section)
        .into_iter()
        .filter_map(|(name, body)| {
            let dosage = first_value(body, &["Dosage"])?;
            let schedule = first_value(body, &["Schedule"])?;
            let time = schedule
                .split(',')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();

            Some(Medication {
                name: name.to_string(),
                dosage,
                time,
                instructions: first_value(body, &["Instructions"]),
            })
        })
        .collect()
}

pub fn parse_vital_signs(section: &str) -> VitalSignsUpdate {
    VitalSignsUpdate {
        heart_rate: first_value(section, HEART_RATE),
        blood_pressure: first_value(section, BLOOD_PRESSURE),
        temperature: first_value(section, TEMPERATURE),
        oxygen_level: first_value(section, OXYGEN),
        glucose_level: first_value(section, GLUCOSE),
    }
}

pub fn parse_activities(section: &str) -> Vec<Activity> {
    section
        .lines()
        .filter_map(|line| {
            let caps = ACTIVITY.captures(line)?;
            Some(Activity {
                time: caps[1].trim().to_string(),
                name: caps[2].trim().to_string(),
                duration: caps[3].trim().to_string(),
            })
        })
        .collect()
}

pub fn parse_appointments(section: &str) -> Vec<Appointment> {
    section
        .lines()
        .filter_map(|line| {
            let caps = APPOINTMENT.captures(line)?;
            Some(Appointment {
                doctor: caps[1].trim().to_string(),
                specialty: caps[2].trim().to_string(),
                date: caps[3].trim().to_string(),
            })
        })
        .collect()
}

/// `Name:` followed by `Phone:`. A name without a phone before the next name is dropped.
pub fn parse_contacts(section: &str) -> Vec<EmergencyContact> {
    let mut contacts = Vec::new();
    let mut pending_name: Option<&str> = None;

    for field in fields(section) {
        match field.label {
            "Name" if !field.value.is_empty() => pending_name = Some(field.value),
            "Phone" if !field.value.is_empty() => {
                if let Some(name) = pending_name.take() {
                    contacts.push(EmergencyContact {
                        name: name.to_string(),
                        role: ContactRole::infer(name),
                        phone: field.value.to_string(),
                    });
                }
            }
            _ => {}
        }
    }

    contacts
}

/// Looked up over the whole document; the first match of each label wins.
pub fn parse_personal_info(document: &str) -> PersonalInfo {
    let age = first_value(document, &["Age"])
        .and_then(|v| {
            let digits: String = v.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        })
        .unwrap_or(0);

    PersonalInfo {
        name: first_value(document, &["Name"]).unwrap_or_default(),
        age,
        blood_type: first_value(document, &["Blood Type"]).unwrap_or_default(),
        weight: first_value(document, &["Weight"]).unwrap_or_default(),
        height: first_value(document, &["Height"]).unwrap_or_default(),
    }
}

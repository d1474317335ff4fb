pub mod parsers;
pub mod schema;
pub mod sections;

pub use schema::{
    Activity, Appointment, ContactRole, EmergencyContact, HealthProfile, Medication,
    PersonalInfo, VitalSignsTargets, VitalSignsUpdate,
};
pub use sections::{Sections, extract_section};

/// Parse a sanitized knowledge base document. Never fails: anything missing or
/// malformed comes back empty.
pub fn parse_document(document: &str) -> HealthProfile {
    let sections = Sections::split(document);

    let profile = HealthProfile {
        personal_info: parsers::parse_personal_info(document),
        vitals: parsers::parse_vital_signs(sections.get(sections::VITAL_SIGNS)),
        medications: parsers::parse_medications(sections.get(sections::MEDICATIONS)),
        appointments: parsers::parse_appointments(sections.get(sections::APPOINTMENTS)),
        activities: parsers::parse_activities(sections.get(sections::DAILY_ROUTINE)),
        contacts: parsers::parse_contacts(sections.get(sections::EMERGENCY_CONTACTS)),
    };

    tracing::debug!(
        sections = sections.len(),
        medications = profile.medications.len(),
        appointments = profile.appointments.len(),
        activities = profile.activities.len(),
        contacts = profile.contacts.len(),
        vitals = profile.vitals.present_count(),
        "Parsed knowledge base document"
    );

    profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingest::{KnowledgeDocument, SourceTag};

    const SAMPLE: &str = include_str!("../../../public/health_kms.md");

    #[test]
    fn test_sample_document() {
        let profile = parse_document(&ingest::sanitize(SAMPLE));

        assert_eq!(profile.personal_info.name, "Margaret Thompson");
        assert_eq!(profile.personal_info.age, 72);
        assert_eq!(profile.personal_info.blood_type, "A+");

        let meds: Vec<_> = profile
            .medications
            .iter()
            .map(|m| (m.name.as_str(), m.dosage.as_str(), m.time.as_str()))
            .collect();
        assert_eq!(
            meds,
            vec![
                ("Metformin", "500mg", "8:00 AM"),
                ("Lisinopril", "10mg", "12:00 PM"),
                ("Simvastatin", "20mg", "8:00 PM"),
            ]
        );

        assert_eq!(profile.vitals.present_count(), 5);
        assert_eq!(profile.vitals.blood_pressure.as_deref(), Some("Below 130/80"));
        assert_eq!(profile.activities.len(), 4);
        assert_eq!(profile.activities[0].name, "Morning Walk");
        assert_eq!(profile.appointments.len(), 2);

        let roles: Vec<_> = profile.contacts.iter().map(|c| c.role).collect();
        assert_eq!(roles, vec![ContactRole::Family, ContactRole::Doctor]);
    }

    #[test]
    fn test_missing_sections_give_empty_collections() {
        let profile = parse_document("# Notes\nNothing structured here.\n## Allergies\n- None\n");

        assert!(profile.medications.is_empty());
        assert!(profile.appointments.is_empty());
        assert!(profile.activities.is_empty());
        assert!(profile.contacts.is_empty());
        assert_eq!(profile.vitals, VitalSignsUpdate::default());
        assert_eq!(profile.personal_info, PersonalInfo::default());
    }

    #[test]
    fn test_crlf_and_bom_parse_identically() {
        let lf = ingest::sanitize(SAMPLE);
        let crlf = format!("\u{feff}{}\r\n", lf.replace('\n', "\r\n"));

        let a = KnowledgeDocument::from_raw(&lf, SourceTag::Remote).unwrap();
        let b = KnowledgeDocument::from_raw(&crlf, SourceTag::Remote).unwrap();

        assert_eq!(parse_document(&a.text), parse_document(&b.text));
        assert_eq!(a.doc_id, b.doc_id);
    }

    #[test]
    fn test_code_fence_does_not_split_medication() {
        let doc = "## Medications\n\
### Metformin\n\
Dosage: 500mg\n\
```\n\
# not a heading\n\
```\n\
Schedule: 8:00 AM, with breakfast\n";
        let profile = parse_document(doc);

        assert_eq!(profile.medications.len(), 1);
        assert_eq!(profile.medications[0].time, "8:00 AM");
    }

    #[test]
    fn test_profile_serializes_contact_roles() {
        let profile = parse_document("## Emergency Contacts\nName: Dr. Smith\nPhone: 555-0456\n");
        let json = serde_json::to_value(&profile.contacts).unwrap();

        assert_eq!(json[0]["role"], "Doctor");
        assert_eq!(profile.record_count(), 1);
    }
}

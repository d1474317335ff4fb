use serde::{Deserialize, Serialize};
use std::fmt;

/// Patient header. Empty strings and `age == 0` mean "not in the document".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersonalInfo {
    pub name: String,
    pub age: u32,
    pub blood_type: String,
    pub weight: String,
    pub height: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    /// Schedule text before its first comma.
    pub time: String,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    pub doctor: String,
    pub specialty: String,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Activity {
    pub name: String,
    pub duration: String,
    pub time: String,
}

impl Medication {
    /// Schedule shown before any document has loaded.
    pub fn initial() -> Vec<Self> {
        [
            ("Metformin", "500mg", "8:00 AM"),
            ("Lisinopril", "10mg", "12:00 PM"),
            ("Simvastatin", "20mg", "8:00 PM"),
        ]
        .into_iter()
        .map(|(name, dosage, time)| Self {
            name: name.to_string(),
            dosage: dosage.to_string(),
            time: time.to_string(),
            instructions: None,
        })
        .collect()
    }
}

impl Appointment {
    pub fn initial() -> Vec<Self> {
        [
            ("Dr. Smith", "Cardiologist", "Tomorrow, 10:00 AM"),
            ("Dr. Johnson", "Endocrinologist", "Next Week, 2:00 PM"),
        ]
        .into_iter()
        .map(|(doctor, specialty, date)| Self {
            doctor: doctor.to_string(),
            specialty: specialty.to_string(),
            date: date.to_string(),
        })
        .collect()
    }
}

impl Activity {
    pub fn initial() -> Vec<Self> {
        [
            ("Morning Walk", "20 mins", "7:00 AM"),
            ("Light Exercise", "15 mins", "4:00 PM"),
        ]
        .into_iter()
        .map(|(name, duration, time)| Self {
            name: name.to_string(),
            duration: duration.to_string(),
            time: time.to_string(),
        })
        .collect()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ContactRole {
    Doctor,
    Family,
}

impl ContactRole {
    /// Anyone whose name contains `Dr.` is a doctor, everyone else is family.
    pub fn infer(name: &str) -> Self {
        if name.contains("Dr.") {
            ContactRole::Doctor
        } else {
            ContactRole::Family
        }
    }
}

impl fmt::Display for ContactRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactRole::Doctor => write!(f, "Doctor"),
            ContactRole::Family => write!(f, "Family"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmergencyContact {
    pub name: String,
    pub role: ContactRole,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VitalSignsTargets {
    pub heart_rate: String,
    pub blood_pressure: String,
    pub temperature: String,
    pub oxygen_level: String,
    pub glucose_level: String,
}

impl Default for VitalSignsTargets {
    fn default() -> Self {
        Self {
            heart_rate: "72 bpm".to_string(),
            blood_pressure: "120/80".to_string(),
            temperature: "98.6°F".to_string(),
            oxygen_level: "98%".to_string(),
            glucose_level: "95 mg/dL".to_string(),
        }
    }
}

impl VitalSignsTargets {
    /// Overwrite only the fields present in `update`.
    pub fn merge(&mut self, update: VitalSignsUpdate) {
        let fields = [
            (&mut self.heart_rate, update.heart_rate),
            (&mut self.blood_pressure, update.blood_pressure),
            (&mut self.temperature, update.temperature),
            (&mut self.oxygen_level, update.oxygen_level),
            (&mut self.glucose_level, update.glucose_level),
        ];

        for (field, value) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}

/// Vital-sign targets found in one document; `None` where the label was absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VitalSignsUpdate {
    pub heart_rate: Option<String>,
    pub blood_pressure: Option<String>,
    pub temperature: Option<String>,
    pub oxygen_level: Option<String>,
    pub glucose_level: Option<String>,
}

impl VitalSignsUpdate {
    pub fn present_count(&self) -> usize {
        [
            &self.heart_rate,
            &self.blood_pressure,
            &self.temperature,
            &self.oxygen_level,
            &self.glucose_level,
        ]
        .iter()
        .filter(|v| v.is_some())
        .count()
    }
}

/// Everything extracted from a single knowledge base document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthProfile {
    pub personal_info: PersonalInfo,
    pub vitals: VitalSignsUpdate,
    pub medications: Vec<Medication>,
    pub appointments: Vec<Appointment>,
    pub activities: Vec<Activity>,
    pub contacts: Vec<EmergencyContact>,
}

impl HealthProfile {
    pub fn record_count(&self) -> usize {
        self.medications.len() + self.appointments.len() + self.activities.len() + self.contacts.len()
    }
}

use extract::{
    Activity, Appointment, EmergencyContact, HealthProfile, Medication, PersonalInfo,
    VitalSignsTargets,
};
use ingest::{KnowledgeDocument, SourceTag};
use serde::Serialize;
use uuid::Uuid;

use crate::avatar::AvatarPanel;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    ReadyWithAdvisory,
    Failed,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Transient; cleared by a timer.
    Advisory,
    /// Stays until the next successful load.
    Error,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notice {
    pub id: Uuid,
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("a knowledge base load is already in progress")]
    AlreadyLoading,
    #[error("knowledge base load aborted: {0}")]
    Aborted(String),
}

/// Everything the dashboard displays. Written only by the load pipeline and the avatar callbacks.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardState {
    pub status: LoadStatus,
    pub notice: Option<Notice>,
    pub source: Option<SourceTag>,
    pub document_id: Option<String>,
    pub personal_info: PersonalInfo,
    pub vitals: VitalSignsTargets,
    pub medications: Vec<Medication>,
    pub appointments: Vec<Appointment>,
    pub activities: Vec<Activity>,
    pub contacts: Vec<EmergencyContact>,
    pub avatar: AvatarPanel,
}

impl DashboardState {
    pub fn new(avatar: AvatarPanel) -> Self {
        Self {
            status: LoadStatus::Idle,
            notice: None,
            source: None,
            document_id: None,
            personal_info: PersonalInfo::default(),
            vitals: VitalSignsTargets::default(),
            medications: Medication::initial(),
            appointments: Appointment::initial(),
            activities: Activity::initial(),
            contacts: Vec::new(),
            avatar,
        }
    }

    pub fn begin_load(&mut self) -> Result<(), RefreshError> {
        if self.status == LoadStatus::Loading {
            return Err(RefreshError::AlreadyLoading);
        }
        self.status = LoadStatus::Loading;
        Ok(())
    }

    /// Replace every collection with the new profile; vital-sign targets are merged instead.
    pub fn apply(&mut self, document: &KnowledgeDocument, profile: HealthProfile) {
        self.personal_info = profile.personal_info;
        self.vitals.merge(profile.vitals);
        self.medications = profile.medications;
        self.appointments = profile.appointments;
        self.activities = profile.activities;
        self.contacts = profile.contacts;

        self.source = Some(document.source);
        self.document_id = Some(document.doc_id.clone());
        self.notice = None;
        self.status = LoadStatus::Ready;
    }

    pub fn set_advisory(&mut self, message: impl Into<String>) -> Uuid {
        let id = Uuid::new_v4();
        self.notice = Some(Notice {
            id,
            kind: NoticeKind::Advisory,
            message: message.into(),
        });
        self.status = LoadStatus::ReadyWithAdvisory;
        id
    }

    /// Clear the advisory `id` if it is still the one showing.
    pub fn clear_advisory(&mut self, id: Uuid) -> bool {
        match &self.notice {
            Some(notice) if notice.id == id && notice.kind == NoticeKind::Advisory => {
                self.notice = None;
                if self.status == LoadStatus::ReadyWithAdvisory {
                    self.status = LoadStatus::Ready;
                }
                true
            }
            _ => false,
        }
    }

    /// Record a failed load. Previously loaded data stays on display.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice {
            id: Uuid::new_v4(),
            kind: NoticeKind::Error,
            message: message.into(),
        });
        self.status = LoadStatus::Failed;
    }
}

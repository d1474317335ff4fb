use serde::Serialize;

use crate::config::AvatarConfig;

/// Video avatar panel. The avatar itself is an embedded third-party component; all we
/// track is which agent/face it runs and whether the placeholder face is showing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AvatarPanel {
    pub agent_id: String,
    pub face_id: String,
    pub show_placeholder: bool,
}

impl AvatarPanel {
    pub fn new(config: &AvatarConfig) -> Self {
        Self {
            agent_id: config.agent_id.clone(),
            face_id: config.face_id.clone(),
            show_placeholder: false,
        }
    }

    pub fn on_start(&mut self) {
        self.show_placeholder = false;
    }

    pub fn on_close(&mut self) {
        self.show_placeholder = true;
    }
}

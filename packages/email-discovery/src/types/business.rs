use serde::{Deserialize, Serialize};

/// Business metadata gathered independently of email discovery.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub pain_points: Vec<String>,
    #[serde(default)]
    pub social_links: Vec<String>,
}

impl BusinessData {
    pub fn is_empty(&self) -> bool {
        self.owner_name.is_none()
            && self.services.is_empty()
            && self.pain_points.is_empty()
            && self.social_links.is_empty()
    }
}

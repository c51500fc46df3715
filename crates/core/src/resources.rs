//! Resource kinds recommended alongside a dream.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default `type` of a vision gallery item.
pub const DEFAULT_VISION_ITEM_TYPE: &str = "image";

/// Maximum length of a vision item `type` label (VARCHAR(20)).
pub const MAX_VISION_ITEM_TYPE_LEN: u64 = 20;

/// Kind of learning resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Article,
    Video,
    Tool,
}

impl ResourceType {
    pub const ALL: [ResourceType; 3] = [ResourceType::Article, ResourceType::Video, ResourceType::Tool];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Article => "article",
            ResourceType::Video => "video",
            ResourceType::Tool => "tool",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown resource type '{s}'")))
    }
}

impl TryFrom<String> for ResourceType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

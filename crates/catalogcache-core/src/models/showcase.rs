use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A highlighted item on the storefront's "new arrivals" strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ShowcaseProduct {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    /// Category identifier
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl ShowcaseProduct {
    pub fn from_draft(id: String, draft: ShowcaseDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            image: draft.image,
            category: draft.category,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ShowcaseDraft {
    pub name: String,
    pub description: String,
    pub image: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ShowcasePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ShowcasePatch {
    pub fn apply_to(&self, item: &mut ShowcaseProduct) {
        if let Some(ref name) = self.name {
            item.name = name.clone();
        }
        if let Some(ref description) = self.description {
            item.description = description.clone();
        }
        if let Some(ref image) = self.image {
            item.image = image.clone();
        }
        if let Some(ref category) = self.category {
            item.category = category.clone();
        }
    }
}

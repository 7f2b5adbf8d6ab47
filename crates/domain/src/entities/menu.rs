use chrono::{DateTime, Utc};
use common::ExternalId;
use document_store::{Collection, Document};
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::error::ValidationError;

/// A menu grouping foods, optionally limited to a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Menu {
    pub menu_id: ExternalId,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Menu {
    const COLLECTION: Collection = Collection::Menus;

    fn external_id(&self) -> &ExternalId {
        &self.menu_id
    }
}

impl Menu {
    pub fn new(input: NewMenu, now: DateTime<Utc>) -> Self {
        Self {
            menu_id: ExternalId::generate(),
            name: input.name,
            category: input.category,
            start_date: input.start_date,
            end_date: input.end_date,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload for creating a menu.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMenu {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

impl NewMenu {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("category", &self.category)?;
        validate_window(self.start_date, self.end_date, now)
    }
}

/// Partial update for a menu.
///
/// A window change must carry both dates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl MenuPatch {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(category) = &self.category {
            require_text("category", category)?;
        }
        validate_window(self.start_date, self.end_date, now)
    }
}

/// Checks a menu's availability window.
///
/// Both bounds or neither; the start must not have passed and the end must
/// come after the start.
pub fn validate_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (None, None) => Ok(()),
        (Some(start), Some(end)) => {
            if start < now {
                return Err(ValidationError::MenuStartInPast);
            }
            if end <= start {
                return Err(ValidationError::MenuEndBeforeStart);
            }
            Ok(())
        }
        _ => Err(ValidationError::IncompleteMenuWindow),
    }
}

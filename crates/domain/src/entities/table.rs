use chrono::{DateTime, Utc};
use common::ExternalId;
use document_store::{Collection, Document};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A dining table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub table_id: ExternalId,
    pub number_of_guests: i64,
    pub table_number: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Table {
    const COLLECTION: Collection = Collection::Tables;

    fn external_id(&self) -> &ExternalId {
        &self.table_id
    }
}

impl Table {
    /// Builds a new table with a fresh identifier.
    pub fn new(input: NewTable, now: DateTime<Utc>) -> Self {
        Self {
            table_id: ExternalId::generate(),
            number_of_guests: input.number_of_guests,
            table_number: input.table_number,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload for creating a table.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTable {
    pub number_of_guests: i64,
    pub table_number: i64,
}

impl NewTable {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_guests(self.number_of_guests)
    }
}

/// Partial update for a table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TablePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_guests: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<i64>,
}

impl TablePatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.number_of_guests {
            Some(guests) => validate_guests(guests),
            None => Ok(()),
        }
    }
}

fn validate_guests(guests: i64) -> Result<(), ValidationError> {
    if guests < 1 {
        return Err(ValidationError::InvalidGuestCount { guests });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_gets_fresh_id_and_timestamps() {
        let now = Utc::now();
        let table = Table::new(
            NewTable {
                number_of_guests: 4,
                table_number: 12,
            },
            now,
        );

        assert_eq!(table.table_id.as_str().len(), 32);
        assert_eq!(table.created_at, now);
        assert_eq!(table.updated_at, now);
    }

    #[test]
    fn guests_must_be_positive() {
        let input = NewTable {
            number_of_guests: 0,
            table_number: 1,
        };
        assert_eq!(
            input.validate(),
            Err(ValidationError::InvalidGuestCount { guests: 0 })
        );

        let patch = TablePatch {
            number_of_guests: Some(-2),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
        assert!(TablePatch::default().validate().is_ok());
    }
}

/// Soft-deletable identity shared by every entity
///
/// Entities embed this value as a field instead of inheriting it. A record
/// whose `deleted_at` is set is logically absent: repositories filter it out of
/// every lookup and never remove the row.
///
/// # Schema
///
/// Each table carries these columns:
///
/// ```sql
/// id BIGSERIAL PRIMARY KEY,
/// created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
/// updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
/// deleted_at TIMESTAMPTZ
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Identity {
    /// Identifier, increasing in creation order
    pub id: i64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Set once the entity is soft-deleted
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Identity {
    /// Identity of a freshly created record
    pub fn new(id: i64, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Records a modification
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Marks the record as deleted; a second call keeps the first timestamp
    pub fn mark_deleted(&mut self, now: DateTime<Utc>) {
        if self.deleted_at.is_none() {
            self.deleted_at = Some(now);
            self.updated_at = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_identity_is_live() {
        let now = Utc::now();
        let identity = Identity::new(1, now);
        assert!(!identity.is_deleted());
        assert_eq!(identity.created_at, identity.updated_at);
    }

    #[test]
    fn test_mark_deleted_is_sticky() {
        let now = Utc::now();
        let mut identity = Identity::new(1, now);

        identity.mark_deleted(now + Duration::seconds(1));
        let first = identity.deleted_at;
        identity.mark_deleted(now + Duration::seconds(5));

        assert!(identity.is_deleted());
        assert_eq!(identity.deleted_at, first);
    }

    #[test]
    fn test_live_identity_omits_deleted_at() {
        let body = serde_json::to_value(Identity::new(3, Utc::now())).unwrap();
        assert!(body.get("deleted_at").is_none());
        assert_eq!(body["id"], 3);
    }
}

use chrono::DateTime;
use chrono::Utc;

/// Identity and timestamps shared by persisted entities.
///
/// Persistence adapters call [`AuditMetadata::on_update`] before writing;
/// creation stamps both timestamps through [`AuditMetadata::on_create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditMetadata<I> {
    pub id: I,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<I> AuditMetadata<I> {
    /// Stamp a freshly created entity.
    pub fn on_create(id: I) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild metadata loaded from storage.
    pub fn restore(id: I, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            updated_at,
        }
    }

    /// Refresh the update timestamp. `created_at` is never touched.
    pub fn on_update(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_on_create_sets_both_timestamps() {
        let audit = AuditMetadata::on_create(7_u32);

        assert_eq!(audit.id, 7);
        assert_eq!(audit.created_at, audit.updated_at);
    }

    #[test]
    fn test_on_update_keeps_created_at() {
        let created_at = Utc::now() - Duration::days(1);
        let mut audit = AuditMetadata::restore(1_u32, created_at, created_at);

        audit.on_update();

        assert_eq!(audit.created_at, created_at);
        assert!(audit.updated_at > created_at);
    }
}

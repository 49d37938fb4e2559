//! Domain service for the student roster.

use crate::db::repositories::student::StudentFields;
use crate::domain::Actor;
use crate::entities::students;
use crate::roster::RosterEntry;
use crate::services::error::RecordError;

/// Domain service trait for students.
#[async_trait::async_trait]
pub trait StudentService: Send + Sync {
    async fn list(&self) -> Result<Vec<students::Model>, RecordError>;

    async fn create(&self, actor: &Actor, fields: StudentFields) -> Result<i32, RecordError>;

    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if no student has this id.
    async fn update(&self, actor: &Actor, id: i32, fields: StudentFields)
    -> Result<(), RecordError>;

    /// # Errors
    ///
    /// Returns [`RecordError::Referential`] while visits, follow-ups,
    /// referrals or appointments still reference the student.
    async fn delete(&self, actor: &Actor, id: i32) -> Result<(), RecordError>;

    /// Removes every student. Fails as a whole if any has dependent records.
    async fn delete_all(&self, actor: &Actor) -> Result<u64, RecordError>;

    /// Inserts candidates whose exact name is not on the roster yet, in one
    /// transaction. Returns the number inserted.
    async fn bulk_import(
        &self,
        actor: &Actor,
        candidates: Vec<RosterEntry>,
    ) -> Result<u64, RecordError>;
}

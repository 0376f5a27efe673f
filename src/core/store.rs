//! Storage seam for the campus API.
//!
//! Handlers hold an `Arc<dyn CampusStore>` injected through the application
//! state; the trait is the only contact point between HTTP and persistence.
//! Implementations enforce the uniqueness constraints (roll number, course
//! code, enrollment pair) and the course-deletion cascade atomically.

use async_trait::async_trait;

use crate::core::error::StoreError;
use crate::core::model::{Course, Enrollment, NewCourse, NewStudent, Student};

/// CRUD and relationship operations over the relational store.
///
/// Write operations are atomic: a cascading course delete either removes the
/// course and every enrollment referencing it, or nothing. Concurrent
/// creates racing on the same unique key resolve at the constraint layer;
/// the loser receives [`StoreError::Duplicate`].
#[async_trait]
pub trait CampusStore: Send + Sync {
    // --- students ---

    /// Insert a student. `Duplicate` on a taken roll number.
    async fn create_student(&self, input: NewStudent) -> Result<Student, StoreError>;

    async fn student(&self, id: i64) -> Result<Option<Student>, StoreError>;

    async fn list_students(&self) -> Result<Vec<Student>, StoreError>;

    /// Full-field replace. `NotFound` if the id does not exist, `Duplicate`
    /// if the new roll number collides with another student.
    async fn update_student(&self, id: i64, input: NewStudent) -> Result<Student, StoreError>;

    /// Delete the student row only. Enrollments are left in place.
    async fn delete_student(&self, id: i64) -> Result<(), StoreError>;

    // --- courses ---

    /// Insert a course. `Duplicate` on a taken course code.
    async fn create_course(&self, input: NewCourse) -> Result<Course, StoreError>;

    async fn course(&self, id: i64) -> Result<Option<Course>, StoreError>;

    async fn list_courses(&self) -> Result<Vec<Course>, StoreError>;

    /// Full-field replace. `NotFound` if the id does not exist, `Duplicate`
    /// if the new course code collides with another course.
    async fn update_course(&self, id: i64, input: NewCourse) -> Result<Course, StoreError>;

    /// Delete the course and every enrollment referencing it, as one unit.
    async fn delete_course(&self, id: i64) -> Result<(), StoreError>;

    // --- enrollments ---

    /// Link a student to a course. `Duplicate` if the pair already exists.
    async fn create_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Enrollment, StoreError>;

    /// All enrollments for a student; empty when there are none.
    async fn enrollments_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<Enrollment>, StoreError>;

    async fn find_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>, StoreError>;

    /// Remove the enrollment identified by the (student, course) pair.
    /// `NotFound` if no such pair exists.
    async fn delete_enrollment(&self, student_id: i64, course_id: i64) -> Result<(), StoreError>;
}

//! In-memory implementation of CampusStore for testing and development.
//!
//! All three tables live behind a single `RwLock`, so uniqueness checks and
//! the course-deletion cascade are atomic with respect to other requests.
//! Ids are assigned from per-table counters, starting at 1.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::core::error::StoreError;
use crate::core::model::{Course, Enrollment, NewCourse, NewStudent, Student};
use crate::core::store::CampusStore;

#[derive(Debug, Default)]
struct Tables {
    students: HashMap<i64, Student>,
    courses: HashMap<i64, Course>,
    enrollments: HashMap<i64, Enrollment>,
    next_student_id: i64,
    next_course_id: i64,
    next_enrollment_id: i64,
}

impl Tables {
    fn roll_number_taken(&self, roll_number: &str, exclude: Option<i64>) -> bool {
        self.students
            .values()
            .any(|s| s.roll_number == roll_number && Some(s.student_id) != exclude)
    }

    fn course_code_taken(&self, course_code: &str, exclude: Option<i64>) -> bool {
        self.courses
            .values()
            .any(|c| c.course_code == course_code && Some(c.course_id) != exclude)
    }

    fn pair_exists(&self, student_id: i64, course_id: i64) -> bool {
        self.enrollments
            .values()
            .any(|e| e.student_id == student_id && e.course_id == course_id)
    }
}

/// In-memory campus store. Thread-safe and cheap to clone.
#[derive(Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|e| StoreError::Backend(format!("failed to acquire read lock: {e}")))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|e| StoreError::Backend(format!("failed to acquire write lock: {e}")))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CampusStore for InMemoryStore {
    async fn create_student(&self, input: NewStudent) -> Result<Student, StoreError> {
        let mut tables = self.write()?;
        if tables.roll_number_taken(&input.roll_number, None) {
            return Err(StoreError::Duplicate {
                constraint: "roll_number",
            });
        }
        tables.next_student_id += 1;
        let student = Student {
            student_id: tables.next_student_id,
            roll_number: input.roll_number,
            first_name: input.first_name,
            last_name: input.last_name,
        };
        tables.students.insert(student.student_id, student.clone());
        Ok(student)
    }

    async fn student(&self, id: i64) -> Result<Option<Student>, StoreError> {
        Ok(self.read()?.students.get(&id).cloned())
    }

    async fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        let mut students: Vec<Student> = self.read()?.students.values().cloned().collect();
        students.sort_by_key(|s| s.student_id);
        Ok(students)
    }

    async fn update_student(&self, id: i64, input: NewStudent) -> Result<Student, StoreError> {
        let mut tables = self.write()?;
        if !tables.students.contains_key(&id) {
            return Err(StoreError::NotFound {
                entity: "student",
                id,
            });
        }
        if tables.roll_number_taken(&input.roll_number, Some(id)) {
            return Err(StoreError::Duplicate {
                constraint: "roll_number",
            });
        }
        let student = Student {
            student_id: id,
            roll_number: input.roll_number,
            first_name: input.first_name,
            last_name: input.last_name,
        };
        tables.students.insert(id, student.clone());
        Ok(student)
    }

    async fn delete_student(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        // Enrollments are deliberately left behind; only course deletion
        // cascades.
        tables
            .students
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound {
                entity: "student",
                id,
            })
    }

    async fn create_course(&self, input: NewCourse) -> Result<Course, StoreError> {
        let mut tables = self.write()?;
        if tables.course_code_taken(&input.course_code, None) {
            return Err(StoreError::Duplicate {
                constraint: "course_code",
            });
        }
        tables.next_course_id += 1;
        let course = Course {
            course_id: tables.next_course_id,
            course_code: input.course_code,
            course_name: input.course_name,
            course_description: input.course_description,
        };
        tables.courses.insert(course.course_id, course.clone());
        Ok(course)
    }

    async fn course(&self, id: i64) -> Result<Option<Course>, StoreError> {
        Ok(self.read()?.courses.get(&id).cloned())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StoreError> {
        let mut courses: Vec<Course> = self.read()?.courses.values().cloned().collect();
        courses.sort_by_key(|c| c.course_id);
        Ok(courses)
    }

    async fn update_course(&self, id: i64, input: NewCourse) -> Result<Course, StoreError> {
        let mut tables = self.write()?;
        if !tables.courses.contains_key(&id) {
            return Err(StoreError::NotFound {
                entity: "course",
                id,
            });
        }
        if tables.course_code_taken(&input.course_code, Some(id)) {
            return Err(StoreError::Duplicate {
                constraint: "course_code",
            });
        }
        let course = Course {
            course_id: id,
            course_code: input.course_code,
            course_name: input.course_name,
            course_description: input.course_description,
        };
        tables.courses.insert(id, course.clone());
        Ok(course)
    }

    async fn delete_course(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if tables.courses.remove(&id).is_none() {
            return Err(StoreError::NotFound {
                entity: "course",
                id,
            });
        }
        // Same write guard: the cascade commits with the course removal.
        tables.enrollments.retain(|_, e| e.course_id != id);
        Ok(())
    }

    async fn create_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Enrollment, StoreError> {
        let mut tables = self.write()?;
        if tables.pair_exists(student_id, course_id) {
            return Err(StoreError::Duplicate {
                constraint: "enrollment",
            });
        }
        tables.next_enrollment_id += 1;
        let enrollment = Enrollment {
            enrollment_id: tables.next_enrollment_id,
            student_id,
            course_id,
        };
        tables
            .enrollments
            .insert(enrollment.enrollment_id, enrollment.clone());
        Ok(enrollment)
    }

    async fn enrollments_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<Enrollment>, StoreError> {
        let mut enrollments: Vec<Enrollment> = self
            .read()?
            .enrollments
            .values()
            .filter(|e| e.student_id == student_id)
            .cloned()
            .collect();
        enrollments.sort_by_key(|e| e.enrollment_id);
        Ok(enrollments)
    }

    async fn find_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>, StoreError> {
        Ok(self
            .read()?
            .enrollments
            .values()
            .find(|e| e.student_id == student_id && e.course_id == course_id)
            .cloned())
    }

    async fn delete_enrollment(&self, student_id: i64, course_id: i64) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let found = tables
            .enrollments
            .values()
            .find(|e| e.student_id == student_id && e.course_id == course_id)
            .map(|e| e.enrollment_id);
        match found {
            Some(id) => {
                tables.enrollments.remove(&id);
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "enrollment",
                id: student_id,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(roll: &str) -> NewStudent {
        NewStudent {
            roll_number: roll.to_string(),
            first_name: "Asha".to_string(),
            last_name: None,
        }
    }

    fn course(code: &str) -> NewCourse {
        NewCourse {
            course_code: code.to_string(),
            course_name: "Maths 1".to_string(),
            course_description: None,
        }
    }

    #[tokio::test]
    async fn test_create_student_assigns_fresh_ids() {
        let store = InMemoryStore::new();
        let a = store.create_student(student("21f1")).await.unwrap();
        let b = store.create_student(student("21f2")).await.unwrap();
        assert_eq!(a.student_id, 1);
        assert_eq!(b.student_id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_roll_number_rejected() {
        let store = InMemoryStore::new();
        store.create_student(student("21f1")).await.unwrap();
        let err = store.create_student(student("21f1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_update_student_keeps_own_roll_number() {
        let store = InMemoryStore::new();
        let created = store.create_student(student("21f1")).await.unwrap();
        // Re-submitting the same roll number for the same id is not a
        // collision.
        let updated = store
            .update_student(created.student_id, student("21f1"))
            .await
            .unwrap();
        assert_eq!(updated.student_id, created.student_id);
    }

    #[tokio::test]
    async fn test_update_student_rejects_foreign_roll_number() {
        let store = InMemoryStore::new();
        store.create_student(student("21f1")).await.unwrap();
        let b = store.create_student(student("21f2")).await.unwrap();
        let err = store
            .update_student(b.student_id, student("21f1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_update_missing_student_not_found() {
        let store = InMemoryStore::new();
        let err = store.update_student(99, student("21f1")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_course_code_rejected() {
        let store = InMemoryStore::new();
        store.create_course(course("CS101")).await.unwrap();
        let err = store.create_course(course("CS101")).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Duplicate {
                constraint: "course_code"
            }
        ));
    }

    #[tokio::test]
    async fn test_course_delete_cascades_enrollments() {
        let store = InMemoryStore::new();
        let s = store.create_student(student("21f1")).await.unwrap();
        let c1 = store.create_course(course("CS101")).await.unwrap();
        let c2 = store.create_course(course("MA101")).await.unwrap();
        store
            .create_enrollment(s.student_id, c1.course_id)
            .await
            .unwrap();
        store
            .create_enrollment(s.student_id, c2.course_id)
            .await
            .unwrap();

        store.delete_course(c1.course_id).await.unwrap();

        let remaining = store.enrollments_for_student(s.student_id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].course_id, c2.course_id);
    }

    #[tokio::test]
    async fn test_student_delete_does_not_cascade() {
        let store = InMemoryStore::new();
        let s = store.create_student(student("21f1")).await.unwrap();
        let c = store.create_course(course("CS101")).await.unwrap();
        store
            .create_enrollment(s.student_id, c.course_id)
            .await
            .unwrap();

        store.delete_student(s.student_id).await.unwrap();

        // The enrollment row survives the student.
        let orphaned = store.enrollments_for_student(s.student_id).await.unwrap();
        assert_eq!(orphaned.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_enrollment_pair_rejected() {
        let store = InMemoryStore::new();
        let s = store.create_student(student("21f1")).await.unwrap();
        let c = store.create_course(course("CS101")).await.unwrap();
        store
            .create_enrollment(s.student_id, c.course_id)
            .await
            .unwrap();
        let err = store
            .create_enrollment(s.student_id, c.course_id)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        let rows = store.enrollments_for_student(s.student_id).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_enrollment_by_pair() {
        let store = InMemoryStore::new();
        let s = store.create_student(student("21f1")).await.unwrap();
        let c = store.create_course(course("CS101")).await.unwrap();
        store
            .create_enrollment(s.student_id, c.course_id)
            .await
            .unwrap();

        store
            .delete_enrollment(s.student_id, c.course_id)
            .await
            .unwrap();
        let err = store
            .delete_enrollment(s.student_id, c.course_id)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_enrollments_for_student_empty_is_ok() {
        let store = InMemoryStore::new();
        let s = store.create_student(student("21f1")).await.unwrap();
        let rows = store.enrollments_for_student(s.student_id).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_lists_sorted_by_id() {
        let store = InMemoryStore::new();
        for code in ["CS101", "MA101", "BA101"] {
            store.create_course(course(code)).await.unwrap();
        }
        let courses = store.list_courses().await.unwrap();
        let ids: Vec<i64> = courses.iter().map(|c| c.course_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}

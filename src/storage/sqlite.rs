//! SQLite storage backend using sqlx.
//!
//! Provides [`SqliteStore`], a `CampusStore` backed by an SQLite database
//! via `sqlx::SqlitePool`. Well suited to single-node deployments where the
//! database lives in one file next to the server.
//!
//! # Feature flag
//!
//! This module is gated behind the `sqlite` feature flag:
//! ```toml
//! [dependencies]
//! campus-rs = { version = "0.1", features = ["sqlite"] }
//! ```
//!
//! # Schema
//!
//! Three tables: `student` (unique roll_number), `course` (unique
//! course_code), and `enrollments` (unique (student_id, course_id) pair,
//! foreign keys to both parents). `PRAGMA foreign_keys` is enabled on every
//! connection.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};

use crate::core::error::StoreError;
use crate::core::model::{Course, Enrollment, NewCourse, NewStudent, Student};
use crate::core::store::CampusStore;

/// Apply the required tables and indexes (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS student (
            student_id INTEGER PRIMARY KEY AUTOINCREMENT,
            roll_number TEXT NOT NULL UNIQUE,
            first_name TEXT NOT NULL,
            last_name TEXT
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| map_err("student table", e))?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS course (
            course_id INTEGER PRIMARY KEY AUTOINCREMENT,
            course_code TEXT NOT NULL UNIQUE,
            course_name TEXT NOT NULL,
            course_description TEXT
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| map_err("course table", e))?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS enrollments (
            enrollment_id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER NOT NULL REFERENCES student(student_id),
            course_id INTEGER NOT NULL REFERENCES course(course_id),
            UNIQUE (student_id, course_id)
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| map_err("enrollments table", e))?;

    Ok(())
}

/// Translate a sqlx error, mapping unique-constraint violations onto
/// [`StoreError::Duplicate`] so that write races surface as conflicts.
fn map_err(constraint: &'static str, err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
        {
            StoreError::Duplicate { constraint }
        }
        _ => StoreError::Backend(format!("{constraint}: {err}")),
    }
}

type StudentRow = (i64, String, String, Option<String>);
type CourseRow = (i64, String, String, Option<String>);
type EnrollmentRow = (i64, i64, i64);

fn student_from_row((student_id, roll_number, first_name, last_name): StudentRow) -> Student {
    Student {
        student_id,
        roll_number,
        first_name,
        last_name,
    }
}

fn course_from_row((course_id, course_code, course_name, course_description): CourseRow) -> Course {
    Course {
        course_id,
        course_code,
        course_name,
        course_description,
    }
}

fn enrollment_from_row((enrollment_id, student_id, course_id): EnrollmentRow) -> Enrollment {
    Enrollment {
        enrollment_id,
        student_id,
        course_id,
    }
}

/// Campus store backed by SQLite.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `url` (e.g. `sqlite://campus.sqlite3`), creating the file
    /// and the schema when absent.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::Backend(format!("invalid sqlite url: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| map_err("connect", e))?;
        ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool (schema is still ensured).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CampusStore for SqliteStore {
    async fn create_student(&self, input: NewStudent) -> Result<Student, StoreError> {
        let result = sqlx::query(
            "INSERT INTO student (roll_number, first_name, last_name) VALUES (?, ?, ?)",
        )
        .bind(&input.roll_number)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .execute(&self.pool)
        .await
        .map_err(|e| map_err("roll_number", e))?;

        Ok(Student {
            student_id: result.last_insert_rowid(),
            roll_number: input.roll_number,
            first_name: input.first_name,
            last_name: input.last_name,
        })
    }

    async fn student(&self, id: i64) -> Result<Option<Student>, StoreError> {
        let row = sqlx::query_as::<_, StudentRow>(
            "SELECT student_id, roll_number, first_name, last_name \
             FROM student WHERE student_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_err("student lookup", e))?;

        Ok(row.map(student_from_row))
    }

    async fn list_students(&self) -> Result<Vec<Student>, StoreError> {
        let rows = sqlx::query_as::<_, StudentRow>(
            "SELECT student_id, roll_number, first_name, last_name \
             FROM student ORDER BY student_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_err("student list", e))?;

        Ok(rows.into_iter().map(student_from_row).collect())
    }

    async fn update_student(&self, id: i64, input: NewStudent) -> Result<Student, StoreError> {
        let result = sqlx::query(
            "UPDATE student SET roll_number = ?, first_name = ?, last_name = ? \
             WHERE student_id = ?",
        )
        .bind(&input.roll_number)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_err("roll_number", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "student",
                id,
            });
        }

        Ok(Student {
            student_id: id,
            roll_number: input.roll_number,
            first_name: input.first_name,
            last_name: input.last_name,
        })
    }

    async fn delete_student(&self, id: i64) -> Result<(), StoreError> {
        // No cascade: enrollments referencing this student stay behind.
        let result = sqlx::query("DELETE FROM student WHERE student_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_err("student delete", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "student",
                id,
            });
        }
        Ok(())
    }

    async fn create_course(&self, input: NewCourse) -> Result<Course, StoreError> {
        let result = sqlx::query(
            "INSERT INTO course (course_code, course_name, course_description) VALUES (?, ?, ?)",
        )
        .bind(&input.course_code)
        .bind(&input.course_name)
        .bind(&input.course_description)
        .execute(&self.pool)
        .await
        .map_err(|e| map_err("course_code", e))?;

        Ok(Course {
            course_id: result.last_insert_rowid(),
            course_code: input.course_code,
            course_name: input.course_name,
            course_description: input.course_description,
        })
    }

    async fn course(&self, id: i64) -> Result<Option<Course>, StoreError> {
        let row = sqlx::query_as::<_, CourseRow>(
            "SELECT course_id, course_code, course_name, course_description \
             FROM course WHERE course_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_err("course lookup", e))?;

        Ok(row.map(course_from_row))
    }

    async fn list_courses(&self) -> Result<Vec<Course>, StoreError> {
        let rows = sqlx::query_as::<_, CourseRow>(
            "SELECT course_id, course_code, course_name, course_description \
             FROM course ORDER BY course_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_err("course list", e))?;

        Ok(rows.into_iter().map(course_from_row).collect())
    }

    async fn update_course(&self, id: i64, input: NewCourse) -> Result<Course, StoreError> {
        let result = sqlx::query(
            "UPDATE course SET course_code = ?, course_name = ?, course_description = ? \
             WHERE course_id = ?",
        )
        .bind(&input.course_code)
        .bind(&input.course_name)
        .bind(&input.course_description)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_err("course_code", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "course",
                id,
            });
        }

        Ok(Course {
            course_id: id,
            course_code: input.course_code,
            course_name: input.course_name,
            course_description: input.course_description,
        })
    }

    async fn delete_course(&self, id: i64) -> Result<(), StoreError> {
        // Enrollments first (they reference the course), then the course
        // row, all inside one transaction so a failure leaves nothing
        // half-deleted.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_err("course delete", e))?;

        sqlx::query("DELETE FROM enrollments WHERE course_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_err("course delete", e))?;

        let result = sqlx::query("DELETE FROM course WHERE course_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_err("course delete", e))?;

        if result.rows_affected() == 0 {
            // Rolls back the enrollment deletes (there were none to lose).
            return Err(StoreError::NotFound {
                entity: "course",
                id,
            });
        }

        tx.commit().await.map_err(|e| map_err("course delete", e))
    }

    async fn create_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Enrollment, StoreError> {
        let result =
            sqlx::query("INSERT INTO enrollments (student_id, course_id) VALUES (?, ?)")
                .bind(student_id)
                .bind(course_id)
                .execute(&self.pool)
                .await
                .map_err(|e| map_err("enrollment", e))?;

        Ok(Enrollment {
            enrollment_id: result.last_insert_rowid(),
            student_id,
            course_id,
        })
    }

    async fn enrollments_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<Enrollment>, StoreError> {
        let rows = sqlx::query_as::<_, EnrollmentRow>(
            "SELECT enrollment_id, student_id, course_id \
             FROM enrollments WHERE student_id = ? ORDER BY enrollment_id",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_err("enrollment list", e))?;

        Ok(rows.into_iter().map(enrollment_from_row).collect())
    }

    async fn find_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>, StoreError> {
        let row = sqlx::query_as::<_, EnrollmentRow>(
            "SELECT enrollment_id, student_id, course_id \
             FROM enrollments WHERE student_id = ? AND course_id = ?",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_err("enrollment lookup", e))?;

        Ok(row.map(enrollment_from_row))
    }

    async fn delete_enrollment(&self, student_id: i64, course_id: i64) -> Result<(), StoreError> {
        let result =
            sqlx::query("DELETE FROM enrollments WHERE student_id = ? AND course_id = ?")
                .bind(student_id)
                .bind(course_id)
                .execute(&self.pool)
                .await
                .map_err(|e| map_err("enrollment delete", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "enrollment",
                id: student_id,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:").await.unwrap()
    }

    fn student(roll: &str) -> NewStudent {
        NewStudent {
            roll_number: roll.to_string(),
            first_name: "Asha".to_string(),
            last_name: Some("Rao".to_string()),
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
    async fn test_schema_is_idempotent() {
        let store = memory_store().await;
        ensure_schema(store.pool()).await.unwrap();
    }

    #[tokio::test]
    async fn test_student_roundtrip() {
        let store = memory_store().await;
        let created = store.create_student(student("21f1")).await.unwrap();
        let fetched = store.student(created.student_id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_duplicate_roll_number_maps_to_duplicate() {
        let store = memory_store().await;
        store.create_student(student("21f1")).await.unwrap();
        let err = store.create_student(student("21f1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_cascade_delete_is_transactional() {
        let store = memory_store().await;
        let s = store.create_student(student("21f1")).await.unwrap();
        let c = store.create_course(course("CS101")).await.unwrap();
        store
            .create_enrollment(s.student_id, c.course_id)
            .await
            .unwrap();

        store.delete_course(c.course_id).await.unwrap();

        assert!(store.course(c.course_id).await.unwrap().is_none());
        assert!(
            store
                .enrollments_for_student(s.student_id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_delete_missing_course_rolls_back() {
        let store = memory_store().await;
        let err = store.delete_course(42).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_pair_rejected_by_constraint() {
        let store = memory_store().await;
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
    }
}

//! PostgreSQL storage backend using sqlx.
//!
//! Provides [`PostgresStore`], a `CampusStore` backed by PostgreSQL via
//! `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! campus-rs = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Differences from the SQLite backend
//!
//! - `BIGSERIAL` ids instead of `INTEGER PRIMARY KEY AUTOINCREMENT`
//! - `$1`, `$2` placeholders instead of `?`
//! - `INSERT .. RETURNING` instead of `last_insert_rowid()`
//! - Foreign keys are always enforced (no pragma needed)

use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::StoreError;
use crate::core::model::{Course, Enrollment, NewCourse, NewStudent, Student};
use crate::core::store::CampusStore;

/// Apply the required tables and indexes (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS student (
            student_id BIGSERIAL PRIMARY KEY,
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
            course_id BIGSERIAL PRIMARY KEY,
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
            enrollment_id BIGSERIAL PRIMARY KEY,
            student_id BIGINT NOT NULL REFERENCES student(student_id),
            course_id BIGINT NOT NULL REFERENCES course(course_id),
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

/// Campus store backed by PostgreSQL.
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect to `url` and ensure the schema exists.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(url)
            .await
            .map_err(|e| map_err("connect", e))?;
        ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool (schema is still ensured).
    pub async fn from_pool(pool: PgPool) -> Result<Self, StoreError> {
        ensure_schema(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CampusStore for PostgresStore {
    async fn create_student(&self, input: NewStudent) -> Result<Student, StoreError> {
        let row = sqlx::query_as::<_, StudentRow>(
            "INSERT INTO student (roll_number, first_name, last_name) VALUES ($1, $2, $3) \
             RETURNING student_id, roll_number, first_name, last_name",
        )
        .bind(&input.roll_number)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_err("roll_number", e))?;

        Ok(student_from_row(row))
    }

    async fn student(&self, id: i64) -> Result<Option<Student>, StoreError> {
        let row = sqlx::query_as::<_, StudentRow>(
            "SELECT student_id, roll_number, first_name, last_name \
             FROM student WHERE student_id = $1",
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
        let row = sqlx::query_as::<_, StudentRow>(
            "UPDATE student SET roll_number = $1, first_name = $2, last_name = $3 \
             WHERE student_id = $4 \
             RETURNING student_id, roll_number, first_name, last_name",
        )
        .bind(&input.roll_number)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_err("roll_number", e))?;

        row.map(student_from_row).ok_or(StoreError::NotFound {
            entity: "student",
            id,
        })
    }

    async fn delete_student(&self, id: i64) -> Result<(), StoreError> {
        // No cascade: enrollments referencing this student stay behind.
        let result = sqlx::query("DELETE FROM student WHERE student_id = $1")
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
        let row = sqlx::query_as::<_, CourseRow>(
            "INSERT INTO course (course_code, course_name, course_description) \
             VALUES ($1, $2, $3) \
             RETURNING course_id, course_code, course_name, course_description",
        )
        .bind(&input.course_code)
        .bind(&input.course_name)
        .bind(&input.course_description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_err("course_code", e))?;

        Ok(course_from_row(row))
    }

    async fn course(&self, id: i64) -> Result<Option<Course>, StoreError> {
        let row = sqlx::query_as::<_, CourseRow>(
            "SELECT course_id, course_code, course_name, course_description \
             FROM course WHERE course_id = $1",
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
        let row = sqlx::query_as::<_, CourseRow>(
            "UPDATE course SET course_code = $1, course_name = $2, course_description = $3 \
             WHERE course_id = $4 \
             RETURNING course_id, course_code, course_name, course_description",
        )
        .bind(&input.course_code)
        .bind(&input.course_name)
        .bind(&input.course_description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_err("course_code", e))?;

        row.map(course_from_row).ok_or(StoreError::NotFound {
            entity: "course",
            id,
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

        sqlx::query("DELETE FROM enrollments WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_err("course delete", e))?;

        let result = sqlx::query("DELETE FROM course WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_err("course delete", e))?;

        if result.rows_affected() == 0 {
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
        let row = sqlx::query_as::<_, EnrollmentRow>(
            "INSERT INTO enrollments (student_id, course_id) VALUES ($1, $2) \
             RETURNING enrollment_id, student_id, course_id",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_err("enrollment", e))?;

        Ok(enrollment_from_row(row))
    }

    async fn enrollments_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<Enrollment>, StoreError> {
        let rows = sqlx::query_as::<_, EnrollmentRow>(
            "SELECT enrollment_id, student_id, course_id \
             FROM enrollments WHERE student_id = $1 ORDER BY enrollment_id",
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
             FROM enrollments WHERE student_id = $1 AND course_id = $2",
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
            sqlx::query("DELETE FROM enrollments WHERE student_id = $1 AND course_id = $2")
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

use rusqlite::{params, Connection};
use tracing::info;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub student_id: i64,
    pub name: String,
    pub age: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub student_id: i64,
    pub course_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grade {
    pub student_id: i64,
    pub course_id: i64,
    pub grade: f64,
}

/// Rows for the three tables, inserted in field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleData {
    pub students: Vec<Student>,
    pub registrations: Vec<Registration>,
    pub grades: Vec<Grade>,
}

impl SampleData {
    /// Three students over courses 101, 102 and 103. Charlie's two grades tie
    /// for his maximum.
    pub fn fixed() -> Self {
        let students = [(1, "Alice", 20), (2, "Bob", 22), (3, "Charlie", 21)]
            .into_iter()
            .map(|(student_id, name, age)| Student {
                student_id,
                name: name.to_string(),
                age,
            })
            .collect();

        let registrations = [(1, 101), (1, 102), (2, 101), (2, 103), (3, 102), (3, 103)]
            .into_iter()
            .map(|(student_id, course_id)| Registration {
                student_id,
                course_id,
            })
            .collect();

        let grades = [
            (1, 101, 88.5),
            (1, 102, 92.0),
            (2, 101, 76.0),
            (2, 103, 90.0),
            (3, 102, 90.0),
            (3, 103, 90.0),
        ]
        .into_iter()
        .map(|(student_id, course_id, grade)| Grade {
            student_id,
            course_id,
            grade,
        })
        .collect();

        Self {
            students,
            registrations,
            grades,
        }
    }
}

/// Rows inserted per table by a successful [`load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub students: usize,
    pub registrations: usize,
    pub grades: usize,
}

/// Insert `data` in a single transaction.
///
/// Students go in before registrations and registrations before grades so
/// foreign keys resolve. Any failing insert rolls the whole batch back.
pub fn load(conn: &mut Connection, data: &SampleData) -> Result<LoadReport> {
    let tx = conn.transaction()?;
    let mut report = LoadReport::default();
    {
        let mut stmt =
            tx.prepare_cached("INSERT INTO student(student_id, name, age) VALUES (?1, ?2, ?3)")?;
        for s in &data.students {
            report.students += stmt.execute(params![s.student_id, s.name, s.age])?;
        }

        let mut stmt = tx
            .prepare_cached("INSERT INTO registered_courses(student_id, course_id) VALUES (?1, ?2)")?;
        for r in &data.registrations {
            report.registrations += stmt.execute(params![r.student_id, r.course_id])?;
        }

        let mut stmt = tx.prepare_cached(
            "INSERT INTO grades(student_id, course_id, grade) VALUES (?1, ?2, ?3)",
        )?;
        for g in &data.grades {
            report.grades += stmt.execute(params![g.student_id, g.course_id, g.grade])?;
        }
    }
    tx.commit()?;

    info!(
        students = report.students,
        registrations = report.registrations,
        grades = report.grades,
        "sample data committed"
    );
    Ok(report)
}

/// Load [`SampleData::fixed`].
pub fn insert_sample_data(conn: &mut Connection) -> Result<LoadReport> {
    load(conn, &SampleData::fixed())
}

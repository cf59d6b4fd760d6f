//! Read-only queries over the populated schema.

use rusqlite::Connection;
use tracing::debug;

use crate::error::{Error, Result};
use crate::report::ReportRow;
use crate::schema::Schema;
use crate::sqlite::Value;

/// A grade equal to the best grade of its student.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxGrade {
    pub student_id: i64,
    pub course_id: i64,
    pub grade: f64,
}

impl ReportRow for MaxGrade {
    fn values(&self) -> Vec<Value> {
        vec![
            self.student_id.into(),
            self.course_id.into(),
            self.grade.into(),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageGrade {
    pub student_id: i64,
    /// Mean grade rounded to two decimals by SQLite's `ROUND`.
    pub average: f64,
}

impl ReportRow for AverageGrade {
    fn values(&self) -> Vec<Value> {
        vec![self.student_id.into(), self.average.into()]
    }
}

const MAX_GRADE_SQL: &str = r#"
    WITH max_per_student AS (
        SELECT student_id, MAX(grade) AS max_grade
        FROM grades
        GROUP BY student_id
    )
    SELECT g.student_id, g.course_id, g.grade AS max_grade
    FROM grades g
    JOIN max_per_student m
      ON g.student_id = m.student_id
     AND g.grade = m.max_grade
    ORDER BY g.student_id, g.course_id
"#;

const AVERAGE_GRADE_SQL: &str = r#"
    SELECT student_id, ROUND(AVG(grade), 2) AS avg_grade
    FROM grades
    GROUP BY student_id
    ORDER BY student_id
"#;

/// Every `(student_id, course_id, grade)` whose grade is the maximum for its
/// student. Ties produce one row per course.
pub fn max_grade_per_student(conn: &Connection) -> Result<Vec<MaxGrade>> {
    let mut stmt = conn.prepare(MAX_GRADE_SQL)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(MaxGrade {
                student_id: row.get(0)?,
                course_id: row.get(1)?,
                grade: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    debug!(rows = rows.len(), "max grade per student");
    Ok(rows)
}

/// Average grade of every student that has at least one grade.
pub fn average_grade_per_student(conn: &Connection) -> Result<Vec<AverageGrade>> {
    let mut stmt = conn.prepare(AVERAGE_GRADE_SQL)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(AverageGrade {
                student_id: row.get(0)?,
                average: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    debug!(rows = rows.len(), "average grade per student");
    Ok(rows)
}

/// Full contents of one table, columns in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDump {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// `SELECT *` over a table of `schema`. Names outside the schema are rejected
/// before any SQL is built.
pub fn dump_table(conn: &Connection, schema: &Schema, table: &str) -> Result<TableDump> {
    let def = schema
        .table(table)
        .ok_or_else(|| Error::UnknownTable(table.to_string()))?;

    let mut stmt = conn.prepare(&format!("SELECT * FROM {}", def.name))?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();
    let rows = stmt
        .query_map([], |row| {
            (0..width)
                .map(|i| row.get_ref(i).map(Value::from))
                .collect::<rusqlite::Result<Vec<_>>>()
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(TableDump {
        table: def.name.clone(),
        columns,
        rows,
    })
}

/// One row of `PRAGMA foreign_key_check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyViolation {
    pub table: String,
    pub rowid: Option<i64>,
    pub parent: String,
    pub fkid: i64,
}

pub fn foreign_key_violations(conn: &Connection) -> Result<Vec<ForeignKeyViolation>> {
    let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ForeignKeyViolation {
                table: row.get(0)?,
                rowid: row.get(1)?,
                parent: row.get(2)?,
                fkid: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

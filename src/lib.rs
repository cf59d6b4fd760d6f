//! Student registrations and grades stored in SQLite.
//!
//! # Intention
//!
//! - Build a small relational schema (students, course registrations, grades)
//!   with composite foreign keys enforced by SQLite.
//! - Load a fixed sample dataset and answer two aggregate questions about it:
//!   the best grade(s) of every student and every student's average grade.
//!
//! # Architectural Boundaries
//!
//! - Every operation takes the connection explicitly; there is no global state.
//! - Only SQLite/database code and text reports belong here.

pub mod app;
pub mod error;
pub mod queries;
pub mod report;
pub mod sample;
pub mod schema;
pub mod sqlite;

pub use error::{Error, Result};
pub use queries::{average_grade_per_student, max_grade_per_student, AverageGrade, MaxGrade};
pub use report::{print_rows, write_rows, ReportRow};
pub use sample::{insert_sample_data, load, LoadReport, SampleData};
pub use schema::{setup_database, student_schema, Schema};
pub use sqlite::{SqliteConfig, Value};

//! The whole walkthrough: reset, load, dump every table, then both reports.

use std::io::Write;

use rusqlite::Connection;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::queries::{
    average_grade_per_student, dump_table, foreign_key_violations, max_grade_per_student,
};
use crate::report::write_rows;
use crate::sample::insert_sample_data;
use crate::schema::{setup_database, Schema};
use crate::sqlite;

/// Rebuild `schema`, load the sample data and write every report to `out`.
pub fn run<W: Write>(conn: &mut Connection, schema: &Schema, out: &mut W) -> Result<()> {
    setup_database(conn, schema)?;
    insert_sample_data(conn)?;

    let violations = foreign_key_violations(conn)?;
    if !violations.is_empty() {
        return Err(Error::ForeignKeyViolations(violations.len()));
    }

    for table in schema.table_names() {
        let dump = dump_table(conn, schema, table)?;
        let columns: Vec<&str> = dump.columns.iter().map(String::as_str).collect();
        write_rows(out, &format!("Table: {}", dump.table), &columns, &dump.rows)?;
    }

    let max_rows = max_grade_per_student(conn)?;
    write_rows(
        out,
        "Max grade per student (with corresponding course_id)",
        &["student_id", "course_id", "max_grade"],
        &max_rows,
    )?;

    let avg_rows = average_grade_per_student(conn)?;
    write_rows(
        out,
        "Average grade per student",
        &["student_id", "avg_grade"],
        &avg_rows,
    )?;
    out.flush()?;

    info!(
        max_rows = max_rows.len(),
        avg_rows = avg_rows.len(),
        "report complete"
    );
    Ok(())
}

/// [`run`], then close the connection on every path.
///
/// A failed run keeps its own error and only logs a close failure; after a
/// successful run the close failure is returned.
pub fn run_and_close<W: Write>(mut conn: Connection, schema: &Schema, out: &mut W) -> Result<()> {
    let outcome = run(&mut conn, schema, out);
    let closed = sqlite::close(conn);
    match outcome {
        Ok(()) => closed,
        Err(err) => {
            if let Err(close_err) = closed {
                warn!(error = %close_err, "failed to close sqlite connection");
            }
            Err(err)
        }
    }
}

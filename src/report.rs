//! Plain-text tables: a title, a `" | "`-joined header, a dash rule and one
//! line per row.

use std::io::{self, Write};

use crate::sqlite::Value;

const SEPARATOR: &str = " | ";
const MIN_RULE_WIDTH: usize = 30;

/// A typed result row that can be printed as a list of values.
pub trait ReportRow {
    fn values(&self) -> Vec<Value>;
}

impl ReportRow for Vec<Value> {
    fn values(&self) -> Vec<Value> {
        self.clone()
    }
}

/// Write `rows` under `title` and `columns`, keeping the given order.
pub fn write_rows<W, R>(out: &mut W, title: &str, columns: &[&str], rows: &[R]) -> io::Result<()>
where
    W: Write,
    R: ReportRow,
{
    let header = columns.join(SEPARATOR);
    writeln!(out)?;
    writeln!(out, "{title}")?;
    writeln!(out, "{header}")?;
    writeln!(out, "{}", "-".repeat(MIN_RULE_WIDTH.max(header.len())))?;
    for row in rows {
        let line = row
            .values()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// [`write_rows`] to standard output.
pub fn print_rows<R: ReportRow>(title: &str, columns: &[&str], rows: &[R]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_rows(&mut out, title, columns, rows)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<R: ReportRow>(title: &str, columns: &[&str], rows: &[R]) -> String {
        let mut buf = Vec::new();
        write_rows(&mut buf, title, columns, rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn short_header_gets_thirty_dashes() {
        let rows = vec![
            vec![Value::Integer(1), Value::Real(90.25)],
            vec![Value::Integer(2), Value::Real(83.0)],
        ];
        let text = render("Average grade per student", &["student_id", "avg_grade"], &rows);
        let expected = format!(
            "\nAverage grade per student\nstudent_id | avg_grade\n{}\n1 | 90.25\n2 | 83.0\n",
            "-".repeat(30)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn long_header_sets_rule_width() {
        let columns = ["a_rather_long_column", "another_long_column"];
        let text = render::<Vec<Value>>("t", &columns, &[]);
        let header = columns.join(" | ");
        assert!(header.len() > 30);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["", "t", header.as_str(), "-".repeat(header.len()).as_str()]);
    }

    #[test]
    fn rows_keep_given_order() {
        let rows = vec![
            vec![Value::Integer(3), Value::from("Charlie")],
            vec![Value::Integer(1), Value::from("Alice")],
        ];
        let text = render("Table: student", &["student_id", "name"], &rows);
        let body: Vec<&str> = text.lines().skip(4).collect();
        assert_eq!(body, vec!["3 | Charlie", "1 | Alice"]);
    }
}

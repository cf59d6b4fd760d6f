//! Typed schema definitions and the drop-and-recreate schema reset.

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::Result;
use crate::sqlite::enable_foreign_keys;

/// Schema definition for the SQLite database.
///
/// Tables are kept in dependency order: a table may only reference tables
/// that appear before it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub tables: Vec<TableDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }
    pub fn add_table(mut self, table: TableDefinition) -> Self {
        self.tables.push(table);
        self
    }
    pub fn table(&self, name: &str) -> Option<&TableDefinition> {
        self.tables.iter().find(|t| t.name == name)
    }
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    /// Table-level (usually composite) primary key. Leave empty when a
    /// column carries [`ColumnConstraint::PrimaryKey`] itself.
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }
    pub fn with_column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }
    pub fn with_primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = columns.iter().map(|c| c.to_string()).collect();
        self
    }
    pub fn with_foreign_key(mut self, key: ForeignKey) -> Self {
        self.foreign_keys.push(key);
        self
    }

    /// Render the `CREATE TABLE` statement for this table.
    pub fn create_sql(&self) -> String {
        let mut parts: Vec<String> = self.columns.iter().map(ColumnDefinition::sql).collect();
        if !self.primary_key.is_empty() {
            parts.push(format!("PRIMARY KEY ({})", self.primary_key.join(", ")));
        }
        parts.extend(self.foreign_keys.iter().map(ForeignKey::sql));
        format!("CREATE TABLE {} ({})", self.name, parts.join(", "))
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            constraints: Vec::new(),
        }
    }
    pub fn with_constraint(mut self, constraint: ColumnConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }
    pub fn not_null(self) -> Self {
        self.with_constraint(ColumnConstraint::NotNull)
    }

    fn sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.data_type.as_sql());
        for constraint in &self.constraints {
            sql.push(' ');
            sql.push_str(constraint.as_sql());
        }
        sql
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Integer,
    Text,
    Real,
}

impl DataType {
    pub fn as_sql(self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Text => "TEXT",
            DataType::Real => "REAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnConstraint {
    PrimaryKey,
    NotNull,
}

impl ColumnConstraint {
    pub fn as_sql(self) -> &'static str {
        match self {
            ColumnConstraint::PrimaryKey => "PRIMARY KEY",
            ColumnConstraint::NotNull => "NOT NULL",
        }
    }
}

/// A possibly composite foreign key; `columns[i]` references
/// `foreign_columns[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub columns: Vec<String>,
    pub foreign_table: String,
    pub foreign_columns: Vec<String>,
}

impl ForeignKey {
    pub fn new(columns: &[&str], foreign_table: &str, foreign_columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            foreign_table: foreign_table.to_string(),
            foreign_columns: foreign_columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn sql(&self) -> String {
        format!(
            "FOREIGN KEY ({}) REFERENCES {}({})",
            self.columns.join(", "),
            self.foreign_table,
            self.foreign_columns.join(", ")
        )
    }
}

pub const STUDENT: &str = "student";
pub const REGISTERED_COURSES: &str = "registered_courses";
pub const GRADES: &str = "grades";

/// The `student`, `registered_courses` and `grades` tables.
///
/// `grades` references `student` directly as well as through its composite
/// key into `registered_courses`. The direct key is implied by the composite
/// one and is kept anyway.
pub fn student_schema() -> Schema {
    let student = TableDefinition::new(STUDENT)
        .with_column(
            ColumnDefinition::new("student_id", DataType::Integer)
                .with_constraint(ColumnConstraint::PrimaryKey),
        )
        .with_column(ColumnDefinition::new("name", DataType::Text).not_null())
        .with_column(ColumnDefinition::new("age", DataType::Integer).not_null());

    let registered_courses = TableDefinition::new(REGISTERED_COURSES)
        .with_column(ColumnDefinition::new("student_id", DataType::Integer).not_null())
        .with_column(ColumnDefinition::new("course_id", DataType::Integer).not_null())
        .with_primary_key(&["student_id", "course_id"])
        .with_foreign_key(ForeignKey::new(&["student_id"], STUDENT, &["student_id"]));

    let grades = TableDefinition::new(GRADES)
        .with_column(ColumnDefinition::new("student_id", DataType::Integer).not_null())
        .with_column(ColumnDefinition::new("course_id", DataType::Integer).not_null())
        .with_column(ColumnDefinition::new("grade", DataType::Real).not_null())
        .with_primary_key(&["student_id", "course_id"])
        .with_foreign_key(ForeignKey::new(&["student_id"], STUDENT, &["student_id"]))
        .with_foreign_key(ForeignKey::new(
            &["student_id", "course_id"],
            REGISTERED_COURSES,
            &["student_id", "course_id"],
        ));

    Schema::new()
        .add_table(student)
        .add_table(registered_courses)
        .add_table(grades)
}

/// Enable foreign keys, drop every table of `schema` (dependents first) and
/// create them again (dependencies first).
pub fn setup_database(conn: &Connection, schema: &Schema) -> Result<()> {
    enable_foreign_keys(conn)?;

    for table in schema.tables.iter().rev() {
        debug!(table = %table.name, "dropping table");
        conn.execute(&table.drop_sql(), [])?;
    }
    for table in &schema.tables {
        let sql = table.create_sql();
        debug!(table = %table.name, %sql, "creating table");
        conn.execute(&sql, [])?;
    }

    info!(tables = schema.tables.len(), "schema reset");
    Ok(())
}

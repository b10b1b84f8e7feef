//! `db query` and `db tables`, over a SQLite file.
//!
//! The database defaults to the configured `database` key; `query` can point
//! at another file with `-d`. Results are tab separated with a header row so
//! they paste cleanly into spreadsheets and `cut`.

use crate::command::{ExitStatus, ParameterizedCommand};
use crate::context::InvocationContext;
use crate::error::{Result, SakError};
use crate::options::{OptionSchema, OptionSpec, ParsedOptions};
use crate::registry::Registry;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl QueryResult {
    pub fn to_tsv(&self) -> String {
        let mut tsv = String::new();
        for line in std::iter::once(&self.columns).chain(&self.rows) {
            tsv.push_str(&line.join("\t"));
            tsv.push('\n');
        }
        tsv
    }
}

pub fn run_query(conn: &Connection, sql: &str) -> Result<QueryResult> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let mut rows = Vec::new();
    let mut cursor = stmt.query([])?;
    while let Some(row) = cursor.next()? {
        let mut values = Vec::with_capacity(width);
        for index in 0..width {
            values.push(format_value(row.get_ref(index)?));
        }
        rows.push(values);
    }

    Ok(QueryResult { columns, rows })
}

fn format_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

pub fn table_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;
    Ok(names)
}

/// Opens an existing database; never creates one as a side effect of a typo.
fn open(path: Option<&Path>) -> Result<Connection> {
    let path = path.ok_or_else(|| {
        SakError::command("No database given, pass --database or set the database key")
    })?;
    if !path.exists() {
        return Err(SakError::command(format!(
            "Database not found: {}",
            path.display()
        )));
    }
    debug!(path = %path.display(), "opening database");
    Ok(Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_URI,
    )?)
}

pub struct Query {
    database: Option<PathBuf>,
}

impl ParameterizedCommand for Query {
    fn schema(&self) -> OptionSchema {
        OptionSchema::new()
            .option(OptionSpec::value("sql", "Statement to run").short('s').required())
            .option(OptionSpec::value("database", "SQLite file, overrides the database key").short('d'))
    }

    fn execute(
        &self,
        _ctx: &InvocationContext,
        options: ParsedOptions,
        out: &mut dyn Write,
    ) -> Result<ExitStatus> {
        let sql = options
            .get("sql")
            .ok_or_else(|| SakError::command("No SQL given"))?;
        let database = options
            .get("database")
            .map(PathBuf::from)
            .or_else(|| self.database.clone());

        let conn = open(database.as_deref())?;
        let result = run_query(&conn, sql)?;
        debug!(rows = result.rows.len(), "query finished");
        out.write_all(result.to_tsv().as_bytes())?;
        Ok(ExitStatus::Success)
    }
}

pub struct Tables {
    database: Option<PathBuf>,
}

impl ParameterizedCommand for Tables {
    fn schema(&self) -> OptionSchema {
        OptionSchema::new()
    }

    fn execute(
        &self,
        _ctx: &InvocationContext,
        _options: ParsedOptions,
        out: &mut dyn Write,
    ) -> Result<ExitStatus> {
        let conn = open(self.database.as_deref())?;
        for name in table_names(&conn)? {
            writeln!(out, "{name}")?;
        }
        Ok(ExitStatus::Success)
    }
}

/// The nested registry behind the `db` composite.
pub fn registry(database: Option<PathBuf>) -> Result<Registry> {
    Registry::builder()
        .parameterized(
            "query",
            "Run a SQL statement and print the rows",
            Query {
                database: database.clone(),
            },
        )
        .parameterized("tables", "List the tables in the database", Tables { database })
        .build()
}

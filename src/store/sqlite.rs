use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, ffi, params, params_from_iter};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::query::{LeadFilter, LeadQuery, SortField, SortOrder};
use crate::types::{Lead, LeadPage, LeadStats, LeadStatus, validate_record};

const LEAD_COLUMNS: &str =
    "id, name, email, phone, status, stage, source, notes, created_at, updated_at";

const INSERT_LEAD: &str = "INSERT INTO leads (id, name, email, phone, status, stage, source, notes, created_at, updated_at, name_normalized)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

/// Fixed-width so that comparing the stored text compares the instants.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_lead(row: &Row<'_>) -> rusqlite::Result<Lead> {
    Ok(Lead {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        status: row.get(4)?,
        stage: row.get(5)?,
        source: row.get(6)?,
        notes: row.get(7)?,
        created_at: parse_datetime(&row.get::<_, String>(8)?),
        updated_at: parse_datetime(&row.get::<_, String>(9)?),
    })
}

/// Maps unique-constraint failures (duplicate id or email) to `AlreadyExists`.
/// CHECK and NOT NULL failures stay database errors.
fn map_write_error(e: rusqlite::Error) -> Error {
    match e {
        rusqlite::Error::SqliteFailure(err, _)
            if matches!(
                err.extended_code,
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            ) =>
        {
            Error::AlreadyExists
        }
        e => Error::from(e),
    }
}

/// Search key for names. SQLite's LIKE only folds ASCII, so both sides are
/// lowercased here instead.
fn normalize_search(s: &str) -> String {
    s.to_lowercase()
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '!' | '%' | '_' => {
                out.push('!');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Builds the WHERE clause (with leading space, or empty) and its parameters.
fn filter_clause(filter: &LeadFilter) -> (String, Vec<Value>) {
    let mut where_parts: Vec<&str> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(search) = &filter.search {
        // email is stored lowercase already
        where_parts.push("(name_normalized LIKE ? ESCAPE '!' OR email LIKE ? ESCAPE '!')");
        let pattern = format!("%{}%", escape_like(&normalize_search(search)));
        params.push(Value::Text(pattern.clone()));
        params.push(Value::Text(pattern));
    }
    if let Some(status) = filter.status {
        where_parts.push("status = ?");
        params.push(Value::Text(status.as_str().to_string()));
    }
    if let Some(stage) = filter.stage {
        where_parts.push("stage = ?");
        params.push(Value::Text(stage.as_str().to_string()));
    }
    if let Some(source) = filter.source {
        where_parts.push("source = ?");
        params.push(Value::Text(source.as_str().to_string()));
    }

    if where_parts.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", where_parts.join(" AND ")), params)
    }
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
        SortField::Name => "name COLLATE NOCASE",
        SortField::Email => "email",
        SortField::Status => "status",
        SortField::Stage => "stage",
        SortField::Source => "source",
    }
}

fn group_counts(conn: &Connection, column: &'static str) -> Result<BTreeMap<String, u64>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {column}, COUNT(*) FROM leads WHERE {column} IS NOT NULL GROUP BY {column}"
    ))?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut counts = BTreeMap::new();
    for row in rows {
        let (key, count) = row?;
        counts.insert(key, count as u64);
    }
    Ok(counts)
}

fn execute_insert(stmt: &mut rusqlite::Statement<'_>, lead: &Lead) -> Result<()> {
    stmt.execute(params![
        lead.id,
        lead.name,
        lead.email,
        lead.phone,
        lead.status,
        lead.stage,
        lead.source,
        lead.notes,
        format_datetime(&lead.created_at),
        format_datetime(&lead.updated_at),
        normalize_search(&lead.name),
    ])
    .map_err(map_write_error)?;
    Ok(())
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    fn create_lead(&self, lead: &Lead) -> Result<()> {
        validate_record(lead)?;
        let conn = self.conn();
        let mut stmt = conn.prepare_cached(INSERT_LEAD)?;
        execute_insert(&mut stmt, lead)
    }

    fn insert_leads(&self, leads: &[Lead]) -> Result<()> {
        for lead in leads {
            validate_record(lead)?;
        }

        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(INSERT_LEAD)?;
            for lead in leads {
                execute_insert(&mut stmt, lead)?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn get_lead(&self, id: &str) -> Result<Option<Lead>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"),
            params![id],
            row_to_lead,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_leads(&self, query: &LeadQuery) -> Result<LeadPage> {
        let conn = self.conn();
        let (where_sql, mut params) = filter_clause(&query.filter);

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM leads{where_sql}"),
            params_from_iter(params.iter()),
            |row| row.get(0),
        )?;

        let direction = match query.sort.order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        // rowid breaks ties so pages never overlap or skip records
        let sql = format!(
            "SELECT {LEAD_COLUMNS} FROM leads{where_sql} ORDER BY {} {direction}, rowid ASC LIMIT ? OFFSET ?",
            sort_column(query.sort.field)
        );
        params.push(Value::Integer(i64::from(query.page.limit)));
        params.push(Value::Integer(
            i64::try_from(query.page.skip()).unwrap_or(i64::MAX),
        ));

        let mut stmt = conn.prepare(&sql)?;
        let leads = stmt
            .query_map(params_from_iter(params.iter()), row_to_lead)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(LeadPage {
            total: total as u64,
            leads,
        })
    }

    fn update_lead(&self, lead: &Lead) -> Result<()> {
        validate_record(lead)?;
        let rows = self
            .conn()
            .execute(
                "UPDATE leads SET name = ?1, email = ?2, phone = ?3, status = ?4, stage = ?5,
                 source = ?6, notes = ?7, updated_at = ?8, name_normalized = ?10 WHERE id = ?9",
                params![
                    lead.name,
                    lead.email,
                    lead.phone,
                    lead.status,
                    lead.stage,
                    lead.source,
                    lead.notes,
                    format_datetime(&lead.updated_at),
                    lead.id,
                    normalize_search(&lead.name),
                ],
            )
            .map_err(map_write_error)?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn clear_leads(&self) -> Result<usize> {
        let rows = self.conn().execute("DELETE FROM leads", [])?;
        Ok(rows)
    }

    fn lead_stats(&self) -> Result<LeadStats> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let total: i64 = tx.query_row("SELECT COUNT(*) FROM leads", [], |row| row.get(0))?;
        let converted: i64 = tx.query_row(
            "SELECT COUNT(*) FROM leads WHERE status = ?1",
            params![LeadStatus::Converted],
            |row| row.get(0),
        )?;
        let lead_by_stage = group_counts(&tx, "stage")?;
        let lead_by_status = group_counts(&tx, "status")?;

        tx.commit()?;

        Ok(LeadStats {
            total_leads: total as u64,
            converted_leads: converted as u64,
            lead_by_stage,
            lead_by_status,
        })
    }

    fn close(&self) -> Result<()> {
        self.conn()
            .query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
        Ok(())
    }
}

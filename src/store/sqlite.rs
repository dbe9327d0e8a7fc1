//! SQLite-backed application store
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC text so that string
//! comparison in SQL orders them chronologically.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};

use super::{
    ACTIVE_MAPPER_STATUS, AggregateAxis, AggregateQuery, AggregatedApplication, Application,
    ApplicationRepository, ApplicationScope, ApplicationUpdate, FormProcessMapper, NewApplication,
    NewFormProcessMapper, QueryFilter, SortField, StoreResult, TimeField,
};
use crate::error::StoreError;

/// Schema version recorded in `PRAGMA user_version`
const SCHEMA_VERSION: i32 = 1;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS form_process_mapper (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        form_id TEXT NOT NULL,
        form_name TEXT NOT NULL,
        process_key TEXT,
        process_name TEXT,
        status TEXT NOT NULL,
        created_by TEXT,
        created TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_mapper_form_id ON form_process_mapper(form_id);

    CREATE TABLE IF NOT EXISTS application (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        application_name TEXT NOT NULL,
        application_status TEXT NOT NULL CHECK (application_status <> ''),
        form_process_mapper_id INTEGER NOT NULL REFERENCES form_process_mapper(id),
        form_url TEXT,
        process_instance_id TEXT,
        created_by TEXT,
        modified_by TEXT,
        created TEXT NOT NULL,
        modified TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_application_name ON application(application_name);
    CREATE INDEX IF NOT EXISTS idx_application_created_by ON application(created_by);
    CREATE INDEX IF NOT EXISTS idx_application_mapper ON application(form_process_mapper_id);
    CREATE INDEX IF NOT EXISTS idx_application_created ON application(created);
    CREATE INDEX IF NOT EXISTS idx_application_modified ON application(modified);
"#;

const APPLICATION_COLUMNS: &str = "a.id, a.application_name, a.application_status, \
     a.form_process_mapper_id, m.form_id, a.form_url, a.process_instance_id, \
     a.created_by, a.modified_by, a.created, a.modified";

const APPLICATION_FROM: &str =
    "FROM application a JOIN form_process_mapper m ON m.id = a.form_process_mapper_id";

const MAPPER_COLUMNS: &str = "m.id, m.form_id, m.form_name, m.process_key, m.process_name, \
     m.status, m.created_by, m.created";

fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(idx: usize, raw: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn application_from_row(row: &Row<'_>) -> rusqlite::Result<Application> {
    Ok(Application {
        id: row.get(0)?,
        application_name: row.get(1)?,
        application_status: row.get(2)?,
        form_process_mapper_id: row.get(3)?,
        form_id: row.get(4)?,
        form_url: row.get(5)?,
        process_instance_id: row.get(6)?,
        created_by: row.get(7)?,
        modified_by: row.get(8)?,
        created: parse_ts(9, row.get(9)?)?,
        modified: parse_ts(10, row.get(10)?)?,
    })
}

fn mapper_from_row(row: &Row<'_>) -> rusqlite::Result<FormProcessMapper> {
    Ok(FormProcessMapper {
        id: row.get(0)?,
        form_id: row.get(1)?,
        form_name: row.get(2)?,
        process_key: row.get(3)?,
        process_name: row.get(4)?,
        status: row.get(5)?,
        created_by: row.get(6)?,
        created: parse_ts(7, row.get(7)?)?,
    })
}

/// Escape LIKE wildcards so user text matches literally
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// WHERE clause accumulated from scope and filter, with positional values
#[derive(Default)]
struct WhereClause {
    clauses: Vec<String>,
    values: Vec<Value>,
}

impl WhereClause {
    fn push(&mut self, clause: &str, value: Value) {
        self.clauses.push(clause.to_string());
        self.values.push(value);
    }

    fn push_in(&mut self, column: &str, values: Vec<Value>) {
        if values.is_empty() {
            // Empty IN-list matches nothing
            self.clauses.push("0".to_string());
            return;
        }
        let placeholders = vec!["?"; values.len()].join(", ");
        self.clauses.push(format!("{} IN ({})", column, placeholders));
        self.values.extend(values);
    }

    fn sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    fn scope(&mut self, scope: &ApplicationScope) {
        let texts = |items: &[String]| items.iter().cloned().map(Value::Text).collect();
        match scope {
            ApplicationScope::All => {}
            ApplicationScope::FormNames(names) => self.push_in("a.application_name", texts(names)),
            ApplicationScope::Owner(owner) => {
                self.push("a.created_by = ?", Value::Text(owner.clone()))
            }
            ApplicationScope::Owners(owners) => self.push_in("a.created_by", texts(owners)),
            ApplicationScope::Ids(ids) => {
                self.push_in("a.id", ids.iter().copied().map(Value::Integer).collect())
            }
            ApplicationScope::FormId(form_id) => {
                self.push("m.form_id = ?", Value::Text(form_id.clone()))
            }
            ApplicationScope::FormIdOwner { form_id, owner } => {
                self.push("m.form_id = ?", Value::Text(form_id.clone()));
                self.push("a.created_by = ?", Value::Text(owner.clone()));
            }
        }
    }

    fn filter(&mut self, filter: &QueryFilter) {
        if let Some(id) = filter.application_id {
            self.push("a.id = ?", Value::Integer(id));
        }
        if let Some(ref name) = filter.application_name {
            self.push(
                "a.application_name LIKE ? ESCAPE '\\'",
                Value::Text(like_pattern(name)),
            );
        }
        if let Some(ref status) = filter.application_status {
            self.push("a.application_status = ?", Value::Text(status.clone()));
        }
        if let Some(ref owner) = filter.created_by {
            self.push("a.created_by = ?", Value::Text(owner.clone()));
        }
        if let Some(ref form_id) = filter.form_id {
            self.push("m.form_id = ?", Value::Text(form_id.clone()));
        }
        if let Some(ref form_name) = filter.form_name {
            self.push("m.form_name = ?", Value::Text(form_name.clone()));
        }

        let ranges = [
            ("a.created >= ?", filter.created_from),
            ("a.created <= ?", filter.created_to),
            ("a.modified >= ?", filter.modified_from),
            ("a.modified <= ?", filter.modified_to),
        ];
        for (clause, bound) in ranges {
            if let Some(ts) = bound {
                self.push(clause, Value::Text(format_ts(&ts)));
            }
        }
    }
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::Id => "a.id",
        SortField::ApplicationName => "a.application_name",
        SortField::ApplicationStatus => "a.application_status",
        SortField::FormId => "m.form_id",
        SortField::FormName => "m.form_name",
        SortField::CreatedBy => "a.created_by",
        SortField::Created => "a.created",
        SortField::Modified => "a.modified",
    }
}

/// ORDER BY clause; the ID breaks ties so pages never overlap
fn order_clause(filter: &QueryFilter) -> String {
    let dir = filter.sort_order.as_sql();
    match filter.sort_by {
        SortField::Id => format!("a.id {}", dir),
        field => format!("{} {}, a.id {}", sort_column(field), dir, dir),
    }
}

fn time_column(field: TimeField) -> &'static str {
    match field {
        TimeField::Created => "a.created",
        TimeField::Modified => "a.modified",
    }
}

/// SQLite-backed implementation of [`ApplicationRepository`]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the store at `path`
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Io(format!("Failed to create store dir: {}", e)))?;
        }
        Self::init(Connection::open(path)?)
    }

    /// Open a private in-memory store
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            return Err(StoreError::SchemaVersion {
                found: version,
                expected: SCHEMA_VERSION,
            });
        }

        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(SCHEMA)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn select_application(conn: &Connection, id: i64) -> StoreResult<Option<Application>> {
        let sql = format!("SELECT {} {} WHERE a.id = ?1", APPLICATION_COLUMNS, APPLICATION_FROM);
        Ok(conn
            .query_row(&sql, [id], application_from_row)
            .optional()?)
    }

    /// Overwrite timestamps, for tests that need fixed dates
    #[cfg(test)]
    pub(crate) fn set_timestamps(
        &self,
        id: i64,
        created: DateTime<Utc>,
        modified: DateTime<Utc>,
    ) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE application SET created = ?1, modified = ?2 WHERE id = ?3",
            params![format_ts(&created), format_ts(&modified), id],
        )?;
        Ok(())
    }
}

impl ApplicationRepository for SqliteStore {
    fn create(&self, new: &NewApplication) -> StoreResult<Application> {
        let conn = self.lock()?;
        let now = format_ts(&Utc::now());

        conn.execute(
            "INSERT INTO application
             (application_name, application_status, form_process_mapper_id, form_url,
              created_by, created, modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                new.application_name,
                new.application_status,
                new.form_process_mapper_id,
                new.form_url,
                new.created_by,
                now
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::select_application(&conn, id)?.ok_or_else(|| StoreError::Corrupt {
            table: "application",
            reason: format!("row {} missing after insert", id),
        })
    }

    fn update(&self, id: i64, update: &ApplicationUpdate) -> StoreResult<Option<Application>> {
        let conn = self.lock()?;
        let now = format_ts(&Utc::now());

        // Single statement: readers see the old row or the new one
        let changed = conn.execute(
            "UPDATE application SET
                application_status = COALESCE(?1, application_status),
                process_instance_id = COALESCE(?2, process_instance_id),
                form_url = COALESCE(?3, form_url),
                modified_by = COALESCE(?4, modified_by),
                modified = MAX(created, ?5)
             WHERE id = ?6",
            params![
                update.application_status,
                update.process_instance_id,
                update.form_url,
                update.modified_by,
                now,
                id
            ],
        )?;

        if changed == 0 {
            return Ok(None);
        }
        Self::select_application(&conn, id)
    }

    fn find_by_id(&self, id: i64) -> StoreResult<Option<Application>> {
        let conn = self.lock()?;
        Self::select_application(&conn, id)
    }

    fn find_applications(
        &self,
        scope: &ApplicationScope,
        filter: &QueryFilter,
    ) -> StoreResult<(Vec<Application>, u64)> {
        let conn = self.lock()?;

        let mut clause = WhereClause::default();
        clause.scope(scope);
        clause.filter(filter);
        let where_sql = clause.sql();

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) {}{}", APPLICATION_FROM, where_sql),
            params_from_iter(clause.values.iter()),
            |r| r.get(0),
        )?;

        let mut sql = format!(
            "SELECT {} {}{} ORDER BY {}",
            APPLICATION_COLUMNS,
            APPLICATION_FROM,
            where_sql,
            order_clause(filter)
        );
        let mut values = clause.values;
        if let Some(page) = filter.pagination {
            sql.push_str(" LIMIT ? OFFSET ?");
            values.push(Value::Integer(page.sql_limit()));
            values.push(Value::Integer(page.offset()));
        }

        log::debug!("find_applications: {} ({} params)", sql, values.len());

        let mut stmt = conn.prepare(&sql)?;
        let applications = stmt
            .query_map(params_from_iter(values.iter()), application_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((applications, total as u64))
    }

    fn count_applications(&self, scope: &ApplicationScope) -> StoreResult<u64> {
        let conn = self.lock()?;

        let mut clause = WhereClause::default();
        clause.scope(scope);

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) {}{}", APPLICATION_FROM, clause.sql()),
            params_from_iter(clause.values.iter()),
            |r| r.get(0),
        )?;
        Ok(total as u64)
    }

    fn find_all_statuses(&self) -> StoreResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT application_status FROM application ORDER BY application_status",
        )?;
        let statuses = stmt
            .query_map([], |r| r.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(statuses)
    }

    fn aggregate(&self, query: &AggregateQuery) -> StoreResult<Vec<AggregatedApplication>> {
        let conn = self.lock()?;
        let column = time_column(query.time_field);
        let from = format_ts(&query.from);
        let to = format_ts(&query.to);

        let rows = match query.axis {
            AggregateAxis::Mapper => {
                let sql = format!(
                    "SELECT a.form_process_mapper_id, m.form_name, COUNT(a.id) {}
                     WHERE {col} >= ?1 AND {col} <= ?2
                     GROUP BY a.form_process_mapper_id, m.form_name
                     ORDER BY a.form_process_mapper_id",
                    APPLICATION_FROM,
                    col = column
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![from, to], |r| {
                        Ok(AggregatedApplication {
                            form_process_mapper_id: r.get(0)?,
                            form_name: r.get(1)?,
                            application_status: None,
                            count: r.get::<_, i64>(2)? as u64,
                        })
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
            AggregateAxis::Status { mapper_id } => {
                let sql = format!(
                    "SELECT a.form_process_mapper_id, m.form_name, a.application_status, COUNT(a.id) {}
                     WHERE a.form_process_mapper_id = ?1 AND {col} >= ?2 AND {col} <= ?3
                     GROUP BY a.form_process_mapper_id, m.form_name, a.application_status
                     ORDER BY a.application_status",
                    APPLICATION_FROM,
                    col = column
                );
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![mapper_id, from, to], |r| {
                        Ok(AggregatedApplication {
                            form_process_mapper_id: r.get(0)?,
                            form_name: r.get(1)?,
                            application_status: Some(r.get(2)?),
                            count: r.get::<_, i64>(3)? as u64,
                        })
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
        };

        Ok(rows)
    }

    fn find_mapper_by_form_id(&self, form_id: &str) -> StoreResult<Option<FormProcessMapper>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM form_process_mapper m
             WHERE m.form_id = ?1 AND m.status = ?2
             ORDER BY m.id DESC LIMIT 1",
            MAPPER_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![form_id, ACTIVE_MAPPER_STATUS], mapper_from_row)
            .optional()?)
    }

    fn find_mapper_by_application_id(&self, id: i64) -> StoreResult<Option<FormProcessMapper>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM form_process_mapper m
             JOIN application a ON a.form_process_mapper_id = m.id
             WHERE a.id = ?1",
            MAPPER_COLUMNS
        );
        Ok(conn.query_row(&sql, [id], mapper_from_row).optional()?)
    }

    fn create_mapper(&self, new: &NewFormProcessMapper) -> StoreResult<FormProcessMapper> {
        let conn = self.lock()?;
        let now = format_ts(&Utc::now());

        conn.execute(
            "INSERT INTO form_process_mapper
             (form_id, form_name, process_key, process_name, status, created_by, created)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                new.form_id,
                new.form_name,
                new.process_key,
                new.process_name,
                ACTIVE_MAPPER_STATUS,
                new.created_by,
                now
            ],
        )?;

        let id = conn.last_insert_rowid();
        let sql = format!("SELECT {} FROM form_process_mapper m WHERE m.id = ?1", MAPPER_COLUMNS);
        Ok(conn.query_row(&sql, [id], mapper_from_row)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{NEW_APPLICATION_STATUS, SortOrder};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn mapper(store: &SqliteStore, form_id: &str, form_name: &str) -> FormProcessMapper {
        store
            .create_mapper(&NewFormProcessMapper {
                form_id: form_id.to_string(),
                form_name: form_name.to_string(),
                process_key: Some(format!("{}-process", form_id)),
                process_name: None,
                created_by: Some("admin".to_string()),
            })
            .unwrap()
    }

    fn application(store: &SqliteStore, mapper: &FormProcessMapper, owner: &str) -> Application {
        store
            .create(&NewApplication {
                application_name: mapper.form_name.clone(),
                application_status: NEW_APPLICATION_STATUS.to_string(),
                form_process_mapper_id: mapper.id,
                form_url: Some(format!(
                    "https://forms.example/form/{}/submission/s-{}",
                    mapper.form_id, owner
                )),
                created_by: Some(owner.to_string()),
            })
            .unwrap()
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_create_assigns_id_and_timestamps() {
        let store = SqliteStore::open_in_memory().unwrap();
        let m = mapper(&store, "F1", "Leave Request");
        let app = application(&store, &m, "alice");

        assert!(app.id > 0);
        assert_eq!(app.form_id, "F1");
        assert_eq!(app.application_status, "new");
        assert!(app.process_instance_id.is_none());
        assert!(app.created <= app.modified);
    }

    #[test]
    fn test_update_sets_but_never_clears_instance_id() {
        let store = SqliteStore::open_in_memory().unwrap();
        let m = mapper(&store, "F1", "Leave");
        let app = application(&store, &m, "alice");

        let updated = store
            .update(app.id, &ApplicationUpdate::process_instance("proc-1"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.process_instance_id.as_deref(), Some("proc-1"));

        let status_only = ApplicationUpdate {
            application_status: Some("approved".to_string()),
            ..Default::default()
        };
        let updated = store.update(app.id, &status_only).unwrap().unwrap();
        assert_eq!(updated.application_status, "approved");
        assert_eq!(updated.process_instance_id.as_deref(), Some("proc-1"));
        assert!(updated.created <= updated.modified);
    }

    #[test]
    fn test_update_missing_application() {
        let store = SqliteStore::open_in_memory().unwrap();
        let result = store
            .update(999, &ApplicationUpdate::process_instance("proc-1"))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_scopes() {
        let store = SqliteStore::open_in_memory().unwrap();
        let leave = mapper(&store, "F1", "Leave");
        let travel = mapper(&store, "F2", "Travel");
        let a1 = application(&store, &leave, "alice");
        application(&store, &leave, "bob");
        let a3 = application(&store, &travel, "alice");
        application(&store, &travel, "carol");

        let all = QueryFilter::new();
        let count = |scope: ApplicationScope| store.find_applications(&scope, &all).unwrap().1;

        assert_eq!(count(ApplicationScope::All), 4);
        assert_eq!(count(ApplicationScope::FormNames(vec!["Leave".into()])), 2);
        assert_eq!(count(ApplicationScope::FormNames(vec![])), 0);
        assert_eq!(count(ApplicationScope::Owner("alice".into())), 2);
        assert_eq!(
            count(ApplicationScope::Owners(vec!["bob".into(), "carol".into()])),
            2
        );
        assert_eq!(count(ApplicationScope::Ids(vec![a1.id, a3.id])), 2);
        assert_eq!(count(ApplicationScope::FormId("F2".into())), 2);
        assert_eq!(
            count(ApplicationScope::FormIdOwner {
                form_id: "F2".into(),
                owner: "alice".into()
            }),
            1
        );
        assert_eq!(
            store
                .count_applications(&ApplicationScope::Owner("alice".into()))
                .unwrap(),
            2
        );
    }

    #[test]
    fn test_filters_compose() {
        let store = SqliteStore::open_in_memory().unwrap();
        let leave = mapper(&store, "F1", "Annual Leave");
        let travel = mapper(&store, "F2", "Travel");
        let a1 = application(&store, &leave, "alice");
        let a2 = application(&store, &leave, "bob");
        application(&store, &travel, "alice");

        store
            .update(
                a2.id,
                &ApplicationUpdate {
                    application_status: Some("approved".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let filter = QueryFilter {
            application_name: Some("leave".into()),
            created_by: Some("alice".into()),
            ..Default::default()
        };
        let (apps, total) = store
            .find_applications(&ApplicationScope::All, &filter)
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(apps[0].id, a1.id);

        let filter = QueryFilter {
            application_status: Some("approved".into()),
            ..Default::default()
        };
        let (apps, _) = store
            .find_applications(&ApplicationScope::All, &filter)
            .unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].id, a2.id);

        let filter = QueryFilter::new().application_id(a1.id);
        let (apps, total) = store
            .find_applications(&ApplicationScope::FormNames(vec!["Travel".into()]), &filter)
            .unwrap();
        assert!(apps.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn test_name_filter_matches_wildcards_literally() {
        let store = SqliteStore::open_in_memory().unwrap();
        let pct = mapper(&store, "F1", "100% Done");
        let plain = mapper(&store, "F2", "100 Done");
        application(&store, &pct, "alice");
        application(&store, &plain, "alice");

        let filter = QueryFilter {
            application_name: Some("0%".into()),
            ..Default::default()
        };
        let (apps, _) = store
            .find_applications(&ApplicationScope::All, &filter)
            .unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].application_name, "100% Done");
    }

    #[test]
    fn test_date_range_filters() {
        let store = SqliteStore::open_in_memory().unwrap();
        let m = mapper(&store, "F1", "Leave");
        let early = application(&store, &m, "alice");
        let late = application(&store, &m, "bob");
        store.set_timestamps(early.id, day(1), day(2)).unwrap();
        store.set_timestamps(late.id, day(10), day(20)).unwrap();

        let filter = QueryFilter {
            created_from: Some(day(5)),
            ..Default::default()
        };
        let (apps, _) = store
            .find_applications(&ApplicationScope::All, &filter)
            .unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].id, late.id);

        let filter = QueryFilter {
            modified_from: Some(day(2)),
            modified_to: Some(day(2)),
            ..Default::default()
        };
        let (apps, _) = store
            .find_applications(&ApplicationScope::All, &filter)
            .unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].id, early.id);
    }

    #[test]
    fn test_pages_concatenate_to_full_result() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mappers = [
            mapper(&store, "F1", "Bravo"),
            mapper(&store, "F2", "Alpha"),
            mapper(&store, "F3", "Charlie"),
        ];
        for i in 0..23 {
            application(&store, &mappers[i % 3], &format!("user-{}", i % 4));
        }

        let base = QueryFilter::new()
            .sort_by(SortField::ApplicationName)
            .sort_order(SortOrder::Asc);
        let (full, total) = store
            .find_applications(&ApplicationScope::All, &base)
            .unwrap();
        assert_eq!(total, 23);

        let mut paged = Vec::new();
        for page_no in 1..=5 {
            let (page, page_total) = store
                .find_applications(&ApplicationScope::All, &base.clone().page(page_no, 5))
                .unwrap();
            assert!(page.len() <= 5);
            assert_eq!(page_total, 23);
            paged.extend(page);
        }

        let full_ids: Vec<i64> = full.iter().map(|a| a.id).collect();
        let paged_ids: Vec<i64> = paged.iter().map(|a| a.id).collect();
        assert_eq!(full_ids, paged_ids);

        let names: Vec<&str> = full.iter().map(|a| a.application_name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let store = SqliteStore::open_in_memory().unwrap();
        let m = mapper(&store, "F1", "Leave");
        for _ in 0..5 {
            application(&store, &m, "alice");
        }

        for (page_no, limit) in [
            (i64::MAX as u64, 2),
            (i64::MAX as u64, 3),
            (u64::MAX, u64::MAX),
            (3, 5),
        ] {
            let (page, total) = store
                .find_applications(&ApplicationScope::All, &QueryFilter::new().page(page_no, limit))
                .unwrap();
            assert!(page.is_empty(), "page {} of {} returned rows", page_no, limit);
            assert_eq!(total, 5);
        }
    }

    #[test]
    fn test_default_order_is_newest_id_first() {
        let store = SqliteStore::open_in_memory().unwrap();
        let m = mapper(&store, "F1", "Leave");
        let first = application(&store, &m, "alice");
        let second = application(&store, &m, "alice");

        let (apps, _) = store
            .find_applications(&ApplicationScope::All, &QueryFilter::new())
            .unwrap();
        assert_eq!(apps[0].id, second.id);
        assert_eq!(apps[1].id, first.id);
    }

    #[test]
    fn test_aggregate_by_mapper_and_status() {
        let store = SqliteStore::open_in_memory().unwrap();
        let leave = mapper(&store, "F1", "Leave");
        let travel = mapper(&store, "F2", "Travel");
        let a1 = application(&store, &leave, "alice");
        let a2 = application(&store, &leave, "bob");
        let a3 = application(&store, &travel, "carol");
        for app in [&a1, &a2, &a3] {
            store.set_timestamps(app.id, day(3), day(15)).unwrap();
        }
        store
            .update(
                a2.id,
                &ApplicationUpdate {
                    application_status: Some("approved".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let by_mapper = store
            .aggregate(&AggregateQuery {
                axis: AggregateAxis::Mapper,
                time_field: TimeField::Created,
                from: day(1),
                to: day(5),
            })
            .unwrap();
        assert_eq!(by_mapper.len(), 2);
        assert_eq!(by_mapper[0].form_name, "Leave");
        assert_eq!(by_mapper[0].count, 2);
        assert_eq!(by_mapper[1].count, 1);
        assert!(by_mapper[0].application_status.is_none());

        let by_status = store
            .aggregate(&AggregateQuery {
                axis: AggregateAxis::Status {
                    mapper_id: leave.id,
                },
                time_field: TimeField::Created,
                from: day(1),
                to: day(5),
            })
            .unwrap();
        assert_eq!(by_status.len(), 2);
        assert_eq!(by_status[0].application_status.as_deref(), Some("approved"));
        assert_eq!(by_status[1].application_status.as_deref(), Some("new"));

        // a2 was just modified, a1 and a3 still carry day 15
        let modified = store
            .aggregate(&AggregateQuery {
                axis: AggregateAxis::Mapper,
                time_field: TimeField::Modified,
                from: day(14),
                to: day(16),
            })
            .unwrap();
        let total: u64 = modified.iter().map(|r| r.count).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_mapper_lookup() {
        let store = SqliteStore::open_in_memory().unwrap();
        mapper(&store, "F1", "Leave v1");
        let latest = mapper(&store, "F1", "Leave v2");

        let found = store.find_mapper_by_form_id("F1").unwrap().unwrap();
        assert_eq!(found.id, latest.id);
        assert!(store.find_mapper_by_form_id("F9").unwrap().is_none());

        let app = application(&store, &latest, "alice");
        let by_app = store.find_mapper_by_application_id(app.id).unwrap().unwrap();
        assert_eq!(by_app.form_name, "Leave v2");
    }

    #[test]
    fn test_statuses_are_distinct() {
        let store = SqliteStore::open_in_memory().unwrap();
        let m = mapper(&store, "F1", "Leave");
        application(&store, &m, "alice");
        let a2 = application(&store, &m, "bob");
        application(&store, &m, "carol");
        store
            .update(
                a2.id,
                &ApplicationUpdate {
                    application_status: Some("rejected".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(store.find_all_statuses().unwrap(), vec!["new", "rejected"]);
    }

    #[test]
    fn test_reopen_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("applications.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            let m = mapper(&store, "F1", "Leave");
            application(&store, &m, "alice");
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.count_applications(&ApplicationScope::All).unwrap(), 1);
    }
}

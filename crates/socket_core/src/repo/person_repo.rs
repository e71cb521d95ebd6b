//! Person snapshot repository contracts and implementations.
//!
//! # Responsibility
//! - Load the full person sequence that seeds a session.
//! - Save the full person sequence on request.
//!
//! # Invariants
//! - Saves replace the whole snapshot atomically; a failed save leaves the
//!   previously saved snapshot intact.
//! - Loads validate every row through `PersonDraft` and report the first
//!   invalid record instead of skipping it.
//! - "Never saved" (`None`) is distinct from "saved empty" (`Some(vec![])`).

use crate::db::DbError;
use crate::model::field::{Name, Profile};
use crate::model::person::{Person, PersonDraft};
use log::{debug, info};
use rusqlite::{params, Connection, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence failure.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Persisted content is not a valid person sequence.
    DataLoad {
        /// Zero-based record index in load order.
        record: usize,
        field: &'static str,
        message: String,
    },
    /// Repository does not accept writes.
    ReadOnly,
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DataLoad {
                record,
                field,
                message,
            } => write!(f, "invalid person record {record} ({field}): {message}"),
            Self::ReadOnly => write!(f, "person repository is read-only"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::DataLoad { .. } | Self::ReadOnly => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Full-snapshot persistence boundary.
pub trait PersonRepository {
    /// Returns the last saved sequence, or `None` when nothing was saved yet.
    fn load_persons(&self) -> StorageResult<Option<Vec<Person>>>;
    /// Replaces the saved sequence with `persons`.
    fn save_persons(&mut self, persons: &[Person]) -> StorageResult<()>;
}

/// SQLite-backed snapshot repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Wraps a connection returned by `db::open_db*`.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn load_persons(&self) -> StorageResult<Option<Vec<Person>>> {
        let saved: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM snapshot_meta WHERE id = 1);",
            [],
            |row| row.get(0),
        )?;
        if !saved {
            debug!("event=snapshot_load module=repo status=empty");
            return Ok(None);
        }

        let mut stmt = self.conn.prepare(
            "SELECT position, name, profile, phone, email, address
             FROM persons
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut drafts = Vec::new();
        while let Some(row) = rows.next()? {
            let position: i64 = row.get("position")?;
            let record = drafts.len();
            let name = row
                .get::<_, Option<String>>("name")?
                .ok_or_else(|| missing_field(record, Name::FIELD, "Name"))?;
            let profile = row
                .get::<_, Option<String>>("profile")?
                .ok_or_else(|| missing_field(record, Profile::FIELD, "Profile"))?;
            drafts.push((
                position,
                PersonDraft {
                    phone: row.get("phone")?,
                    email: row.get("email")?,
                    address: row.get("address")?,
                    ..PersonDraft::new(name, profile)
                },
            ));
        }

        let mut persons = Vec::with_capacity(drafts.len());
        for (record, (position, mut draft)) in drafts.into_iter().enumerate() {
            draft.languages = self.load_tokens(
                "SELECT language FROM person_languages WHERE person_position = ?1 ORDER BY language;",
                position,
            )?;
            draft.tags = self.load_tokens(
                "SELECT tag FROM person_tags WHERE person_position = ?1 ORDER BY tag;",
                position,
            )?;
            let person = draft.build().map_err(|err| StorageError::DataLoad {
                record,
                field: err.field,
                message: err.message.to_string(),
            })?;
            persons.push(person);
        }

        info!(
            "event=snapshot_load module=repo status=ok count={}",
            persons.len()
        );
        Ok(Some(persons))
    }

    fn save_persons(&mut self, persons: &[Person]) -> StorageResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute_batch(
            "DELETE FROM person_languages;
             DELETE FROM person_tags;
             DELETE FROM persons;",
        )?;

        for (position, person) in persons.iter().enumerate() {
            let position = position as i64;
            tx.execute(
                "INSERT INTO persons (position, name, profile, phone, email, address)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    position,
                    person.name().as_str(),
                    person.profile().as_str(),
                    person.phone().map(|value| value.as_str()),
                    person.email().map(|value| value.as_str()),
                    person.address().map(|value| value.as_str()),
                ],
            )?;
            for language in person.languages() {
                tx.execute(
                    "INSERT INTO person_languages (person_position, language) VALUES (?1, ?2);",
                    params![position, language.as_str()],
                )?;
            }
            for tag in person.tags() {
                tx.execute(
                    "INSERT INTO person_tags (person_position, tag) VALUES (?1, ?2);",
                    params![position, tag.as_str()],
                )?;
            }
        }

        tx.execute(
            "INSERT INTO snapshot_meta (id, saved_at)
             VALUES (1, strftime('%s', 'now') * 1000)
             ON CONFLICT(id) DO UPDATE SET saved_at = excluded.saved_at;",
            [],
        )?;
        tx.commit()?;

        info!(
            "event=snapshot_save module=repo status=ok count={}",
            persons.len()
        );
        Ok(())
    }
}

impl SqlitePersonRepository<'_> {
    fn load_tokens(&self, sql: &str, position: i64) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let tokens = stmt
            .query_map([position], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tokens)
    }
}

fn missing_field(record: usize, field: &'static str, label: &str) -> StorageError {
    StorageError::DataLoad {
        record,
        field,
        message: format!("Person's {label} field is missing!"),
    }
}

/// Process-local repository for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersonRepository {
    saved: Option<Vec<Person>>,
    /// Successful saves accepted before it turns read-only; `None` is unlimited.
    save_limit: Option<usize>,
    save_count: usize,
}

impl InMemoryPersonRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository that already holds `persons` as its saved snapshot.
    pub fn with_persons(persons: Vec<Person>) -> Self {
        Self {
            saved: Some(persons),
            ..Self::default()
        }
    }

    /// Repository whose saves always fail with `StorageError::ReadOnly`.
    pub fn read_only(persons: Option<Vec<Person>>) -> Self {
        Self {
            saved: persons,
            ..Self::default()
        }
        .with_save_limit(0)
    }

    /// Accepts `limit` more saves, then fails with `StorageError::ReadOnly`.
    pub fn with_save_limit(self, limit: usize) -> Self {
        Self {
            save_limit: Some(self.save_count + limit),
            ..self
        }
    }

    pub fn saved(&self) -> Option<&[Person]> {
        self.saved.as_deref()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl PersonRepository for InMemoryPersonRepository {
    fn load_persons(&self) -> StorageResult<Option<Vec<Person>>> {
        Ok(self.saved.clone())
    }

    fn save_persons(&mut self, persons: &[Person]) -> StorageResult<()> {
        if self.save_limit.is_some_and(|limit| self.save_count >= limit) {
            return Err(StorageError::ReadOnly);
        }
        self.saved = Some(persons.to_vec());
        self.save_count += 1;
        Ok(())
    }
}

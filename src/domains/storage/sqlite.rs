//! SQLite document collection.
//!
//! Every collection lives in one `documents` table keyed by
//! `(collection, id)`. Bodies are stored as JSON text without the `id`
//! field. `seq` keeps insertion order across updates.
//!
//! Ids come from [`IdSequence`]; the last id issued per collection is kept in
//! `id_counters` so ids are not reused after a delete, even across restarts.
//!
//! rusqlite is blocking, so each call runs on the blocking pool while holding
//! the connection mutex.

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{error, info};

use super::document::{Document, DocumentCollection, DocumentError, DocumentResult, Filter};
use crate::domains::resources::IdSequence;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    seq        INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL,
    id         TEXT NOT NULL,
    body       TEXT NOT NULL,
    UNIQUE (collection, id)
);
CREATE TABLE IF NOT EXISTS id_counters (
    collection TEXT PRIMARY KEY,
    last_id    INTEGER NOT NULL
);
";

fn db_error(err: rusqlite::Error) -> DocumentError {
    DocumentError::unavailable(err.to_string())
}

/// Handle to an open SQLite database shared by its collections.
#[derive(Clone)]
pub struct SqliteDatabase {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDatabase {
    /// Open the database named by a connection string.
    ///
    /// Accepts `sqlite://<path>`, `sqlite:<path>`, a bare path, or
    /// `sqlite::memory:` / `:memory:` for a private in-memory database.
    pub fn open(url: &str) -> DocumentResult<Self> {
        let target = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);

        if target == ":memory:" {
            return Self::open_in_memory();
        }

        let started_at = Instant::now();
        info!(path = target, "Opening SQLite database");

        let conn = Connection::open(target).map_err(|e| {
            error!(
                path = target,
                duration_ms = started_at.elapsed().as_millis() as u64,
                error = %e,
                "Failed to open SQLite database"
            );
            db_error(e)
        })?;

        let db = Self::bootstrap(conn)?;
        info!(
            path = target,
            duration_ms = started_at.elapsed().as_millis() as u64,
            "SQLite database ready"
        );
        Ok(db)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> DocumentResult<Self> {
        let conn = Connection::open_in_memory().map_err(db_error)?;
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> DocumentResult<Self> {
        conn.busy_timeout(Duration::from_secs(5)).map_err(db_error)?;
        conn.execute_batch(SCHEMA).map_err(db_error)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// A client for the named collection.
    pub fn collection(&self, name: impl Into<String>) -> SqliteCollection {
        SqliteCollection {
            db: self.clone(),
            name: name.into(),
        }
    }

    async fn with_conn<T, F>(&self, f: F) -> DocumentResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> DocumentResult<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| DocumentError::unavailable("connection lock poisoned"))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| DocumentError::unavailable(format!("database task failed: {e}")))?
    }
}

/// One named collection inside a [`SqliteDatabase`].
#[derive(Clone)]
pub struct SqliteCollection {
    db: SqliteDatabase,
    name: String,
}

fn parse_body(id: String, body: &str) -> DocumentResult<Document> {
    let mut doc: Document =
        serde_json::from_str(body).map_err(|source| DocumentError::Corrupt {
            id: id.clone(),
            source,
        })?;
    doc.insert("id".to_owned(), Value::String(id));
    Ok(doc)
}

fn encode_body(mut doc: Document) -> DocumentResult<String> {
    doc.remove("id");
    Ok(serde_json::to_string(&doc)?)
}

#[async_trait]
impl DocumentCollection for SqliteCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find(&self, filter: &Filter) -> DocumentResult<Vec<Document>> {
        let name = self.name.clone();
        let filter = filter.clone();
        self.db
            .with_conn(move |conn| {
                let mut stmt = conn
                    .prepare("SELECT id, body FROM documents WHERE collection = ?1 ORDER BY seq")
                    .map_err(db_error)?;
                let rows = stmt
                    .query_map(params![name], |row| {
                        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                    })
                    .map_err(db_error)?
                    .collect::<rusqlite::Result<Vec<_>>>()
                    .map_err(db_error)?;

                let mut docs = Vec::with_capacity(rows.len());
                for (id, body) in rows {
                    let doc = parse_body(id, &body)?;
                    if filter.matches(&doc) {
                        docs.push(doc);
                    }
                }
                Ok(docs)
            })
            .await
    }

    async fn find_by_id(&self, id: &str) -> DocumentResult<Option<Document>> {
        let name = self.name.clone();
        let id = id.to_owned();
        self.db
            .with_conn(move |conn| {
                let body = conn
                    .query_row(
                        "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                        params![name, id],
                        |row| row.get::<_, String>(0),
                    )
                    .optional()
                    .map_err(db_error)?;
                body.map(|body| parse_body(id, &body)).transpose()
            })
            .await
    }

    async fn save(&self, mut doc: Document) -> DocumentResult<Document> {
        let name = self.name.clone();
        let body = encode_body(doc.clone())?;
        let id = self
            .db
            .with_conn(move |conn| {
                let tx = conn.transaction().map_err(db_error)?;

                let last = tx
                    .query_row(
                        "SELECT last_id FROM id_counters WHERE collection = ?1",
                        params![name],
                        |row| row.get::<_, i64>(0),
                    )
                    .optional()
                    .map_err(db_error)?
                    .unwrap_or(0);

                let existing = {
                    let mut stmt = tx
                        .prepare("SELECT id FROM documents WHERE collection = ?1")
                        .map_err(db_error)?;
                    stmt.query_map(params![name], |row| row.get::<_, String>(0))
                        .map_err(db_error)?
                        .collect::<rusqlite::Result<Vec<_>>>()
                        .map_err(db_error)?
                };

                let mut ids = IdSequence::starting_after(u64::try_from(last).unwrap_or(0));
                let id = ids.next(existing.iter().map(String::as_str))?;
                let counter = i64::try_from(ids.last())
                    .map_err(|_| DocumentError::CounterOverflow(ids.last()))?;

                tx.execute(
                    "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3)",
                    params![name, id, body],
                )
                .map_err(db_error)?;
                tx.execute(
                    "INSERT INTO id_counters (collection, last_id) VALUES (?1, ?2)
                     ON CONFLICT (collection) DO UPDATE SET last_id = excluded.last_id",
                    params![name, counter],
                )
                .map_err(db_error)?;

                tx.commit().map_err(db_error)?;
                Ok(id)
            })
            .await?;

        doc.insert("id".to_owned(), Value::String(id));
        Ok(doc)
    }

    async fn find_by_id_and_update(
        &self,
        id: &str,
        mut doc: Document,
    ) -> DocumentResult<Option<Document>> {
        let name = self.name.clone();
        let key = id.to_owned();
        let body = encode_body(doc.clone())?;
        let changed = self
            .db
            .with_conn(move |conn| {
                conn.execute(
                    "UPDATE documents SET body = ?3 WHERE collection = ?1 AND id = ?2",
                    params![name, key, body],
                )
                .map_err(db_error)
            })
            .await?;

        if changed == 0 {
            return Ok(None);
        }
        doc.insert("id".to_owned(), Value::String(id.to_owned()));
        Ok(Some(doc))
    }

    async fn find_by_id_and_delete(&self, id: &str) -> DocumentResult<Option<Document>> {
        let name = self.name.clone();
        let id = id.to_owned();
        self.db
            .with_conn(move |conn| {
                let tx = conn.transaction().map_err(db_error)?;
                let body = tx
                    .query_row(
                        "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                        params![name, id],
                        |row| row.get::<_, String>(0),
                    )
                    .optional()
                    .map_err(db_error)?;
                if body.is_some() {
                    tx.execute(
                        "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                        params![name, id],
                    )
                    .map_err(db_error)?;
                }
                tx.commit().map_err(db_error)?;
                body.map(|body| parse_body(id, &body)).transpose()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn note(content: &str) -> Document {
        match json!({ "content": content, "important": false }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let notes = db.collection("notes");

        let first = notes.save(note("a")).await.unwrap();
        let second = notes.save(note("b")).await.unwrap();
        assert_eq!(first["id"], "1");
        assert_eq!(second["id"], "2");

        let all = notes.find(&Filter::all()).await.unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[tokio::test]
    async fn test_collections_are_separate() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        db.collection("notes").save(note("a")).await.unwrap();
        let person = db.collection("persons").save(note("b")).await.unwrap();

        assert_eq!(person["id"], "1");
        assert_eq!(db.collection("notes").find(&Filter::all()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deleted_id_is_not_reissued() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let notes = db.collection("notes");
        notes.save(note("a")).await.unwrap();
        let second = notes.save(note("b")).await.unwrap();

        let removed = notes.find_by_id_and_delete("2").await.unwrap();
        assert_eq!(removed, Some(second));
        assert_eq!(notes.find_by_id_and_delete("2").await.unwrap(), None);

        let third = notes.save(note("c")).await.unwrap();
        assert_eq!(third["id"], "3");
    }

    #[tokio::test]
    async fn test_update_keeps_position() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let notes = db.collection("notes");
        notes.save(note("a")).await.unwrap();
        notes.save(note("b")).await.unwrap();

        let updated = notes
            .find_by_id_and_update("1", note("a2"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["content"], "a2");
        assert_eq!(notes.find_by_id_and_update("9", note("x")).await.unwrap(), None);

        let all = notes.find(&Filter::all()).await.unwrap();
        assert_eq!(all[0]["id"], "1");
        assert_eq!(all[0]["content"], "a2");
    }

    #[tokio::test]
    async fn test_find_with_filter() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let notes = db.collection("notes");
        let mut important = note("a");
        important.insert("important".into(), Value::Bool(true));
        notes.save(important).await.unwrap();
        notes.save(note("b")).await.unwrap();

        let found = notes
            .find(&Filter::all().eq("important", true))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["content"], "a");
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.db");
        let url = format!("sqlite://{}", path.display());

        {
            let db = SqliteDatabase::open(&url).unwrap();
            db.collection("notes").save(note("kept")).await.unwrap();
        }

        let db = SqliteDatabase::open(&url).unwrap();
        let doc = db.collection("notes").find_by_id("1").await.unwrap().unwrap();
        assert_eq!(doc["content"], "kept");
        assert_eq!(db.collection("notes").save(note("next")).await.unwrap()["id"], "2");
    }

    async fn insert_raw(db: &SqliteDatabase, collection: &'static str, id: String) {
        db.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, '{}')",
                params![collection, id],
            )
            .map_err(db_error)?;
            Ok(())
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_counter_beyond_sqlite_integer_is_rejected() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let notes = db.collection("notes");
        insert_raw(&db, "notes", i64::MAX.to_string()).await;

        let err = notes.save(note("a")).await.unwrap_err();
        assert!(matches!(err, DocumentError::CounterOverflow(n) if n == i64::MAX as u64 + 1));
        assert_eq!(notes.find(&Filter::all()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_id_without_successor_does_not_block_saves() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let notes = db.collection("notes");
        insert_raw(&db, "notes", u64::MAX.to_string()).await;

        let saved = notes.save(note("a")).await.unwrap();
        assert_eq!(saved["id"], "1");
    }
}

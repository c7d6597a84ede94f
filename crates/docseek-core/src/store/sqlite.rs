use std::path::Path;
#[cfg(unix)]
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::embedding::EmbeddingSource;
use crate::error::{DocseekError, Result};
use crate::models::IndexedDocument;

use super::{VectorStore, validate_document};

const SELECT_COLUMNS: &str = "id, title, path, embedding, embedding_source, extracted_text, \
                              last_modified_ms, last_indexed";

#[derive(Clone)]
pub struct SqliteVectorStore {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SqliteVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteVectorStore").finish_non_exhaustive()
    }
}

impl SqliteVectorStore {
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| DocseekError::Internal("sqlite mutex poisoned".to_string()))?;
        f(&conn)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        #[cfg(unix)]
        harden_sqlite_permissions(path)?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(
                r"
                PRAGMA journal_mode = WAL;
                CREATE TABLE IF NOT EXISTS documents (
                    path TEXT PRIMARY KEY,
                    id TEXT NOT NULL UNIQUE,
                    title TEXT NOT NULL,
                    embedding BLOB NOT NULL,
                    embedding_dim INTEGER NOT NULL,
                    embedding_source TEXT NOT NULL,
                    extracted_text TEXT NOT NULL,
                    last_modified_ms INTEGER,
                    last_indexed TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_documents_last_indexed
                ON documents(last_indexed DESC);
                ",
            )?;
            Ok(())
        })
    }
}

impl VectorStore for SqliteVectorStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn put(&self, document: IndexedDocument) -> Result<IndexedDocument> {
        validate_document(&document)?;
        let blob = encode_embedding(&document.embedding);
        let dim = i64::try_from(document.embedding.len())
            .map_err(|_| DocseekError::Validation("embedding too large".to_string()))?;
        let last_modified_ms = document.last_modified.map(|ts| ts.timestamp_millis());
        let last_indexed = format_timestamp(document.last_indexed);

        let stored_id = self.with_conn(|conn| {
            let id = conn.query_row(
                r"
                INSERT INTO documents(
                    path, id, title, embedding, embedding_dim, embedding_source,
                    extracted_text, last_modified_ms, last_indexed
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ON CONFLICT(path) DO UPDATE SET
                  title=excluded.title,
                  embedding=excluded.embedding,
                  embedding_dim=excluded.embedding_dim,
                  embedding_source=excluded.embedding_source,
                  extracted_text=excluded.extracted_text,
                  last_modified_ms=excluded.last_modified_ms,
                  last_indexed=excluded.last_indexed
                RETURNING id
                ",
                params![
                    document.path,
                    document.id,
                    document.title,
                    blob,
                    dim,
                    document.embedding_source.as_str(),
                    document.extracted_text,
                    last_modified_ms,
                    last_indexed,
                ],
                |row| row.get::<_, String>(0),
            )?;
            Ok(id)
        })?;

        Ok(IndexedDocument {
            id: stored_id,
            last_modified: last_modified_ms.and_then(DateTime::<Utc>::from_timestamp_millis),
            last_indexed: DateTime::<Utc>::from_timestamp_micros(
                document.last_indexed.timestamp_micros(),
            )
            .unwrap_or(document.last_indexed),
            ..document
        })
    }

    fn get_all(&self, limit: usize) -> Result<Vec<IndexedDocument>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {SELECT_COLUMNS} FROM documents \
                 ORDER BY last_indexed DESC, path ASC LIMIT ?1"
            ))?;
            let rows = stmt.query_map(params![limit], row_to_document)?;

            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }

    fn get_by_path(&self, path: &str) -> Result<Option<IndexedDocument>> {
        self.with_conn(|conn| {
            let value = conn
                .query_row(
                    &format!("SELECT {SELECT_COLUMNS} FROM documents WHERE path = ?1"),
                    params![path],
                    row_to_document,
                )
                .optional()?;
            Ok(value)
        })
    }

    fn delete(&self, path: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM documents WHERE path = ?1", params![path])?;
            Ok(affected > 0)
        })
    }

    fn count(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| {
                row.get::<_, i64>(0)
            })?;
            Ok(usize::try_from(count).unwrap_or(0))
        })
    }

    fn paths(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT path FROM documents ORDER BY path ASC")?;
            let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }
}

fn row_to_document(row: &Row<'_>) -> rusqlite::Result<IndexedDocument> {
    let blob = row.get::<_, Vec<u8>>(3)?;
    let embedding = decode_embedding(&blob).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Blob,
            format!("embedding blob length {} is not a multiple of 4", blob.len()).into(),
        )
    })?;
    let last_modified = row
        .get::<_, Option<i64>>(6)?
        .and_then(DateTime::<Utc>::from_timestamp_millis);
    let raw_indexed = row.get::<_, String>(7)?;
    let last_indexed = DateTime::parse_from_rfc3339(&raw_indexed)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(err)))?
        .with_timezone(&Utc);

    Ok(IndexedDocument {
        id: row.get(0)?,
        title: row.get(1)?,
        path: row.get(2)?,
        embedding,
        embedding_source: EmbeddingSource::parse(&row.get::<_, String>(4)?),
        extracted_text: row.get(5)?,
        last_modified,
        last_indexed,
    })
}

/// Fixed-width UTC timestamps so lexical order matches time order.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(embedding.len() * 4);
    for value in embedding {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}

fn decode_embedding(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return None;
    }
    Some(
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect(),
    )
}

#[cfg(unix)]
fn harden_sqlite_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    for suffix in ["", "-wal", "-shm"] {
        let mut os = path.as_os_str().to_os_string();
        os.push(suffix);
        let candidate = PathBuf::from(os);
        if candidate.exists() {
            std::fs::set_permissions(candidate, std::fs::Permissions::from_mode(0o600))?;
        }
    }
    Ok(())
}

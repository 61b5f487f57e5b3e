//! `SQLite` implementation of the study backend.
//!
//! Holds all three tables (`users`, `lists`, `folders`) in a single database
//! file. Access goes through a `Mutex<Connection>`; WAL mode and a busy
//! timeout keep concurrent access graceful.

use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use rusqlite::{Connection, OptionalExtension, params};

use crate::models::{Folder, FolderId, ListId, User, UserId, slug};
use crate::storage::sqlite::{acquire_lock, configure_connection, record_operation};
use crate::{Error, Result};

use super::traits::{ListColumn, ListRow, StudyBackend};

/// How many sequence numbers to try before giving up on a unique path.
///
/// Collisions only happen when two creations race on the same slug, so the
/// first retry almost always succeeds.
const MAX_PATH_RETRIES: i64 = 16;

/// `SQLite`-backed [`StudyBackend`].
///
/// # Concurrency Model
///
/// `rusqlite::Connection` is not `Sync`, so the connection sits behind a
/// mutex. Blob mutations ([`StudyBackend::update_list_column`]) run their
/// whole read-modify-write inside one `BEGIN IMMEDIATE` transaction while
/// the lock is held, which rules out the lost-update race between two
/// concurrent edits of the same list.
pub struct SqliteStudyBackend {
    /// Database connection (mutex for interior mutability).
    conn: Mutex<Connection>,
}

impl SqliteStudyBackend {
    /// Opens (or creates) the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(|e| Error::OperationFailed {
            operation: "open_database".to_string(),
            cause: e.to_string(),
        })?;

        let backend = Self {
            conn: Mutex::new(conn),
        };
        backend.initialize_schema()?;
        Ok(backend)
    }

    /// Creates an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::OperationFailed {
            operation: "open_database_memory".to_string(),
            cause: e.to_string(),
        })?;

        let backend = Self {
            conn: Mutex::new(conn),
        };
        backend.initialize_schema()?;
        Ok(backend)
    }

    /// Initializes the database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = acquire_lock(&self.conn);

        configure_connection(&conn)?;

        conn.execute_batch(
            r"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                registration_date INTEGER NOT NULL
            );

            -- Cards, folder memberships, and keywords are independently
            -- serialized JSON columns; absent means the empty collection.
            CREATE TABLE IF NOT EXISTS lists (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                cards TEXT,
                folders TEXT,
                keywords TEXT,
                path TEXT NOT NULL UNIQUE,
                user_id INTEGER NOT NULL,
                creation_date INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            );

            CREATE INDEX IF NOT EXISTS idx_lists_user ON lists(user_id);

            CREATE TABLE IF NOT EXISTS folders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                path TEXT NOT NULL UNIQUE,
                user_id INTEGER NOT NULL,
                creation_date INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            );

            CREATE INDEX IF NOT EXISTS idx_folders_user ON folders(user_id);
            ",
        )
        .map_err(|e| Error::OperationFailed {
            operation: "initialize_schema".to_string(),
            cause: e.to_string(),
        })?;

        Ok(())
    }

    fn is_unique_violation(e: &rusqlite::Error) -> bool {
        e.to_string().contains("UNIQUE constraint failed")
    }

    fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: UserId::new(row.get(0)?),
            username: row.get(1)?,
            password_hash: row.get(2)?,
            registration_date: row.get(3)?,
        })
    }

    fn map_folder(row: &rusqlite::Row<'_>) -> rusqlite::Result<Folder> {
        Ok(Folder {
            id: FolderId::new(row.get(0)?),
            name: row.get(1)?,
            path: row.get(2)?,
            user_id: UserId::new(row.get(3)?),
            creation_date: row.get(4)?,
        })
    }

    fn map_list_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ListRow> {
        Ok(ListRow {
            id: ListId::new(row.get(0)?),
            title: row.get(1)?,
            description: row.get(2)?,
            cards: row.get(3)?,
            folders: row.get(4)?,
            keywords: row.get(5)?,
            path: row.get(6)?,
            user_id: UserId::new(row.get(7)?),
            creation_date: row.get(8)?,
        })
    }
}

const LIST_COLUMNS: &str =
    "id, title, description, cards, folders, keywords, path, user_id, creation_date";

impl StudyBackend for SqliteStudyBackend {
    fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        registered_at: i64,
    ) -> Result<User> {
        let conn = acquire_lock(&self.conn);

        conn.execute(
            "INSERT INTO users (username, password_hash, registration_date)
             VALUES (?1, ?2, ?3)",
            params![username, password_hash, registered_at],
        )
        .map_err(|e| {
            if Self::is_unique_violation(&e) {
                Error::Conflict(format!("username '{username}' already exists"))
            } else {
                Error::OperationFailed {
                    operation: "create_user".to_string(),
                    cause: e.to_string(),
                }
            }
        })?;

        Ok(User {
            id: UserId::new(conn.last_insert_rowid()),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            registration_date: registered_at,
        })
    }

    fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let conn = acquire_lock(&self.conn);

        conn.query_row(
            "SELECT id, username, password_hash, registration_date
             FROM users WHERE id = ?1",
            params![id.get()],
            Self::map_user,
        )
        .optional()
        .map_err(|e| Error::OperationFailed {
            operation: "get_user".to_string(),
            cause: e.to_string(),
        })
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = acquire_lock(&self.conn);

        conn.query_row(
            "SELECT id, username, password_hash, registration_date
             FROM users WHERE username = ?1",
            params![username],
            Self::map_user,
        )
        .optional()
        .map_err(|e| Error::OperationFailed {
            operation: "get_user_by_username".to_string(),
            cause: e.to_string(),
        })
    }

    fn create_folder(&self, user_id: UserId, name: &str, created_at: i64) -> Result<Folder> {
        let conn = acquire_lock(&self.conn);

        // Sequence numbers start at the user's folder count + 1, as the
        // original paths did; the UNIQUE constraint plus retry resolves
        // collisions the count-based derivation could not.
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM folders WHERE user_id = ?1",
                params![user_id.get()],
                |row| row.get(0),
            )
            .map_err(|e| Error::OperationFailed {
                operation: "count_folders".to_string(),
                cause: e.to_string(),
            })?;

        let base = slug::slugify(name);
        for attempt in 0..MAX_PATH_RETRIES {
            let path = slug::path_for(&base, count + 1 + attempt);
            match conn.execute(
                "INSERT INTO folders (name, path, user_id, creation_date)
                 VALUES (?1, ?2, ?3, ?4)",
                params![name, path, user_id.get(), created_at],
            ) {
                Ok(_) => {
                    return Ok(Folder {
                        id: FolderId::new(conn.last_insert_rowid()),
                        name: name.to_string(),
                        path,
                        user_id,
                        creation_date: created_at,
                    });
                },
                Err(e) if Self::is_unique_violation(&e) => {},
                Err(e) => {
                    return Err(Error::OperationFailed {
                        operation: "create_folder".to_string(),
                        cause: e.to_string(),
                    });
                },
            }
        }

        Err(Error::OperationFailed {
            operation: "create_folder".to_string(),
            cause: format!("no unique path for '{base}' after {MAX_PATH_RETRIES} attempts"),
        })
    }

    fn get_folder(&self, id: FolderId) -> Result<Option<Folder>> {
        let conn = acquire_lock(&self.conn);

        conn.query_row(
            "SELECT id, name, path, user_id, creation_date
             FROM folders WHERE id = ?1",
            params![id.get()],
            Self::map_folder,
        )
        .optional()
        .map_err(|e| Error::OperationFailed {
            operation: "get_folder".to_string(),
            cause: e.to_string(),
        })
    }

    fn get_folder_by_path(&self, path: &str) -> Result<Option<Folder>> {
        let conn = acquire_lock(&self.conn);

        conn.query_row(
            "SELECT id, name, path, user_id, creation_date
             FROM folders WHERE path = ?1",
            params![path],
            Self::map_folder,
        )
        .optional()
        .map_err(|e| Error::OperationFailed {
            operation: "get_folder_by_path".to_string(),
            cause: e.to_string(),
        })
    }

    fn list_folders(&self, user_id: UserId) -> Result<Vec<Folder>> {
        let conn = acquire_lock(&self.conn);

        let mut stmt = conn
            .prepare(
                "SELECT id, name, path, user_id, creation_date
                 FROM folders WHERE user_id = ?1 ORDER BY id",
            )
            .map_err(|e| Error::OperationFailed {
                operation: "prepare_list_folders".to_string(),
                cause: e.to_string(),
            })?;

        let folders = stmt
            .query_map(params![user_id.get()], Self::map_folder)
            .map_err(|e| Error::OperationFailed {
                operation: "list_folders".to_string(),
                cause: e.to_string(),
            })?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::OperationFailed {
                operation: "collect_folders".to_string(),
                cause: e.to_string(),
            })?;

        Ok(folders)
    }

    fn create_list(
        &self,
        user_id: UserId,
        title: &str,
        description: &str,
        cards_json: &str,
        created_at: i64,
    ) -> Result<ListRow> {
        let start = Instant::now();
        let conn = acquire_lock(&self.conn);

        let result = (|| {
            // List paths are sequenced over the whole table, as in the
            // original schema.
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM lists", [], |row| row.get(0))
                .map_err(|e| Error::OperationFailed {
                    operation: "count_lists".to_string(),
                    cause: e.to_string(),
                })?;

            let base = slug::slugify(title);
            for attempt in 0..MAX_PATH_RETRIES {
                let path = slug::path_for(&base, count + 1 + attempt);
                match conn.execute(
                    "INSERT INTO lists (title, description, cards, path, user_id, creation_date)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![title, description, cards_json, path, user_id.get(), created_at],
                ) {
                    Ok(_) => {
                        return Ok(ListRow {
                            id: ListId::new(conn.last_insert_rowid()),
                            title: title.to_string(),
                            description: description.to_string(),
                            cards: Some(cards_json.to_string()),
                            folders: None,
                            keywords: None,
                            path,
                            user_id,
                            creation_date: created_at,
                        });
                    },
                    Err(e) if Self::is_unique_violation(&e) => {},
                    Err(e) => {
                        return Err(Error::OperationFailed {
                            operation: "create_list".to_string(),
                            cause: e.to_string(),
                        });
                    },
                }
            }

            Err(Error::OperationFailed {
                operation: "create_list".to_string(),
                cause: format!("no unique path for '{base}' after {MAX_PATH_RETRIES} attempts"),
            })
        })();

        let outcome = if result.is_ok() { "success" } else { "error" };
        record_operation("create_list", start, outcome);
        result
    }

    fn get_list(&self, id: ListId) -> Result<Option<ListRow>> {
        let conn = acquire_lock(&self.conn);

        conn.query_row(
            &format!("SELECT {LIST_COLUMNS} FROM lists WHERE id = ?1"),
            params![id.get()],
            Self::map_list_row,
        )
        .optional()
        .map_err(|e| Error::OperationFailed {
            operation: "get_list".to_string(),
            cause: e.to_string(),
        })
    }

    fn get_list_by_path(&self, path: &str) -> Result<Option<ListRow>> {
        let conn = acquire_lock(&self.conn);

        conn.query_row(
            &format!("SELECT {LIST_COLUMNS} FROM lists WHERE path = ?1"),
            params![path],
            Self::map_list_row,
        )
        .optional()
        .map_err(|e| Error::OperationFailed {
            operation: "get_list_by_path".to_string(),
            cause: e.to_string(),
        })
    }

    fn lists_for_user(&self, user_id: UserId) -> Result<Vec<ListRow>> {
        let conn = acquire_lock(&self.conn);

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {LIST_COLUMNS} FROM lists WHERE user_id = ?1 ORDER BY id"
            ))
            .map_err(|e| Error::OperationFailed {
                operation: "prepare_lists_for_user".to_string(),
                cause: e.to_string(),
            })?;

        let rows = stmt
            .query_map(params![user_id.get()], Self::map_list_row)
            .map_err(|e| Error::OperationFailed {
                operation: "lists_for_user".to_string(),
                cause: e.to_string(),
            })?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::OperationFailed {
                operation: "collect_lists".to_string(),
                cause: e.to_string(),
            })?;

        Ok(rows)
    }

    fn update_list_column(
        &self,
        list_id: ListId,
        user_id: UserId,
        column: ListColumn,
        apply: &mut dyn FnMut(Option<&str>) -> Result<Option<String>>,
    ) -> Result<bool> {
        let start = Instant::now();
        let conn = acquire_lock(&self.conn);

        conn.execute("BEGIN IMMEDIATE", [])
            .map_err(|e| Error::OperationFailed {
                operation: "begin_transaction".to_string(),
                cause: e.to_string(),
            })?;

        let result = (|| {
            let row: Option<(i64, Option<String>)> = conn
                .query_row(
                    &format!("SELECT user_id, {} FROM lists WHERE id = ?1", column.name()),
                    params![list_id.get()],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()
                .map_err(|e| Error::OperationFailed {
                    operation: "read_list_column".to_string(),
                    cause: e.to_string(),
                })?;

            let (owner, current) = row.ok_or(Error::NotFound {
                resource: "list",
                id: list_id.get(),
            })?;
            if owner != user_id.get() {
                return Err(Error::Forbidden {
                    resource: "list",
                    id: list_id.get(),
                    user_id: user_id.get(),
                });
            }

            let Some(next) = apply(current.as_deref())? else {
                return Ok(false);
            };

            conn.execute(
                &format!(
                    "UPDATE lists SET {} = ?1 WHERE id = ?2 AND user_id = ?3",
                    column.name()
                ),
                params![next, list_id.get(), user_id.get()],
            )
            .map_err(|e| Error::OperationFailed {
                operation: "write_list_column".to_string(),
                cause: e.to_string(),
            })?;

            Ok(true)
        })();

        let result = match result {
            Ok(changed) => conn
                .execute("COMMIT", [])
                .map_err(|e| Error::OperationFailed {
                    operation: "commit_transaction".to_string(),
                    cause: e.to_string(),
                })
                .map(|_| changed),
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            },
        };

        let outcome = if result.is_ok() { "success" } else { "error" };
        record_operation("update_list_column", start, outcome);
        result
    }
}

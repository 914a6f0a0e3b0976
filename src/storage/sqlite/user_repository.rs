use rusqlite::{OptionalExtension, Row};

use crate::domain::User;
use crate::errors::{GatorError, GatorResult};
use crate::storage::sqlite::SqliteStorage;
use crate::storage::traits::UserRepository;

pub struct SqliteUserRepository {
    storage: SqliteStorage,
}

impl SqliteUserRepository {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
        })
    }
}

impl UserRepository for SqliteUserRepository {
    fn create(&self, user: &User) -> GatorResult<()> {
        let conn = self.storage.connection()?;
        conn.execute(
            "INSERT INTO users (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            (&user.id, &user.name, &user.created_at, &user.updated_at),
        )
        .map_err(|e| GatorError::from_insert(e, format!("user {}", user.name)))?;
        Ok(())
    }

    fn get_by_name(&self, name: &str) -> GatorResult<Option<User>> {
        let conn = self.storage.connection()?;
        let user = conn
            .query_row(
                "SELECT id, name, created_at, updated_at FROM users WHERE name = ?1",
                [name],
                Self::from_row,
            )
            .optional()?;
        Ok(user)
    }

    fn delete_all(&self) -> GatorResult<usize> {
        let conn = self.storage.connection()?;
        Ok(conn.execute("DELETE FROM users", [])?)
    }

    fn list_names(&self) -> GatorResult<Vec<String>> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare("SELECT name FROM users ORDER BY name")?;
        let names = stmt.query_map([], |row| row.get(0))?;
        names.collect::<Result<Vec<_>, _>>().map_err(GatorError::from)
    }
}

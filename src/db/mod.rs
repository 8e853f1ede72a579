mod schema;

use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::error::StoreError;
use crate::models::*;

type Result<T> = std::result::Result<T, StoreError>;

/// Sent to subscribers after every successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StoreEvent {
    CategoriesChanged,
    ExpensesChanged,
}

/// SQLite-backed store for categories and expenses.
///
/// Readers take snapshots with [`Database::categories`] and
/// [`Database::expenses`] and learn about changes through
/// [`Database::subscribe`].
pub(crate) struct Database {
    conn: Connection,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let mut db = Self {
            conn,
            subscribers: Vec::new(),
        };
        db.migrate()?;
        db.seed_default_categories()?;
        tracing::info!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self {
            conn,
            subscribers: Vec::new(),
        };
        db.migrate()?;
        db.seed_default_categories()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::info!(version = schema::CURRENT_VERSION, "created schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })?;

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                tracing::info!(from_version, "applying migration");
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    fn seed_default_categories(&mut self) -> Result<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        for (name, icon, color) in DEFAULT_CATEGORIES {
            let cat = Category::new((*name).to_string(), (*icon).to_string(), *color);
            tx.execute(
                "INSERT INTO categories (id, name, iconName, colorValue) VALUES (?1, ?2, ?3, ?4)",
                params![cat.id, cat.name, cat.icon_name, cat.color_value],
            )?;
        }
        tx.commit()?;
        tracing::info!(count = DEFAULT_CATEGORIES.len(), "seeded default categories");
        Ok(())
    }

    // ── Change notification ───────────────────────────────────

    pub(crate) fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, event: StoreEvent) {
        // Receivers that have been dropped are forgotten.
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    // ── Categories ────────────────────────────────────────────

    pub(crate) fn categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, iconName, colorValue FROM categories ORDER BY name COLLATE NOCASE, id",
        )?;
        let rows = stmt.query_map([], category_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn category_by_id(&self, id: &str) -> Result<Option<Category>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name, iconName, colorValue FROM categories WHERE id = ?1",
                params![id],
                category_from_row,
            )
            .optional()?)
    }

    /// Insert, or overwrite the category with the same id.
    pub(crate) fn insert_category(&mut self, cat: &Category) -> Result<()> {
        self.conn.execute(
            "INSERT INTO categories (id, name, iconName, colorValue) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET name = ?2, iconName = ?3, colorValue = ?4",
            params![cat.id, cat.name, cat.icon_name, cat.color_value],
        )?;
        tracing::info!(id = %cat.id, name = %cat.name, "category saved");
        self.notify(StoreEvent::CategoriesChanged);
        Ok(())
    }

    pub(crate) fn update_category(&mut self, cat: &Category) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE categories SET name = ?2, iconName = ?3, colorValue = ?4 WHERE id = ?1",
            params![cat.id, cat.name, cat.icon_name, cat.color_value],
        )?;
        if changed == 0 {
            return Err(StoreError::CategoryNotFound(cat.id.clone()));
        }
        tracing::info!(id = %cat.id, name = %cat.name, "category updated");
        self.notify(StoreEvent::CategoriesChanged);
        Ok(())
    }

    /// Delete a category that no expense refers to.
    pub(crate) fn delete_category(&mut self, cat: &Category) -> Result<()> {
        let tx = self.conn.transaction()?;
        let count: i64 = tx.query_row(
            "SELECT COUNT(*) FROM expenses WHERE categoryId = ?1",
            params![cat.id],
            |row| row.get(0),
        )?;
        if count > 0 {
            tracing::warn!(id = %cat.id, count, "refused to delete category in use");
            return Err(StoreError::ReferentialIntegrity {
                name: cat.name.clone(),
                count,
            });
        }
        let changed = tx.execute("DELETE FROM categories WHERE id = ?1", params![cat.id])?;
        tx.commit()?;
        if changed == 0 {
            return Err(StoreError::CategoryNotFound(cat.id.clone()));
        }
        tracing::info!(id = %cat.id, name = %cat.name, "category deleted");
        self.notify(StoreEvent::CategoriesChanged);
        Ok(())
    }

    pub(crate) fn count_expenses_for_category(&self, category_id: &str) -> Result<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE categoryId = ?1",
            params![category_id],
            |row| row.get(0),
        )?)
    }

    /// Expense counts keyed by category id; categories without expenses are absent.
    pub(crate) fn expense_counts(&self) -> Result<HashMap<String, i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT categoryId, COUNT(*) FROM expenses GROUP BY categoryId")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<std::result::Result<HashMap<_, _>, _>>()?)
    }

    // ── Expenses ──────────────────────────────────────────────

    /// All expenses, newest first.
    pub(crate) fn expenses(&self) -> Result<Vec<ExpenseEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, categoryId, createdAt FROM expenses ORDER BY createdAt DESC, id",
        )?;
        let rows = stmt.query_map([], expense_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Record a new expense. Expenses never change once stored, so an id that
    /// already exists is rejected.
    pub(crate) fn insert_expense(&mut self, expense: &ExpenseEntry) -> Result<()> {
        self.conn.execute(
            "INSERT INTO expenses (id, amount, categoryId, createdAt) VALUES (?1, ?2, ?3, ?4)",
            params![
                expense.id,
                expense.amount,
                expense.category_id,
                expense.created_at
            ],
        )?;
        tracing::info!(
            id = %expense.id,
            amount = expense.amount,
            category_id = %expense.category_id,
            "expense saved"
        );
        self.notify(StoreEvent::ExpensesChanged);
        Ok(())
    }

    pub(crate) fn delete_expense(&mut self, expense: &ExpenseEntry) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![expense.id])?;
        if changed > 0 {
            tracing::info!(id = %expense.id, "expense deleted");
            self.notify(StoreEvent::ExpensesChanged);
        }
        Ok(())
    }
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        icon_name: row.get(2)?,
        color_value: row.get(3)?,
    })
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<ExpenseEntry> {
    Ok(ExpenseEntry {
        id: row.get(0)?,
        amount: row.get(1)?,
        category_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id          TEXT PRIMARY KEY NOT NULL,
    name        TEXT NOT NULL,
    iconName    TEXT NOT NULL,
    colorValue  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS expenses (
    id          TEXT PRIMARY KEY NOT NULL,
    amount      REAL NOT NULL,
    categoryId  TEXT NOT NULL REFERENCES categories(id) ON DELETE RESTRICT,
    createdAt   INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(categoryId);
CREATE INDEX IF NOT EXISTS idx_expenses_created ON expenses(createdAt);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];

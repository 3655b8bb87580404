pub mod from_row;
pub mod queries;

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;

/// Open (or create) the database at `path` and return a connection pool.
///
/// Every connection runs in WAL mode with foreign keys on and a busy
/// timeout, so concurrent writers queue instead of failing immediately.
pub fn init_pool(path: &str) -> anyhow::Result<DbPool> {
    let manager = SqliteConnectionManager::file(path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )
    });
    let pool = r2d2::Pool::new(manager)?;
    run_migrations(&*pool.get()?)?;
    Ok(pool)
}

pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS coupons (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL,
            value REAL NOT NULL,
            expiration_date INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS redemptions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            coupon_id INTEGER NOT NULL REFERENCES coupons(id),
            user TEXT,
            status TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_redemptions_coupon_id
            ON redemptions(coupon_id);",
    )
}

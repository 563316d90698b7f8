use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use bootcamper::db::{DbPool, establish_connection_pool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// A migrated throwaway SQLite database, removed again on drop.
///
/// Every test uses its own file name so the suites can run in parallel.
pub struct TestDb {
    name: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        remove_db_files(name);

        let pool = establish_connection_pool(name).expect("failed to create test database pool");
        {
            let mut conn = pool.get().expect("failed to get test database connection");
            conn.run_pending_migrations(MIGRATIONS)
                .expect("failed to run migrations");
        }

        Self {
            name: name.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        remove_db_files(&self.name);
    }
}

fn remove_db_files(name: &str) {
    // The pool runs in WAL mode, so the journal files need removing too.
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{name}{suffix}"));
    }
}

#[macro_use]
extern crate diesel;

use anyhow::{anyhow, Result as Fallible};
use cufi_core::{repositories as repo, usecases as uc};
use diesel::{r2d2, sqlite::SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::{
    cell::{RefCell, RefMut},
    sync::Arc,
};

mod models;
mod repo_impl;
mod schema;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

type Connection = SqliteConnection;

type ConnectionManager = r2d2::ConnectionManager<Connection>;
type ConnectionPool = r2d2::Pool<ConnectionManager>;
type PooledConnection = r2d2::PooledConnection<ConnectionManager>;

type SharedConnectionPool = Arc<RwLock<ConnectionPool>>;

/// Read access for queries that run outside of a transaction.
///
/// Any attempt to write through it is answered with a repository error.
pub struct DbReadOnly<'a> {
    _locked_pool: RwLockReadGuard<'a, ConnectionPool>,
    conn: RefCell<PooledConnection>,
}

/// The only handle that may write. Writes happen in [`DbReadWrite::transaction`].
pub struct DbReadWrite<'a> {
    _locked_pool: RwLockWriteGuard<'a, ConnectionPool>,
    conn: RefCell<PooledConnection>,
}

/// Repository view on a connection with an open transaction.
pub struct DbConnection<'a> {
    conn: RefCell<&'a mut SqliteConnection>,
}

fn checkout(pool: &ConnectionPool, access: &str) -> Fallible<RefCell<PooledConnection>> {
    let conn = pool.get().inspect_err(|err| {
        log::error!("No pooled SQLite connection available ({access}): {err}");
    })?;
    Ok(RefCell::new(conn))
}

impl<'a> DbReadOnly<'a> {
    fn try_new(pool: &'a SharedConnectionPool) -> Fallible<Self> {
        let locked_pool = pool.read();
        let conn = checkout(&locked_pool, "shared")?;
        Ok(Self {
            _locked_pool: locked_pool,
            conn,
        })
    }
}

impl<'a> DbConnection<'a> {
    fn new(conn: &'a mut SqliteConnection) -> Self {
        Self {
            conn: RefCell::new(conn),
        }
    }
}

impl<'a> DbReadWrite<'a> {
    fn try_new(pool: &'a SharedConnectionPool) -> Fallible<Self> {
        let locked_pool = pool.write();
        let conn = checkout(&locked_pool, "exclusive")?;
        Ok(Self {
            _locked_pool: locked_pool,
            conn,
        })
    }

    /// Commits if `f` succeeds. Otherwise everything is rolled back
    /// and the error of `f` is returned as is.
    pub fn transaction<T, F, E>(&mut self, f: F) -> Result<T, uc::Error>
    where
        F: FnOnce(&DbConnection) -> Result<T, E>,
        E: Into<uc::Error>,
    {
        use diesel::Connection as _;
        let mut failure: Option<uc::Error> = None;
        self.conn
            .borrow_mut()
            .transaction(|conn| {
                f(&DbConnection::new(conn)).map_err(|err| {
                    failure = Some(err.into());
                    diesel::result::Error::RollbackTransaction
                })
            })
            .map_err(|err| match failure {
                Some(failure) => {
                    debug_assert!(matches!(err, diesel::result::Error::RollbackTransaction));
                    failure
                }
                None => uc::Error::Repo(match err {
                    diesel::result::Error::NotFound => repo::Error::NotFound,
                    _ => repo::Error::Other(err.into()),
                }),
            })
    }

    fn sqlite_conn(&self) -> RefMut<PooledConnection> {
        self.conn.borrow_mut()
    }
}

/// Pool of SQLite connections.
///
/// Readers share the pool lock, a writer holds it alone. SQLite then
/// never sees a write that overlaps with another statement, so it does
/// not answer with SQLITE_LOCKED.
#[derive(Clone)]
pub struct Connections {
    pool: SharedConnectionPool,
}

/// Settings that apply to the database file.
///
/// `encoding` only takes effect on a freshly created database.
pub fn initialize_database(connection: &mut SqliteConnection) -> Fallible<()> {
    use diesel::connection::SimpleConnection as _;
    connection.batch_execute(
        r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA wal_autocheckpoint = 1000;
PRAGMA wal_checkpoint(TRUNCATE);
PRAGMA secure_delete = 0;
PRAGMA automatic_index = 1;
PRAGMA defer_foreign_keys = 1;
PRAGMA recursive_triggers = 1;
PRAGMA encoding = 'UTF-8';
"#,
    )?;
    Ok(())
}

// Event children and user data are removed by ON DELETE CASCADE,
// which SQLite only honours with foreign keys switched on. The
// setting is per connection, hence it is applied on every checkout.
#[derive(Debug)]
struct ForeignKeys;

impl r2d2::CustomizeConnection<Connection, r2d2::Error> for ForeignKeys {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), r2d2::Error> {
        use diesel::connection::SimpleConnection as _;
        conn.batch_execute("PRAGMA foreign_keys = 1;")
            .map_err(r2d2::Error::QueryError)
    }
}

impl Connections {
    pub fn init(url: &str, pool_size: u32) -> Fallible<Self> {
        use diesel::Connection as _;
        // r2d2 keeps retrying an unreachable database, so try once up front.
        SqliteConnection::establish(url)
            .map_err(|err| anyhow!("Cannot open SQLite database '{url}': {err}"))?;
        let pool = ConnectionPool::builder()
            .max_size(pool_size)
            .connection_customizer(Box::new(ForeignKeys))
            .build(ConnectionManager::new(url))?;
        initialize_database(&mut *pool.get()?)?;
        Ok(Self {
            pool: Arc::new(RwLock::new(pool)),
        })
    }

    pub fn shared(&self) -> Fallible<DbReadOnly> {
        DbReadOnly::try_new(&self.pool)
    }

    pub fn exclusive(&self) -> Fallible<DbReadWrite> {
        DbReadWrite::try_new(&self.pool)
    }
}

pub fn run_embedded_database_migrations(db: DbReadWrite<'_>) -> Fallible<()> {
    log::info!("Running embedded database migrations");
    let mut sqlite_conn = db.sqlite_conn();
    let applied = sqlite_conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| anyhow!("Failed to run database migrations: {err}"))?
        .len();
    log::debug!("Applied {applied} pending migration(s)");
    Ok(())
}

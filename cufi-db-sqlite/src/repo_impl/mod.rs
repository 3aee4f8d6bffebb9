use anyhow::anyhow;
use diesel::{
    self,
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
    sql_types::{BigInt, Integer, Text},
};

use cufi_core::{
    entities::*,
    filter::{EventFilter, TextField},
    repositories::{self as repo, *},
};

use super::*;

/// Limit and offset of a boxed query.
macro_rules! paginate {
    ($query:ident, $pagination:expr) => {
        let offset = $pagination.offset.unwrap_or(0) as i64;
        // SQLite does not support an OFFSET without a LIMIT
        // <https://www.sqlite.org/lang_select.html>
        if let Some(limit) = $pagination.limit {
            $query = $query.limit(limit as i64);
            if offset > 0 {
                $query = $query.offset(offset);
            }
        } else if offset > 0 {
            $query = $query.limit(i64::MAX);
            $query = $query.offset(offset);
        }
    };
}

mod assistance;
mod event;
mod incident;
mod list;
mod rating;
mod session;
mod user;

type Result<T> = std::result::Result<T, repo::Error>;

pub fn from_diesel_err(err: DieselError) -> repo::Error {
    match err {
        DieselError::NotFound => repo::Error::NotFound,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            repo::Error::AlreadyExists
        }
        _ => repo::Error::Other(err.into()),
    }
}

fn read_only_access() -> repo::Error {
    anyhow!("Write access is not permitted on a read-only connection").into()
}

// Deleting or updating a single row by its key
fn expect_single_row(count: usize) -> Result<()> {
    if count == 0 {
        return Err(repo::Error::NotFound);
    }
    debug_assert_eq!(1, count);
    Ok(())
}

define_sql_function! {
    fn last_insert_rowid() -> BigInt;
}

// Position of the first occurrence of `needle` in `haystack`,
// starting at 1. Unlike LIKE this comparison is case-sensitive.
define_sql_function! {
    fn instr(haystack: Text, needle: Text) -> Integer;
}

fn inserted_rowid(conn: &mut SqliteConnection) -> Result<i64> {
    diesel::select(last_insert_rowid())
        .get_result::<i64>(conn)
        .map_err(from_diesel_err)
}

fn load_date(value: &str) -> Result<Date> {
    parse_iso_date(value).map_err(|err| anyhow::Error::from(err).into())
}

use folio_core::db::migrations::latest_version;
use folio_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "portfolios");
    assert_table_exists(&conn, "experiences");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("folio.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "portfolios");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn schema_rejects_current_experience_with_end_date() {
    let conn = open_db_in_memory().unwrap();
    let err = conn
        .execute(
            "INSERT INTO experiences (
                id, title, company, location, start_date, end_date, current,
                description, technologies, created_at, updated_at
            ) VALUES ('x', 't', 'c', 'l', '2020-01-01', '2021-01-01', 1, 'd', '[\"Go\"]', 1, 1);",
            [],
        )
        .unwrap_err();
    assert_eq!(
        err.sqlite_error_code(),
        Some(rusqlite::ErrorCode::ConstraintViolation)
    );
}

#[test]
fn sort_key_indexes_exist() {
    let conn = open_db_in_memory().unwrap();
    for (index, table) in [
        ("idx_portfolios_created_at", "portfolios"),
        ("idx_experiences_start_date", "experiences"),
    ] {
        let owner: String = conn
            .query_row(
                "SELECT tbl_name FROM sqlite_master WHERE type = 'index' AND name = ?1;",
                [index],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(owner, table, "index {index} is on the wrong table");
    }
}

#[test]
fn technologies_column_holds_json_array() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO portfolios (
            id, title, description, technologies, featured, created_at, updated_at
        ) VALUES ('p1', 't', 'd', '[\"Rust\",\"Go\"]', 0, 1, 1);",
        [],
    )
    .unwrap();

    let count: i64 = conn
        .query_row(
            "SELECT json_array_length(technologies) FROM portfolios WHERE id = 'p1';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 2);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}

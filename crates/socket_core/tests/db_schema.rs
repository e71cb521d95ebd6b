mod common;

use common::{amy, bob};
use rusqlite::Connection;
use socket_core::db::migrations::{apply_migrations, latest_version};
use socket_core::db::{open_db, open_db_in_memory, DbError};
use socket_core::{PersonRepository, SqlitePersonRepository};

#[test]
fn persons_table_has_one_column_per_scalar_field() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(
        column_names(&conn, "persons"),
        ["position", "name", "profile", "phone", "email", "address"]
    );
    assert_eq!(
        column_names(&conn, "person_languages"),
        ["person_position", "language"]
    );
    assert_eq!(column_names(&conn, "person_tags"), ["person_position", "tag"]);
    assert_eq!(column_names(&conn, "snapshot_meta"), ["id", "saved_at"]);
}

#[test]
fn snapshot_meta_accepts_only_row_one() {
    let conn = open_db_in_memory().unwrap();

    conn.execute("INSERT INTO snapshot_meta (id, saved_at) VALUES (1, 0);", [])
        .unwrap();
    let second = conn.execute("INSERT INTO snapshot_meta (id, saved_at) VALUES (2, 0);", []);
    assert!(second.unwrap_err().to_string().contains("CHECK constraint"));
    assert_eq!(count_rows(&conn, "snapshot_meta"), 1);
}

#[test]
fn deleting_a_person_cascades_to_languages_and_tags() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO persons (position, name, profile) VALUES (0, 'Bob Choo', 'bob-choo');
         INSERT INTO person_languages (person_position, language) VALUES (0, 'C++');
         INSERT INTO person_tags (person_position, tag) VALUES (0, 'friend');
         INSERT INTO person_tags (person_position, tag) VALUES (0, 'husband');",
    )
    .unwrap();
    assert_eq!(count_rows(&conn, "person_tags"), 2);

    conn.execute("DELETE FROM persons WHERE position = 0;", [])
        .unwrap();
    assert_eq!(count_rows(&conn, "person_languages"), 0);
    assert_eq!(count_rows(&conn, "person_tags"), 0);

    let orphan = conn.execute(
        "INSERT INTO person_tags (person_position, tag) VALUES (7, 'friend');",
        [],
    );
    assert!(orphan.is_err());
}

#[test]
fn saved_rows_survive_reopen_under_the_same_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("socket.db");

    let mut conn = open_db(&path).unwrap();
    SqlitePersonRepository::new(&mut conn)
        .save_persons(&[amy(), bob()])
        .unwrap();
    drop(conn);

    let mut conn = open_db(&path).unwrap();
    apply_migrations(&mut conn).unwrap();
    assert_eq!(schema_version(&conn), latest_version());

    let names: Vec<(i64, String)> = conn
        .prepare("SELECT position, name FROM persons ORDER BY position;")
        .unwrap()
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        names,
        vec![(0, "Amy Bee".to_string()), (1, "Bob Choo".to_string())]
    );
    assert_eq!(count_rows(&conn, "person_tags"), 2);
    assert_eq!(count_rows(&conn, "snapshot_meta"), 1);

    let repo = SqlitePersonRepository::new(&mut conn);
    assert_eq!(repo.load_persons().unwrap(), Some(vec![amy(), bob()]));
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
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

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn column_names(conn: &Connection, table: &str) -> Vec<String> {
    conn.prepare(&format!("PRAGMA table_info({table});"))
        .unwrap()
        .query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

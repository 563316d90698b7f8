use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};

mod common;

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}

#[derive(QueryableByName)]
struct ForeignKeys {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

#[test]
fn test_pooled_connections_carry_the_pragmas() {
    let test_db = common::TestDb::new("test_db_pragmas.db");
    let mut conn = test_db.pool().get().unwrap();

    let mode = diesel::sql_query("PRAGMA journal_mode")
        .load::<JournalMode>(&mut conn)
        .unwrap();
    assert_eq!(mode[0].journal_mode.to_lowercase(), "wal");

    let fks = diesel::sql_query("PRAGMA foreign_keys")
        .load::<ForeignKeys>(&mut conn)
        .unwrap();
    assert_eq!(fks[0].foreign_keys, 1);
}

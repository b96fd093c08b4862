#![cfg(all(
    feature = "postgres",
    feature = "mysql",
    feature = "ldap",
    feature = "lmdb"
))]

use std::io;
use std::sync::{Arc, Mutex};

use store_middleware::prelude::*;

/// Marker stored as the open handle by the recording driver.
struct MockConn;

/// Driver that records every call and can be told to fail.
#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<String>>>,
    fail_connect: bool,
    fail_exec: bool,
}

impl Recorder {
    fn log(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Backend for Recorder {
    fn connect(&self, db: &mut Database) -> Result<(), DbError> {
        self.log("connect");
        if self.fail_connect {
            return Err(DbError::backend(Some("08001".into()), "connection refused"));
        }
        db.set_handle(MockConn);
        Ok(())
    }

    fn disconnect(&self, db: &mut Database) -> Result<(), DbError> {
        self.log("disconnect");
        db.take_handle();
        Ok(())
    }

    fn exec(&self, db: &mut Database, sql: &str) -> Result<(), DbError> {
        db.require_handle::<MockConn>()?;
        self.log(format!("exec:{sql}"));
        if self.fail_exec {
            return Err(DbError::backend(Some("42601".into()), "syntax error"));
        }
        Ok(())
    }

    fn fetch_all(
        &self,
        _db: &mut Database,
        query: &str,
        filter: &[KeyValue],
    ) -> Result<ResultSet, DbError> {
        self.log(format!("fetch:{query}"));
        let rows: ResultSet = [("alice", "30"), ("bob", "41")]
            .iter()
            .map(|(name, age)| Row::new(vec![Field::new("name", *name), Field::new("age", *age)]))
            .filter(|row| row.matches(filter))
            .collect();
        Ok(rows)
    }

    fn insert(&self, _db: &mut Database, resource: &str, data: &[KeyValue]) -> Result<(), DbError> {
        self.log(format!("insert:{resource}:{}", data.len()));
        Ok(())
    }

    fn create(&self, _db: &mut Database) -> Result<(), DbError> {
        self.log("create");
        Ok(())
    }
}

/// Directory-style driver that only knows connect/disconnect/insert.
#[derive(Clone, Default)]
struct DirectoryOnly {
    inner: Recorder,
}

impl Backend for DirectoryOnly {
    fn connect(&self, db: &mut Database) -> Result<(), DbError> {
        self.inner.connect(db)
    }

    fn disconnect(&self, db: &mut Database) -> Result<(), DbError> {
        self.inner.disconnect(db)
    }

    fn insert(&self, db: &mut Database, resource: &str, data: &[KeyValue]) -> Result<(), DbError> {
        self.inner.insert(db, resource, data)
    }
}

fn dispatcher_with(kind: BackendType, driver: impl Backend + 'static) -> Dispatcher {
    let mut registry = Registry::new();
    registry.register(kind, driver);
    Dispatcher::new(registry)
}

fn payload() -> Vec<KeyValue> {
    vec![KeyValue::new("name", "Alice"), KeyValue::new("age", "30")]
}

#[test]
fn unknown_tags_fail_every_operation_and_leave_descriptor_alone() {
    let recorder = Recorder::default();
    let dispatcher = dispatcher_with(BackendType::Postgres, recorder.clone());

    for tag in ["oracle", "PG", "Pg", "postgres"] {
        let mut db = Database::new("x", tag).with_host("h");
        assert!(matches!(dispatcher.connect(&mut db), Err(DbError::UnknownBackendType(t)) if t == tag));
        assert!(matches!(dispatcher.create(&mut db), Err(DbError::UnknownBackendType(_))));
        assert!(matches!(dispatcher.disconnect(&mut db), Err(DbError::UnknownBackendType(_))));
        assert!(matches!(dispatcher.exec(&mut db, "SELECT 1"), Err(DbError::UnknownBackendType(_))));
        assert!(matches!(
            dispatcher.fetch_all(&mut db, "SELECT 1", &[]),
            Err(DbError::UnknownBackendType(_))
        ));
        assert!(matches!(
            dispatcher.insert(&mut db, "users", &payload()),
            Err(DbError::UnknownBackendType(_))
        ));
        assert!(!db.is_connected());
    }

    // a connected descriptor whose tag is unknown keeps its handle
    let mut db = Database::new("x", "oracle");
    db.set_handle(MockConn);
    assert!(dispatcher.exec(&mut db, "SELECT 1").is_err());
    assert!(dispatcher.disconnect(&mut db).is_err());
    assert!(db.is_connected());

    assert!(recorder.calls().is_empty());
}

#[test]
fn known_variant_without_registered_driver_is_unknown() {
    let dispatcher = Dispatcher::new(Registry::new());
    let mut db = Database::new("m", "my");
    assert!(matches!(
        dispatcher.exec(&mut db, "SELECT 1"),
        Err(DbError::UnknownBackendType(t)) if t == "my"
    ));
}

#[test]
fn empty_tag_is_null_input() {
    let dispatcher = Dispatcher::new(Registry::new());
    let mut db = Database::new("m", "");
    assert!(matches!(dispatcher.connect(&mut db), Err(DbError::NullInput(_))));
}

#[test]
fn exec_opens_and_closes_ephemeral_connection() {
    let recorder = Recorder::default();
    let dispatcher = dispatcher_with(BackendType::Postgres, recorder.clone());
    let mut db = Database::new("users", "pg").with_host("db1");

    assert!(!db.is_connected());
    dispatcher.exec(&mut db, "DELETE FROM t").unwrap();
    assert!(!db.is_connected());
    assert_eq!(
        recorder.calls(),
        vec!["connect", "exec:DELETE FROM t", "disconnect"]
    );
}

#[test]
fn exec_leaves_caller_connection_open() {
    let recorder = Recorder::default();
    let dispatcher = dispatcher_with(BackendType::Postgres, recorder.clone());
    let mut db = Database::new("users", "pg").with_host("db1");

    dispatcher.connect(&mut db).unwrap();
    dispatcher.exec(&mut db, "SELECT 1").unwrap();
    dispatcher.exec(&mut db, "SELECT 2").unwrap();
    assert!(db.is_connected());
    assert_eq!(recorder.calls(), vec!["connect", "exec:SELECT 1", "exec:SELECT 2"]);

    dispatcher.disconnect(&mut db).unwrap();
    assert!(!db.is_connected());
}

#[test]
fn failed_exec_still_closes_ephemeral_connection() {
    let recorder = Recorder {
        fail_exec: true,
        ..Recorder::default()
    };
    let dispatcher = dispatcher_with(BackendType::Postgres, recorder.clone());
    let mut db = Database::new("users", "pg");

    let err = dispatcher.exec(&mut db, "SELEC 1").unwrap_err();
    assert_eq!(err.code(), Some("42601"));
    assert!(!db.is_connected());
    assert_eq!(recorder.calls(), vec!["connect", "exec:SELEC 1", "disconnect"]);
}

#[test]
fn unsupported_exec_after_connect_still_closes() {
    let driver = DirectoryOnly::default();
    let dispatcher = dispatcher_with(BackendType::Ldap, driver.clone());
    let mut db = Database::new("dir", "ldap");

    let err = dispatcher.exec(&mut db, "anything").unwrap_err();
    assert!(matches!(
        err,
        DbError::Unsupported {
            backend: BackendType::Ldap,
            operation: Operation::Execute
        }
    ));
    assert!(!db.is_connected());
    assert_eq!(driver.inner.calls(), vec!["connect", "disconnect"]);
}

#[test]
fn connect_failure_short_circuits_exec() {
    let recorder = Recorder {
        fail_connect: true,
        ..Recorder::default()
    };
    let dispatcher = dispatcher_with(BackendType::Postgres, recorder.clone());
    let mut db = Database::new("users", "pg").with_host("db1");

    let err = dispatcher.exec(&mut db, "SELECT 1").unwrap_err();
    assert!(matches!(&err, DbError::ConnectionFailure { host, .. } if host == "db1"));
    assert_eq!(err.code(), Some("08001"));
    assert!(!db.is_connected());
    assert_eq!(recorder.calls(), vec!["connect"]);

    assert!(matches!(
        dispatcher.connect(&mut db),
        Err(DbError::ConnectionFailure { .. })
    ));
}

#[test]
fn sql_insert_uses_single_quotes_for_pg() {
    let recorder = Recorder::default();
    let dispatcher = dispatcher_with(BackendType::Postgres, recorder.clone());
    let mut db = Database::new("users", "pg");

    dispatcher.insert(&mut db, "users", &payload()).unwrap();
    assert_eq!(
        recorder.calls(),
        vec![
            "connect",
            "exec:INSERT INTO users (name,age) VALUES ('Alice','30')",
            "disconnect"
        ]
    );
    assert!(!db.is_connected());
}

#[test]
fn sql_insert_uses_double_quotes_for_mysql() {
    let recorder = Recorder::default();
    let dispatcher = dispatcher_with(BackendType::MySql, recorder.clone());
    let mut db = Database::new("users", "my");
    dispatcher.connect(&mut db).unwrap();

    dispatcher.insert(&mut db, "users", &payload()).unwrap();
    assert_eq!(
        recorder.calls(),
        vec![
            "connect",
            r#"exec:INSERT INTO users (name,age) VALUES ("Alice","30")"#
        ]
    );
    assert!(db.is_connected());
}

#[test]
fn non_sql_insert_goes_to_native_driver() {
    let recorder = Recorder::default();
    let dispatcher = dispatcher_with(BackendType::Lmdb, recorder.clone());
    let mut db = Database::new("kv", "lmdb");

    dispatcher.insert(&mut db, "sessions", &payload()).unwrap();
    assert_eq!(recorder.calls(), vec!["insert:sessions:2"]);
}

#[test]
fn insert_rejects_empty_resource_and_payload() {
    let recorder = Recorder::default();
    let dispatcher = dispatcher_with(BackendType::Postgres, recorder.clone());
    let mut db = Database::new("users", "pg");

    assert!(matches!(
        dispatcher.insert(&mut db, "", &payload()),
        Err(DbError::NullInput("resource"))
    ));
    assert!(matches!(
        dispatcher.insert(&mut db, "users", &[]),
        Err(DbError::NullInput("insert payload"))
    ));
    assert!(matches!(
        dispatcher.exec(&mut db, ""),
        Err(DbError::NullInput("statement"))
    ));
    assert!(recorder.calls().is_empty());
}

#[test]
fn fetch_all_applies_filter_and_counts_rows() {
    let recorder = Recorder::default();
    let dispatcher = dispatcher_with(BackendType::Postgres, recorder.clone());
    let mut db = Database::new("users", "pg");

    let all = dispatcher.fetch_all(&mut db, "SELECT *", &[]).unwrap();
    assert_eq!(all.row_count(), 2);
    assert_eq!(all.rows[0].get("name"), Some("alice"));
    assert_eq!(all.rows[1].get("name"), Some("bob"));

    let mut bob = dispatcher
        .fetch_all(&mut db, "SELECT *", &[KeyValue::new("age", "41")])
        .unwrap();
    assert_eq!(bob.row_count(), 1);
    assert_eq!(bob.rows[0].field("name").map(|f| f.value.as_str()), Some("bob"));
    assert!(bob.rows[0].field("email").is_none());

    bob.release();
    assert_eq!(bob.row_count(), 0);
}

#[test]
fn create_routes_or_reports_unsupported() {
    let recorder = Recorder::default();
    let dispatcher = dispatcher_with(BackendType::Postgres, recorder.clone());
    let mut db = Database::new("users", "pg");
    dispatcher.create(&mut db).unwrap();
    assert_eq!(recorder.calls(), vec!["create"]);

    let dispatcher = dispatcher_with(BackendType::Ldap, DirectoryOnly::default());
    let mut db = Database::new("dir", "ldap");
    assert!(matches!(
        dispatcher.create(&mut db),
        Err(DbError::Unsupported {
            operation: Operation::Create,
            ..
        })
    ));
}

#[test]
fn disconnect_without_handle_is_noop() {
    let recorder = Recorder::default();
    let dispatcher = dispatcher_with(BackendType::Postgres, recorder.clone());
    let mut db = Database::new("users", "pg");

    dispatcher.disconnect(&mut db).unwrap();
    assert!(recorder.calls().is_empty());
}

#[test]
fn routes_by_alias_from_loaded_config() {
    let pg = Recorder::default();
    let dir = DirectoryOnly::default();
    let mut registry = Registry::new();
    registry
        .register(BackendType::Postgres, pg.clone())
        .register(BackendType::Ldap, dir.clone());
    let dispatcher = Dispatcher::new(registry);

    let mut dbs = Databases::from_json_str(
        r#"[
            {"alias": "users", "type": "pg", "host": "db1"},
            {"alias": "people", "type": "ldap", "host": "ldap1"}
        ]"#,
    )
    .unwrap();

    let users = dbs.get_mut("users").unwrap();
    dispatcher.exec(users, "SELECT 1").unwrap();

    let people = dbs.get_mut("people").unwrap();
    dispatcher
        .insert(people, "uid=alice,ou=people", &payload())
        .unwrap();

    assert!(dbs.get("nobody").is_none());
    assert_eq!(pg.calls(), vec!["connect", "exec:SELECT 1", "disconnect"]);
    assert_eq!(dir.inner.calls(), vec!["insert:uid=alice,ou=people:2"]);
    dbs.release();
}

#[cfg(not(feature = "mssql"))]
#[test]
fn compiled_out_variant_behaves_like_unknown_tag() {
    let dispatcher = Dispatcher::default();
    let mut db = Database::new("x", "tds").with_host("sql1");

    assert!(matches!(
        dispatcher.exec(&mut db, "SELECT 1"),
        Err(DbError::UnknownBackendType(t)) if t == "tds"
    ));
    assert!(matches!(
        dispatcher.connect(&mut db),
        Err(DbError::UnknownBackendType(_))
    ));
    assert!(!db.is_connected());
}

/// Collects formatted log output for assertions.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[test]
fn failed_sql_insert_is_logged_as_insert() {
    let recorder = Recorder {
        fail_exec: true,
        ..Recorder::default()
    };
    let dispatcher = dispatcher_with(BackendType::Postgres, recorder);
    let mut db = Database::new("users", "pg");

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        assert!(dispatcher.insert(&mut db, "users", &payload()).is_err());
    });

    let text = logs.text();
    assert!(text.contains("operation=insert"), "{text}");
    assert!(!text.contains("operation=exec"), "{text}");
}

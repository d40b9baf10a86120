//! End-to-end tests for service CRUD against a real file.
//!
//! Each test copies a three-service fixture into a temp directory and drives
//! it through `ServiceStore::with_path`, so no environment state is touched.

use std::path::PathBuf;

use pgservice_config::{Section, ServiceError, ServiceStore, render_service};
use tempfile::TempDir;

const SERVICE_BASE: &str = "\
[service_1]
host = host_1
dbname = db_1
port = 1111
user = user_1
password = pwd_1

[service_2]
host = host_2
dbname = db_2
port = 2222
user = user_2
password = pwd_2

[service_3]
host = host_3
dbname = db_3
port = 3333
user = user_3
password = pwd_3
";

struct Fixture {
    _dir: TempDir,
    path: PathBuf,
    store: ServiceStore,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pg_service.conf");
        std::fs::write(&path, SERVICE_BASE).unwrap();
        let store = ServiceStore::with_path(&path);
        Self {
            _dir: dir,
            path,
            store,
        }
    }

    fn content(&self) -> String {
        std::fs::read_to_string(&self.path).unwrap()
    }
}

fn section(pairs: &[(&str, &str)]) -> Section {
    pairs.iter().copied().collect()
}

fn expected_service(n: u32) -> Section {
    [
        ("host", format!("host_{n}")),
        ("dbname", format!("db_{n}")),
        ("port", format!("{n}{n}{n}{n}")),
        ("user", format!("user_{n}")),
        ("password", format!("pwd_{n}")),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let store = ServiceStore::with_path(dir.path().join("non_existing_file"));

    assert!(matches!(store.load(), Err(ServiceError::FileNotFound { .. })));
    assert!(matches!(
        store.list_names(false),
        Err(ServiceError::FileNotFound { .. })
    ));
}

#[test]
fn test_list_names() {
    let fixture = Fixture::new();
    assert_eq!(
        fixture.store.list_names(false).unwrap(),
        ["service_1", "service_2", "service_3"]
    );
}

#[test]
fn test_list_names_sorted_case_insensitive() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pg_service.conf");
    std::fs::write(&path, "[zeta]\n[Beta]\n[alpha]\n[beta2]\n").unwrap();
    let store = ServiceStore::with_path(&path);

    assert_eq!(
        store.list_names(false).unwrap(),
        ["zeta", "Beta", "alpha", "beta2"]
    );
    assert_eq!(
        store.list_names(true).unwrap(),
        ["alpha", "Beta", "beta2", "zeta"]
    );
}

#[test]
fn test_get_service() {
    let fixture = Fixture::new();

    assert!(matches!(
        fixture.store.get("non_existing_service"),
        Err(ServiceError::ServiceNotFound { .. })
    ));
    assert_eq!(fixture.store.get("service_1").unwrap(), expected_service(1));
}

#[test]
fn test_empty_file_is_empty_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pg_service.conf");
    std::fs::write(&path, "").unwrap();
    let store = ServiceStore::with_path(&path);

    assert!(store.load().unwrap().is_empty());
    assert!(store.list_names(true).unwrap().is_empty());
}

#[test]
fn test_set_value() {
    let fixture = Fixture::new();

    assert!(matches!(
        fixture.store.set_value("non_existing_service", "key", "value"),
        Err(ServiceError::ServiceNotFound { .. })
    ));

    // Create setting
    fixture
        .store
        .set_value("service_1", "new_key", "new_value")
        .unwrap();
    let conf = fixture.store.get("service_1").unwrap();
    assert_eq!(conf.get("new_key"), Some("new_value"));
    assert!(
        !fixture.content().contains(" = "),
        "Whitespace around delimiters should not be present"
    );

    // Overwrite setting
    fixture.store.set_value("service_1", "port", "1").unwrap();
    assert_eq!(fixture.store.get("service_1").unwrap().get("port"), Some("1"));
    assert!(!fixture.content().contains(" = "));

    // Other services untouched
    assert_eq!(fixture.store.get("service_2").unwrap(), expected_service(2));
}

#[test]
fn test_set_value_rewrites_whole_file_canonically() {
    let fixture = Fixture::new();
    fixture.store.set_value("service_2", "port", "5432").unwrap();

    let content = fixture.content();
    assert!(content.starts_with("[service_1]\nhost=host_1\ndbname=db_1\n"));
    assert!(content.contains("[service_2]\nhost=host_2\ndbname=db_2\nport=5432\n"));
    assert!(content.ends_with("password=pwd_3\n\n"));
}

#[test]
fn test_write_full() {
    let fixture = Fixture::new();

    assert!(matches!(
        fixture
            .store
            .write_full("non_existing_service", &section(&[("key", "value")]), false),
        Err(ServiceError::ServiceNotFound { .. })
    ));

    // Overwrite the whole service_3 config using service_2 params
    assert_eq!(fixture.store.get("service_3").unwrap(), expected_service(3));
    let config_2 = fixture.store.get("service_2").unwrap();
    let written = fixture.store.write_full("service_3", &config_2, false).unwrap();

    assert_eq!(written, config_2);
    assert_eq!(fixture.store.get("service_3").unwrap(), config_2);
    assert!(!fixture.content().contains(" = "));
}

#[test]
fn test_write_full_drops_keys_not_in_new_settings() {
    let fixture = Fixture::new();
    let settings = section(&[("port", "9"), ("host", "h")]);

    fixture.store.write_full("service_1", &settings, false).unwrap();

    let stored = fixture.store.get("service_1").unwrap();
    assert_eq!(stored.keys().collect::<Vec<_>>(), ["port", "host"]);
    assert!(stored.get("dbname").is_none());
    assert_eq!(
        fixture.store.list_names(false).unwrap(),
        ["service_1", "service_2", "service_3"]
    );
}

#[test]
fn test_write_full_create_if_not_found() {
    let fixture = Fixture::new();
    let settings = section(&[("host", "localhost")]);

    fixture
        .store
        .write_full("missing_service", &settings, true)
        .unwrap();

    assert_eq!(
        fixture.store.list_names(false).unwrap(),
        ["service_1", "service_2", "service_3", "missing_service"]
    );
    assert_eq!(fixture.store.get("missing_service").unwrap(), settings);
}

#[test]
fn test_create_service() {
    let fixture = Fixture::new();
    let settings = section(&[("host", "new_host"), ("port", "5432")]);

    assert!(fixture.store.create("new_service", &settings).unwrap());
    assert_eq!(fixture.store.get("new_service").unwrap(), settings);
    assert_eq!(
        fixture.store.list_names(false).unwrap().last().map(String::as_str),
        Some("new_service")
    );

    // A second create must not overwrite
    let other = section(&[("host", "other")]);
    assert!(!fixture.store.create("new_service", &other).unwrap());
    assert_eq!(fixture.store.get("new_service").unwrap(), settings);
}

#[test]
fn test_remove_service() {
    let fixture = Fixture::new();

    fixture.store.remove("service_2").unwrap();

    assert_eq!(
        fixture.store.list_names(false).unwrap(),
        ["service_1", "service_3"]
    );

    let before = fixture.content();
    for _ in 0..2 {
        assert!(matches!(
            fixture.store.remove("service_2"),
            Err(ServiceError::ServiceNotFound { .. })
        ));
    }
    assert_eq!(fixture.content(), before);
}

#[test]
fn test_rename_service() {
    let fixture = Fixture::new();
    let original = fixture.store.get("service_1").unwrap();

    fixture.store.rename("service_1", "renamed").unwrap();

    assert_eq!(fixture.store.get("renamed").unwrap(), original);
    assert!(matches!(
        fixture.store.get("service_1"),
        Err(ServiceError::ServiceNotFound { .. })
    ));
    assert_eq!(
        fixture.store.list_names(false).unwrap(),
        ["service_2", "service_3", "renamed"]
    );
}

#[test]
fn test_duplicate_service() {
    let fixture = Fixture::new();

    assert!(matches!(
        fixture.store.duplicate("non_existing_service", "copy"),
        Err(ServiceError::ServiceNotFound { .. })
    ));

    assert!(fixture.store.duplicate("service_1", "copy").unwrap());
    assert_eq!(fixture.store.get("copy").unwrap(), expected_service(1));
    assert_eq!(fixture.store.get("service_1").unwrap(), expected_service(1));

    // Overwrite an existing target
    assert!(fixture.store.duplicate("service_2", "service_3").unwrap());
    assert_eq!(fixture.store.get("service_3").unwrap(), expected_service(2));
    assert_eq!(
        fixture.store.list_names(false).unwrap(),
        ["service_1", "service_2", "service_3", "copy"]
    );
}

#[test]
fn test_percent_values_are_literal() {
    let fixture = Fixture::new();
    fixture
        .store
        .set_value("service_1", "password", "100%(secret)s")
        .unwrap();

    assert_eq!(
        fixture.store.get("service_1").unwrap().get("password"),
        Some("100%(secret)s")
    );
}

#[test]
fn test_render_matches_written_section() {
    let fixture = Fixture::new();
    let settings = fixture.store.get("service_1").unwrap();

    let text = render_service("service_1", &settings);

    assert_eq!(
        text,
        "[service_1]\nhost=host_1\ndbname=db_1\nport=1111\nuser=user_1\npassword=pwd_1"
    );
    // render is pure: the fixture file keeps its original formatting
    assert_eq!(fixture.content(), SERVICE_BASE);
}

#[test]
fn test_malformed_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pg_service.conf");
    std::fs::write(&path, "[a]\nhost=h\n[a]\nport=1\n").unwrap();
    let store = ServiceStore::with_path(&path);

    match store.set_value("a", "port", "2") {
        Err(ServiceError::Parse { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected parse error, got {other:?}"),
    }
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "[a]\nhost=h\n[a]\nport=1\n"
    );
}

#[test]
fn test_multiline_values_stay_loadable() {
    let fixture = Fixture::new();

    fixture
        .store
        .set_value("service_1", "options", "a\n\nb")
        .unwrap();
    fixture
        .store
        .set_value("service_2", "options", "-c x=1\n#not a comment\n;nor this")
        .unwrap();

    let service_1 = fixture.store.get("service_1").unwrap();
    assert_eq!(service_1.get("options"), Some("a\n\nb"));
    assert_eq!(service_1.get("password"), Some("pwd_1"));
    assert_eq!(
        fixture.store.get("service_2").unwrap().get("options"),
        Some("-c x=1\n#not a comment\n;nor this")
    );
    assert_eq!(
        fixture.store.list_names(false).unwrap(),
        ["service_1", "service_2", "service_3"]
    );

    // A later mutation still loads the file
    fixture.store.set_value("service_3", "port", "1").unwrap();
    assert_eq!(fixture.store.get("service_1").unwrap(), service_1);
}

#[test]
fn test_unstorable_keys_and_names_leave_file_loadable() {
    let fixture = Fixture::new();

    for key in ["", "a=b", "a:b", "two\nlines"] {
        let err = fixture.store.set_value("service_1", key, "v").unwrap_err();
        assert!(err.is_invalid_input(), "{key:?} gave {err:?}");
    }
    for name in ["", "two\nlines"] {
        assert!(matches!(
            fixture.store.create(name, &section(&[("host", "h")])),
            Err(ServiceError::InvalidName { .. })
        ));
        assert!(matches!(
            fixture.store.rename("service_1", name),
            Err(ServiceError::InvalidName { .. })
        ));
    }

    assert_eq!(fixture.content(), SERVICE_BASE);
    assert_eq!(fixture.store.get("service_1").unwrap(), expected_service(1));
}

#[cfg(unix)]
#[test]
fn test_symlinked_service_file_stays_a_symlink() {
    let fixture = Fixture::new();
    let link = fixture.path.with_file_name(".pg_service.conf");
    std::os::unix::fs::symlink(&fixture.path, &link).unwrap();
    let store = ServiceStore::with_path(&link);

    store.set_value("service_1", "port", "1").unwrap();

    assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(fixture.store.get("service_1").unwrap().get("port"), Some("1"));
}

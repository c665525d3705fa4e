use bookdb_core::{
    import_books, run_import, Author, BookRecord, BookRepository, BookRow, FacadeLog,
    ImportConfig, ImportError, LoadError, LogSink, RepoError, SqliteBookRepository,
};
use log::Level;
use std::cell::RefCell;
use std::fmt::Arguments;
use std::path::Path;

const DUNE_DOC: &str = r#"{"books":[{"id":7,"title":"Dune","publication_year":1965,"author":{"name":"Frank Herbert","birth_year":1920,"nationality":"American"},"genres":["scifi","adventure"],"ratings":{"goodreads":4.25,"amazon":4.7}}]}"#;

#[derive(Default)]
struct RecordingLog {
    events: RefCell<Vec<(Level, String)>>,
}

impl RecordingLog {
    fn errors(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter(|(level, _)| *level == Level::Error)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl LogSink for RecordingLog {
    fn log(&self, level: Level, args: Arguments<'_>) {
        self.events.borrow_mut().push((level, args.to_string()));
    }
}

fn config_in(dir: &Path, document: Option<&str>) -> ImportConfig {
    let input_path = dir.join("sample_data.json");
    if let Some(document) = document {
        std::fs::write(&input_path, document).unwrap();
    }
    ImportConfig {
        input_path,
        db_path: dir.join("books.db"),
    }
}

#[test]
fn end_to_end_dune_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), Some(DUNE_DOC));

    let report = run_import(&config, &FacadeLog::default()).unwrap();

    assert_eq!(report.loaded, 1);
    assert_eq!(
        report.rows,
        vec![BookRow {
            id: 7,
            title: "Dune".to_string(),
            publication_year: Some(1965),
            author_name: Some("Frank Herbert".to_string()),
            author_birth_year: Some(1920),
            author_nationality: Some("American".to_string()),
            genres: Some("scifi,adventure".to_string()),
            goodreads_rating: Some(4.25),
            amazon_rating: Some(4.7),
        }]
    );
}

#[test]
fn rerunning_import_replaces_rows_instead_of_duplicating() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), Some(DUNE_DOC));
    run_import(&config, &FacadeLog::default()).unwrap();

    let revised = DUNE_DOC.replace(r#""title":"Dune""#, r#""title":"Dune (Revised)""#);
    std::fs::write(&config.input_path, revised).unwrap();
    let report = run_import(&config, &FacadeLog::default()).unwrap();

    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].title, "Dune (Revised)");
}

#[test]
fn missing_author_name_aborts_before_anything_is_committed() {
    let dir = tempfile::tempdir().unwrap();
    let document = r#"{"books":[
        {"id":1,"title":"Fine","author":{"name":"a"},"genres":[],"ratings":{}},
        {"id":2,"title":"Broken","author":{},"genres":[],"ratings":{}},
        {"id":3,"title":"After","author":{"name":"c"},"genres":[],"ratings":{}}
    ]}"#;
    let config = config_in(dir.path(), Some(document));
    let log = RecordingLog::default();

    let err = run_import(&config, &log).unwrap_err();

    assert!(matches!(
        err,
        ImportError::Load(LoadError::MissingField {
            field: "author.name",
            ..
        })
    ));
    assert!(!config.db_path.exists(), "database must not be touched");
    assert!(log.errors().iter().any(|message| message.contains("author.name")));
}

#[test]
fn missing_input_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), None);
    let log = RecordingLog::default();

    let err = run_import(&config, &log).unwrap_err();

    assert!(matches!(err, ImportError::Load(LoadError::NotFound(_))));
    assert!(!log.errors().is_empty());
}

#[test]
fn malformed_input_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), Some("{ not json"));

    let err = run_import(&config, &FacadeLog::default()).unwrap_err();
    assert!(matches!(err, ImportError::Load(LoadError::Parse(_))));
}

#[test]
fn failure_on_record_n_keeps_earlier_rows_committed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books.db");
    let log = RecordingLog::default();

    let repo = SqliteBookRepository::open(&path, &log).unwrap();
    // Pre-existing table with a stricter constraint; create_schema leaves it alone.
    repo.connection()
        .execute_batch(
            "CREATE TABLE books (
                id INTEGER PRIMARY KEY CHECK (id < 3),
                title TEXT NOT NULL,
                publication_year INTEGER,
                author_name TEXT,
                author_birth_year INTEGER,
                author_nationality TEXT,
                genres TEXT,
                goodreads_rating REAL,
                amazon_rating REAL
            );",
        )
        .unwrap();

    let books: Vec<BookRecord> = (1..=4)
        .map(|id| BookRecord::new(id, format!("Volume {id}"), Author::new("Serial Author")))
        .collect();
    let err = import_books(&repo, &books, &log).unwrap_err();
    assert!(matches!(err, ImportError::Repo(RepoError::Upsert { id: 3, .. })));
    repo.close().unwrap();

    let reopen_log = FacadeLog::default();
    let reopened = SqliteBookRepository::open(&path, &reopen_log).unwrap();
    let ids: Vec<i64> = reopened.fetch_all().unwrap().iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(reopened.find_book(4).unwrap().is_none());

    let errors = log.errors();
    assert!(
        errors
            .iter()
            .any(|message| message.contains("id=3") && message.contains("Volume 3")),
        "upsert failure should be logged with id and title: {errors:?}"
    );
}

#[test]
fn run_import_closes_repository_when_an_upsert_fails() {
    let dir = tempfile::tempdir().unwrap();
    let document = r#"{"books":[
        {"id":1,"title":"Kept","author":{"name":"a"},"genres":[],"ratings":{}},
        {"id":5,"title":"Rejected","author":{"name":"b"},"genres":[],"ratings":{}}
    ]}"#;
    let config = config_in(dir.path(), Some(document));
    let setup = rusqlite::Connection::open(&config.db_path).unwrap();
    setup
        .execute_batch(
            "CREATE TABLE books (
                id INTEGER PRIMARY KEY CHECK (id < 2),
                title TEXT NOT NULL,
                publication_year INTEGER,
                author_name TEXT,
                author_birth_year INTEGER,
                author_nationality TEXT,
                genres TEXT,
                goodreads_rating REAL,
                amazon_rating REAL
            );",
        )
        .unwrap();
    drop(setup);
    let log = RecordingLog::default();

    let err = run_import(&config, &log).unwrap_err();

    assert!(
        matches!(err, ImportError::Repo(RepoError::Upsert { id: 5, .. })),
        "unexpected error: {err}"
    );
    let events = log.events.borrow();
    let upsert_failed = events
        .iter()
        .position(|(level, message)| {
            *level == Level::Error && message.contains("event=book_upsert")
        })
        .expect("upsert failure should be logged");
    let closed = events
        .iter()
        .position(|(level, message)| {
            *level == Level::Info
                && message.contains("event=db_close")
                && message.contains("status=ok")
        })
        .expect("repository close should be logged");
    assert!(closed > upsert_failed);

    let reopen_log = FacadeLog::default();
    let reopened = SqliteBookRepository::open(&config.db_path, &reopen_log).unwrap();
    let ids: Vec<i64> = reopened.fetch_all().unwrap().iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![1]);
    reopened.close().unwrap();
}

#[test]
fn import_logs_loaded_and_persisted_counts() {
    let log = RecordingLog::default();
    let repo = SqliteBookRepository::open_in_memory(&log).unwrap();
    let books = vec![
        BookRecord::new(1, "One", Author::new("A")),
        BookRecord::new(1, "One Again", Author::new("A")),
    ];

    let rows = import_books(&repo, &books, &log).unwrap();

    // Duplicate ids collapse; the mismatch is reported, not rejected.
    assert_eq!(rows.len(), 1);
    let events = log.events.borrow();
    assert!(events
        .iter()
        .any(|(level, message)| *level == Level::Info
            && message.contains("loaded=2 persisted=1")));
}

use folio_core::db::open_db_in_memory;
use folio_core::repo::SqlitePortfolioRepository;
use folio_core::{PortfolioInput, RepoError, ResourceKind, ResourceRepository};
use rusqlite::params;
use uuid::Uuid;

fn input(title: &str) -> PortfolioInput {
    PortfolioInput {
        title: title.to_string(),
        description: format!("{title} description"),
        image_url: Some("https://cdn.example.com/cover.png".to_string()),
        project_url: None,
        github_url: Some("https://github.com/example/folio".to_string()),
        technologies: vec!["Rust".to_string(), "SQLite".to_string()],
        featured: false,
    }
}

#[test]
fn create_then_get_returns_input_plus_server_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePortfolioRepository::new(&conn);

    let created = repo.create(&input("Folio")).unwrap();
    assert_eq!(created.created_at, created.updated_at);

    let loaded = repo.get_by_id(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.to_input(), input("Folio"));
}

#[test]
fn create_normalizes_technologies_before_persisting() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePortfolioRepository::new(&conn);

    let mut padded = input("Padded");
    padded.technologies = vec![
        "React".to_string(),
        " TypeScript".to_string(),
        "  ".to_string(),
        " Node.js ".to_string(),
    ];
    let created = repo.create(&padded).unwrap();

    let loaded = repo.get_by_id(created.id).unwrap().unwrap();
    assert_eq!(loaded.technologies, vec!["React", "TypeScript", "Node.js"]);
}

#[test]
fn create_rejects_invalid_input_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePortfolioRepository::new(&conn);

    let mut invalid = input("Broken");
    invalid.technologies = vec![" ".to_string()];
    invalid.project_url = Some("not a url".to_string());

    let err = repo.create(&invalid).unwrap_err();
    match err {
        RepoError::Validation(err) => {
            assert!(err.field("technologies").is_some());
            assert!(err.field("projectUrl").is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(repo.list_all().unwrap().is_empty());
}

#[test]
fn list_is_newest_first_and_empty_is_not_an_error() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePortfolioRepository::new(&conn);
    assert!(repo.list_all().unwrap().is_empty());

    let older = repo.create(&input("Older")).unwrap();
    let newer = repo.create(&input("Newer")).unwrap();
    let tied = repo.create(&input("Tied")).unwrap();

    conn.execute(
        "UPDATE portfolios SET created_at = 1000 WHERE id = ?1;",
        params![older.id.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE portfolios SET created_at = 2000 WHERE id IN (?1, ?2);",
        params![newer.id.to_string(), tied.id.to_string()],
    )
    .unwrap();

    let listed: Vec<_> = repo.list_all().unwrap().into_iter().map(|p| p.id).collect();
    assert_eq!(listed, vec![tied.id, newer.id, older.id]);
}

#[test]
fn update_replaces_fields_and_keeps_identity() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePortfolioRepository::new(&conn);
    let created = repo.create(&input("Draft")).unwrap();

    let replacement = PortfolioInput {
        title: "Final".to_string(),
        description: "Shipped".to_string(),
        image_url: None,
        project_url: Some("https://folio.example.com".to_string()),
        github_url: None,
        technologies: vec!["Go".to_string()],
        featured: true,
    };
    let updated = repo.update_by_id(created.id, &replacement).unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(updated.to_input(), replacement);
    assert_eq!(repo.get_by_id(created.id).unwrap().unwrap(), updated);
}

#[test]
fn consecutive_updates_strictly_increase_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePortfolioRepository::new(&conn);
    let created = repo.create(&input("Draft")).unwrap();

    let first = repo.update_by_id(created.id, &input("One")).unwrap();
    let second = repo.update_by_id(created.id, &input("Two")).unwrap();
    assert!(first.updated_at > created.updated_at);
    assert!(second.updated_at > first.updated_at);
}

#[test]
fn update_missing_id_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePortfolioRepository::new(&conn);
    let missing = Uuid::new_v4();

    let err = repo.update_by_id(missing, &input("Ghost")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound { kind: ResourceKind::Portfolio, id } if id == missing
    ));
}

#[test]
fn delete_twice_reports_not_found_second_time() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePortfolioRepository::new(&conn);
    let created = repo.create(&input("Doomed")).unwrap();

    assert!(repo.delete_by_id(created.id).unwrap());
    assert!(repo.get_by_id(created.id).unwrap().is_none());

    let err = repo.delete_by_id(created.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[test]
fn corrupt_technologies_column_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePortfolioRepository::new(&conn);
    let created = repo.create(&input("Corrupt")).unwrap();

    conn.execute(
        "UPDATE portfolios SET technologies = 'Rust,Go' WHERE id = ?1;",
        params![created.id.to_string()],
    )
    .unwrap();

    let err = repo.get_by_id(created.id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

use balance_core::db::open_db_in_memory;
use balance_core::model::tag::DEFAULT_TAG_COLOR;
use balance_core::{
    FixedClock, Frequency, SqliteTagRepository, SqliteTaskRepository, SqliteUserRepository,
    TagService, TagServiceError, TaskDraft, TaskService, TaskServiceError, UserBalanceRepository,
};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use uuid::Uuid;

fn monday_morning() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 4)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn setup_user(conn: &Connection) -> Uuid {
    let owner = Uuid::new_v4();
    SqliteUserRepository::new(conn).create_user(owner).unwrap();
    owner
}

fn draft(title: &str) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        description: None,
        points_per_click: 5,
        frequency: Frequency::Daily,
        required_count: 1,
    }
}

#[test]
fn create_tag_trims_name_and_defaults_color() {
    let conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn);
    let service = TagService::new(SqliteTagRepository::new(&conn));

    let tag = service.create_tag(owner, "  Health ", None).unwrap();
    assert_eq!(tag.name, "Health");
    assert_eq!(tag.color, DEFAULT_TAG_COLOR);

    let colored = service.create_tag(owner, "Work", Some("#ff0000")).unwrap();
    assert_eq!(colored.color, "#ff0000");
}

#[test]
fn duplicate_names_are_rejected_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn);
    let service = TagService::new(SqliteTagRepository::new(&conn));

    service.create_tag(owner, "Health", None).unwrap();
    let err = service.create_tag(owner, "health", None).unwrap_err();
    assert!(matches!(err, TagServiceError::Duplicate(_)));

    // A different user may reuse the name.
    let other = setup_user(&conn);
    service.create_tag(other, "Health", None).unwrap();
}

#[test]
fn list_tags_is_sorted_by_name() {
    let conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn);
    let service = TagService::new(SqliteTagRepository::new(&conn));

    service.create_tag(owner, "work", None).unwrap();
    service.create_tag(owner, "Errands", None).unwrap();
    service.create_tag(owner, "health", None).unwrap();

    let names: Vec<String> = service
        .list_tags(owner)
        .unwrap()
        .into_iter()
        .map(|tag| tag.name)
        .collect();
    assert_eq!(names, vec!["Errands", "health", "work"]);
}

#[test]
fn delete_tag_enforces_ownership() {
    let conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn);
    let stranger = setup_user(&conn);
    let service = TagService::new(SqliteTagRepository::new(&conn));

    let tag = service.create_tag(owner, "Health", None).unwrap();

    let err = service.delete_tag(tag.id, stranger).unwrap_err();
    assert!(matches!(err, TagServiceError::Forbidden(_)));

    service.delete_tag(tag.id, owner).unwrap();
    let err = service.delete_tag(tag.id, owner).unwrap_err();
    assert!(matches!(err, TagServiceError::NotFound(_)));
}

#[test]
fn edit_replaces_the_whole_tag_set() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn);

    let (health, work) = {
        let tags = TagService::new(SqliteTagRepository::new(&conn));
        (
            tags.create_tag(owner, "Health", None).unwrap(),
            tags.create_tag(owner, "Work", None).unwrap(),
        )
    };

    let mut service = TaskService::new(
        SqliteTaskRepository::new(&mut conn),
        FixedClock::new(monday_morning()),
    );
    let task = service
        .create_task(owner, &draft("Stretch"), &[health.id], None)
        .unwrap();
    assert_eq!(task.tags.len(), 1);
    assert_eq!(task.tags[0].name, "Health");

    let edited = service
        .edit_task(task.id, owner, &draft("Stretch"), &[work.id], None)
        .unwrap();
    assert_eq!(edited.tags.len(), 1);
    assert_eq!(edited.tags[0].name, "Work");

    let cleared = service
        .edit_task(task.id, owner, &draft("Stretch"), &[], None)
        .unwrap();
    assert!(cleared.tags.is_empty());
}

#[test]
fn attaching_a_foreign_tag_fails_atomically() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn);
    let stranger = setup_user(&conn);

    let foreign_tag = {
        let tags = TagService::new(SqliteTagRepository::new(&conn));
        tags.create_tag(stranger, "Theirs", None).unwrap()
    };

    let mut service = TaskService::new(
        SqliteTaskRepository::new(&mut conn),
        FixedClock::new(monday_morning()),
    );
    let task = service
        .create_task(owner, &draft("Stretch"), &[], None)
        .unwrap();

    let err = service
        .edit_task(task.id, owner, &draft("Stretch"), &[foreign_tag.id], None)
        .unwrap_err();
    assert!(matches!(err, TaskServiceError::TagNotFound(id) if id == foreign_tag.id));

    // The failed replacement must not have cleared existing links either.
    let reloaded = service.get_task(task.id, owner).unwrap();
    assert!(reloaded.tags.is_empty());
}

#[test]
fn deleting_a_tag_cascades_its_task_links() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn);

    let tag = {
        let tags = TagService::new(SqliteTagRepository::new(&conn));
        tags.create_tag(owner, "Health", None).unwrap()
    };

    let task_id = {
        let mut service = TaskService::new(
            SqliteTaskRepository::new(&mut conn),
            FixedClock::new(monday_morning()),
        );
        service
            .create_task(owner, &draft("Stretch"), &[tag.id], None)
            .unwrap()
            .id
    };

    TagService::new(SqliteTagRepository::new(&conn))
        .delete_tag(tag.id, owner)
        .unwrap();

    let service = TaskService::new(
        SqliteTaskRepository::new(&mut conn),
        FixedClock::new(monday_morning()),
    );
    let task = service.get_task(task_id, owner).unwrap();
    assert!(task.tags.is_empty());
}

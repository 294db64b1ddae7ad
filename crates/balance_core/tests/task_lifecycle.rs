use balance_core::db::open_db_in_memory;
use balance_core::{
    FixedClock, Frequency, LedgerService, SortMode, SqliteLedgerStore, SqliteTaskRepository,
    SqliteUserRepository, TaskDraft, TaskFilter, TaskService, UserBalanceRepository,
};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use uuid::Uuid;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn draft(title: &str, frequency: Frequency, required_count: u32) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        description: None,
        points_per_click: 5,
        frequency,
        required_count,
    }
}

fn setup_user(conn: &Connection) -> Uuid {
    let owner = Uuid::new_v4();
    SqliteUserRepository::new(conn).create_user(owner).unwrap();
    owner
}

/// Creates a task at `created` and advances its counter `clicks` times.
fn create_with_progress(
    conn: &mut Connection,
    owner: Uuid,
    draft: &TaskDraft,
    created: NaiveDateTime,
    clicks: u32,
) -> Uuid {
    let task = {
        let mut service = TaskService::new(
            SqliteTaskRepository::new(conn),
            FixedClock::new(created),
        );
        service.create_task(owner, draft, &[], None).unwrap()
    };

    let mut ledger = LedgerService::new(SqliteLedgerStore::new(conn), FixedClock::new(created));
    for _ in 0..clicks {
        ledger.toggle(task.id, owner).unwrap();
    }
    task.id
}

#[test]
fn daily_task_resets_on_next_day_listing() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn);

    // Monday: two of three clicks done.
    let task_id = create_with_progress(
        &mut conn,
        owner,
        &draft("Stretch", Frequency::Daily, 3),
        at(2024, 3, 4, 9, 0),
        2,
    );

    // Tuesday listing rewinds progress and recomputes the deadline.
    let tuesday = at(2024, 3, 5, 8, 0);
    let service = TaskService::new(SqliteTaskRepository::new(&mut conn), FixedClock::new(tuesday));
    let listing = service
        .list_tasks(owner, SortMode::Smart, TaskFilter::default())
        .unwrap();

    assert_eq!(listing.active.len(), 1);
    let task = &listing.active[0];
    assert_eq!(task.completed_count, 0);
    assert_eq!(task.completed_at, None);
    assert_eq!(task.last_modified, tuesday);
    assert_eq!(task.deadline, at(2024, 3, 6, 0, 0));

    // The reset is persisted, not just presented.
    let reloaded = service.get_task(task_id, owner).unwrap();
    assert_eq!(reloaded.completed_count, 0);
    assert_eq!(reloaded.last_modified, tuesday);
}

#[test]
fn daily_task_does_not_reset_within_the_same_day() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn);

    let task_id = create_with_progress(
        &mut conn,
        owner,
        &draft("Stretch", Frequency::Daily, 3),
        at(2024, 3, 4, 9, 0),
        2,
    );

    let later_same_day = at(2024, 3, 4, 22, 0);
    let service = TaskService::new(
        SqliteTaskRepository::new(&mut conn),
        FixedClock::new(later_same_day),
    );
    service
        .list_tasks(owner, SortMode::Smart, TaskFilter::default())
        .unwrap();

    let task = service.get_task(task_id, owner).unwrap();
    assert_eq!(task.completed_count, 2);
}

#[test]
fn weekly_task_finished_sunday_survives_until_monday() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn);

    // 2024-03-10 is a Sunday.
    let task_id = create_with_progress(
        &mut conn,
        owner,
        &draft("Gym", Frequency::Weekly, 1),
        at(2024, 3, 10, 18, 0),
        1,
    );

    // Listing later the same Sunday: same week, no reset, still finished.
    {
        let service = TaskService::new(
            SqliteTaskRepository::new(&mut conn),
            FixedClock::new(at(2024, 3, 10, 22, 0)),
        );
        let listing = service
            .list_tasks(owner, SortMode::Smart, TaskFilter::default())
            .unwrap();
        assert_eq!(listing.finished.len(), 1);
        assert!(listing.active.is_empty());
    }

    // Monday listing crosses the week boundary and rewinds progress.
    let monday = at(2024, 3, 11, 7, 0);
    let service = TaskService::new(SqliteTaskRepository::new(&mut conn), FixedClock::new(monday));
    let listing = service
        .list_tasks(owner, SortMode::Smart, TaskFilter::default())
        .unwrap();

    assert!(listing.finished.is_empty());
    assert_eq!(listing.active.len(), 1);
    let task = service.get_task(task_id, owner).unwrap();
    assert_eq!(task.completed_count, 0);
    assert_eq!(task.completed_at, None);
    // New cycle deadline: the Monday after the reset day.
    assert_eq!(task.deadline, at(2024, 3, 18, 0, 0));
}

#[test]
fn weekly_task_does_not_reset_mid_week() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn);

    // Wednesday progress, Friday listing: same Monday-anchored week.
    let task_id = create_with_progress(
        &mut conn,
        owner,
        &draft("Gym", Frequency::Weekly, 3),
        at(2024, 3, 6, 9, 0),
        2,
    );

    let friday = at(2024, 3, 8, 9, 0);
    let service = TaskService::new(SqliteTaskRepository::new(&mut conn), FixedClock::new(friday));
    service
        .list_tasks(owner, SortMode::Smart, TaskFilter::default())
        .unwrap();

    let task = service.get_task(task_id, owner).unwrap();
    assert_eq!(task.completed_count, 2);
}

#[test]
fn one_time_task_never_resets() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn);

    let task_id = create_with_progress(
        &mut conn,
        owner,
        &draft("Dentist", Frequency::OneTime, 1),
        at(2024, 3, 4, 9, 0),
        1,
    );

    // Weeks later the completion still stands.
    let service = TaskService::new(
        SqliteTaskRepository::new(&mut conn),
        FixedClock::new(at(2024, 4, 1, 9, 0)),
    );
    let listing = service
        .list_tasks(owner, SortMode::Smart, TaskFilter::default())
        .unwrap();

    assert!(listing.active.is_empty());
    assert_eq!(listing.finished.len(), 1);
    let task = service.get_task(task_id, owner).unwrap();
    assert_eq!(task.completed_count, 1);
    assert!(task.completed_at.is_some());
}

#[test]
fn reset_does_not_touch_point_balance() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn);

    create_with_progress(
        &mut conn,
        owner,
        &draft("Stretch", Frequency::Daily, 3),
        at(2024, 3, 4, 9, 0),
        2,
    );

    {
        let service = TaskService::new(
            SqliteTaskRepository::new(&mut conn),
            FixedClock::new(at(2024, 3, 5, 8, 0)),
        );
        service
            .list_tasks(owner, SortMode::Smart, TaskFilter::default())
            .unwrap();
    }

    // Earned points survive the counter rewind.
    let points = SqliteUserRepository::new(&conn).get_points(owner).unwrap();
    assert_eq!(points, 10);
}

use balance_core::db::open_db_in_memory;
use balance_core::{
    PrizeService, PrizeServiceError, RedeemOutcome, SqlitePrizeRepository, SqliteUserRepository,
    UserBalanceRepository,
};
use balance_core::model::prize::PrizeValidationError;
use rusqlite::Connection;
use uuid::Uuid;

fn setup_user(conn: &Connection, points: i64) -> Uuid {
    let owner = Uuid::new_v4();
    let users = SqliteUserRepository::new(conn);
    users.create_user(owner).unwrap();
    if points > 0 {
        users.adjust_points(owner, points).unwrap();
    }
    owner
}

fn service(conn: &Connection) -> PrizeService<SqlitePrizeRepository<'_>, SqliteUserRepository<'_>> {
    PrizeService::new(
        SqlitePrizeRepository::new(conn),
        SqliteUserRepository::new(conn),
    )
}

#[test]
fn create_and_list_orders_by_cost() {
    let conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn, 0);
    let service = service(&conn);

    service
        .create_prize(owner, "Weekend trip", None, 500)
        .unwrap();
    service
        .create_prize(owner, "Movie night", Some("With popcorn.".to_string()), 50)
        .unwrap();
    service.create_prize(owner, "Ice cream", None, 50).unwrap();

    let prizes = service.list_prizes(owner).unwrap();
    let titles: Vec<&str> = prizes.iter().map(|p| p.title.as_str()).collect();
    // Cheapest first, title breaks ties.
    assert_eq!(titles, vec!["Ice cream", "Movie night", "Weekend trip"]);
}

#[test]
fn create_rejects_non_positive_cost() {
    let conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn, 0);
    let service = service(&conn);

    let err = service.create_prize(owner, "Free lunch", None, 0).unwrap_err();
    assert!(matches!(
        err,
        PrizeServiceError::Validation(PrizeValidationError::NonPositiveCost(0))
    ));
}

#[test]
fn redeem_debits_the_balance() {
    let conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn, 100);
    let service = service(&conn);

    let prize = service.create_prize(owner, "Movie night", None, 30).unwrap();
    let outcome = service.redeem(prize.id, owner).unwrap();

    assert_eq!(outcome, RedeemOutcome::Redeemed { new_point_total: 70 });
    let points = SqliteUserRepository::new(&conn).get_points(owner).unwrap();
    assert_eq!(points, 70);
}

#[test]
fn redeem_with_insufficient_points_leaves_balance_untouched() {
    let conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn, 10);
    let service = service(&conn);

    let prize = service.create_prize(owner, "Weekend trip", None, 500).unwrap();
    let outcome = service.redeem(prize.id, owner).unwrap();

    assert_eq!(
        outcome,
        RedeemOutcome::InsufficientPoints {
            current_points: 10,
            cost: 500,
        }
    );
    let points = SqliteUserRepository::new(&conn).get_points(owner).unwrap();
    assert_eq!(points, 10);
}

#[test]
fn redeem_exact_balance_reaches_zero() {
    let conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn, 30);
    let service = service(&conn);

    let prize = service.create_prize(owner, "Movie night", None, 30).unwrap();
    let outcome = service.redeem(prize.id, owner).unwrap();

    assert_eq!(outcome, RedeemOutcome::Redeemed { new_point_total: 0 });
}

#[test]
fn redeem_rejects_foreign_prizes() {
    let conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn, 100);
    let stranger = setup_user(&conn, 100);
    let service = service(&conn);

    let prize = service.create_prize(owner, "Movie night", None, 30).unwrap();
    let err = service.redeem(prize.id, stranger).unwrap_err();
    assert!(matches!(err, PrizeServiceError::Forbidden(id) if id == prize.id));

    let points = SqliteUserRepository::new(&conn).get_points(stranger).unwrap();
    assert_eq!(points, 100);
}

#[test]
fn redeem_missing_prize_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn, 100);
    let service = service(&conn);

    let missing = Uuid::new_v4();
    let err = service.redeem(missing, owner).unwrap_err();
    assert!(matches!(err, PrizeServiceError::NotFound(id) if id == missing));
}

#[test]
fn delete_enforces_ownership() {
    let conn = open_db_in_memory().unwrap();
    let owner = setup_user(&conn, 0);
    let stranger = setup_user(&conn, 0);
    let service = service(&conn);

    let prize = service.create_prize(owner, "Movie night", None, 30).unwrap();

    let err = service.delete_prize(prize.id, stranger).unwrap_err();
    assert!(matches!(err, PrizeServiceError::Forbidden(_)));

    service.delete_prize(prize.id, owner).unwrap();
    assert!(service.list_prizes(owner).unwrap().is_empty());

    let err = service.delete_prize(prize.id, owner).unwrap_err();
    assert!(matches!(err, PrizeServiceError::NotFound(_)));
}

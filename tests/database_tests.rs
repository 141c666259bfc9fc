//! Store tests against Postgres. Run with a reachable `DATABASE_URL` and
//! `cargo test --test database_tests -- --ignored`.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use sqlx::PgPool;
use uuid::Uuid;

use overtime_hub::OvertimeStore;
use overtime_hub::database::PgStore;
use overtime_hub::database::models::{
    Decision, RequestStatus, Role, Shift, ShiftInput, ShiftStatus, ShiftType,
};

async fn insert_profile(pool: &PgPool, full_name: Option<&str>, role: Role) -> sqlx::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO profiles (id, full_name, role) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(full_name)
        .bind(role)
        .execute(pool)
        .await?;
    Ok(id)
}

async fn insert_shift(store: &PgStore, shift_date: NaiveDate, spots: i32) -> anyhow::Result<Shift> {
    let input = ShiftInput {
        shift_date,
        shift_type: ShiftType::Day,
        start_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
        department: "Dispatch".to_string(),
        spots_available: spots,
        notes: None,
    };
    Ok(store.upsert_shifts(&[input]).await?.remove(0))
}

async fn request_rows(pool: &PgPool, shift_id: Uuid) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM ot_requests WHERE shift_id = $1")
        .bind(shift_id)
        .fetch_one(pool)
        .await
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, hour, 0, 0).unwrap()
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, d).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn repeated_request_keeps_one_row(pool: PgPool) -> anyhow::Result<()> {
    let store = PgStore::new(pool.clone());
    let employee = insert_profile(&pool, Some("J. Edwards"), Role::Employee).await?;
    let shift = insert_shift(&store, date(10), 1).await?;

    let first = store.upsert_request(shift.id, employee, at(9)).await?;
    let again = store.upsert_request(shift.id, employee, at(10)).await?;

    assert_eq!(again.id, first.id);
    assert_eq!(again.status, RequestStatus::Requested);
    assert_eq!(again.requested_at, at(9));
    assert_eq!(request_rows(&pool, shift.id).await?, 1);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn cancelled_request_is_revived_in_place(pool: PgPool) -> anyhow::Result<()> {
    let store = PgStore::new(pool.clone());
    let employee = insert_profile(&pool, Some("J. Edwards"), Role::Employee).await?;
    let manager = insert_profile(&pool, Some("M. Boss"), Role::Manager).await?;
    let shift = insert_shift(&store, date(10), 1).await?;

    let created = store.upsert_request(shift.id, employee, at(9)).await?;
    store
        .decide_request(created.id, Decision::Approved, manager, at(10))
        .await?
        .expect("approved");
    let cancelled = store.cancel_request(shift.id, employee).await?.expect("cancelled");
    assert_eq!(cancelled.status, RequestStatus::Cancelled);

    let revived = store.upsert_request(shift.id, employee, at(12)).await?;
    assert_eq!(revived.id, created.id);
    assert_eq!(revived.status, RequestStatus::Requested);
    assert_eq!(revived.requested_at, at(12));
    assert_eq!(revived.decided_at, None);
    assert_eq!(revived.decided_by, None);
    assert!(!revived.archived);
    assert_eq!(request_rows(&pool, shift.id).await?, 1);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn closed_requests_reject_transitions(pool: PgPool) -> anyhow::Result<()> {
    let store = PgStore::new(pool.clone());
    let employee = insert_profile(&pool, Some("J. Edwards"), Role::Employee).await?;
    let manager = insert_profile(&pool, Some("M. Boss"), Role::Manager).await?;
    let shift = insert_shift(&store, date(10), 1).await?;

    let request = store.upsert_request(shift.id, employee, at(9)).await?;
    let declined = store
        .decide_request(request.id, Decision::Declined, manager, at(10))
        .await?
        .expect("declined");
    assert_eq!(declined.status, RequestStatus::Declined);
    assert_eq!(declined.decided_by, Some(manager));

    assert!(store.cancel_request(shift.id, employee).await?.is_none());

    store.upsert_request(shift.id, employee, at(11)).await?;
    store.cancel_request(shift.id, employee).await?.expect("cancelled");
    assert!(
        store
            .decide_request(request.id, Decision::Approved, manager, at(12))
            .await?
            .is_none()
    );
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn soft_delete_declines_open_requests(pool: PgPool) -> anyhow::Result<()> {
    let store = PgStore::new(pool.clone());
    let manager = insert_profile(&pool, Some("M. Boss"), Role::Manager).await?;
    let waiting = insert_profile(&pool, Some("A. Adams"), Role::Employee).await?;
    let approved = insert_profile(&pool, Some("B. Brown"), Role::Employee).await?;
    let withdrawn = insert_profile(&pool, Some("C. Clark"), Role::Employee).await?;
    let shift = insert_shift(&store, date(10), 1).await?;

    store.upsert_request(shift.id, waiting, at(9)).await?;
    let chosen = store.upsert_request(shift.id, approved, at(9)).await?;
    store
        .decide_request(chosen.id, Decision::Approved, manager, at(10))
        .await?
        .expect("approved");
    store.upsert_request(shift.id, withdrawn, at(9)).await?;
    store.cancel_request(shift.id, withdrawn).await?.expect("cancelled");

    let (deleted, declined) = store
        .soft_delete_shift(shift.id, manager, at(11))
        .await?
        .expect("deleted");
    assert_eq!(deleted.shift_status, ShiftStatus::Deleted);
    assert_eq!(deleted.deleted_at, Some(at(11)));
    assert_eq!(declined, 2);

    for user in [waiting, approved] {
        let request = store.find_request_for(shift.id, user).await?.expect("request");
        assert_eq!(request.status, RequestStatus::Declined);
        assert_eq!(request.decided_by, Some(manager));
    }
    let untouched = store.find_request_for(shift.id, withdrawn).await?.expect("request");
    assert_eq!(untouched.status, RequestStatus::Cancelled);

    assert!(
        store
            .decide_request(chosen.id, Decision::Approved, manager, at(12))
            .await?
            .is_none()
    );
    assert!(store.list_approved_between(date(1), date(28)).await?.is_empty());
    assert!(store.soft_delete_shift(shift.id, manager, at(12)).await?.is_none());
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn counts_view_tallies_non_archived_requests(pool: PgPool) -> anyhow::Result<()> {
    let store = PgStore::new(pool.clone());
    let manager = insert_profile(&pool, Some("M. Boss"), Role::Manager).await?;
    let shift = insert_shift(&store, date(10), 1).await?;

    let mut users = Vec::new();
    for name in ["A. Adams", "B. Brown", "C. Clark", "D. Dunn", "E. Evans"] {
        users.push(insert_profile(&pool, Some(name), Role::Employee).await?);
    }
    let mut requests = Vec::new();
    for (i, user) in users.iter().enumerate() {
        requests.push(
            store
                .upsert_request(shift.id, *user, at(9) + Duration::minutes(i as i64))
                .await?,
        );
    }

    for request in &requests[..2] {
        store
            .decide_request(request.id, Decision::Approved, manager, at(10))
            .await?
            .expect("approved");
    }
    store.cancel_request(shift.id, users[2]).await?.expect("cancelled");
    store
        .decide_request(requests[3].id, Decision::Declined, manager, at(10))
        .await?
        .expect("declined");
    assert_eq!(store.archive_closed_requests(users[3]).await?, 1);

    let counts = store
        .shift_counts()
        .await?
        .into_iter()
        .find(|c| c.shift_id == shift.id)
        .expect("counts row");
    assert_eq!(counts.requested, 1);
    assert_eq!(counts.approved, 2);
    assert_eq!(counts.declined, 0);
    assert_eq!(counts.cancelled, 1);
    assert!(counts.is_over_approved(shift.spots_available));

    let approved = store.list_approved_between(date(10), date(10)).await?;
    let names: Vec<Option<String>> = approved.into_iter().map(|e| e.full_name).collect();
    assert_eq!(
        names,
        vec![Some("A. Adams".to_string()), Some("B. Brown".to_string())]
    );
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs a Postgres DATABASE_URL"]
async fn profiles_list_by_name_and_role(pool: PgPool) -> anyhow::Result<()> {
    let store = PgStore::new(pool.clone());
    insert_profile(&pool, Some("M. Boss"), Role::Manager).await?;
    insert_profile(&pool, Some("A. Adams"), Role::Employee).await?;
    let pending = insert_profile(&pool, None, Role::NewUser).await?;

    let all = store.list_all_profiles(None).await?;
    let names: Vec<Option<&str>> = all.iter().map(|p| p.full_name.as_deref()).collect();
    assert_eq!(names, vec![Some("A. Adams"), Some("M. Boss"), None]);

    let waiting = store.list_all_profiles(Some(Role::NewUser)).await?;
    assert_eq!(waiting.len(), 1);
    assert_eq!(waiting[0].id, pending);
    Ok(())
}

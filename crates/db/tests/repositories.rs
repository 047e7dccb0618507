//! Integration tests for the repository layer.
//!
//! These run against a real database (`DATABASE_URL`) with the workspace
//! migrations applied, so they are ignored by default:
//! `cargo test -p cragmap-db -- --ignored`.

use cragmap_core::leaderboard::PageRequest;
use cragmap_core::stats::LogStatus;
use cragmap_core::submission::{
    ImageTarget, NewImage, NewRoute, RoutePoint, ValidatedSubmission,
};
use cragmap_core::types::DbId;
use cragmap_db::models::crag::NewCrag;
use cragmap_db::repositories::{
    ClimbRepo, CragReportRepo, CragRepo, LeaderboardRepo, LogRepo, ProfileRepo, RegionRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, username: &str) -> DbId {
    let id = DbId::new_v4();
    ProfileRepo::find_or_create(pool, id).await.unwrap();
    ProfileRepo::update_profile(
        pool,
        id,
        &cragmap_db::models::profile::UpdateProfile {
            username: Some(username.to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    id
}

async fn new_crag(pool: &PgPool, user: DbId, name: &str) -> DbId {
    let region = RegionRepo::create(pool, &format!("{name} region"), Some("FR"), Some(48.4), Some(2.6))
        .await
        .unwrap();
    CragRepo::create(
        pool,
        user,
        &NewCrag {
            name: name.to_string(),
            latitude: 48.40,
            longitude: 2.63,
            region_id: Some(region.id),
            description: None,
            rock_type: Some("sandstone".into()),
            crag_type: Default::default(),
        },
    )
    .await
    .unwrap()
    .id
}

fn route(name: &str, grade: &str, order: i32) -> NewRoute {
    NewRoute {
        name: name.to_string(),
        grade: grade.to_string(),
        description: None,
        points: vec![RoutePoint { x: 0.1, y: 0.9 }, RoutePoint { x: 0.2, y: 0.1 }],
        sequence_order: order,
    }
}

fn new_image_submission(crag_id: DbId, routes: Vec<NewRoute>) -> ValidatedSubmission {
    ValidatedSubmission {
        image: ImageTarget::New(NewImage {
            url: "https://cdn.example.com/boulder.jpg".into(),
            latitude: 48.40,
            longitude: 2.63,
            capture_date: None,
            width: Some(1200),
            height: Some(800),
            crag_id,
        }),
        routes,
    }
}

// ---------------------------------------------------------------------------
// Submissions and moderation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn submission_creates_pending_climbs_with_route_lines(pool: PgPool) {
    let user = new_user(&pool, "setter").await;
    let crag = new_crag(&pool, user, "Bas Cuvier").await;

    let outcome = ClimbRepo::create_submission(
        &pool,
        user,
        &new_image_submission(crag, vec![route("Marie-Rose", "6A", 0), route("La Prestat", "7A", 1)]),
    )
    .await
    .unwrap();

    assert_eq!(outcome.climbs.len(), 2);
    assert!(outcome.climbs.iter().all(|c| c.status == "pending"));
    assert!(outcome.climbs.iter().all(|c| c.crag_id == Some(crag)));

    let lines = ClimbRepo::route_lines(&pool, outcome.climbs[0].id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].points.0.len(), 2);
    assert_eq!(lines[0].color, "red");

    let since = chrono::Utc::now() - chrono::Duration::hours(24);
    assert_eq!(ClimbRepo::count_created_since(&pool, user, since).await.unwrap(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn submission_on_missing_image_rolls_back(pool: PgPool) {
    let user = new_user(&pool, "ghost").await;
    let result = ClimbRepo::create_submission(
        &pool,
        user,
        &ValidatedSubmission {
            image: ImageTarget::Existing(DbId::new_v4()),
            routes: vec![route("Nothing", "6A", 0)],
        },
    )
    .await;

    assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
    let since = chrono::Utc::now() - chrono::Duration::hours(24);
    assert_eq!(ClimbRepo::count_created_since(&pool, user, since).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn moderation_only_decides_pending_climbs(pool: PgPool) {
    let user = new_user(&pool, "mod_target").await;
    let crag = new_crag(&pool, user, "Apremont").await;
    let outcome = ClimbRepo::create_submission(&pool, user, &new_image_submission(crag, vec![route("A", "6B", 0)]))
        .await
        .unwrap();
    let id = outcome.climbs[0].id;

    assert_eq!(ClimbRepo::list_pending(&pool).await.unwrap().len(), 1);

    let approved = ClimbRepo::approve(&pool, id).await.unwrap().unwrap();
    assert_eq!(approved.status, "approved");
    assert!(approved.approved_at.is_some());

    assert!(ClimbRepo::reject(&pool, id, Some("late")).await.unwrap().is_none());
    assert!(ClimbRepo::approve(&pool, DbId::new_v4()).await.unwrap().is_none());
    assert!(ClimbRepo::list_pending(&pool).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Logbook, leaderboard and account deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn relogging_replaces_status(pool: PgPool) {
    let user = new_user(&pool, "logger").await;
    let crag = new_crag(&pool, user, "Franchard").await;
    let outcome = ClimbRepo::create_submission(&pool, user, &new_image_submission(crag, vec![route("B", "7A", 0)]))
        .await
        .unwrap();
    let climb = outcome.climbs[0].id;

    LogRepo::upsert_many(&pool, user, &[climb], LogStatus::Try).await.unwrap();
    let logs = LogRepo::upsert_many(&pool, user, &[climb], LogStatus::Flash).await.unwrap();
    assert_eq!(logs.len(), 1);

    let book = LogRepo::list_for_user(&pool, user).await.unwrap();
    assert_eq!(book.len(), 1);
    assert_eq!(book[0].status, "flash");
    assert_eq!(book[0].grade.as_deref(), Some("7A"));

    assert!(LogRepo::delete(&pool, user, book[0].id).await.unwrap());
    assert!(!LogRepo::delete(&pool, user, book[0].id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn repeated_climb_ids_are_logged_once(pool: PgPool) {
    let user = new_user(&pool, "double_tap").await;
    let crag = new_crag(&pool, user, "Elephant").await;
    let outcome = ClimbRepo::create_submission(&pool, user, &new_image_submission(crag, vec![route("D", "6B+", 0)]))
        .await
        .unwrap();
    let climb = outcome.climbs[0].id;

    let logs = LogRepo::upsert_many(&pool, user, &[climb, climb, climb], LogStatus::Top)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(LogRepo::list_for_user(&pool, user).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn leaderboard_ranks_by_recent_average(pool: PgPool) {
    let strong = new_user(&pool, "strong").await;
    let casual = new_user(&pool, "casual").await;
    let crag = new_crag(&pool, strong, "Cuvier Rempart").await;
    let outcome = ClimbRepo::create_submission(
        &pool,
        strong,
        &new_image_submission(crag, vec![route("Hard", "8A", 0), route("Easy", "5A", 1)]),
    )
    .await
    .unwrap();

    LogRepo::upsert_many(&pool, strong, &[outcome.climbs[0].id], LogStatus::Flash).await.unwrap();
    LogRepo::upsert_many(&pool, casual, &[outcome.climbs[1].id], LogStatus::Top).await.unwrap();

    let rows = LeaderboardRepo::fetch(&pool, None, None, 20, 0).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].user_id, strong);
    assert_eq!(rows[0].avg_points, 810.0);
    assert_eq!(rows[1].avg_points, 500.0);
    assert!(rows.iter().all(|r| r.total_users == 2));

    assert_eq!(LeaderboardRepo::count(&pool, Some("female"), None).await.unwrap(), 0);

    // Offsets beyond 32 bits reach the query intact and return nothing.
    let far = PageRequest::new(Some(67_108_865), Some(64));
    let rows = LeaderboardRepo::fetch(&pool, None, None, far.limit, far.offset()).await.unwrap();
    assert!(rows.is_empty());
    let far = PageRequest::new(Some(33_554_433), Some(64));
    let rows = LeaderboardRepo::fetch(&pool, None, None, far.limit, far.offset()).await.unwrap();
    assert!(rows.is_empty());
    let rows = LeaderboardRepo::fetch(&pool, None, None, 100, i64::MAX).await.unwrap();
    assert!(rows.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn deleting_account_detaches_climbs(pool: PgPool) {
    let user = new_user(&pool, "leaver").await;
    let crag = new_crag(&pool, user, "Roche aux Sabots").await;
    let outcome = ClimbRepo::create_submission(&pool, user, &new_image_submission(crag, vec![route("C", "6C", 0)]))
        .await
        .unwrap();
    let climb = outcome.climbs[0].id;
    LogRepo::upsert_many(&pool, user, &[climb], LogStatus::Top).await.unwrap();

    ProfileRepo::delete_account(&pool, user).await.unwrap();

    assert!(ProfileRepo::find_by_id(&pool, user).await.unwrap().is_none());
    let kept = ClimbRepo::find_by_id(&pool, climb).await.unwrap().unwrap();
    assert_eq!(kept.user_id, None);
    assert!(LogRepo::list_for_user(&pool, user).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Regions, crags and reports
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn region_names_are_unique_ignoring_case(pool: PgPool) {
    RegionRepo::create(&pool, "Fontainebleau", Some("FR"), None, None).await.unwrap();
    let err = RegionRepo::create(&pool, "FONTAINEBLEAU", None, None, None)
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_regions_name_lower"));

    let found = RegionRepo::find_by_name(&pool, "fontainebleau").await.unwrap();
    assert!(found.is_some());
    assert_eq!(RegionRepo::list(&pool, Some("bleau")).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn reports_increment_counter(pool: PgPool) {
    let user = new_user(&pool, "reporter").await;
    let crag = new_crag(&pool, user, "Isatis").await;

    CragReportRepo::create(&pool, user, crag, "duplicate of another crag").await.unwrap().unwrap();
    CragReportRepo::create(&pool, user, crag, "wrong coordinates entirely").await.unwrap().unwrap();
    assert!(CragReportRepo::create(&pool, user, DbId::new_v4(), "missing crag here")
        .await
        .unwrap()
        .is_none());

    let crag = CragRepo::find_by_id(&pool, crag).await.unwrap().unwrap();
    assert_eq!(crag.report_count, 2);

    let near = CragRepo::find_near(&pool, 48.40, 2.63, 1.0).await.unwrap();
    assert_eq!(near.len(), 1);
    assert!(CragRepo::find_at_coordinates(&pool, 48.40, 2.63).await.unwrap().is_some());
}

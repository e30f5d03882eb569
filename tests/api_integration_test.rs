// ==========================================
// 排课 API 集成测试
// ==========================================
// 测试目标: 目录读取 → 生成 → 落库 的完整链路
// ==========================================

mod helpers;

use std::sync::Arc;

use course_timetable_engine::api::{ApiError, ScheduleApi};
use course_timetable_engine::config::{ConfigManager, SchedulerConfigReader};
use course_timetable_engine::engine::AllocationOrchestrator;
use course_timetable_engine::repository::{
    ScheduleStore, SqliteCatalogRepository, SqliteScheduleRepository,
};
use helpers::catalog_builder::demo_catalog;
use tempfile::NamedTempFile;
use test_helpers::{create_test_db, insert_catalog, open_test_connection};

async fn build_api(db_path: &str) -> ScheduleApi {
    let config = ConfigManager::new(db_path)
        .unwrap()
        .load_scheduler_config()
        .await
        .unwrap();
    let orchestrator = AllocationOrchestrator::new(config).unwrap();
    ScheduleApi::new(
        Arc::new(SqliteCatalogRepository::new(db_path).unwrap()),
        orchestrator,
    )
}

fn seeded_db() -> (NamedTempFile, String) {
    let (temp_file, db_path) = create_test_db().unwrap();
    insert_catalog(&open_test_connection(&db_path).unwrap(), &demo_catalog()).unwrap();
    (temp_file, db_path)
}

#[tokio::test]
async fn test_generate_returns_full_response() {
    let (_temp_file, db_path) = seeded_db();
    let api = build_api(&db_path).await;

    let response = api.generate(None).unwrap();

    assert!(response.success);
    assert!(uuid::Uuid::parse_str(&response.run_id).is_ok());
    assert!(chrono::DateTime::parse_from_rfc3339(&response.generated_at).is_ok());
    assert_eq!(response.data.summary.semester, "All");
    assert_eq!(response.data.summary.total_sections, 5);
    assert_eq!(response.data.summary.schedules_saved, 0);
    assert!(response.data.summary.conflict_free);
    assert!(response.data.summary.successful_assignments > 0);
}

#[tokio::test]
async fn test_unknown_semester_produces_empty_schedule() {
    let (_temp_file, db_path) = seeded_db();
    let api = build_api(&db_path).await;

    let response = api.generate(Some("Summer")).unwrap();

    assert!(response.success);
    assert_eq!(response.data.summary.total_pairs, 0);
    assert!(response.data.schedules.is_empty());
    assert_eq!(response.data.weekly_schedules.len(), 5);
}

#[tokio::test]
async fn test_generate_and_store_persists_sessions() {
    let (_temp_file, db_path) = seeded_db();
    let store = Arc::new(SqliteScheduleRepository::new(&db_path).unwrap());
    let api = build_api(&db_path).await.with_store(store.clone());

    let response = api.generate_and_store(Some("1st semester")).unwrap();

    assert_eq!(response.data.summary.schedules_saved, response.data.schedules.len());
    assert_eq!(store.list_all().unwrap(), response.data.schedules);
}

#[tokio::test]
async fn test_generate_and_store_without_store_fails() {
    let (_temp_file, db_path) = seeded_db();
    let api = build_api(&db_path).await;

    assert!(matches!(
        api.generate_and_store(None),
        Err(ApiError::InternalError(_))
    ));
}

#[tokio::test]
async fn test_unreadable_catalog_is_data_unavailable() {
    let temp_file = NamedTempFile::new().unwrap();
    let db_path = temp_file.path().to_str().unwrap().to_string();
    let orchestrator = AllocationOrchestrator::new(Default::default()).unwrap();
    let api = ScheduleApi::new(
        Arc::new(SqliteCatalogRepository::new(&db_path).unwrap()),
        orchestrator,
    );

    assert!(matches!(api.generate(None), Err(ApiError::DataUnavailable(_))));
}

#[tokio::test]
async fn test_health_reports_grid() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = build_api(&db_path).await;

    let health = api.health();
    assert_eq!(health.status, "ok");
    assert_eq!(health.slot_count, 5);
}

// ==========================================
// 仓储层集成测试
// ==========================================
// 测试目标: 目录快照读取与排课结果整表替换
// ==========================================

mod helpers;

use std::sync::{Arc, Mutex};

use course_timetable_engine::config::SchedulerConfig;
use course_timetable_engine::engine::AllocationOrchestrator;
use course_timetable_engine::repository::{
    CatalogReader, ScheduleStore, SqliteCatalogRepository, SqliteScheduleRepository,
};
use helpers::catalog_builder::{demo_catalog, CatalogBuilder};
use test_helpers::{create_test_db, insert_catalog, open_test_connection};

#[test]
fn test_catalog_snapshot_matches_inserted_rows() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let expected = demo_catalog();
    insert_catalog(&open_test_connection(&db_path).unwrap(), &expected).unwrap();

    let repo = SqliteCatalogRepository::new(&db_path).unwrap();
    let loaded = repo.load_catalog(None).unwrap();

    assert_eq!(loaded.programs, expected.programs);
    assert_eq!(loaded.rooms, expected.rooms);
    assert_eq!(loaded.faculty, expected.faculty);
    assert_eq!(loaded.courses, expected.courses);
    assert_eq!(loaded.sections, expected.sections);
}

#[test]
fn test_semester_filter_at_load_time() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let catalog = CatalogBuilder::new()
        .semester("1st Semester")
        .major(1, "IT101", 1, 1)
        .semester("2nd Semester")
        .major(2, "IT102", 1, 1)
        .section(1, 1, 1)
        .build();
    insert_catalog(&open_test_connection(&db_path).unwrap(), &catalog).unwrap();

    let repo = SqliteCatalogRepository::new(&db_path).unwrap();
    let second = repo.load_courses(Some("2ND semester")).unwrap();

    assert_eq!(second.len(), 1);
    assert_eq!(second[0].course_code, "IT102");
    assert_eq!(repo.load_courses(None).unwrap().len(), 2);
}

#[test]
fn test_missing_tables_surface_as_error() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let repo = SqliteCatalogRepository::new(temp_file.path().to_str().unwrap()).unwrap();

    assert!(repo.load_catalog(None).is_err());
}

#[test]
fn test_replace_all_overwrites_previous_run() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = Arc::new(Mutex::new(open_test_connection(&db_path).unwrap()));
    let store = SqliteScheduleRepository::from_connection(conn);

    let catalog = demo_catalog();
    let result = AllocationOrchestrator::new(SchedulerConfig::default())
        .unwrap()
        .generate(&catalog, None);
    assert!(!result.schedules.is_empty());

    let saved = store.replace_all(&result.schedules).unwrap();
    assert_eq!(saved, result.schedules.len());
    assert_eq!(store.list_all().unwrap(), result.schedules);

    let subset = &result.schedules[..2];
    store.replace_all(subset).unwrap();
    assert_eq!(store.list_all().unwrap(), subset.to_vec());

    store.replace_all(&[]).unwrap();
    assert!(store.list_all().unwrap().is_empty());
}

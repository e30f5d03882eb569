// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证排课参数读取、默认值回退与启动校验
// ==========================================


use chrono::NaiveTime;
use course_timetable_engine::config::{
    config_keys, ConfigError, ConfigManager, SchedulerConfig, SchedulerConfigReader,
};
use test_helpers::{create_test_db, insert_config, open_test_connection};

#[tokio::test]
async fn test_empty_table_yields_defaults() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    let config = config_manager.load_scheduler_config().await.unwrap();
    assert_eq!(config, SchedulerConfig::default());
    assert!(!config.rollback_partial_assignments);
}

#[tokio::test]
async fn test_stored_values_override_defaults() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).unwrap();
    insert_config(&conn, config_keys::DAY_START, "08:00").unwrap();
    insert_config(&conn, config_keys::SLOT_MINUTES, "60").unwrap();
    insert_config(&conn, config_keys::PERMANENT_COURSE_LIMIT, "8").unwrap();
    insert_config(&conn, config_keys::ROLLBACK_PARTIAL_ASSIGNMENTS, "true").unwrap();

    let config_manager = ConfigManager::new(&db_path).unwrap();
    let config = config_manager.load_scheduler_config().await.unwrap();

    assert_eq!(config.day_start, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
    assert_eq!(config.slot_minutes, 60);
    assert_eq!(config.permanent_course_limit, 8);
    assert_eq!(config.other_course_limit, 5);
    assert!(config.rollback_partial_assignments);
}

#[tokio::test]
async fn test_set_config_value_upserts() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).unwrap();

    config_manager.set_config_value(config_keys::BATCH_SIZE, "10").unwrap();
    config_manager.set_config_value(config_keys::BATCH_SIZE, "20").unwrap();

    assert_eq!(config_manager.get_batch_size().await.unwrap(), 20);
    let snapshot: serde_json::Value =
        serde_json::from_str(&config_manager.get_config_snapshot().unwrap()).unwrap();
    assert_eq!(snapshot["batch_size"], "20");
}

#[tokio::test]
async fn test_malformed_value_is_an_error() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).unwrap();
    insert_config(&conn, config_keys::SLOT_MINUTES, "ninety").unwrap();

    let config_manager = ConfigManager::new(&db_path).unwrap();
    let err = config_manager.load_scheduler_config().await.unwrap_err();

    assert!(matches!(err, ConfigError::UnparsableValue { .. }));
}

#[tokio::test]
async fn test_negative_duration_fails_validation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).unwrap();
    insert_config(&conn, config_keys::SLOT_MINUTES, "-30").unwrap();

    let config_manager = ConfigManager::new(&db_path).unwrap();
    let err = config_manager.load_scheduler_config().await.unwrap_err();

    assert_eq!(err, ConfigError::NonPositiveSlotDuration(-30));
}

#[tokio::test]
async fn test_inverted_day_window_fails_validation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).unwrap();
    insert_config(&conn, config_keys::DAY_END, "07:00").unwrap();

    let config_manager = ConfigManager::new(&db_path).unwrap();
    let err = config_manager.load_scheduler_config().await.unwrap_err();

    assert!(matches!(err, ConfigError::InvalidDayWindow { .. }));
}

#[tokio::test]
async fn test_oversized_slot_duration_fails_validation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).unwrap();
    insert_config(&conn, config_keys::SLOT_MINUTES, "9223372036854775807").unwrap();

    let config_manager = ConfigManager::new(&db_path).unwrap();
    let err = config_manager.load_scheduler_config().await.unwrap_err();

    assert_eq!(
        err,
        ConfigError::SlotDurationTooLong {
            slot_minutes: i64::MAX,
            window_minutes: 630,
        }
    );
}

// ==========================================
// 课程排课系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供目录表 / 排课结果表 / 配置表的建表语句
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS program (
            program_id INTEGER PRIMARY KEY,
            program_code TEXT NOT NULL,
            program_name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS room (
            room_id INTEGER PRIMARY KEY,
            room_name TEXT NOT NULL,
            room_type TEXT NOT NULL,
            capacity INTEGER NOT NULL DEFAULT 0,
            program_id INTEGER REFERENCES program(program_id)
        );

        CREATE TABLE IF NOT EXISTS faculty (
            faculty_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            employment_type TEXT NOT NULL,
            specialization TEXT,
            program_id INTEGER REFERENCES program(program_id)
        );

        CREATE TABLE IF NOT EXISTS course (
            course_id INTEGER PRIMARY KEY,
            course_code TEXT NOT NULL,
            title TEXT NOT NULL,
            units INTEGER NOT NULL DEFAULT 0,
            course_type TEXT NOT NULL,
            year_level INTEGER NOT NULL,
            semester TEXT,
            program_id INTEGER NOT NULL REFERENCES program(program_id)
        );

        CREATE TABLE IF NOT EXISTS section (
            section_id INTEGER PRIMARY KEY,
            section_name TEXT NOT NULL,
            program_id INTEGER NOT NULL REFERENCES program(program_id),
            year_level INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS generated_schedule (
            schedule_id INTEGER PRIMARY KEY AUTOINCREMENT,
            course_id INTEGER NOT NULL,
            course_code TEXT NOT NULL,
            course_title TEXT NOT NULL,
            section_id INTEGER NOT NULL,
            section_name TEXT NOT NULL,
            program_id INTEGER NOT NULL,
            faculty_id INTEGER NOT NULL,
            faculty_name TEXT NOT NULL,
            room_id INTEGER NOT NULL,
            room_name TEXT NOT NULL,
            day TEXT NOT NULL,
            time_start TEXT NOT NULL,
            time_end TEXT NOT NULL,
            delivery_mode TEXT NOT NULL,
            equivalent_units INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 默认数据库路径
///
/// 优先读取环境变量 COURSE_TIMETABLE_DB_PATH，否则使用用户数据目录
pub fn default_db_path() -> String {
    if let Ok(path) = std::env::var("COURSE_TIMETABLE_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    match dirs::data_dir() {
        Some(data_dir) => data_dir
            .join("course-timetable")
            .join("course_timetable.db")
            .to_string_lossy()
            .to_string(),
        None => "./course_timetable.db".to_string(),
    }
}

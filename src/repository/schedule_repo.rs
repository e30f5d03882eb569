// ==========================================
// 课程排课系统 - 排课结果仓储
// ==========================================
// 职责: generated_schedule 表的整表替换与读取
// 红线: 替换在单个事务内完成，失败不留半截数据
// ==========================================

use crate::domain::schedule::ScheduledSession;
use crate::domain::time_slot::{format_hhmm, parse_hhmm};
use crate::domain::types::{DeliveryMode, Weekday};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use tracing::info;

/// 排课结果存储接口
pub trait ScheduleStore: Send + Sync {
    /// 删除旧结果并写入新结果，返回写入条数
    fn replace_all(&self, sessions: &[ScheduledSession]) -> RepositoryResult<usize>;

    fn list_all(&self) -> RepositoryResult<Vec<ScheduledSession>>;
}

pub struct SqliteScheduleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteScheduleRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

/// 数据库行的原始文本字段
struct RawSessionRow {
    session: ScheduledSession,
    day: String,
    time_start: String,
    time_end: String,
    delivery_mode: String,
}

fn field_error(field: &str, value: &str) -> RepositoryError {
    RepositoryError::FieldValueError {
        field: field.to_string(),
        message: format!("无法解析的值: {}", value),
    }
}

impl RawSessionRow {
    fn into_session(self) -> RepositoryResult<ScheduledSession> {
        let mut session = self.session;
        session.day = Weekday::from_code(&self.day).ok_or_else(|| field_error("day", &self.day))?;
        session.time_start =
            parse_hhmm(&self.time_start).ok_or_else(|| field_error("time_start", &self.time_start))?;
        session.time_end =
            parse_hhmm(&self.time_end).ok_or_else(|| field_error("time_end", &self.time_end))?;
        session.delivery_mode = DeliveryMode::parse(&self.delivery_mode)
            .ok_or_else(|| field_error("delivery_mode", &self.delivery_mode))?;
        Ok(session)
    }
}

impl ScheduleStore for SqliteScheduleRepository {
    fn replace_all(&self, sessions: &[ScheduledSession]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let removed = tx.execute("DELETE FROM generated_schedule", [])?;
        for session in sessions {
            tx.execute(
                r#"INSERT INTO generated_schedule (
                    course_id, course_code, course_title,
                    section_id, section_name, program_id,
                    faculty_id, faculty_name, room_id, room_name,
                    day, time_start, time_end, delivery_mode, equivalent_units
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
                params![
                    session.course_id,
                    &session.course_code,
                    &session.course_title,
                    session.section_id,
                    &session.section_name,
                    session.program_id,
                    session.faculty_id,
                    &session.faculty_name,
                    session.room_id,
                    &session.room_name,
                    session.day.code(),
                    format_hhmm(session.time_start),
                    format_hhmm(session.time_end),
                    session.delivery_mode.as_str(),
                    session.equivalent_units,
                ],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        info!(removed, saved = sessions.len(), "排课结果已替换");
        Ok(sessions.len())
    }

    fn list_all(&self) -> RepositoryResult<Vec<ScheduledSession>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT course_id, course_code, course_title,
                   section_id, section_name, program_id,
                   faculty_id, faculty_name, room_id, room_name,
                   day, time_start, time_end, delivery_mode, equivalent_units
            FROM generated_schedule
            ORDER BY schedule_id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RawSessionRow {
                session: ScheduledSession {
                    course_id: row.get(0)?,
                    course_code: row.get(1)?,
                    course_title: row.get(2)?,
                    section_id: row.get(3)?,
                    section_name: row.get(4)?,
                    program_id: row.get(5)?,
                    faculty_id: row.get(6)?,
                    faculty_name: row.get(7)?,
                    room_id: row.get(8)?,
                    room_name: row.get(9)?,
                    time_start: chrono::NaiveTime::MIN,
                    time_end: chrono::NaiveTime::MIN,
                    day: Weekday::Monday,
                    delivery_mode: DeliveryMode::FaceToFace,
                    equivalent_units: row.get(14)?,
                },
                day: row.get(10)?,
                time_start: row.get(11)?,
                time_end: row.get(12)?,
                delivery_mode: row.get(13)?,
            })
        })?;

        let sessions = rows
            .map(|row| row.map_err(RepositoryError::from).and_then(RawSessionRow::into_session))
            .collect::<RepositoryResult<Vec<_>>>()?;
        Ok(sessions)
    }
}

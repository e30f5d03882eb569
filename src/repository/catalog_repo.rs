// ==========================================
// 课程排课系统 - 目录数据仓储
// ==========================================
// 职责: 读取 program / room / faculty / course / section 表
// 红线: Repository 不含排课逻辑，只做字段归一化
// ==========================================

use crate::domain::catalog::{Catalog, Course, Faculty, Program, Room, Section};
use crate::domain::types::{CourseType, EmploymentType, RoomType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

// ==========================================
// CatalogReader - 目录快照读取接口
// ==========================================
/// 引擎只依赖该接口，不关心数据来自哪里
pub trait CatalogReader: Send + Sync {
    fn load_programs(&self) -> RepositoryResult<Vec<Program>>;

    fn load_rooms(&self) -> RepositoryResult<Vec<Room>>;

    fn load_faculty(&self) -> RepositoryResult<Vec<Faculty>>;

    /// semester 为 None 时返回全部课程；否则按学期名大小写不敏感完全匹配
    fn load_courses(&self, semester: Option<&str>) -> RepositoryResult<Vec<Course>>;

    fn load_sections(&self) -> RepositoryResult<Vec<Section>>;

    /// 一次性读取完整目录快照
    fn load_catalog(&self, semester: Option<&str>) -> RepositoryResult<Catalog> {
        let catalog = Catalog {
            programs: self.load_programs()?,
            rooms: self.load_rooms()?,
            faculty: self.load_faculty()?,
            courses: self.load_courses(semester)?,
            sections: self.load_sections()?,
        };
        info!(
            programs = catalog.programs.len(),
            rooms = catalog.rooms.len(),
            faculty = catalog.faculty.len(),
            courses = catalog.courses.len(),
            sections = catalog.sections.len(),
            "目录快照已加载"
        );
        Ok(catalog)
    }
}

// ==========================================
// SqliteCatalogRepository
// ==========================================
pub struct SqliteCatalogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCatalogRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl CatalogReader for SqliteCatalogRepository {
    fn load_programs(&self) -> RepositoryResult<Vec<Program>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT program_id, program_code, program_name FROM program ORDER BY program_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Program {
                program_id: row.get(0)?,
                program_code: row.get(1)?,
                program_name: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn load_rooms(&self) -> RepositoryResult<Vec<Room>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT room_id, room_name, room_type, capacity, program_id
            FROM room
            ORDER BY room_id
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            let raw_type: String = row.get(2)?;
            Ok((
                Room {
                    room_id: row.get(0)?,
                    room_name: row.get(1)?,
                    room_type: RoomType::Tba,
                    capacity: row.get(3)?,
                    program_id: row.get(4)?,
                },
                raw_type,
            ))
        })?;

        let mut rooms = Vec::new();
        for row in rows {
            let (mut room, raw_type) = row?;
            room.room_type = match RoomType::parse(&raw_type) {
                Some(room_type) => room_type,
                None => {
                    warn!(
                        room_id = room.room_id,
                        room_type = %raw_type,
                        "未知教室类型，按 tba 处理"
                    );
                    RoomType::Tba
                }
            };
            rooms.push(room);
        }
        Ok(rooms)
    }

    fn load_faculty(&self) -> RepositoryResult<Vec<Faculty>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT faculty_id, name, employment_type, specialization, program_id
            FROM faculty
            ORDER BY faculty_id
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Faculty {
                faculty_id: row.get(0)?,
                name: row.get(1)?,
                employment_type: EmploymentType::from_free_text(&row.get::<_, String>(2)?),
                specialization: row
                    .get::<_, Option<String>>(3)?
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()),
                program_id: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn load_courses(&self, semester: Option<&str>) -> RepositoryResult<Vec<Course>> {
        let conn = self.get_conn()?;
        let semester = semester.map(str::trim).filter(|s| !s.is_empty());

        let mut stmt = conn.prepare(
            r#"
            SELECT course_id, course_code, title, units, course_type, year_level, semester, program_id
            FROM course
            WHERE ?1 IS NULL OR LOWER(TRIM(semester)) = LOWER(?1)
            ORDER BY course_id
            "#,
        )?;
        let rows = stmt.query_map(params![semester], |row| {
            Ok(Course {
                course_id: row.get(0)?,
                course_code: row.get::<_, String>(1)?.trim().to_string(),
                title: row.get(2)?,
                units: row.get(3)?,
                course_type: CourseType::from_free_text(&row.get::<_, String>(4)?),
                year_level: row.get(5)?,
                semester: row.get(6)?,
                program_id: row.get(7)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn load_sections(&self) -> RepositoryResult<Vec<Section>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT section_id, section_name, program_id, year_level
            FROM section
            ORDER BY section_id
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Section {
                section_id: row.get(0)?,
                section_name: row.get(1)?,
                program_id: row.get(2)?,
                year_level: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> SqliteCatalogRepository {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO program VALUES (1, 'BSIT', 'Information Technology');
            INSERT INTO room VALUES (1, 'Lab A', 'Laboratory', 40, 1);
            INSERT INTO room VALUES (2, 'Court', 'gym', 200, NULL);
            INSERT INTO faculty VALUES (1, 'Santos', 'Full-Time', 'IT101', 1);
            INSERT INTO faculty VALUES (2, 'Reyes', 'Affiliate', '  ', NULL);
            INSERT INTO course VALUES (1, 'IT101', 'Programming', 3, 'Major', 1, '1st Semester', 1);
            INSERT INTO course VALUES (2, 'GE101', 'Ethics', 3, 'Minor', 1, '2nd Semester', 1);
            INSERT INTO section VALUES (1, 'BSIT 1A', 1, 1);
            "#,
        )
        .unwrap();
        SqliteCatalogRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_rooms_are_normalized() {
        let rooms = setup().load_rooms().unwrap();
        assert_eq!(rooms[0].room_type, RoomType::Laboratory);
        assert_eq!(rooms[1].room_type, RoomType::Tba);
    }

    #[test]
    fn test_faculty_are_normalized() {
        let faculty = setup().load_faculty().unwrap();
        assert_eq!(faculty[0].employment_type, EmploymentType::Permanent);
        assert_eq!(faculty[1].employment_type, EmploymentType::Affiliate);
        assert_eq!(faculty[1].specialization, None);
    }

    #[test]
    fn test_courses_filtered_by_semester_case_insensitive() {
        let repo = setup();
        assert_eq!(repo.load_courses(None).unwrap().len(), 2);

        let first = repo.load_courses(Some("1ST SEMESTER")).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].course_type, CourseType::Major);

        assert!(repo.load_courses(Some("Summer")).unwrap().is_empty());
    }
}

// ==========================================
// 课程排课系统 - 基础目录实体
// ==========================================
// 教室 / 教师 / 课程 / 班级 / 专业
// 红线: 每次排课运行期间只读，加载后不再修改
// ==========================================

use crate::domain::types::{CourseType, EmploymentType, RoomType};
use serde::{Deserialize, Serialize};

// ==========================================
// Program - 专业
// ==========================================
// 仅用于亲和度匹配（教师/教室所属专业）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub program_id: i64,
    pub program_code: String,
    pub program_name: String,
}

// ==========================================
// Room - 教室
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub room_id: i64,
    pub room_name: String,
    pub room_type: RoomType,
    pub capacity: i64,
    pub program_id: Option<i64>, // None = 公共教室
}

impl Room {
    /// 系统兜底线上教室（目录中没有 online 类型教室时使用）
    pub fn fallback_online() -> Self {
        Self {
            room_id: 0,
            room_name: "Online".to_string(),
            room_type: RoomType::Online,
            capacity: 0,
            program_id: None,
        }
    }

    pub fn is_online(&self) -> bool {
        self.room_type == RoomType::Online
    }
}

// ==========================================
// Faculty - 教师
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub faculty_id: i64,
    pub name: String,
    pub employment_type: EmploymentType,
    pub specialization: Option<String>, // 课程代码子串匹配
    pub program_id: Option<i64>,
}

impl Faculty {
    /// 是否具备专长
    pub fn has_specialization(&self) -> bool {
        self.specialization
            .as_deref()
            .map(|s| !s.trim().is_empty())
            .unwrap_or(false)
    }

    /// 专长匹配: 课程代码（大写）是专长字符串（大写）的子串
    ///
    /// 空专长永不匹配
    pub fn is_specialized_for(&self, course: &Course) -> bool {
        let spec = match self.specialization.as_deref() {
            Some(s) if !s.trim().is_empty() => s.to_uppercase(),
            _ => return false,
        };
        let code = course.course_code.trim().to_uppercase();
        !code.is_empty() && spec.contains(&code)
    }
}

// ==========================================
// Course - 课程
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: i64,
    pub course_code: String,
    pub title: String,
    pub units: i64,
    pub course_type: CourseType,
    pub year_level: i64,
    pub semester: Option<String>,
    pub program_id: i64,
}

// ==========================================
// Section - 班级
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub section_id: i64,
    pub section_name: String,
    pub program_id: i64,
    pub year_level: i64,
}

// ==========================================
// Catalog - 单次运行的目录快照
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub programs: Vec<Program>,
    pub rooms: Vec<Room>,
    pub faculty: Vec<Faculty>,
    pub courses: Vec<Course>,
    pub sections: Vec<Section>,
}

impl Catalog {
    /// 目录中第一间线上教室；没有则返回兜底教室
    pub fn online_room(&self) -> Room {
        self.rooms
            .iter()
            .find(|r| r.is_online())
            .cloned()
            .unwrap_or_else(Room::fallback_online)
    }

    /// 按学期过滤课程（大小写不敏感的完全匹配）
    ///
    /// semester 为 None 时返回全部课程
    pub fn courses_in_semester(&self, semester: Option<&str>) -> Vec<&Course> {
        match semester.map(str::trim).filter(|s| !s.is_empty()) {
            None => self.courses.iter().collect(),
            Some(wanted) => self
                .courses
                .iter()
                .filter(|c| {
                    c.semester
                        .as_deref()
                        .map(|s| s.trim().eq_ignore_ascii_case(wanted))
                        .unwrap_or(false)
                })
                .collect(),
        }
    }

    pub fn faculty_by_id(&self, faculty_id: i64) -> Option<&Faculty> {
        self.faculty.iter().find(|f| f.faculty_id == faculty_id)
    }
}

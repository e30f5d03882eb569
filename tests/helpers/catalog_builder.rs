// ==========================================
// 目录数据构建器 - 用于集成测试
// ==========================================

use course_timetable_engine::domain::types::{CourseType, EmploymentType, RoomType};
use course_timetable_engine::domain::{Catalog, Course, Faculty, Program, Room, Section};
use std::collections::BTreeSet;

// ==========================================
// CatalogBuilder
// ==========================================

#[derive(Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
    semester: Option<String>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 之后添加的课程都带该学期标签
    pub fn semester(mut self, semester: &str) -> Self {
        self.semester = Some(semester.to_string());
        self
    }

    pub fn room(mut self, id: i64, room_type: RoomType, capacity: i64, program_id: Option<i64>) -> Self {
        self.catalog.rooms.push(Room {
            room_id: id,
            room_name: format!("{} {}", room_type, id),
            room_type,
            capacity,
            program_id,
        });
        self
    }

    pub fn lab(self, id: i64, capacity: i64) -> Self {
        self.room(id, RoomType::Laboratory, capacity, None)
    }

    pub fn lecture(self, id: i64, capacity: i64) -> Self {
        self.room(id, RoomType::Lecture, capacity, None)
    }

    pub fn online_room(self, id: i64) -> Self {
        self.room(id, RoomType::Online, 0, None)
    }

    pub fn faculty(
        mut self,
        id: i64,
        employment_type: EmploymentType,
        specialization: Option<&str>,
        program_id: Option<i64>,
    ) -> Self {
        self.catalog.faculty.push(Faculty {
            faculty_id: id,
            name: format!("Faculty {}", id),
            employment_type,
            specialization: specialization.map(str::to_string),
            program_id,
        });
        self
    }

    pub fn course(mut self, id: i64, code: &str, course_type: CourseType, year_level: i64, program_id: i64) -> Self {
        self.catalog.courses.push(Course {
            course_id: id,
            course_code: code.to_string(),
            title: format!("{} title", code),
            units: 3,
            course_type,
            year_level,
            semester: self.semester.clone(),
            program_id,
        });
        self
    }

    pub fn major(self, id: i64, code: &str, year_level: i64, program_id: i64) -> Self {
        self.course(id, code, CourseType::Major, year_level, program_id)
    }

    pub fn minor(self, id: i64, code: &str, year_level: i64, program_id: i64) -> Self {
        self.course(id, code, CourseType::Minor, year_level, program_id)
    }

    pub fn section(mut self, id: i64, program_id: i64, year_level: i64) -> Self {
        self.catalog.sections.push(Section {
            section_id: id,
            section_name: format!("SEC-{}", id),
            program_id,
            year_level,
        });
        self
    }

    /// 自动补齐所有被引用的专业
    pub fn build(mut self) -> Catalog {
        let mut referenced: BTreeSet<i64> = BTreeSet::new();
        referenced.extend(self.catalog.rooms.iter().filter_map(|r| r.program_id));
        referenced.extend(self.catalog.faculty.iter().filter_map(|f| f.program_id));
        referenced.extend(self.catalog.courses.iter().map(|c| c.program_id));
        referenced.extend(self.catalog.sections.iter().map(|s| s.program_id));

        let known: BTreeSet<i64> = self.catalog.programs.iter().map(|p| p.program_id).collect();
        for program_id in referenced.difference(&known) {
            self.catalog.programs.push(Program {
                program_id: *program_id,
                program_code: format!("P{}", program_id),
                program_name: format!("Program {}", program_id),
            });
        }
        self.catalog.programs.sort_by_key(|p| p.program_id);
        self.catalog
    }
}

/// 两个专业、五个班级的中等规模目录
pub fn demo_catalog() -> Catalog {
    CatalogBuilder::new()
        .semester("1st Semester")
        .room(1, RoomType::Laboratory, 40, Some(1))
        .room(2, RoomType::Laboratory, 35, Some(1))
        .room(3, RoomType::Laboratory, 40, Some(2))
        .lab(4, 30)
        .lecture(5, 50)
        .lecture(6, 45)
        .online_room(7)
        .room(8, RoomType::Field, 200, None)
        .faculty(1, EmploymentType::Permanent, Some("IT101, IT102, IT201"), Some(1))
        .faculty(2, EmploymentType::Permanent, Some("CS101, CS102, CS201"), Some(2))
        .faculty(3, EmploymentType::PartTime, Some("IT202, CS202"), Some(1))
        .faculty(4, EmploymentType::Affiliate, Some("GE101, GE102"), None)
        .faculty(5, EmploymentType::Affiliate, None, None)
        .faculty(6, EmploymentType::PartTime, None, Some(2))
        .faculty(7, EmploymentType::Permanent, None, Some(1))
        .major(1, "IT101", 1, 1)
        .major(2, "IT102", 1, 1)
        .minor(3, "GE101", 1, 1)
        .major(4, "IT201", 2, 1)
        .major(5, "IT202", 2, 1)
        .minor(6, "GE102", 2, 1)
        .major(7, "CS101", 1, 2)
        .major(8, "CS102", 1, 2)
        .minor(9, "GE101", 1, 2)
        .major(10, "CS201", 2, 2)
        .major(11, "CS202", 2, 2)
        .section(1, 1, 1)
        .section(2, 1, 1)
        .section(3, 1, 2)
        .section(4, 2, 1)
        .section(5, 2, 2)
        .build()
}

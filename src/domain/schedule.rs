// ==========================================
// 课程排课系统 - 排课结果模型
// ==========================================
// 输出两种视图:
// 1) 扁平课次列表 schedules（供外部落库）
// 2) 按班级的周课表 weekly_schedules（供展示）
// ==========================================

use crate::domain::catalog::{Course, Faculty, Room, Section};
use crate::domain::time_slot::{hhmm, TimeSlot};
use crate::domain::types::{DeliveryMode, Weekday};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// ScheduledSession - 单个课次
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSession {
    pub course_id: i64,
    pub course_code: String,
    pub course_title: String,
    pub section_id: i64,
    pub section_name: String,
    pub program_id: i64,
    pub faculty_id: i64,
    pub faculty_name: String,
    pub room_id: i64,
    pub room_name: String,
    #[serde(with = "hhmm")]
    pub time_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub time_end: NaiveTime,
    pub day: Weekday,
    pub delivery_mode: DeliveryMode,
    pub equivalent_units: i64,
}

impl ScheduledSession {
    pub fn new(
        course: &Course,
        section: &Section,
        faculty: &Faculty,
        room: &Room,
        day: Weekday,
        slot: TimeSlot,
        mode: DeliveryMode,
    ) -> Self {
        Self {
            course_id: course.course_id,
            course_code: course.course_code.clone(),
            course_title: course.title.clone(),
            section_id: section.section_id,
            section_name: section.section_name.clone(),
            program_id: section.program_id,
            faculty_id: faculty.faculty_id,
            faculty_name: faculty.name.clone(),
            room_id: room.room_id,
            room_name: room.room_name.clone(),
            time_start: slot.start,
            time_end: slot.end,
            day,
            delivery_mode: mode,
            equivalent_units: course.units,
        }
    }

    pub fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.time_start, self.time_end)
    }
}

// ==========================================
// 周课表视图
// ==========================================

/// 某班级某天的课次（按授课方式分组）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySessions {
    pub face_to_face: Vec<ScheduledSession>,
    pub online: Vec<ScheduledSession>,
}

/// 班级周课表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionWeeklySchedule {
    pub section_name: String,
    pub year_level: i64,
    pub program_id: i64,
    /// 按星期代码平铺在班级字段旁
    #[serde(flatten)]
    pub days: BTreeMap<Weekday, DaySessions>,
}

impl SectionWeeklySchedule {
    /// 五天全部预置为空
    pub fn new(section: &Section) -> Self {
        Self {
            section_name: section.section_name.clone(),
            year_level: section.year_level,
            program_id: section.program_id,
            days: Weekday::ALL
                .iter()
                .map(|d| (*d, DaySessions::default()))
                .collect(),
        }
    }

    pub fn push(&mut self, session: ScheduledSession) {
        let day = self.days.entry(session.day).or_default();
        match session.delivery_mode {
            DeliveryMode::FaceToFace => day.face_to_face.push(session),
            DeliveryMode::Online => day.online.push(session),
        }
    }

    pub fn session_count(&self) -> usize {
        self.days
            .values()
            .map(|d| d.face_to_face.len() + d.online.len())
            .sum()
    }
}

// ==========================================
// GenerationSummary - 运行摘要
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LunchBreak {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub semester: String,
    pub total_sections: usize,
    pub total_courses: usize,
    pub total_faculty: usize,
    pub total_pairs: usize,
    pub successful_assignments: usize,
    pub failed_pairs: usize,
    pub failed_attempts_by_reason: BTreeMap<String, usize>,
    pub assignments_by_phase: BTreeMap<String, usize>,
    pub weekdays_covered: Vec<Weekday>,
    pub time_slots: Vec<TimeSlot>,
    pub lunch_break: LunchBreak,
    pub conflict_free: bool,
    pub schedules_saved: usize,
}

// ==========================================
// GenerationResult - 一次 generate 的完整输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub weekly_schedules: BTreeMap<i64, SectionWeeklySchedule>,
    pub schedules: Vec<ScheduledSession>,
    pub summary: GenerationSummary,
}

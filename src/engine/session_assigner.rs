// ==========================================
// 课程排课系统 - 课次分配器
// ==========================================
// 输入: (课程, 班级, 教师) + 候选教室列表
// 输出: 一次面授 + 一次线上（两者都成功才算分配成功）
// ==========================================
// 落位规则:
// - 起始星期 = (section_id + course_id + 方式偏移) mod 5，面授偏移 0，线上偏移 3
// - 从起始星期轮转查找，跳过禁用日；每天按时间顺序取第一个无冲突时段
// - 线上课禁止与面授课同一天
// 部分提交: 线上失败时默认保留面授占用（不回滚），可通过配置开启回滚
// ==========================================

use crate::domain::catalog::{Course, Faculty, Room, Section};
use crate::domain::schedule::ScheduledSession;
use crate::domain::time_slot::TimeSlot;
use crate::domain::types::{DeliveryMode, Weekday};
use crate::engine::error::PlacementError;
use crate::engine::run_state::RunState;
use tracing::debug;

pub struct SessionAssigner<'a> {
    slots: &'a [TimeSlot],
    rollback_partial: bool,
}

impl<'a> SessionAssigner<'a> {
    pub fn new(slots: &'a [TimeSlot], rollback_partial: bool) -> Self {
        Self {
            slots,
            rollback_partial,
        }
    }

    /// 起始星期索引
    ///
    /// 各项先取模再相加，任意 i64 id 都不会溢出
    pub fn start_day_index(section_id: i64, course_id: i64, mode: DeliveryMode) -> i64 {
        let days = Weekday::ALL.len() as i64;
        (section_id.rem_euclid(days) + course_id.rem_euclid(days) + mode.day_offset().rem_euclid(days))
            .rem_euclid(days)
    }

    /// 从起始星期开始的轮转顺序
    pub fn day_order(section_id: i64, course_id: i64, mode: DeliveryMode) -> Vec<Weekday> {
        let start = Self::start_day_index(section_id, course_id, mode);
        (0..Weekday::ALL.len() as i64)
            .map(|offset| Weekday::from_index(start + offset))
            .collect()
    }

    /// 为单个课次查找并提交一个 (星期, 时段)
    ///
    /// # 返回
    /// - Some((day, slot)): 已写入冲突台账
    /// - None: 所有星期/时段均冲突或被禁用
    pub fn place_session(
        &self,
        state: &mut RunState,
        course: &Course,
        section: &Section,
        faculty: &Faculty,
        room: &Room,
        mode: DeliveryMode,
        forbidden_day: Option<Weekday>,
    ) -> Option<(Weekday, TimeSlot)> {
        for day in Self::day_order(section.section_id, course.course_id, mode) {
            if Some(day) == forbidden_day {
                continue;
            }

            let free = self.slots.iter().find(|slot| {
                !state
                    .ledger
                    .conflicts(faculty.faculty_id, room, section.section_id, day, slot)
            });

            if let Some(slot) = free {
                state
                    .ledger
                    .commit(faculty.faculty_id, room, section.section_id, day, *slot);
                return Some((day, *slot));
            }
        }
        None
    }

    /// 为 (课程, 班级, 教师) 安排面授 + 线上两次课
    ///
    /// 成功时返回两条课次记录（尚未写入结果，由编排器统一登记）
    #[allow(clippy::too_many_arguments)]
    pub fn assign_pair(
        &self,
        state: &mut RunState,
        course: &Course,
        section: &Section,
        faculty: &Faculty,
        candidate_rooms: &[&Room],
        online_room: &Room,
    ) -> Result<Vec<ScheduledSession>, PlacementError> {
        if candidate_rooms.is_empty() {
            return Err(PlacementError::NoEligibleRoom);
        }

        // 1. 面授：依次尝试候选教室
        let mut face_to_face = None;
        for room in candidate_rooms {
            if let Some((day, slot)) = self.place_session(
                state,
                course,
                section,
                faculty,
                room,
                DeliveryMode::FaceToFace,
                None,
            ) {
                state.record_room_usage(section.program_id, room.room_id);
                face_to_face = Some((*room, day, slot));
                break;
            }
        }

        let Some((f2f_room, f2f_day, f2f_slot)) = face_to_face else {
            return Err(PlacementError::NoAvailableSlot {
                mode: DeliveryMode::FaceToFace,
            });
        };

        // 2. 线上：禁止与面授同日
        let online = self.place_session(
            state,
            course,
            section,
            faculty,
            online_room,
            DeliveryMode::Online,
            Some(f2f_day),
        );

        let Some((online_day, online_slot)) = online else {
            if self.rollback_partial {
                state
                    .ledger
                    .release(faculty.faculty_id, f2f_room, section.section_id, f2f_day, &f2f_slot);
                state.release_room_usage(section.program_id, f2f_room.room_id);
            }
            debug!(
                course_code = %course.course_code,
                section_id = section.section_id,
                faculty_id = faculty.faculty_id,
                rolled_back = self.rollback_partial,
                "线上课落位失败，放弃该课程对"
            );
            return Err(PlacementError::NoAvailableSlot {
                mode: DeliveryMode::Online,
            });
        };

        debug!(
            course_code = %course.course_code,
            section_id = section.section_id,
            faculty_id = faculty.faculty_id,
            room_id = f2f_room.room_id,
            f2f = %format!("{} {}", f2f_day, f2f_slot),
            online = %format!("{} {}", online_day, online_slot),
            "课程对分配成功"
        );

        Ok(vec![
            ScheduledSession::new(
                course,
                section,
                faculty,
                f2f_room,
                f2f_day,
                f2f_slot,
                DeliveryMode::FaceToFace,
            ),
            ScheduledSession::new(
                course,
                section,
                faculty,
                online_room,
                online_day,
                online_slot,
                DeliveryMode::Online,
            ),
        ])
    }
}

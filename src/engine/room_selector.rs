// ==========================================
// 课程排课系统 - 教室候选列表
// ==========================================
// 输入: 班级专业 + 课程类型 + 专业教室使用量
// 输出: 按优先级排序的候选教室（由课次分配器依次尝试）
// ==========================================
// 红线:
// - 专业课只能使用实验室
// - 属于其他专业的教室直接排除
// - online / field / tba 不参与面授候选
// ==========================================

use crate::domain::catalog::Room;
use crate::domain::types::{CourseType, RoomType};
use crate::engine::run_state::RunState;
use std::cmp::Ordering;

pub struct RoomSelector;

impl RoomSelector {
    pub fn new() -> Self {
        Self
    }

    /// 面授候选教室
    ///
    /// 专业所属教室在前，公共教室在后；两组内部分别按
    /// (使用次数升序, [公共课: 实验室优先], 容量降序, room_id 升序) 排序
    pub fn available_rooms_for_program<'c>(
        &self,
        rooms: &'c [Room],
        program_id: i64,
        course_type: CourseType,
        state: &RunState,
    ) -> Vec<&'c Room> {
        let mut program_rooms = Vec::new();
        let mut general_rooms = Vec::new();

        for room in rooms {
            if !room.room_type.is_physical() {
                continue;
            }
            if course_type.is_major() && room.room_type != RoomType::Laboratory {
                continue;
            }
            match room.program_id {
                Some(owner) if owner == program_id => program_rooms.push(room),
                Some(_) => {}
                None => general_rooms.push(room),
            }
        }

        let compare = |a: &&Room, b: &&Room| -> Ordering {
            let usage = state
                .room_usage(program_id, a.room_id)
                .cmp(&state.room_usage(program_id, b.room_id));
            let lab_first = if course_type.is_major() {
                Ordering::Equal
            } else {
                lab_rank(a).cmp(&lab_rank(b))
            };
            usage
                .then(lab_first)
                .then_with(|| b.capacity.cmp(&a.capacity))
                .then_with(|| a.room_id.cmp(&b.room_id))
        };

        program_rooms.sort_by(compare);
        general_rooms.sort_by(compare);

        program_rooms.extend(general_rooms);
        program_rooms
    }
}

impl Default for RoomSelector {
    fn default() -> Self {
        Self::new()
    }
}

fn lab_rank(room: &Room) -> u8 {
    if room.room_type == RoomType::Laboratory {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: i64, room_type: RoomType, capacity: i64, program_id: Option<i64>) -> Room {
        Room {
            room_id: id,
            room_name: format!("R{}", id),
            room_type,
            capacity,
            program_id,
        }
    }

    fn ids(rooms: &[&Room]) -> Vec<i64> {
        rooms.iter().map(|r| r.room_id).collect()
    }

    #[test]
    fn test_major_only_gets_labs() {
        let rooms = vec![
            room(1, RoomType::Lecture, 50, None),
            room(2, RoomType::Laboratory, 30, None),
            room(3, RoomType::Online, 0, None),
            room(4, RoomType::Field, 100, None),
        ];
        let state = RunState::new();
        let picked = RoomSelector::new().available_rooms_for_program(&rooms, 1, CourseType::Major, &state);
        assert_eq!(ids(&picked), vec![2]);
    }

    #[test]
    fn test_program_rooms_first_and_foreign_rooms_excluded() {
        let rooms = vec![
            room(1, RoomType::Lecture, 50, None),
            room(2, RoomType::Lecture, 40, Some(1)),
            room(3, RoomType::Lecture, 90, Some(2)),
        ];
        let state = RunState::new();
        let picked = RoomSelector::new().available_rooms_for_program(&rooms, 1, CourseType::Minor, &state);
        assert_eq!(ids(&picked), vec![2, 1]);

        let picked = RoomSelector::new().available_rooms_for_program(&rooms, 3, CourseType::Minor, &state);
        assert_eq!(ids(&picked), vec![1]);
    }

    #[test]
    fn test_sort_by_usage_lab_capacity_id() {
        let rooms = vec![
            room(1, RoomType::Lecture, 60, None),
            room(2, RoomType::Laboratory, 30, None),
            room(3, RoomType::Lecture, 60, None),
            room(4, RoomType::Lecture, 80, None),
        ];
        let mut state = RunState::new();

        let selector = RoomSelector::new();
        let picked = selector.available_rooms_for_program(&rooms, 1, CourseType::Minor, &state);
        // 公共课实验室优先，其余按容量降序、id 升序
        assert_eq!(ids(&picked), vec![2, 4, 1, 3]);

        state.record_room_usage(1, 2);
        state.record_room_usage(1, 4);
        let picked = selector.available_rooms_for_program(&rooms, 1, CourseType::Minor, &state);
        assert_eq!(ids(&picked), vec![1, 3, 2, 4]);

        // 其他专业的使用量不影响本专业排序
        let picked = selector.available_rooms_for_program(&rooms, 7, CourseType::Minor, &state);
        assert_eq!(ids(&picked), vec![2, 4, 1, 3]);
    }
}

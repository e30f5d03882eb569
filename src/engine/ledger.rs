// ==========================================
// 课程排课系统 - 冲突台账
// ==========================================
// 按 (资源, 星期) 记录已占用时段，资源分三类：教师 / 教室 / 班级
// 红线: 线上教室不占用教室台账
// 并发: 单次运行内单线程访问，不加锁
// ==========================================

use crate::domain::catalog::Room;
use crate::domain::time_slot::TimeSlot;
use crate::domain::types::Weekday;
use std::collections::{BTreeMap, BTreeSet, HashMap};

type DayLog = BTreeMap<Weekday, BTreeSet<TimeSlot>>;

#[derive(Debug, Clone, Default)]
pub struct ConflictLedger {
    faculty: HashMap<i64, DayLog>,
    rooms: HashMap<i64, DayLog>,
    sections: HashMap<i64, DayLog>,
}

impl ConflictLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 检查候选时段是否与任一资源的已有占用重叠
    ///
    /// 教室检查仅对非线上教室生效
    pub fn conflicts(
        &self,
        faculty_id: i64,
        room: &Room,
        section_id: i64,
        day: Weekday,
        slot: &TimeSlot,
    ) -> bool {
        if overlaps_any(&self.faculty, faculty_id, day, slot) {
            return true;
        }
        if !room.is_online() && overlaps_any(&self.rooms, room.room_id, day, slot) {
            return true;
        }
        overlaps_any(&self.sections, section_id, day, slot)
    }

    /// 提交占用（调用方需已确认无冲突）
    pub fn commit(
        &mut self,
        faculty_id: i64,
        room: &Room,
        section_id: i64,
        day: Weekday,
        slot: TimeSlot,
    ) {
        insert(&mut self.faculty, faculty_id, day, slot);
        if !room.is_online() {
            insert(&mut self.rooms, room.room_id, day, slot);
        }
        insert(&mut self.sections, section_id, day, slot);
    }

    /// 撤销一次提交（仅在开启部分提交回滚时使用）
    pub fn release(
        &mut self,
        faculty_id: i64,
        room: &Room,
        section_id: i64,
        day: Weekday,
        slot: &TimeSlot,
    ) {
        remove(&mut self.faculty, faculty_id, day, slot);
        if !room.is_online() {
            remove(&mut self.rooms, room.room_id, day, slot);
        }
        remove(&mut self.sections, section_id, day, slot);
    }

    /// 教师全周已占用时段数
    pub fn faculty_slot_count(&self, faculty_id: i64) -> usize {
        self.faculty
            .get(&faculty_id)
            .map(|days| days.values().map(BTreeSet::len).sum())
            .unwrap_or(0)
    }

    /// 教室全周已占用时段数
    pub fn room_slot_count(&self, room_id: i64) -> usize {
        self.rooms
            .get(&room_id)
            .map(|days| days.values().map(BTreeSet::len).sum())
            .unwrap_or(0)
    }
}

fn overlaps_any(log: &HashMap<i64, DayLog>, id: i64, day: Weekday, slot: &TimeSlot) -> bool {
    log.get(&id)
        .and_then(|days| days.get(&day))
        .map(|slots| slots.iter().any(|s| s.overlaps(slot)))
        .unwrap_or(false)
}

fn insert(log: &mut HashMap<i64, DayLog>, id: i64, day: Weekday, slot: TimeSlot) {
    log.entry(id).or_default().entry(day).or_default().insert(slot);
}

fn remove(log: &mut HashMap<i64, DayLog>, id: i64, day: Weekday, slot: &TimeSlot) {
    if let Some(slots) = log.get_mut(&id).and_then(|days| days.get_mut(&day)) {
        slots.remove(slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::RoomType;

    fn room(room_id: i64, room_type: RoomType) -> Room {
        Room {
            room_id,
            room_name: format!("R{}", room_id),
            room_type,
            capacity: 40,
            program_id: None,
        }
    }

    fn slot(sh: u32, sm: u32, eh: u32, em: u32) -> TimeSlot {
        TimeSlot::from_hm(sh, sm, eh, em).unwrap()
    }

    #[test]
    fn test_each_resource_blocks_independently() {
        let mut ledger = ConflictLedger::new();
        let lab = room(1, RoomType::Laboratory);
        ledger.commit(10, &lab, 100, Weekday::Monday, slot(7, 30, 9, 0));

        let other_room = room(2, RoomType::Lecture);
        let overlapping = slot(8, 0, 9, 30);

        // 同教师
        assert!(ledger.conflicts(10, &other_room, 200, Weekday::Monday, &overlapping));
        // 同教室
        assert!(ledger.conflicts(11, &lab, 200, Weekday::Monday, &overlapping));
        // 同班级
        assert!(ledger.conflicts(11, &other_room, 100, Weekday::Monday, &overlapping));
        // 全部不同
        assert!(!ledger.conflicts(11, &other_room, 200, Weekday::Monday, &overlapping));
        // 不同星期
        assert!(!ledger.conflicts(10, &lab, 100, Weekday::Tuesday, &overlapping));
        // 相邻时段不冲突
        assert!(!ledger.conflicts(10, &lab, 100, Weekday::Monday, &slot(9, 0, 10, 30)));
    }

    #[test]
    fn test_online_room_is_not_tracked() {
        let mut ledger = ConflictLedger::new();
        let online = room(50, RoomType::Online);
        ledger.commit(10, &online, 100, Weekday::Friday, slot(7, 30, 9, 0));

        assert_eq!(ledger.room_slot_count(50), 0);
        assert!(!ledger.conflicts(11, &online, 200, Weekday::Friday, &slot(7, 30, 9, 0)));
        assert_eq!(ledger.faculty_slot_count(10), 1);
    }

    #[test]
    fn test_release_undoes_commit() {
        let mut ledger = ConflictLedger::new();
        let lab = room(1, RoomType::Laboratory);
        let s = slot(7, 30, 9, 0);
        ledger.commit(10, &lab, 100, Weekday::Monday, s);
        ledger.release(10, &lab, 100, Weekday::Monday, &s);

        assert_eq!(ledger.faculty_slot_count(10), 0);
        assert!(!ledger.conflicts(10, &lab, 100, Weekday::Monday, &s));
    }
}

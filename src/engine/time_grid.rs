// ==========================================
// 课程排课系统 - 时间网格生成
// ==========================================
// 输入: 首节开始时间 / 时段时长 / 每日结束时间 / 午休窗
// 输出: 按时间顺序的非重叠时段序列
// 红线: 每次运行只生成一次，之后只读
// ==========================================

use crate::config::SchedulerConfig;
use crate::domain::time_slot::TimeSlot;
use chrono::{Duration, NaiveTime};
use tracing::debug;

pub struct TimeGridGenerator {
    day_start: NaiveTime,
    day_end: NaiveTime,
    slot_minutes: i64,
    lunch: TimeSlot,
}

impl TimeGridGenerator {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            day_start: config.day_start,
            day_end: config.day_end,
            slot_minutes: config.slot_minutes,
            lunch: config.lunch_window(),
        }
    }

    /// 生成一天的时段序列
    ///
    /// 规则：
    /// 1) 从 day_start 起按固定时长逐个生成候选时段
    /// 2) 候选时段结束时间达到或超过 day_end 时停止
    /// 3) 与午休窗重叠的候选时段被剔除，游标照常前进一个时长
    pub fn generate(&self) -> Vec<TimeSlot> {
        let mut slots = Vec::new();
        if self.slot_minutes <= 0 {
            return slots;
        }
        let Some(step) = Duration::try_minutes(self.slot_minutes) else {
            return slots;
        };

        let mut cursor = self.day_start;
        loop {
            let (end, wrapped) = cursor.overflowing_add_signed(step);
            // 跨越午夜或到达结束时间即停止
            if wrapped != 0 || end >= self.day_end || end <= cursor {
                break;
            }

            let candidate = TimeSlot::new(cursor, end);
            if candidate.overlaps(&self.lunch) {
                debug!(slot = %candidate, "候选时段与午休重叠，剔除");
            } else {
                slots.push(candidate);
            }
            cursor = end;
        }

        slots
    }
}

// ==========================================
// 课程排课系统 - 单次运行状态
// ==========================================
// 每次 generate 开始时新建，结束后随结果一并消费
// 红线: 不跨运行共享；各子模块通过引用接收
// ==========================================

use crate::domain::catalog::Section;
use crate::domain::schedule::{ScheduledSession, SectionWeeklySchedule};
use crate::engine::error::PlacementError;
use crate::engine::ledger::ConflictLedger;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

// ==========================================
// AllocationPhase - 编排状态机
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AllocationPhase {
    Reset,
    BuildAssignmentList,
    PrimaryPass,
    BackfillUnassignedFaculty,
    BackfillSpecializedCapacity,
    Done,
}

impl fmt::Display for AllocationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AllocationPhase::Reset => "RESET",
            AllocationPhase::BuildAssignmentList => "BUILD_ASSIGNMENT_LIST",
            AllocationPhase::PrimaryPass => "PRIMARY_PASS",
            AllocationPhase::BackfillUnassignedFaculty => "BACKFILL_UNASSIGNED_FACULTY",
            AllocationPhase::BackfillSpecializedCapacity => "BACKFILL_SPECIALIZED_CAPACITY",
            AllocationPhase::Done => "DONE",
        };
        write!(f, "{}", name)
    }
}

// ==========================================
// RunState
// ==========================================
#[derive(Debug)]
pub struct RunState {
    pub phase: AllocationPhase,
    pub ledger: ConflictLedger,
    /// faculty_id → 已分配课程数
    pub faculty_course_count: HashMap<i64, u32>,
    /// program_id → room_id → 使用次数（仅实体教室）
    pub program_room_usage: HashMap<i64, HashMap<i64, u32>>,
    /// 已完整分配的 (section_id, course_id)
    pub assigned_pairs: HashSet<(i64, i64)>,
    /// faculty_id → 尚未分配且匹配专长的课程对数量
    pub faculty_spec_backlog: HashMap<i64, u32>,

    pub schedules: Vec<ScheduledSession>,
    pub weekly_schedules: BTreeMap<i64, SectionWeeklySchedule>,
    pub failed_attempts_by_reason: BTreeMap<String, usize>,
    pub assignments_by_phase: BTreeMap<String, usize>,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            phase: AllocationPhase::Reset,
            ledger: ConflictLedger::new(),
            faculty_course_count: HashMap::new(),
            program_room_usage: HashMap::new(),
            assigned_pairs: HashSet::new(),
            faculty_spec_backlog: HashMap::new(),
            schedules: Vec::new(),
            weekly_schedules: BTreeMap::new(),
            failed_attempts_by_reason: BTreeMap::new(),
            assignments_by_phase: BTreeMap::new(),
        }
    }

    pub fn course_count(&self, faculty_id: i64) -> u32 {
        self.faculty_course_count.get(&faculty_id).copied().unwrap_or(0)
    }

    pub fn room_usage(&self, program_id: i64, room_id: i64) -> u32 {
        self.program_room_usage
            .get(&program_id)
            .and_then(|rooms| rooms.get(&room_id))
            .copied()
            .unwrap_or(0)
    }

    pub fn record_room_usage(&mut self, program_id: i64, room_id: i64) {
        *self
            .program_room_usage
            .entry(program_id)
            .or_default()
            .entry(room_id)
            .or_insert(0) += 1;
    }

    pub fn release_room_usage(&mut self, program_id: i64, room_id: i64) {
        if let Some(count) = self
            .program_room_usage
            .get_mut(&program_id)
            .and_then(|rooms| rooms.get_mut(&room_id))
        {
            *count = count.saturating_sub(1);
        }
    }

    pub fn is_assigned(&self, section_id: i64, course_id: i64) -> bool {
        self.assigned_pairs.contains(&(section_id, course_id))
    }

    pub fn backlog(&self, faculty_id: i64) -> u32 {
        self.faculty_spec_backlog.get(&faculty_id).copied().unwrap_or(0)
    }

    pub fn decrement_backlog(&mut self, faculty_id: i64) {
        if let Some(count) = self.faculty_spec_backlog.get_mut(&faculty_id) {
            *count = count.saturating_sub(1);
        }
    }

    /// 记录一次完整分配（面授 + 线上）
    pub fn record_assignment(
        &mut self,
        section: &Section,
        course_id: i64,
        faculty_id: i64,
        sessions: Vec<ScheduledSession>,
    ) {
        self.assigned_pairs.insert((section.section_id, course_id));
        *self.faculty_course_count.entry(faculty_id).or_insert(0) += 1;
        *self
            .assignments_by_phase
            .entry(self.phase.to_string())
            .or_insert(0) += 1;

        let weekly = self
            .weekly_schedules
            .entry(section.section_id)
            .or_insert_with(|| SectionWeeklySchedule::new(section));
        for session in sessions {
            weekly.push(session.clone());
            self.schedules.push(session);
        }
    }

    pub fn record_failure(&mut self, error: PlacementError) {
        *self
            .failed_attempts_by_reason
            .entry(error.reason_code().to_string())
            .or_insert(0) += 1;
    }

    pub fn successful_assignments(&self) -> usize {
        self.assigned_pairs.len()
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 课程排课系统 - 分配编排器
// ==========================================
// 状态机:
// RESET → BUILD_ASSIGNMENT_LIST → PRIMARY_PASS
//       → BACKFILL_UNASSIGNED_FACULTY → BACKFILL_SPECIALIZED_CAPACITY → DONE
// ==========================================
// 红线:
// - 每次 generate 新建 RunState，不跨运行共享
// - 单对落位失败只计数，不作为运行错误
// - 全流程无随机性，相同输入得到相同输出
// ==========================================

use crate::config::SchedulerConfig;
use crate::domain::catalog::{Catalog, Course, Faculty, Room, Section};
use crate::domain::schedule::{
    GenerationResult, GenerationSummary, LunchBreak, SectionWeeklySchedule,
};
use crate::domain::time_slot::TimeSlot;
use crate::domain::types::{EmploymentType, Weekday};
use crate::engine::eligibility::{counts_toward_backlog, employment_allows};
use crate::engine::error::{EngineResult, PlacementError};
use crate::engine::faculty_selector::FacultySelector;
use crate::engine::room_selector::RoomSelector;
use crate::engine::run_state::{AllocationPhase, RunState};
use crate::engine::session_assigner::SessionAssigner;
use crate::engine::time_grid::TimeGridGenerator;
use crate::engine::verify::find_conflicts;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

// ==========================================
// AssignmentPair - 待排 (班级, 课程)
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct AssignmentPair<'c> {
    pub section: &'c Section,
    pub course: &'c Course,
}

impl<'c> AssignmentPair<'c> {
    pub fn key(&self) -> (i64, i64) {
        (self.section.section_id, self.course.course_id)
    }
}

/// 交叉生成并排序待排列表
///
/// 过滤: 课程与班级的专业、年级一致
/// 排序: 专业课优先 → 年级升序 → 专业升序 → 课程代码升序（再以 id 兜底）
pub fn build_assignment_list<'c>(
    sections: &'c [Section],
    courses: &[&'c Course],
) -> Vec<AssignmentPair<'c>> {
    let mut pairs: Vec<AssignmentPair<'c>> = sections
        .iter()
        .flat_map(|section| {
            courses
                .iter()
                .filter(move |course| {
                    course.program_id == section.program_id
                        && course.year_level == section.year_level
                })
                .map(move |course| AssignmentPair { section, course: *course })
        })
        .collect();

    pairs.sort_by(|a, b| {
        a.course
            .course_type
            .cmp(&b.course.course_type)
            .then_with(|| a.course.year_level.cmp(&b.course.year_level))
            .then_with(|| a.course.program_id.cmp(&b.course.program_id))
            .then_with(|| a.course.course_code.cmp(&b.course.course_code))
            .then_with(|| a.section.section_id.cmp(&b.section.section_id))
            .then_with(|| a.course.course_id.cmp(&b.course.course_id))
    });

    pairs
}

// ==========================================
// AllocationOrchestrator
// ==========================================
pub struct AllocationOrchestrator {
    config: SchedulerConfig,
    time_slots: Vec<TimeSlot>,
    faculty_selector: FacultySelector,
    room_selector: RoomSelector,
}

impl AllocationOrchestrator {
    /// 创建编排器（配置不合法时立即失败）
    pub fn new(config: SchedulerConfig) -> EngineResult<Self> {
        config.validate()?;
        let time_slots = TimeGridGenerator::new(&config).generate();
        info!(slot_count = time_slots.len(), "时间网格已生成");

        Ok(Self {
            faculty_selector: FacultySelector::new(&config),
            room_selector: RoomSelector::new(),
            time_slots,
            config,
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn time_slots(&self) -> &[TimeSlot] {
        &self.time_slots
    }

    /// 生成一周课表
    ///
    /// # 参数
    /// - catalog: 只读目录快照
    /// - semester: 学期过滤（大小写不敏感的完全匹配），None 表示全部
    #[instrument(skip(self, catalog), fields(
        sections = catalog.sections.len(),
        courses = catalog.courses.len(),
        faculty = catalog.faculty.len(),
        rooms = catalog.rooms.len()
    ))]
    pub fn generate(&self, catalog: &Catalog, semester: Option<&str>) -> GenerationResult {
        // ==========================================
        // RESET
        // ==========================================
        let mut state = RunState::new();
        for section in &catalog.sections {
            state
                .weekly_schedules
                .insert(section.section_id, SectionWeeklySchedule::new(section));
        }
        let assigner = SessionAssigner::new(&self.time_slots, self.config.rollback_partial_assignments);
        let online_room = catalog.online_room();
        if online_room == Room::fallback_online() {
            warn!("目录中没有 online 类型教室，线上课使用兜底教室");
        }

        // ==========================================
        // BUILD_ASSIGNMENT_LIST
        // ==========================================
        self.enter_phase(&mut state, AllocationPhase::BuildAssignmentList);
        let courses = catalog.courses_in_semester(semester);
        let pairs = build_assignment_list(&catalog.sections, &courses);
        self.init_backlog(&mut state, &catalog.faculty, &pairs);
        info!(
            pair_count = pairs.len(),
            course_count = courses.len(),
            semester = semester.unwrap_or("All"),
            "待排列表已生成"
        );

        // ==========================================
        // PRIMARY_PASS
        // ==========================================
        self.enter_phase(&mut state, AllocationPhase::PrimaryPass);
        self.primary_pass(&mut state, catalog, &pairs, &assigner, &online_room);

        // ==========================================
        // BACKFILL_UNASSIGNED_FACULTY
        // ==========================================
        self.enter_phase(&mut state, AllocationPhase::BackfillUnassignedFaculty);
        self.backfill_unassigned_faculty(&mut state, catalog, &pairs, &assigner, &online_room);

        // ==========================================
        // BACKFILL_SPECIALIZED_CAPACITY
        // ==========================================
        self.enter_phase(&mut state, AllocationPhase::BackfillSpecializedCapacity);
        self.backfill_specialized_capacity(&mut state, catalog, &pairs, &assigner, &online_room);

        // ==========================================
        // DONE
        // ==========================================
        self.enter_phase(&mut state, AllocationPhase::Done);
        let summary = self.build_summary(&state, catalog, courses.len(), pairs.len(), semester);

        info!(
            successful_assignments = summary.successful_assignments,
            failed_pairs = summary.failed_pairs,
            session_count = state.schedules.len(),
            conflict_free = summary.conflict_free,
            "排课完成"
        );

        GenerationResult {
            weekly_schedules: state.weekly_schedules,
            schedules: state.schedules,
            summary,
        }
    }

    // ==========================================
    // 阶段实现
    // ==========================================

    fn enter_phase(&self, state: &mut RunState, phase: AllocationPhase) {
        debug!(
            from = %state.phase,
            to = %phase,
            assigned = state.successful_assignments(),
            "阶段切换"
        );
        state.phase = phase;
    }

    /// 统计每位有专长教师的专长待办
    fn init_backlog(&self, state: &mut RunState, faculty: &[Faculty], pairs: &[AssignmentPair<'_>]) {
        for member in faculty.iter().filter(|f| f.has_specialization()) {
            let count = pairs
                .iter()
                .filter(|p| !state.is_assigned(p.section.section_id, p.course.course_id))
                .filter(|p| counts_toward_backlog(member, p.course))
                .count() as u32;
            state.faculty_spec_backlog.insert(member.faculty_id, count);
        }
    }

    fn primary_pass(
        &self,
        state: &mut RunState,
        catalog: &Catalog,
        pairs: &[AssignmentPair<'_>],
        assigner: &SessionAssigner<'_>,
        online_room: &Room,
    ) {
        let batch_size = self.config.batch_size;
        let total_batches = pairs.len().div_ceil(batch_size);

        for (index, pair) in pairs.iter().enumerate() {
            if index % batch_size == 0 {
                debug!(batch = index / batch_size + 1, total_batches, "处理批次");
            }
            if state.is_assigned(pair.section.section_id, pair.course.course_id) {
                continue;
            }

            let selected = self
                .faculty_selector
                .select(&catalog.faculty, pair.course, pair.section, state);
            let outcome = match selected {
                Ok(faculty) => self.try_assign(state, catalog, pair, faculty, assigner, online_room),
                Err(error) => Err(error),
            };

            if let Err(error) = outcome {
                self.note_failure(state, pair, error);
            }
        }

        info!(
            assigned = state.successful_assignments(),
            "主流程完成"
        );
    }

    /// 保证每位教师至少有一门课
    ///
    /// 专长匹配的课程对优先，其次是聘用类别允许的任意课程对
    fn backfill_unassigned_faculty(
        &self,
        state: &mut RunState,
        catalog: &Catalog,
        pairs: &[AssignmentPair<'_>],
        assigner: &SessionAssigner<'_>,
        online_room: &Room,
    ) {
        let mut backfilled = 0usize;

        for faculty in sorted_by_id(&catalog.faculty) {
            if state.course_count(faculty.faculty_id) > 0
                || !self.faculty_selector.has_capacity(faculty, state)
            {
                continue;
            }

            let eligible: Vec<&AssignmentPair<'_>> = pairs
                .iter()
                .filter(|p| !state.is_assigned(p.section.section_id, p.course.course_id))
                .filter(|p| employment_allows(faculty, p.course))
                .collect();
            let (preferred, others): (Vec<_>, Vec<_>) = eligible
                .into_iter()
                .partition(|p| faculty.is_specialized_for(p.course));

            for pair in preferred.into_iter().chain(others) {
                match self.try_assign(state, catalog, pair, faculty, assigner, online_room) {
                    Ok(()) => {
                        backfilled += 1;
                        break;
                    }
                    Err(error) => self.note_failure(state, pair, error),
                }
            }

            if state.course_count(faculty.faculty_id) == 0 {
                debug!(faculty_id = faculty.faculty_id, "教师补位失败，仍无课程");
            }
        }

        info!(backfilled, "未分配教师补位完成");
    }

    /// 外聘/兼职专长教师按专长填满剩余容量
    ///
    /// 反复扫描直到某一轮没有新增分配
    fn backfill_specialized_capacity(
        &self,
        state: &mut RunState,
        catalog: &Catalog,
        pairs: &[AssignmentPair<'_>],
        assigner: &SessionAssigner<'_>,
        online_room: &Room,
    ) {
        let candidates: Vec<&Faculty> = sorted_by_id(&catalog.faculty)
            .into_iter()
            .filter(|f| f.employment_type != EmploymentType::Permanent && f.has_specialization())
            .collect();

        let mut filled = 0usize;
        let mut rounds = 0usize;
        loop {
            rounds += 1;
            let mut filled_this_round = 0usize;

            for faculty in &candidates {
                for pair in pairs {
                    if !self.faculty_selector.has_capacity(faculty, state) {
                        break;
                    }
                    if state.is_assigned(pair.section.section_id, pair.course.course_id)
                        || !faculty.is_specialized_for(pair.course)
                        || !employment_allows(faculty, pair.course)
                    {
                        continue;
                    }

                    match self.try_assign(state, catalog, pair, faculty, assigner, online_room) {
                        Ok(()) => filled_this_round += 1,
                        Err(error) => self.note_failure(state, pair, error),
                    }
                }
            }

            filled += filled_this_round;
            if filled_this_round == 0 {
                break;
            }
        }

        info!(filled, rounds, "专长容量补位完成");
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 查找教室并尝试落位，成功后登记结果、扣减专长待办
    fn try_assign(
        &self,
        state: &mut RunState,
        catalog: &Catalog,
        pair: &AssignmentPair<'_>,
        faculty: &Faculty,
        assigner: &SessionAssigner<'_>,
        online_room: &Room,
    ) -> Result<(), PlacementError> {
        let rooms = self.room_selector.available_rooms_for_program(
            &catalog.rooms,
            pair.section.program_id,
            pair.course.course_type,
            state,
        );

        let sessions = assigner.assign_pair(state, pair.course, pair.section, faculty, &rooms, online_room)?;
        state.record_assignment(pair.section, pair.course.course_id, faculty.faculty_id, sessions);

        for member in catalog.faculty.iter() {
            if counts_toward_backlog(member, pair.course) {
                state.decrement_backlog(member.faculty_id);
            }
        }
        Ok(())
    }

    fn note_failure(&self, state: &mut RunState, pair: &AssignmentPair<'_>, error: PlacementError) {
        debug!(
            phase = %state.phase,
            section_id = pair.section.section_id,
            course_code = %pair.course.course_code,
            reason = error.reason_code(),
            "课程对未能分配"
        );
        state.record_failure(error);
    }

    fn build_summary(
        &self,
        state: &RunState,
        catalog: &Catalog,
        course_count: usize,
        pair_count: usize,
        semester: Option<&str>,
    ) -> GenerationSummary {
        let covered: BTreeSet<Weekday> = state.schedules.iter().map(|s| s.day).collect();
        let successful = state.successful_assignments();

        GenerationSummary {
            semester: semester
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or("All")
                .to_string(),
            total_sections: catalog.sections.len(),
            total_courses: course_count,
            total_faculty: catalog.faculty.len(),
            total_pairs: pair_count,
            successful_assignments: successful,
            failed_pairs: pair_count.saturating_sub(successful),
            failed_attempts_by_reason: state.failed_attempts_by_reason.clone(),
            assignments_by_phase: state.assignments_by_phase.clone(),
            weekdays_covered: covered.into_iter().collect(),
            time_slots: self.time_slots.clone(),
            lunch_break: LunchBreak {
                start: self.config.lunch_start,
                end: self.config.lunch_end,
            },
            conflict_free: find_conflicts(&state.schedules).is_empty(),
            schedules_saved: 0,
        }
    }
}

fn sorted_by_id(faculty: &[Faculty]) -> Vec<&Faculty> {
    let mut sorted: Vec<&Faculty> = faculty.iter().collect();
    sorted.sort_by_key(|f| f.faculty_id);
    sorted
}

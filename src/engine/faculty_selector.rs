// ==========================================
// 课程排课系统 - 教师选择器
// ==========================================
// 输入: 课程 + 班级 + 运行状态
// 输出: 选中的教师（或 NoEligibleFaculty）
// ==========================================
// 分桶: 聘用类别 × 专长匹配，共六桶
// 桶内排序: 得分降序，同分按 faculty_id 升序
// 专业课: [正式-专长, 兼职-专长]
// 公共课: [外聘-专长, 外聘-其他, 兼职-专长, 兼职-其他]
// 红线: 课程数达到上限的教师不可被选中
// ==========================================

use crate::config::SchedulerConfig;
use crate::domain::catalog::{Course, Faculty, Section};
use crate::domain::types::{CourseType, EmploymentType};
use crate::engine::error::PlacementError;
use crate::engine::run_state::RunState;
use std::collections::BTreeMap;
use tracing::debug;

// 得分权重
const PROGRAM_MATCH_BONUS: i64 = 80;
const LOAD_BASE: i64 = 50;
const LOAD_STEP: i64 = 5;
const SLOT_BASE: i64 = 30;
const SLOT_STEP: i64 = 2;

/// 教师分桶
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FacultyBucket {
    PermanentSpecialized,
    PermanentOther,
    AffiliateSpecialized,
    AffiliateOther,
    PartTimeSpecialized,
    PartTimeOther,
}

impl FacultyBucket {
    pub fn of(faculty: &Faculty, course: &Course) -> Self {
        let specialized = faculty.is_specialized_for(course);
        match (faculty.employment_type, specialized) {
            (EmploymentType::Permanent, true) => FacultyBucket::PermanentSpecialized,
            (EmploymentType::Permanent, false) => FacultyBucket::PermanentOther,
            (EmploymentType::Affiliate, true) => FacultyBucket::AffiliateSpecialized,
            (EmploymentType::Affiliate, false) => FacultyBucket::AffiliateOther,
            (EmploymentType::PartTime, true) => FacultyBucket::PartTimeSpecialized,
            (EmploymentType::PartTime, false) => FacultyBucket::PartTimeOther,
        }
    }

    /// 按课程类型的桶搜索顺序
    pub fn search_order(course_type: CourseType) -> &'static [FacultyBucket] {
        match course_type {
            CourseType::Major => &[
                FacultyBucket::PermanentSpecialized,
                FacultyBucket::PartTimeSpecialized,
            ],
            CourseType::Minor => &[
                FacultyBucket::AffiliateSpecialized,
                FacultyBucket::AffiliateOther,
                FacultyBucket::PartTimeSpecialized,
                FacultyBucket::PartTimeOther,
            ],
        }
    }
}

/// 桶内候选
#[derive(Debug, Clone)]
pub struct FacultyCandidate<'c> {
    pub faculty: &'c Faculty,
    pub score: i64,
    pub specialized: bool,
}

// ==========================================
// FacultySelector
// ==========================================
pub struct FacultySelector {
    permanent_limit: u32,
    other_limit: u32,
}

impl FacultySelector {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            permanent_limit: config.permanent_course_limit,
            other_limit: config.other_course_limit,
        }
    }

    pub fn course_limit(&self, faculty: &Faculty) -> u32 {
        match faculty.employment_type {
            EmploymentType::Permanent => self.permanent_limit,
            EmploymentType::Affiliate | EmploymentType::PartTime => self.other_limit,
        }
    }

    /// 是否仍有剩余课程容量
    pub fn has_capacity(&self, faculty: &Faculty, state: &RunState) -> bool {
        state.course_count(faculty.faculty_id) < self.course_limit(faculty)
    }

    /// 候选得分
    ///
    /// 80（教师专业 = 班级专业）
    /// + max(0, 50 - 5 × 已分配课程数)
    /// + max(0, 30 - 2 × 全周已占用时段数)
    pub fn score(&self, faculty: &Faculty, section: &Section, state: &RunState) -> i64 {
        let program_bonus = if faculty.program_id == Some(section.program_id) {
            PROGRAM_MATCH_BONUS
        } else {
            0
        };
        let course_count = i64::from(state.course_count(faculty.faculty_id));
        let slot_count = state.ledger.faculty_slot_count(faculty.faculty_id) as i64;

        program_bonus
            + (LOAD_BASE - LOAD_STEP * course_count).max(0)
            + (SLOT_BASE - SLOT_STEP * slot_count).max(0)
    }

    /// 将有剩余容量的教师分桶并排序
    pub fn rank<'c>(
        &self,
        faculty: &'c [Faculty],
        course: &Course,
        section: &Section,
        state: &RunState,
    ) -> BTreeMap<FacultyBucket, Vec<FacultyCandidate<'c>>> {
        let mut buckets: BTreeMap<FacultyBucket, Vec<FacultyCandidate<'c>>> = BTreeMap::new();

        for member in faculty.iter().filter(|f| self.has_capacity(f, state)) {
            buckets
                .entry(FacultyBucket::of(member, course))
                .or_default()
                .push(FacultyCandidate {
                    faculty: member,
                    score: self.score(member, section, state),
                    specialized: member.is_specialized_for(course),
                });
        }

        for candidates in buckets.values_mut() {
            candidates.sort_by(|a, b| {
                b.score
                    .cmp(&a.score)
                    .then_with(|| a.faculty.faculty_id.cmp(&b.faculty.faculty_id))
            });
        }

        buckets
    }

    /// 为 (课程, 班级) 选择教师
    ///
    /// 非专长候选若仍有专长待办则跳过（留给专长课程）
    pub fn select<'c>(
        &self,
        faculty: &'c [Faculty],
        course: &Course,
        section: &Section,
        state: &RunState,
    ) -> Result<&'c Faculty, PlacementError> {
        let buckets = self.rank(faculty, course, section, state);

        for bucket in FacultyBucket::search_order(course.course_type) {
            let Some(candidates) = buckets.get(bucket) else {
                continue;
            };

            for candidate in candidates {
                if !candidate.specialized && state.backlog(candidate.faculty.faculty_id) > 0 {
                    debug!(
                        faculty_id = candidate.faculty.faculty_id,
                        course_code = %course.course_code,
                        "教师仍有专长待办，跳过非专长课程"
                    );
                    continue;
                }

                debug!(
                    faculty_id = candidate.faculty.faculty_id,
                    score = candidate.score,
                    bucket = ?bucket,
                    course_code = %course.course_code,
                    section_id = section.section_id,
                    "选中教师"
                );
                return Ok(candidate.faculty);
            }
        }

        Err(PlacementError::NoEligibleFaculty)
    }
}

// ==========================================
// 课程排课系统 - 聘用类别准入规则
// ==========================================
// 正式教师 → 仅专业课
// 外聘教师 → 仅公共课
// 兼职教师 → 公共课；专业课须专长匹配
// ==========================================

use crate::domain::catalog::{Course, Faculty};
use crate::domain::types::{CourseType, EmploymentType};

/// 聘用类别是否允许该教师承担该课程
pub fn employment_allows(faculty: &Faculty, course: &Course) -> bool {
    match (faculty.employment_type, course.course_type) {
        (EmploymentType::Permanent, CourseType::Major) => true,
        (EmploymentType::Permanent, CourseType::Minor) => false,
        (EmploymentType::Affiliate, CourseType::Minor) => true,
        (EmploymentType::Affiliate, CourseType::Major) => false,
        (EmploymentType::PartTime, CourseType::Minor) => true,
        (EmploymentType::PartTime, CourseType::Major) => faculty.is_specialized_for(course),
    }
}

/// 该课程是否计入教师的专长待办
pub fn counts_toward_backlog(faculty: &Faculty, course: &Course) -> bool {
    faculty.is_specialized_for(course) && employment_allows(faculty, course)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(code: &str, course_type: CourseType) -> Course {
        Course {
            course_id: 1,
            course_code: code.to_string(),
            title: code.to_string(),
            units: 3,
            course_type,
            year_level: 1,
            semester: None,
            program_id: 1,
        }
    }

    fn faculty(employment_type: EmploymentType, spec: Option<&str>) -> Faculty {
        Faculty {
            faculty_id: 1,
            name: "F".to_string(),
            employment_type,
            specialization: spec.map(str::to_string),
            program_id: None,
        }
    }

    #[test]
    fn test_employment_matrix() {
        let major = course("IT201", CourseType::Major);
        let minor = course("GE101", CourseType::Minor);

        let permanent = faculty(EmploymentType::Permanent, None);
        assert!(employment_allows(&permanent, &major));
        assert!(!employment_allows(&permanent, &minor));

        let affiliate = faculty(EmploymentType::Affiliate, Some("IT201"));
        assert!(!employment_allows(&affiliate, &major));
        assert!(employment_allows(&affiliate, &minor));

        let part_time = faculty(EmploymentType::PartTime, Some("IT201"));
        assert!(employment_allows(&part_time, &major));
        assert!(employment_allows(&part_time, &minor));
        assert!(!employment_allows(&part_time, &course("IT301", CourseType::Major)));
    }

    #[test]
    fn test_backlog_requires_specialization_and_eligibility() {
        let affiliate = faculty(EmploymentType::Affiliate, Some("IT201, GE101"));
        assert!(counts_toward_backlog(&affiliate, &course("GE101", CourseType::Minor)));
        assert!(!counts_toward_backlog(&affiliate, &course("IT201", CourseType::Major)));
        assert!(!counts_toward_backlog(&affiliate, &course("GE102", CourseType::Minor)));
    }
}

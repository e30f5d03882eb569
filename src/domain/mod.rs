// ==========================================
// 课程排课系统 - 领域模型层
// ==========================================
// 职责: 定义目录实体、值对象、排课结果
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod catalog;
pub mod schedule;
pub mod time_slot;
pub mod types;

// 重导出核心类型
pub use catalog::{Catalog, Course, Faculty, Program, Room, Section};
pub use schedule::{
    DaySessions, GenerationResult, GenerationSummary, LunchBreak, ScheduledSession,
    SectionWeeklySchedule,
};
pub use time_slot::TimeSlot;
pub use types::{CourseType, DeliveryMode, EmploymentType, RoomType, Weekday};

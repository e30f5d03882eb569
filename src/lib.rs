// ==========================================
// 课程排课系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 约束满足型排课引擎（教师 / 教室 / 时段）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 排课规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CourseType, DeliveryMode, EmploymentType, RoomType, Weekday};

// 领域实体
pub use domain::{
    Catalog, Course, Faculty, GenerationResult, GenerationSummary, Program, Room,
    ScheduledSession, Section, SectionWeeklySchedule, TimeSlot,
};

// 引擎
pub use engine::{AllocationOrchestrator, EngineError, PlacementError};

// 配置
pub use config::{ConfigManager, SchedulerConfig, SchedulerConfigReader};

// 仓储
pub use repository::{
    CatalogReader, ScheduleStore, SqliteCatalogRepository, SqliteScheduleRepository,
};

// API
pub use api::{ApiError, ScheduleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "课程排课系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

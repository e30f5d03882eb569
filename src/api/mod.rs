// ==========================================
// 课程排课系统 - API 层
// ==========================================
// 职责: 提供排课服务接口,供命令行与上层服务调用
// ==========================================

pub mod error;
pub mod schedule_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use schedule_api::{GenerateScheduleResponse, HealthStatus, ScheduleApi};

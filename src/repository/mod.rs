// ==========================================
// 课程排课系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供目录读取与结果存储接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod catalog_repo;
pub mod error;
pub mod schedule_repo;

// 重导出核心仓储
pub use catalog_repo::{CatalogReader, SqliteCatalogRepository};
pub use error::{RepositoryError, RepositoryResult};
pub use schedule_repo::{ScheduleStore, SqliteScheduleRepository};

// ==========================================
// 课程排课系统 - 配置层
// ==========================================
// 职责: 排课参数管理,启动时校验
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod config_reader_trait;
pub mod scheduler_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, describe_config, ConfigManager};
pub use config_reader_trait::SchedulerConfigReader;
pub use scheduler_config::{ConfigError, SchedulerConfig};

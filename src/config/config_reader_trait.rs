// ==========================================
// 课程排课系统 - 排课配置读取 Trait
// ==========================================
// 职责: 定义引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑、不内置任何凭据
// ==========================================

use crate::config::scheduler_config::{ConfigError, SchedulerConfig};
use async_trait::async_trait;
use chrono::NaiveTime;

// ==========================================
// SchedulerConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait SchedulerConfigReader: Send + Sync {
    // ===== 时间网格 =====

    /// 每日首节开始时间
    ///
    /// # 默认值
    /// - 07:30
    async fn get_day_start(&self) -> Result<NaiveTime, ConfigError>;

    /// 每日最晚结束时间（时段结束不得达到该时刻）
    ///
    /// # 默认值
    /// - 18:00
    async fn get_day_end(&self) -> Result<NaiveTime, ConfigError>;

    /// 时段时长（分钟）
    ///
    /// # 默认值
    /// - 90
    async fn get_slot_minutes(&self) -> Result<i64, ConfigError>;

    /// 午休时间窗 (start, end)
    ///
    /// # 默认值
    /// - 12:00 - 12:30
    async fn get_lunch_window(&self) -> Result<(NaiveTime, NaiveTime), ConfigError>;

    // ===== 课程数上限 =====

    /// 正式/全职教师课程数上限
    ///
    /// # 默认值
    /// - 10
    async fn get_permanent_course_limit(&self) -> Result<u32, ConfigError>;

    /// 外聘/兼职教师课程数上限
    ///
    /// # 默认值
    /// - 5
    async fn get_other_course_limit(&self) -> Result<u32, ConfigError>;

    // ===== 运行策略 =====

    /// 线上课失败时是否回滚面授课
    ///
    /// # 默认值
    /// - false（保留已提交的面授占用）
    async fn get_rollback_partial_assignments(&self) -> Result<bool, ConfigError>;

    /// 主流程进度日志批次大小
    ///
    /// # 默认值
    /// - 5
    async fn get_batch_size(&self) -> Result<usize, ConfigError>;

    /// 读取全部配置并校验
    async fn load_scheduler_config(&self) -> Result<SchedulerConfig, ConfigError> {
        let (lunch_start, lunch_end) = self.get_lunch_window().await?;
        let config = SchedulerConfig {
            day_start: self.get_day_start().await?,
            day_end: self.get_day_end().await?,
            slot_minutes: self.get_slot_minutes().await?,
            lunch_start,
            lunch_end,
            permanent_course_limit: self.get_permanent_course_limit().await?,
            other_course_limit: self.get_other_course_limit().await?,
            rollback_partial_assignments: self.get_rollback_partial_assignments().await?,
            batch_size: self.get_batch_size().await?,
        };
        config.validate()?;
        Ok(config)
    }
}

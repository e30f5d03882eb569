// ==========================================
// 课程排课系统 - 排课参数
// ==========================================
// 职责: 时间网格、课程数上限、部分提交策略
// 红线: 非法数值在启动时失败，不允许运行中途报错
// ==========================================

use crate::domain::time_slot::{format_hhmm, TimeSlot};
use chrono::NaiveTime;
use thiserror::Error;

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("时段时长必须为正数: slot_minutes={0}")]
    NonPositiveSlotDuration(i64),

    #[error("时段时长超过每日可排时间窗: slot_minutes={slot_minutes}, window_minutes={window_minutes}")]
    SlotDurationTooLong { slot_minutes: i64, window_minutes: i64 },

    #[error("每日结束时间必须晚于开始时间: start={start}, end={end}")]
    InvalidDayWindow { start: String, end: String },

    #[error("午休时间窗无效: start={start}, end={end}")]
    InvalidLunchWindow { start: String, end: String },

    #[error("课程数上限必须大于0: {0}")]
    ZeroCourseLimit(String),

    #[error("批次大小必须大于0")]
    ZeroBatchSize,

    #[error("配置值无法解析 (key={key}): {value}")]
    UnparsableValue { key: String, value: String },

    #[error("配置读取失败: {0}")]
    Storage(String),
}

// ==========================================
// SchedulerConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    // ===== 时间网格 =====
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub slot_minutes: i64,
    pub lunch_start: NaiveTime,
    pub lunch_end: NaiveTime,

    // ===== 课程数上限 =====
    pub permanent_course_limit: u32,
    pub other_course_limit: u32,

    // ===== 运行策略 =====
    /// 线上课落位失败时是否回滚已提交的面授课
    pub rollback_partial_assignments: bool,
    /// 主流程进度日志的批次大小（不影响结果）
    pub batch_size: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            day_start: hm(7, 30),
            day_end: hm(18, 0),
            slot_minutes: 90,
            lunch_start: hm(12, 0),
            lunch_end: hm(12, 30),
            permanent_course_limit: 10,
            other_course_limit: 5,
            rollback_partial_assignments: false,
            batch_size: 5,
        }
    }
}

impl SchedulerConfig {
    /// 校验数值配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slot_minutes <= 0 {
            return Err(ConfigError::NonPositiveSlotDuration(self.slot_minutes));
        }
        if self.day_end <= self.day_start {
            return Err(ConfigError::InvalidDayWindow {
                start: format_hhmm(self.day_start),
                end: format_hhmm(self.day_end),
            });
        }
        let window_minutes = (self.day_end - self.day_start).num_minutes();
        if self.slot_minutes > window_minutes {
            return Err(ConfigError::SlotDurationTooLong {
                slot_minutes: self.slot_minutes,
                window_minutes,
            });
        }
        if self.lunch_end < self.lunch_start {
            return Err(ConfigError::InvalidLunchWindow {
                start: format_hhmm(self.lunch_start),
                end: format_hhmm(self.lunch_end),
            });
        }
        if self.permanent_course_limit == 0 {
            return Err(ConfigError::ZeroCourseLimit("permanent".to_string()));
        }
        if self.other_course_limit == 0 {
            return Err(ConfigError::ZeroCourseLimit("affiliate/part-time".to_string()));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(())
    }

    pub fn lunch_window(&self) -> TimeSlot {
        TimeSlot::new(self.lunch_start, self.lunch_end)
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SchedulerConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_slot_longer_than_day_window_rejected() {
        // 07:30..18:00 共 630 分钟
        let config = SchedulerConfig {
            slot_minutes: i64::MAX,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SlotDurationTooLong {
                slot_minutes: i64::MAX,
                window_minutes: 630,
            })
        );

        let config = SchedulerConfig {
            slot_minutes: 630,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_duration_fails_fast() {
        let config = SchedulerConfig {
            slot_minutes: -30,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveSlotDuration(-30))
        );
    }

    #[test]
    fn test_inverted_windows_rejected() {
        let config = SchedulerConfig {
            day_end: hm(7, 0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDayWindow { .. })
        ));

        let config = SchedulerConfig {
            lunch_start: hm(13, 0),
            lunch_end: hm(12, 0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLunchWindow { .. })
        ));
    }
}

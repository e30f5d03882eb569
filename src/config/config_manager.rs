// ==========================================
// 课程排课系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::config_reader_trait::SchedulerConfigReader;
use crate::config::scheduler_config::{ConfigError, SchedulerConfig};
use crate::db::open_sqlite_connection;
use crate::domain::time_slot::{format_hhmm, parse_hhmm};
use async_trait::async_trait;
use chrono::NaiveTime;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
    defaults: SchedulerConfig,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, ConfigError> {
        let conn = open_sqlite_connection(db_path).map_err(|e| ConfigError::Storage(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            defaults: SchedulerConfig::default(),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigError> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| ConfigError::Storage(format!("锁获取失败: {}", e)))?;
            crate::db::configure_sqlite_connection(&conn_guard)
                .map_err(|e| ConfigError::Storage(e.to_string()))?;
        }

        Ok(Self {
            conn,
            defaults: SchedulerConfig::default(),
        })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::Storage(format!("锁获取失败: {}", e)))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(ConfigError::Storage(e.to_string())),
        }
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::Storage(format!("锁获取失败: {}", e)))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )
        .map_err(|e| ConfigError::Storage(e.to_string()))?;
        Ok(())
    }

    /// 读取并解析数值类配置；不存在时返回默认值，格式错误直接报错
    fn get_parsed_or<T: FromStr>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::UnparsableValue {
                key: key.to_string(),
                value: raw,
            }),
        }
    }

    fn get_time_or(&self, key: &str, default: NaiveTime) -> Result<NaiveTime, ConfigError> {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => parse_hhmm(&raw).ok_or(ConfigError::UnparsableValue {
                key: key.to_string(),
                value: raw,
            }),
        }
    }

    /// 获取排课相关配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 随排课结果一并记录，便于复现同一次运行
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::Storage(format!("锁获取失败: {}", e)))?;

        let mut stmt = conn
            .prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")
            .map_err(|e| ConfigError::Storage(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(|e| ConfigError::Storage(e.to_string()))?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row.map_err(|e| ConfigError::Storage(e.to_string()))?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&json!(config_map)).map_err(|e| ConfigError::Storage(e.to_string()))
    }
}

// ==========================================
// SchedulerConfigReader Trait 实现
// ==========================================
#[async_trait]
impl SchedulerConfigReader for ConfigManager {
    async fn get_day_start(&self) -> Result<NaiveTime, ConfigError> {
        self.get_time_or(config_keys::DAY_START, self.defaults.day_start)
    }

    async fn get_day_end(&self) -> Result<NaiveTime, ConfigError> {
        self.get_time_or(config_keys::DAY_END, self.defaults.day_end)
    }

    async fn get_slot_minutes(&self) -> Result<i64, ConfigError> {
        self.get_parsed_or(config_keys::SLOT_MINUTES, self.defaults.slot_minutes)
    }

    async fn get_lunch_window(&self) -> Result<(NaiveTime, NaiveTime), ConfigError> {
        let start = self.get_time_or(config_keys::LUNCH_START, self.defaults.lunch_start)?;
        let end = self.get_time_or(config_keys::LUNCH_END, self.defaults.lunch_end)?;
        Ok((start, end))
    }

    async fn get_permanent_course_limit(&self) -> Result<u32, ConfigError> {
        self.get_parsed_or(
            config_keys::PERMANENT_COURSE_LIMIT,
            self.defaults.permanent_course_limit,
        )
    }

    async fn get_other_course_limit(&self) -> Result<u32, ConfigError> {
        self.get_parsed_or(config_keys::OTHER_COURSE_LIMIT, self.defaults.other_course_limit)
    }

    async fn get_rollback_partial_assignments(&self) -> Result<bool, ConfigError> {
        match self.get_config_value(config_keys::ROLLBACK_PARTIAL_ASSIGNMENTS)? {
            None => Ok(self.defaults.rollback_partial_assignments),
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "y" => Ok(true),
                "0" | "false" | "no" | "n" => Ok(false),
                _ => Err(ConfigError::UnparsableValue {
                    key: config_keys::ROLLBACK_PARTIAL_ASSIGNMENTS.to_string(),
                    value: raw,
                }),
            },
        }
    }

    async fn get_batch_size(&self) -> Result<usize, ConfigError> {
        self.get_parsed_or(config_keys::BATCH_SIZE, self.defaults.batch_size)
    }
}

/// 将配置写回为可读字符串（种子数据/导出使用）
pub fn describe_config(config: &SchedulerConfig) -> Vec<(&'static str, String)> {
    vec![
        (config_keys::DAY_START, format_hhmm(config.day_start)),
        (config_keys::DAY_END, format_hhmm(config.day_end)),
        (config_keys::SLOT_MINUTES, config.slot_minutes.to_string()),
        (config_keys::LUNCH_START, format_hhmm(config.lunch_start)),
        (config_keys::LUNCH_END, format_hhmm(config.lunch_end)),
        (
            config_keys::PERMANENT_COURSE_LIMIT,
            config.permanent_course_limit.to_string(),
        ),
        (config_keys::OTHER_COURSE_LIMIT, config.other_course_limit.to_string()),
        (
            config_keys::ROLLBACK_PARTIAL_ASSIGNMENTS,
            config.rollback_partial_assignments.to_string(),
        ),
        (config_keys::BATCH_SIZE, config.batch_size.to_string()),
    ]
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 时间网格
    pub const DAY_START: &str = "day_start";
    pub const DAY_END: &str = "day_end";
    pub const SLOT_MINUTES: &str = "slot_minutes";
    pub const LUNCH_START: &str = "lunch_start";
    pub const LUNCH_END: &str = "lunch_end";

    // 课程数上限
    pub const PERMANENT_COURSE_LIMIT: &str = "permanent_course_limit";
    pub const OTHER_COURSE_LIMIT: &str = "other_course_limit";

    // 运行策略
    pub const ROLLBACK_PARTIAL_ASSIGNMENTS: &str = "rollback_partial_assignments";
    pub const BATCH_SIZE: &str = "batch_size";
}

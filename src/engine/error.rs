// ==========================================
// 课程排课系统 - 引擎层错误类型
// ==========================================
// PlacementError: 单个 (班级, 课程) 落位失败，引擎内部吞掉并计数
// EngineError: 运行级错误，中止本次运行
// ==========================================

use crate::config::ConfigError;
use crate::domain::types::DeliveryMode;
use thiserror::Error;

/// 单对落位失败原因
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlacementError {
    #[error("无可用教师")]
    NoEligibleFaculty,

    #[error("无可用教室")]
    NoEligibleRoom,

    #[error("无可用时段: mode={mode}")]
    NoAvailableSlot { mode: DeliveryMode },
}

impl PlacementError {
    /// 摘要统计使用的原因代码
    pub fn reason_code(&self) -> &'static str {
        match self {
            PlacementError::NoEligibleFaculty => "NO_ELIGIBLE_FACULTY",
            PlacementError::NoEligibleRoom => "NO_ELIGIBLE_ROOM",
            PlacementError::NoAvailableSlot {
                mode: DeliveryMode::FaceToFace,
            } => "NO_FACE_TO_FACE_SLOT",
            PlacementError::NoAvailableSlot {
                mode: DeliveryMode::Online,
            } => "NO_ONLINE_SLOT",
        }
    }
}

/// 运行级错误
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("配置错误: {0}")]
    Configuration(#[from] ConfigError),
}

pub type EngineResult<T> = Result<T, EngineError>;

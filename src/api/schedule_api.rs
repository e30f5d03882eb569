// ==========================================
// 课程排课系统 - 排课 API
// ==========================================
// 职责: 读取目录快照 → 运行编排器 → 组装响应（可选落库）
// 红线: 快照读取失败时中止，不返回部分结果
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::engine::orchestrator::AllocationOrchestrator;
use crate::domain::schedule::GenerationResult;
use crate::repository::catalog_repo::CatalogReader;
use crate::repository::schedule_repo::ScheduleStore;

// ==========================================
// 响应 DTO
// ==========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateScheduleResponse {
    pub success: bool,
    /// RFC 3339
    pub generated_at: String,
    pub run_id: String,
    pub data: GenerationResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub slot_count: usize,
}

// ==========================================
// ScheduleApi
// ==========================================

/// 排课API
///
/// 职责：
/// 1. 加载目录快照（可按学期过滤）
/// 2. 调用编排器生成一周课表
/// 3. 按需整表替换已保存的排课结果
pub struct ScheduleApi {
    catalog_reader: Arc<dyn CatalogReader>,
    schedule_store: Option<Arc<dyn ScheduleStore>>,
    orchestrator: AllocationOrchestrator,
}

impl ScheduleApi {
    pub fn new(catalog_reader: Arc<dyn CatalogReader>, orchestrator: AllocationOrchestrator) -> Self {
        Self {
            catalog_reader,
            schedule_store: None,
            orchestrator,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ScheduleStore>) -> Self {
        self.schedule_store = Some(store);
        self
    }

    /// 生成课表（不落库）
    ///
    /// # 参数
    /// - semester: 学期名（大小写不敏感），None 表示全部课程
    ///
    /// # 返回
    /// - Ok(GenerateScheduleResponse): 生成结果（部分覆盖也算成功）
    /// - Err(ApiError::DataUnavailable): 目录快照无法获取
    pub fn generate(&self, semester: Option<&str>) -> ApiResult<GenerateScheduleResponse> {
        let run_id = Uuid::new_v4().to_string();
        info!(run_id = %run_id, semester = semester.unwrap_or("All"), "开始生成课表");

        let catalog = self.catalog_reader.load_catalog(semester).map_err(|e| {
            error!(run_id = %run_id, error = %e, "目录快照读取失败");
            ApiError::DataUnavailable(e.to_string())
        })?;

        let data = self.orchestrator.generate(&catalog, semester);

        Ok(GenerateScheduleResponse {
            success: true,
            generated_at: Utc::now().to_rfc3339(),
            run_id,
            data,
        })
    }

    /// 生成课表并整表替换已保存结果
    pub fn generate_and_store(&self, semester: Option<&str>) -> ApiResult<GenerateScheduleResponse> {
        let store = self
            .schedule_store
            .as_ref()
            .ok_or_else(|| ApiError::InternalError("未配置排课结果存储".to_string()))?;

        let mut response = self.generate(semester)?;
        let saved = store.replace_all(&response.data.schedules)?;
        response.data.summary.schedules_saved = saved;

        info!(run_id = %response.run_id, saved, "排课结果已保存");
        Ok(response)
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
            slot_count: self.orchestrator.time_slots().len(),
        }
    }
}

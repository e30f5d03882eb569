// ==========================================
// 课程排课系统 - 引擎层
// ==========================================
// 职责: 实现排课规则与分配状态机,不拼 SQL
// 红线: 引擎只读目录快照,运行状态只存在于单次 generate 内
// ==========================================

pub mod eligibility;
pub mod error;
pub mod faculty_selector;
pub mod ledger;
pub mod orchestrator;
pub mod room_selector;
pub mod run_state;
pub mod session_assigner;
pub mod time_grid;
pub mod verify;

// 重导出核心引擎
pub use error::{EngineError, EngineResult, PlacementError};
pub use faculty_selector::{FacultyBucket, FacultyCandidate, FacultySelector};
pub use ledger::ConflictLedger;
pub use orchestrator::{build_assignment_list, AllocationOrchestrator, AssignmentPair};
pub use room_selector::RoomSelector;
pub use run_state::{AllocationPhase, RunState};
pub use session_assigner::SessionAssigner;
pub use time_grid::TimeGridGenerator;
pub use verify::{find_conflicts, ConflictResource, SessionConflict};

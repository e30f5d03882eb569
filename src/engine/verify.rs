// ==========================================
// 课程排课系统 - 结果复核
// ==========================================
// 对产出的课次列表重新做一次冲突检查：
// 同一天内，同教师 / 同实体教室 / 同班级的课次不得时间重叠
// ==========================================

use crate::domain::schedule::ScheduledSession;
use crate::domain::types::DeliveryMode;
use serde::Serialize;

/// 冲突资源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictResource {
    Faculty,
    Room,
    Section,
}

/// 一对冲突课次（下标指向输入列表）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionConflict {
    pub resource: ConflictResource,
    pub first: usize,
    pub second: usize,
}

/// 查找所有冲突
pub fn find_conflicts(sessions: &[ScheduledSession]) -> Vec<SessionConflict> {
    let mut conflicts = Vec::new();

    for (i, a) in sessions.iter().enumerate() {
        for (j, b) in sessions.iter().enumerate().skip(i + 1) {
            if a.day != b.day || !a.slot().overlaps(&b.slot()) {
                continue;
            }
            if a.faculty_id == b.faculty_id {
                conflicts.push(SessionConflict {
                    resource: ConflictResource::Faculty,
                    first: i,
                    second: j,
                });
            }
            // 线上课次不占用教室
            if a.room_id == b.room_id
                && a.delivery_mode == DeliveryMode::FaceToFace
                && b.delivery_mode == DeliveryMode::FaceToFace
            {
                conflicts.push(SessionConflict {
                    resource: ConflictResource::Room,
                    first: i,
                    second: j,
                });
            }
            if a.section_id == b.section_id {
                conflicts.push(SessionConflict {
                    resource: ConflictResource::Section,
                    first: i,
                    second: j,
                });
            }
        }
    }

    conflicts
}

// ==========================================
// 课程排课系统 - 领域类型定义
// ==========================================
// 教室类型 / 聘用类别 / 课程类型 / 授课方式 / 星期
// 外部数据均为自由文本，加载时在此统一归一化
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 教室类型 (Room Type)
// ==========================================
// 数据库值大小写不敏感
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Lecture,    // 普通讲授教室
    Laboratory, // 实验室
    Online,     // 线上虚拟教室
    Field,      // 场地/外出
    Tba,        // 待定
}

impl RoomType {
    /// 从数据库文本解析（大小写不敏感）
    ///
    /// 无法识别的值返回 None，由调用方决定降级策略
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "lecture" => Some(RoomType::Lecture),
            "laboratory" | "lab" => Some(RoomType::Laboratory),
            "online" => Some(RoomType::Online),
            "field" => Some(RoomType::Field),
            "tba" => Some(RoomType::Tba),
            _ => None,
        }
    }

    /// 是否为实体教室（参与教室冲突与使用量统计）
    pub fn is_physical(&self) -> bool {
        !matches!(self, RoomType::Online | RoomType::Field | RoomType::Tba)
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            RoomType::Lecture => "lecture",
            RoomType::Laboratory => "laboratory",
            RoomType::Online => "online",
            RoomType::Field => "field",
            RoomType::Tba => "tba",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 聘用类别 (Employment Type)
// ==========================================
// 决定可授课程类型与课程数上限
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentType {
    Permanent, // 正式/全职
    Affiliate, // 外聘
    PartTime,  // 兼职
}

impl EmploymentType {
    /// 从自由文本归一化
    ///
    /// # 规则
    /// - 含 permanent / full-time / full time / regular → Permanent
    /// - 含 affiliate → Affiliate
    /// - 其余（含 part-time 及无法识别的值）→ PartTime
    pub fn from_free_text(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        if normalized.contains("permanent")
            || normalized.contains("full time")
            || normalized.contains("fulltime")
            || normalized.contains("regular")
        {
            EmploymentType::Permanent
        } else if normalized.contains("affiliate") {
            EmploymentType::Affiliate
        } else {
            EmploymentType::PartTime
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            EmploymentType::Permanent => "permanent",
            EmploymentType::Affiliate => "affiliate",
            EmploymentType::PartTime => "part-time",
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 课程类型 (Course Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseType {
    Major, // 专业课（必须使用实验室）
    Minor, // 公共/通识课
}

impl CourseType {
    /// 无法识别的值按 Minor 处理
    pub fn from_free_text(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("major") {
            CourseType::Major
        } else {
            CourseType::Minor
        }
    }

    pub fn is_major(&self) -> bool {
        matches!(self, CourseType::Major)
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            CourseType::Major => "major",
            CourseType::Minor => "minor",
        }
    }
}

impl fmt::Display for CourseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 授课方式 (Delivery Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeliveryMode {
    #[serde(rename = "Face-to-face")]
    FaceToFace,
    #[serde(rename = "Online")]
    Online,
}

impl DeliveryMode {
    /// 起始星期的偏移量（同一课程的两次课错开）
    pub fn day_offset(&self) -> i64 {
        match self {
            DeliveryMode::FaceToFace => 0,
            DeliveryMode::Online => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMode::FaceToFace => "Face-to-face",
            DeliveryMode::Online => "Online",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "face-to-face" | "face to face" | "f2f" => Some(DeliveryMode::FaceToFace),
            "online" => Some(DeliveryMode::Online),
            _ => None,
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 星期 (Weekday)
// ==========================================
// 固定周一至周五，代码 M/T/W/TH/F
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "M")]
    Monday,
    #[serde(rename = "T")]
    Tuesday,
    #[serde(rename = "W")]
    Wednesday,
    #[serde(rename = "TH")]
    Thursday,
    #[serde(rename = "F")]
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// 按索引取星期（自动取模）
    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(Self::ALL.len() as i64) as usize]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Weekday::Monday => "M",
            Weekday::Tuesday => "T",
            Weekday::Wednesday => "W",
            Weekday::Thursday => "TH",
            Weekday::Friday => "F",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.code().eq_ignore_ascii_case(code.trim()))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employment_type_normalization() {
        assert_eq!(EmploymentType::from_free_text("Permanent"), EmploymentType::Permanent);
        assert_eq!(EmploymentType::from_free_text("FULL-TIME"), EmploymentType::Permanent);
        assert_eq!(EmploymentType::from_free_text("Full Time"), EmploymentType::Permanent);
        assert_eq!(EmploymentType::from_free_text(" affiliate "), EmploymentType::Affiliate);
        assert_eq!(EmploymentType::from_free_text("Part-time"), EmploymentType::PartTime);
        assert_eq!(EmploymentType::from_free_text("contractual"), EmploymentType::PartTime);
    }

    #[test]
    fn test_room_type_parse_is_case_insensitive() {
        assert_eq!(RoomType::parse("LABORATORY"), Some(RoomType::Laboratory));
        assert_eq!(RoomType::parse("Online"), Some(RoomType::Online));
        assert_eq!(RoomType::parse("TBA"), Some(RoomType::Tba));
        assert_eq!(RoomType::parse("gym"), None);
        assert!(!RoomType::Field.is_physical());
        assert!(RoomType::Lecture.is_physical());
    }

    #[test]
    fn test_weekday_rotation_and_codes() {
        assert_eq!(Weekday::from_index(0), Weekday::Monday);
        assert_eq!(Weekday::from_index(7), Weekday::Wednesday);
        assert_eq!(Weekday::from_code("th"), Some(Weekday::Thursday));
        assert_eq!(serde_json::to_string(&Weekday::Thursday).unwrap(), "\"TH\"");
        assert_eq!(
            serde_json::to_string(&DeliveryMode::FaceToFace).unwrap(),
            "\"Face-to-face\""
        );
    }
}

use serde::{Deserialize, Serialize};

/// 作业科目
///
/// 用于给一组扫描作业标注科目，序列化为小写下划线形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Mathematics,
    English,
    Science,
    Physics,
    Chemistry,
    Biology,
    History,
    Geography,
    ComputerScience,
    Art,
}

impl Subject {
    pub const ALL: [Subject; 10] = [
        Subject::Mathematics,
        Subject::English,
        Subject::Science,
        Subject::Physics,
        Subject::Chemistry,
        Subject::Biology,
        Subject::History,
        Subject::Geography,
        Subject::ComputerScience,
        Subject::Art,
    ];

    /// 获取显示名称
    pub fn name(self) -> &'static str {
        match self {
            Subject::Mathematics => "Mathematics",
            Subject::English => "English",
            Subject::Science => "Science",
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Biology => "Biology",
            Subject::History => "History",
            Subject::Geography => "Geography",
            Subject::ComputerScience => "Computer Science",
            Subject::Art => "Art",
        }
    }

    /// 智能查找科目：精确匹配名称，其次匹配常见缩写
    pub fn find(s: &str) -> Option<Self> {
        let needle = s.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        if let Some(subject) = Self::ALL
            .iter()
            .copied()
            .find(|subject| subject.name().to_lowercase() == needle)
        {
            return Some(subject);
        }

        match needle.as_str() {
            "math" | "maths" => Some(Subject::Mathematics),
            "eng" => Some(Subject::English),
            "phys" => Some(Subject::Physics),
            "chem" => Some(Subject::Chemistry),
            "bio" => Some(Subject::Biology),
            "geo" => Some(Subject::Geography),
            "cs" | "computing" => Some(Subject::ComputerScience),
            _ => None,
        }
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

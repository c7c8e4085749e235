//! 리서치 노트 주제.

use serde::{Deserialize, Serialize};

/// 리서치 노트의 고정 주제 집합.
///
/// 대시보드의 노트 입력 폼에서 선택 가능한 값과 1:1로 대응합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteTopic {
    #[serde(rename = "Competitors")]
    Competitors,
    #[serde(rename = "10-K Summary")]
    TenKSummary,
    #[serde(rename = "Product Roadmap")]
    ProductRoadmap,
    #[serde(rename = "Sector Analysis")]
    SectorAnalysis,
}

impl NoteTopic {
    /// 선택 가능한 전체 주제 목록.
    pub const ALL: [NoteTopic; 4] = [
        NoteTopic::Competitors,
        NoteTopic::TenKSummary,
        NoteTopic::ProductRoadmap,
        NoteTopic::SectorAnalysis,
    ];

    /// 저장소에 기록되는 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Competitors => "Competitors",
            Self::TenKSummary => "10-K Summary",
            Self::ProductRoadmap => "Product Roadmap",
            Self::SectorAnalysis => "Sector Analysis",
        }
    }
}

impl std::fmt::Display for NoteTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NoteTopic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Competitors" => Ok(Self::Competitors),
            "10-K Summary" => Ok(Self::TenKSummary),
            "Product Roadmap" => Ok(Self::ProductRoadmap),
            "Sector Analysis" => Ok(Self::SectorAnalysis),
            other => Err(format!(
                "Unknown note topic: {} (expected one of: {})",
                other,
                Self::ALL.map(|t| t.as_str()).join(", ")
            )),
        }
    }
}

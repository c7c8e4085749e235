//! 조회 대상 리소스 종류.

use serde::{Deserialize, Serialize};

/// 캐시-조회-저장 시퀀스가 다루는 리소스 종류.
///
/// - `Price`: 티커의 현재가 (Finnhub quote)
/// - `CompanyNews`: 티커별 기업 뉴스 (Finnhub company news)
/// - `MacroNews`: 자유 검색어 기반 매크로 뉴스 (TheNewsAPI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Price,
    CompanyNews,
    MacroNews,
}

impl ResourceKind {
    /// API 로그에 기록되는 외부 API 이름.
    pub fn api_name(&self) -> &'static str {
        match self {
            Self::Price => "finnhub_quote",
            Self::CompanyNews => "finnhub_company_news",
            Self::MacroNews => "thenewsapi_search",
        }
    }

    /// 저장 레코드에 기록되는 출처 문자열.
    pub fn source(&self) -> &'static str {
        match self {
            Self::Price | Self::CompanyNews => "Finnhub",
            Self::MacroNews => "TheNewsAPI",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Price => write!(f, "price"),
            Self::CompanyNews => write!(f, "company_news"),
            Self::MacroNews => write!(f, "macro_news"),
        }
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "price" => Ok(Self::Price),
            "company_news" => Ok(Self::CompanyNews),
            "macro_news" => Ok(Self::MacroNews),
            _ => Err(format!("Unknown resource kind: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parse_roundtrip() {
        for kind in [
            ResourceKind::Price,
            ResourceKind::CompanyNews,
            ResourceKind::MacroNews,
        ] {
            let parsed: ResourceKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("orderbook".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_api_name_and_source() {
        assert_eq!(ResourceKind::Price.api_name(), "finnhub_quote");
        assert_eq!(ResourceKind::Price.source(), "Finnhub");
        assert_eq!(ResourceKind::MacroNews.source(), "TheNewsAPI");
    }
}

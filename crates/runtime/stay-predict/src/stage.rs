//! Display-only analysis stages

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalysisStage {
    PropertyInfo,
    MarketData,
    ModelRun,
    ComparableSearch,
    Complete,
}

/// How a stage row is drawn relative to the active stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageMarker {
    Done,
    Active,
    Waiting,
}

impl AnalysisStage {
    pub const ALL: [AnalysisStage; 5] = [
        AnalysisStage::PropertyInfo,
        AnalysisStage::MarketData,
        AnalysisStage::ModelRun,
        AnalysisStage::ComparableSearch,
        AnalysisStage::Complete,
    ];

    pub const FIRST: AnalysisStage = AnalysisStage::PropertyInfo;

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> Option<AnalysisStage> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn message(&self) -> &'static str {
        match self {
            AnalysisStage::PropertyInfo => "숙소 정보 분석 중...",
            AnalysisStage::MarketData => "주변 시세 데이터 수집 중...",
            AnalysisStage::ModelRun => "AI 모델 예측 실행 중...",
            AnalysisStage::ComparableSearch => "유사 매물 검색 중...",
            AnalysisStage::Complete => "최종 분석 완료!",
        }
    }

    pub fn marker(&self, active: AnalysisStage) -> StageMarker {
        match self.cmp(&active) {
            std::cmp::Ordering::Less => StageMarker::Done,
            std::cmp::Ordering::Equal => StageMarker::Active,
            std::cmp::Ordering::Greater => StageMarker::Waiting,
        }
    }
}

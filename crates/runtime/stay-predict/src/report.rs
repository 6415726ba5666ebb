//! PDF report export (not available)

use crate::Analysis;

/// Notice surfaced when the host asks for a report
pub const REPORT_NOTICE: &str = "PDF 리포트 다운로드 기능은 실제 구현에서 제공됩니다.";

/// Always fails with [`stay_core::Error::NotImplemented`].
pub fn download_report(analysis: &Analysis) -> stay_core::Result<Vec<u8>> {
    tracing::info!(
        predicted_price = analysis.prediction.predicted_price,
        "report download requested"
    );
    Err(stay_core::Error::NotImplemented(REPORT_NOTICE.to_string()))
}

//! Report Service

use super::{ApiClient, CancelToken, Endpoint};
use crate::error::ApiResult;
use crate::models::{DateRange, ExportFormat, ExportedReport, Statistics};

pub async fn statistics(client: &ApiClient, range: &DateRange, cancel: &CancelToken) -> ApiResult<Statistics> {
    client
        .get_with_query(&Endpoint::ReportsStatistics, &range.to_query(), cancel)
        .await
}

/// Download a generated report; the caller hands the bytes to the browser
pub async fn export(
    client: &ApiClient,
    range: &DateRange,
    format: ExportFormat,
    cancel: &CancelToken,
) -> ApiResult<ExportedReport> {
    let mut query = range.to_query();
    query.push(("format", format.as_str().to_string()));
    let bytes = client.get_bytes(&Endpoint::ReportsGenerate, &query, cancel).await?;
    Ok(ExportedReport {
        file_name: file_name(range, format),
        mime_type: format.mime_type(),
        bytes,
    })
}

pub fn file_name(range: &DateRange, format: ExportFormat) -> String {
    format!(
        "reporte_{}_{}.{}",
        range.start.format("%Y-%m-%d"),
        range.end.format("%Y-%m-%d"),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{client_with, FakeTransport};
    use crate::api::Method;
    use chrono::NaiveDate;
    use serde_json::json;

    fn march() -> DateRange {
        DateRange {
            start: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_statistics_query() {
        let fake = FakeTransport::new();
        fake.on(
            Method::Get,
            "/reports/statistics/?start_date=2025-03-01&end_date=2025-03-31",
            200,
            json!({"total_incidencias": 14, "incidencias_por_estado": {"REPORTADA": 9, "RESUELTA": 5}, "total_tareas": 4, "tareas_completadas": 1}),
        );
        let client = client_with(fake.clone());

        let stats = statistics(&client, &march(), &CancelToken::new()).await.unwrap();
        assert_eq!(stats.total_incidencias, 14);
        assert_eq!(stats.incidencias_por_estado.get("RESUELTA"), Some(&5));
        assert_eq!(stats.task_completion_percent(), 25);
    }

    #[tokio::test]
    async fn test_export_names_file() {
        let fake = FakeTransport::new();
        fake.on_raw(
            Method::Get,
            "/reports/generate/?start_date=2025-03-01&end_date=2025-03-31&format=excel",
            200,
            b"PK\x03\x04".to_vec(),
        );
        let client = client_with(fake.clone());

        let report = export(&client, &march(), ExportFormat::Excel, &CancelToken::new()).await.unwrap();
        assert_eq!(report.file_name, "reporte_2025-03-01_2025-03-31.xlsx");
        assert_eq!(report.bytes, b"PK\x03\x04".to_vec());
        assert_eq!(file_name(&march(), ExportFormat::Pdf), "reporte_2025-03-01_2025-03-31.pdf");
    }
}

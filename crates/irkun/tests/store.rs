//! Collected financials written through the JSON store of the settings.

use async_trait::async_trait;
use chrono::NaiveDate;
use irkun::{
    API_KEY_VAR, CompanyOutcome, DATA_DIR_VAR, FilingDocument, FilingSource, FinancialsPipeline,
    FinancialsStore, Result, Settings, default_companies, find_company,
};
use serde_json::{Value, json};
use std::io::{Cursor, Write};
use std::sync::Arc;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const INSTANCE: &str = r#"<xbrli:xbrl xmlns:xbrli="http://www.xbrl.org/2003/instance"
    xmlns:jppfs_cor="http://disclosure.edinet-fsa.go.jp/taxonomy/jppfs/2024-11-01/jppfs_cor">
  <jppfs_cor:NetSales contextRef="CurrentYearDuration_NonConsolidatedMember">3500000000</jppfs_cor:NetSales>
  <jppfs_cor:OrdinaryIncome contextRef="CurrentYearDuration_NonConsolidatedMember">412500000</jppfs_cor:OrdinaryIncome>
</xbrli:xbrl>"#;

/// One annual report of Welbe filed on 2025-06-24.
#[derive(Debug)]
struct OneReport;

#[async_trait]
impl FilingSource for OneReport {
    fn name(&self) -> &str {
        "one-report"
    }

    async fn get_documents(&self, date: NaiveDate) -> Result<Vec<FilingDocument>> {
        if date != NaiveDate::from_ymd_opt(2025, 6, 24).unwrap() {
            return Ok(Vec::new());
        }
        Ok(vec![FilingDocument {
            sec_code: Some("65560".into()),
            ordinance_code: Some("010".into()),
            form_code: Some("030000".into()),
            period_end: NaiveDate::from_ymd_opt(2025, 3, 31),
            ..FilingDocument::new("S100W001")
        }])
    }

    async fn download_archive(&self, _doc_id: &str) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("XBRL/PublicDoc/jpcrp030000-asr-001.xbrl", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(INSTANCE.as_bytes()).unwrap();
        Ok(writer.finish().unwrap().into_inner())
    }
}

#[tokio::test]
async fn test_collected_financials_are_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().to_string_lossy().into_owned();
    let settings = Settings::from_lookup(|name| match name {
        API_KEY_VAR => Some("test-key".into()),
        DATA_DIR_VAR => Some(data_dir.clone()),
        _ => None,
    })
    .unwrap();
    let store = settings.store();

    std::fs::write(
        store.companies_path(),
        r#"[{"id": "welbe", "name": "ウェルビー", "hasFullData": false}]"#,
    )
    .unwrap();

    let companies = default_companies();
    let welbe = find_company(&companies, "welbe").unwrap();
    let pipeline = FinancialsPipeline::new(Arc::new(OneReport))
        .with_years(0)
        .with_today(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());

    let CompanyOutcome::Updated(financials) = pipeline.process_company(welbe).await.unwrap() else {
        panic!("expected financials for welbe");
    };
    assert_eq!(store.upsert(&[financials]).await.unwrap(), 1);
    assert_eq!(store.mark_full_data(&[welbe.id.clone()]).await.unwrap(), 1);

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(store.financials_path()).unwrap()).unwrap();
    assert_eq!(
        written,
        json!([{
            "companyId": "welbe",
            "currency": "JPY",
            "unit": "million",
            "fiscalYears": [{
                "year": "2025年3月期",
                "revenue": 3500,
                "ordinaryProfit": 412
            }]
        }])
    );

    let companies: Value =
        serde_json::from_str(&std::fs::read_to_string(store.companies_path()).unwrap()).unwrap();
    assert_eq!(
        companies,
        json!([{"id": "welbe", "name": "ウェルビー", "hasFullData": true}])
    );
}

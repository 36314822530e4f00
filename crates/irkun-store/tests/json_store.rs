use irkun_core::{CompanyFinancials, CompanyId, FinancialsStore, FiscalYearRecord};
use irkun_store::JsonFileStore;
use serde_json::{Value, json};
use tempfile::TempDir;

fn record(year: &str, revenue: i64) -> FiscalYearRecord {
    FiscalYearRecord {
        revenue: Some(revenue),
        ..FiscalYearRecord::new(year)
    }
}

fn read(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_missing_files_are_empty() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::in_dir(dir.path());

    assert!(store.load().await.unwrap().is_empty());
    assert_eq!(store.mark_full_data(&[CompanyId::new("sms")]).await.unwrap(), 0);
    assert!(!store.companies_path().exists());
}

#[tokio::test]
async fn test_upsert_replaces_and_appends() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::in_dir(dir.path().join("data"));

    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    std::fs::write(
        store.financials_path(),
        serde_json::to_string(&json!([
            {"companyId": "welbe", "currency": "JPY", "unit": "million",
             "fiscalYears": [{"year": "2024年3月期", "revenue": 12000, "segments": []}]},
            {"companyId": "litalico", "currency": "JPY", "unit": "million", "fiscalYears": []}
        ]))
        .unwrap(),
    )
    .unwrap();

    let total = store
        .upsert(&[
            CompanyFinancials::new(CompanyId::new("litalico"), vec![record("2025年3月期", 32000)]),
            CompanyFinancials::new(CompanyId::new("sms"), vec![record("2025年3月期", 60000)]),
        ])
        .await
        .unwrap();
    assert_eq!(total, 3);

    let written = read(store.financials_path());
    let ids: Vec<_> = written
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["companyId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["welbe", "litalico", "sms"]);

    // Fields not modelled by the store survive in untouched entries.
    assert_eq!(written[0]["fiscalYears"][0]["segments"], json!([]));
    // Unknown figures are omitted, not written as null or zero.
    assert_eq!(
        written[1]["fiscalYears"][0],
        json!({"year": "2025年3月期", "revenue": 32000})
    );

    let litalico = store.get(&CompanyId::new("litalico")).await.unwrap().unwrap();
    assert_eq!(litalico.fiscal_years, vec![record("2025年3月期", 32000)]);
    assert!(!dir.path().join("data/financials.json.tmp").exists());
}

#[tokio::test]
async fn test_output_is_pretty_utf8() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::in_dir(dir.path());
    store
        .upsert(&[CompanyFinancials::new(CompanyId::new("copel"), vec![record("2025年3月期", 3500)])])
        .await
        .unwrap();

    let text = std::fs::read_to_string(store.financials_path()).unwrap();
    assert!(text.contains("2025年3月期"));
    assert!(text.contains("\n  {\n    \"companyId\": \"copel\""));
}

#[tokio::test]
async fn test_empty_upsert_does_not_write() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::in_dir(dir.path());
    assert_eq!(store.upsert(&[]).await.unwrap(), 0);
    assert!(!store.financials_path().exists());
}

#[tokio::test]
async fn test_mark_full_data_preserves_other_fields() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::in_dir(dir.path());
    let companies = json!([
        {"id": "litalico", "name": "LITALICO", "hasFullData": true},
        {"id": "welbe", "name": "ウェルビー", "tags": ["就労移行"]},
        {"id": "sms", "name": "SMS", "hasFullData": false}
    ]);
    std::fs::write(store.companies_path(), companies.to_string()).unwrap();

    let ids = ["litalico", "welbe", "sms", "recruit"].map(CompanyId::new);
    assert_eq!(store.mark_full_data(&ids).await.unwrap(), 2);

    let written = read(store.companies_path());
    assert_eq!(
        written,
        json!([
            {"id": "litalico", "name": "LITALICO", "hasFullData": true},
            {"id": "welbe", "name": "ウェルビー", "tags": ["就労移行"], "hasFullData": true},
            {"id": "sms", "name": "SMS", "hasFullData": true}
        ])
    );

    assert_eq!(store.mark_full_data(&ids).await.unwrap(), 0);
}

#[tokio::test]
async fn test_corrupt_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::in_dir(dir.path());
    std::fs::write(store.financials_path(), "{not json").unwrap();
    assert!(store.load().await.is_err());
    assert!(store.upsert(&[]).await.is_err());
}

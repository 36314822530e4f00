//! Default company registry.

use irkun_core::{Company, DataError, Result, SecurityCode};

/// Tracked companies: product id, security code, name.
const COMPANIES: &[(&str, &str, &str)] = &[
    ("litalico", "7366", "LITALICO"),
    ("welbe", "6556", "ウェルビー"),
    ("cocoruport", "9346", "ココルポート"),
    ("spool", "2471", "エスプール"),
    ("sms", "2175", "SMS"),
    ("persol", "2181", "パーソルホールディングス"),
    ("pasona", "2168", "パソナグループ"),
    ("copel", "9726", "コペル"),
    ("nd_software", "3794", "NDソフトウェア"),
    ("kanamic", "3939", "カナミックネットワーク"),
    ("sorust", "6197", "ソラスト"),
    ("care21", "2373", "ケア21"),
    ("saint_care", "9014", "セントケア・ホールディング"),
    ("unimat", "9707", "ユニマット リタイアメント・コミュニティ"),
    ("medley", "4480", "メドレー"),
    ("visional", "4194", "ビジョナル"),
    ("recruit", "6098", "リクルートホールディングス"),
];

/// Returns the default registry, in a fixed order.
#[must_use]
pub fn default_companies() -> Vec<Company> {
    COMPANIES
        .iter()
        .filter_map(|(id, code, name)| {
            let code = SecurityCode::new(*code).ok()?;
            Some(Company::new(*id, code, *name))
        })
        .collect()
}

/// Finds a company by id.
///
/// # Errors
/// Returns [`DataError::UnknownCompany`] listing the available ids.
pub fn find_company<'a>(companies: &'a [Company], id: &str) -> Result<&'a Company> {
    companies
        .iter()
        .find(|c| c.id.as_str() == id)
        .ok_or_else(|| {
            let available: Vec<&str> = companies.iter().map(|c| c.id.as_str()).collect();
            DataError::UnknownCompany(format!("{id} (available: {})", available.join(", ")))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_is_complete_and_unique() {
        let companies = default_companies();
        assert_eq!(companies.len(), COMPANIES.len());
        assert_eq!(companies.len(), 17);

        let ids: HashSet<_> = companies.iter().map(|c| c.id.as_str()).collect();
        let codes: HashSet<_> = companies.iter().map(|c| c.security_code.as_str()).collect();
        assert_eq!(ids.len(), companies.len());
        assert_eq!(codes.len(), companies.len());
    }

    #[test]
    fn test_find_company() {
        let companies = default_companies();
        let sms = find_company(&companies, "sms").unwrap();
        assert_eq!(sms.security_code.as_str(), "2175");

        let err = find_company(&companies, "acme").unwrap_err();
        assert!(matches!(err, DataError::UnknownCompany(ref m) if m.contains("litalico")));
    }
}

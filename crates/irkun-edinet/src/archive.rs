//! Extraction of the primary XBRL instance from an EDINET archive.
//!
//! An archive holds the instance of the filing under `XBRL/PublicDoc/` and
//! the auditor's reports under `XBRL/AuditDoc/`. When several candidate
//! instances remain, the one with the longest path is taken; EDINET does not
//! document which file is primary, so this is a heuristic.

use std::io::{Cursor, Read};
use tracing::{debug, warn};
use zip::ZipArchive;

const INSTANCE_EXTENSION: &str = ".xbrl";
const PUBLIC_DOC: &str = "PublicDoc";
const AUDIT_DOC: &str = "AuditDoc";

/// Picks the primary instance among the entry names of an archive.
///
/// Entries under `PublicDoc` are preferred; `AuditDoc` entries are never
/// chosen. Among the remaining candidates the longest name wins, the first
/// one on ties.
#[must_use]
pub fn select_instance<'a, I>(names: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let instances: Vec<&str> = names
        .into_iter()
        .filter(|name| name.ends_with(INSTANCE_EXTENSION) && !name.contains(AUDIT_DOC))
        .collect();

    longest(instances.iter().copied().filter(|n| n.contains(PUBLIC_DOC)))
        .or_else(|| longest(instances.iter().copied()))
}

fn longest<'a>(candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    candidates.reduce(|best, name| if name.len() > best.len() { name } else { best })
}

/// Returns the text of the primary XBRL instance in a zip archive.
///
/// A malformed archive, an archive without an instance, and an instance that
/// is not UTF-8 all yield `None` and a warning.
#[must_use]
pub fn extract_xbrl(bytes: &[u8]) -> Option<String> {
    let mut archive = match ZipArchive::new(Cursor::new(bytes)) {
        Ok(archive) => archive,
        Err(e) => {
            warn!(error = %e, "Bad zip file");
            return None;
        }
    };

    let name = {
        let names: Vec<&str> = archive.file_names().collect();
        match select_instance(names) {
            Some(name) => name.to_string(),
            None => {
                warn!(entries = archive.len(), "No .xbrl file found in archive");
                return None;
            }
        }
    };
    debug!(%name, "Selected XBRL instance");

    let mut raw = Vec::new();
    let read = archive
        .by_name(&name)
        .map_err(|e| e.to_string())
        .and_then(|mut file| file.read_to_end(&mut raw).map_err(|e| e.to_string()));
    if let Err(e) = read {
        warn!(%name, error = %e, "Could not read XBRL instance");
        return None;
    }

    match String::from_utf8(raw) {
        Ok(text) => Some(match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        }),
        Err(e) => {
            warn!(%name, error = %e, "XBRL instance is not UTF-8");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_select_prefers_public_doc() {
        let names = [
            "XBRL/AuditDoc/jpaud-aai-cc-001_E05707-000_2025-03-31_01_2025-06-20.xbrl",
            "XBRL/Other/jpcrp030000-asr-001_E05707-000_2025-03-31_01_2025-06-20_long.xbrl",
            "XBRL/PublicDoc/jpcrp030000-asr-001_E05707-000_2025-03-31_01_2025-06-20.xbrl",
            "XBRL/PublicDoc/manifest_PublicDoc.xml",
        ];
        assert_eq!(
            select_instance(names),
            Some("XBRL/PublicDoc/jpcrp030000-asr-001_E05707-000_2025-03-31_01_2025-06-20.xbrl")
        );
    }

    #[test]
    fn test_select_longest_name_first_on_ties() {
        let names = ["XBRL/PublicDoc/a.xbrl", "XBRL/PublicDoc/abc.xbrl", "XBRL/PublicDoc/xyz.xbrl"];
        assert_eq!(select_instance(names), Some("XBRL/PublicDoc/abc.xbrl"));
    }

    #[test]
    fn test_select_falls_back_outside_public_doc() {
        let names = ["XBRL/AuditDoc/audit_report.xbrl", "XBRL/instance.xbrl"];
        assert_eq!(select_instance(names), Some("XBRL/instance.xbrl"));
        assert_eq!(select_instance(["XBRL/AuditDoc/audit.xbrl"]), None);
        assert_eq!(select_instance(["XBRL/PublicDoc/0000000_header.htm"]), None);
    }

    #[test]
    fn test_extract_reads_instance() {
        let bytes = build_zip(&[
            ("XBRL/AuditDoc/audit.xbrl", b"<audit/>".as_slice()),
            ("XBRL/PublicDoc/jpcrp030000-asr-001.xbrl", "\u{feff}<xbrli:xbrl/>".as_bytes()),
        ]);
        assert_eq!(extract_xbrl(&bytes).as_deref(), Some("<xbrli:xbrl/>"));
    }

    #[test]
    fn test_extract_bad_input_is_none() {
        assert_eq!(extract_xbrl(b"not a zip"), None);
        assert_eq!(extract_xbrl(&build_zip(&[("XBRL/PublicDoc/a.htm", b"<html/>".as_slice())])), None);
        assert_eq!(
            extract_xbrl(&build_zip(&[("XBRL/PublicDoc/a.xbrl", [0xffu8, 0xfe, 0x00].as_slice())])),
            None
        );
    }
}

//! PDF document store
//!
//! Lays a `ClaimDocument` out on a single A4 page with lopdf and writes it
//! to the output directory as `claim_<key>_<YYYYmmdd_HHMMSS>.pdf`. Loading
//! by key returns the newest matching file.
//!
//! Text is drawn with the standard Helvetica fonts in WinAnsiEncoding;
//! characters outside that code page are written as `?`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use tracing::{debug, info};

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_claims::{ClaimDocument, DocumentReference, DocumentStore, StoredDocument};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 72;
const VALUE_COLUMN: i64 = 260;
const LINE_HEIGHT: i64 = 18;

/// Stores claim documents as PDF files in one directory
#[derive(Debug, Clone)]
pub struct PdfDocumentStore {
    output_dir: PathBuf,
}

impl PdfDocumentStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File name for a document rendered now
    pub fn filename_for(document: &ClaimDocument) -> String {
        format!(
            "claim_{}_{}.pdf",
            document.key,
            Utc::now().format("%Y%m%d_%H%M%S")
        )
    }

    /// Lays a document out as PDF bytes
    pub fn layout(document: &ClaimDocument) -> Result<Vec<u8>, PortError> {
        let mut ops = Vec::new();
        let mut y = PAGE_HEIGHT - MARGIN;

        text(&mut ops, "F2", 18, MARGIN, y, &document.title);
        y -= LINE_HEIGHT * 2;

        for line in &document.header {
            labelled(&mut ops, y, &line.label, &line.value);
            y -= LINE_HEIGHT;
        }

        for section in &document.sections {
            y -= LINE_HEIGHT;
            text(&mut ops, "F2", 13, MARGIN, y, &section.heading);
            y -= LINE_HEIGHT;
            for line in &section.lines {
                labelled(&mut ops, y, &line.label, &line.value);
                y -= LINE_HEIGHT;
            }
        }

        text(&mut ops, "F1", 8, MARGIN, MARGIN, &document.footer);

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular,
                "F2" => bold,
            },
        });

        let content = Content { operations: ops };
        let encoded = content
            .encode()
            .map_err(|e| PortError::transformation(format!("PDF content encoding failed: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| PortError::internal(format!("PDF serialization failed: {}", e)))?;
        Ok(bytes)
    }

    async fn newest_for(&self, key: &str) -> Result<Option<String>, PortError> {
        let prefix = format!("claim_{}_", key);

        let mut entries = match tokio::fs::read_dir(&self.output_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PortError::io("listing output directory", e)),
        };

        let mut newest: Option<String> = None;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PortError::io("listing output directory", e))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            // keys may contain `_`, so the rest must be exactly the timestamp
            let matches = name
                .strip_prefix(&prefix)
                .is_some_and(is_timestamped_pdf);
            if matches && newest.as_deref().map_or(true, |current| name.as_str() > current) {
                newest = Some(name);
            }
        }
        Ok(newest)
    }
}

fn text(ops: &mut Vec<Operation>, font: &str, size: i64, x: i64, y: i64, value: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![Object::String(win_ansi(value), StringFormat::Literal)]));
    ops.push(Operation::new("ET", vec![]));
}

/// Transcodes to the WinAnsi code page used by the standard fonts
fn win_ansi(value: &str) -> Vec<u8> {
    value
        .chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            _ => b'?',
        })
        .collect()
}

/// `YYYYmmdd_HHMMSS.pdf`
fn is_timestamped_pdf(rest: &str) -> bool {
    let Some(stamp) = rest.strip_suffix(".pdf") else {
        return false;
    };
    stamp.len() == 15
        && stamp.char_indices().all(|(i, c)| {
            if i == 8 {
                c == '_'
            } else {
                c.is_ascii_digit()
            }
        })
}

fn labelled(ops: &mut Vec<Operation>, y: i64, label: &str, value: &str) {
    text(ops, "F2", 11, MARGIN, y, &format!("{}:", label));
    text(ops, "F1", 11, VALUE_COLUMN, y, value);
}

/// Keys become part of a file name; only `[A-Za-z0-9_-]` is accepted
fn validate_key(key: &str) -> Result<(), PortError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(PortError::validation_field(
            format!("invalid document key '{}'", key),
            "key",
        ))
    }
}

impl DomainPort for PdfDocumentStore {}

#[async_trait]
impl DocumentStore for PdfDocumentStore {
    async fn render(&self, document: &ClaimDocument) -> Result<DocumentReference, PortError> {
        validate_key(&document.key)?;
        let bytes = Self::layout(document)?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| PortError::io("creating output directory", e))?;

        let filename = Self::filename_for(document);
        let path = self.output_dir.join(&filename);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| PortError::io(format!("writing {}", path.display()), e))?;

        info!(key = %document.key, path = %path.display(), size = bytes.len(), "PDF document written");
        Ok(DocumentReference {
            key: document.key.clone(),
            filename,
        })
    }

    async fn load(&self, key: &str) -> Result<StoredDocument, PortError> {
        validate_key(key)?;
        let filename = self
            .newest_for(key)
            .await?
            .ok_or_else(|| PortError::not_found("Document", key))?;

        let path = self.output_dir.join(&filename);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| PortError::io(format!("reading {}", path.display()), e))?;
        debug!(key = %key, filename = %filename, "PDF document loaded");

        Ok(StoredDocument {
            filename,
            content_type: "application/pdf",
            bytes,
        })
    }
}

#[async_trait]
impl HealthCheckable for PdfDocumentStore {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let (status, message) = match tokio::fs::create_dir_all(&self.output_dir).await {
            Ok(()) => match tokio::fs::metadata(&self.output_dir).await {
                Ok(meta) if meta.permissions().readonly() => (
                    AdapterHealth::Degraded,
                    Some("output directory is read-only".to_string()),
                ),
                Ok(_) => (AdapterHealth::Healthy, None),
                Err(e) => (AdapterHealth::Unhealthy, Some(e.to_string())),
            },
            Err(e) => (AdapterHealth::Unhealthy, Some(e.to_string())),
        };

        HealthCheckResult {
            adapter_id: "pdf-document-store".to_string(),
            status,
            latency_ms: start.elapsed().as_millis() as u64,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("CLM-0f8e6a2c-1b7d-4c1e-9a55-3f2a1d0c9b8e").is_ok());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("").is_err());
    }

    #[test]
    fn test_win_ansi_maps_currency_symbols_to_single_bytes() {
        assert_eq!(win_ansi("$100"), b"$100".to_vec());
        assert_eq!(win_ansi("€1.234,56"), vec![0x80, b'1', b'.', b'2', b'3', b'4', b',', b'5', b'6']);
        assert_eq!(win_ansi("£5"), vec![0xA3, b'5']);
        assert_eq!(win_ansi("Grêle"), vec![b'G', b'r', 0xEA, b'l', b'e']);
        assert_eq!(win_ansi("車"), b"?".to_vec());
    }

    #[test]
    fn test_timestamp_suffix_must_be_exact() {
        assert!(is_timestamped_pdf("20250101_120000.pdf"));
        assert!(!is_timestamped_pdf("B_20250101_120000.pdf"));
        assert!(!is_timestamped_pdf("20250101_120000.txt"));
        assert!(!is_timestamped_pdf("2025010a_120000.pdf"));
    }
}

//! Document format resolution: magic bytes first, then the client's
//! declared content type, then the filename extension.

use serde::Serialize;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

/// What the client told us about the upload.
#[derive(Debug, Clone, Default)]
pub struct DeclaredType {
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

impl DeclaredType {
    pub fn new(filename: Option<String>, content_type: Option<String>) -> Self {
        Self {
            filename,
            content_type,
        }
    }

    fn extension(&self) -> Option<String> {
        let name = self.filename.as_deref()?;
        let (_, ext) = name.rsplit_once('.')?;
        Some(ext.to_ascii_lowercase())
    }

    fn mime(&self) -> Option<String> {
        self.content_type.as_deref().map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }
}

/// Resolves the document format, or `None` if the bytes cannot be handled.
pub fn resolve_format(bytes: &[u8], declared: &DeclaredType) -> Option<DocumentFormat> {
    // Sniffed types win over whatever the client claims.
    if let Some(kind) = infer::get(bytes) {
        return match kind.mime_type() {
            "application/pdf" => Some(DocumentFormat::Pdf),
            DOCX_MIME => Some(DocumentFormat::Docx),
            // Some zip writers defeat infer's docx probe; trust the declaration then.
            "application/zip" if declares_docx(declared) => Some(DocumentFormat::Docx),
            mime if mime.starts_with("text/") => Some(DocumentFormat::PlainText),
            _ => None,
        };
    }

    if let Some(mime) = declared.mime() {
        match mime.as_str() {
            "application/pdf" => return Some(DocumentFormat::Pdf),
            DOCX_MIME => return Some(DocumentFormat::Docx),
            "application/msword" => return None,
            m if m.starts_with("text/") => return Some(DocumentFormat::PlainText),
            _ => {}
        }
    }

    match declared.extension().as_deref() {
        Some("pdf") => return Some(DocumentFormat::Pdf),
        Some("docx") => return Some(DocumentFormat::Docx),
        Some("txt" | "text" | "md" | "markdown" | "csv") => {
            return Some(DocumentFormat::PlainText)
        }
        _ => {}
    }

    if looks_like_text(bytes) {
        Some(DocumentFormat::PlainText)
    } else {
        None
    }
}

fn declares_docx(declared: &DeclaredType) -> bool {
    declared.mime().as_deref() == Some(DOCX_MIME) || declared.extension().as_deref() == Some("docx")
}

fn looks_like_text(bytes: &[u8]) -> bool {
    !bytes.contains(&0) && std::str::from_utf8(bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> DeclaredType {
        DeclaredType::new(Some(name.to_string()), None)
    }

    #[test]
    fn test_pdf_magic_bytes_beat_declared_type() {
        let bytes = b"%PDF-1.4\n%garbage";
        let declared = DeclaredType::new(Some("resume.txt".into()), Some("text/plain".into()));
        assert_eq!(resolve_format(bytes, &declared), Some(DocumentFormat::Pdf));
    }

    #[test]
    fn test_plain_text_by_extension() {
        assert_eq!(
            resolve_format(b"Jane Doe", &named("resume.TXT")),
            Some(DocumentFormat::PlainText)
        );
    }

    #[test]
    fn test_content_type_parameters_are_ignored() {
        let declared = DeclaredType::new(None, Some("text/plain; charset=utf-8".into()));
        assert_eq!(
            resolve_format(b"Jane Doe", &declared),
            Some(DocumentFormat::PlainText)
        );
    }

    #[test]
    fn test_undeclared_utf8_is_text() {
        assert_eq!(
            resolve_format("Zoë Ångström".as_bytes(), &DeclaredType::default()),
            Some(DocumentFormat::PlainText)
        );
    }

    #[test]
    fn test_legacy_word_is_unsupported() {
        let declared = DeclaredType::new(
            Some("resume.doc".into()),
            Some("application/msword".into()),
        );
        assert_eq!(resolve_format(&[0xAB, 0x00, 0xCD], &declared), None);
    }

    #[test]
    fn test_binary_without_declaration_is_unsupported() {
        assert_eq!(
            resolve_format(&[0x00, 0x01, 0x02, 0xFF], &DeclaredType::default()),
            None
        );
    }

    #[test]
    fn test_png_is_unsupported_even_if_named_pdf() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(resolve_format(&png, &named("resume.pdf")), None);
    }
}

// src/utils.rs
use anyhow::Result;

/// Document types the extraction service accepts.
pub const SUPPORTED_DOCUMENTS: &[&str] = &["pdf", "docx"];

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Validate file extension against allowed types
pub fn validate_file_extension(filename: &str, allowed: &[&str]) -> Result<()> {
    let ext = get_file_extension(filename)
        .ok_or_else(|| anyhow::anyhow!("File has no extension: {}", filename))?;

    if !allowed.contains(&ext.as_str()) {
        anyhow::bail!(
            "Unsupported file extension: {}. Allowed: {:?}",
            ext,
            allowed
        );
    }

    Ok(())
}

/// MIME type for an uploadable document
pub fn document_content_type(filename: &str) -> Result<&'static str> {
    validate_file_extension(filename, SUPPORTED_DOCUMENTS)?;
    match get_file_extension(filename).as_deref() {
        Some("pdf") => Ok("application/pdf"),
        Some("docx") => {
            Ok("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        _ => anyhow::bail!("Unsupported file format: {}", filename),
    }
}

/// Shortens long text for log lines, on a char boundary
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("test.pdf"), Some("pdf".to_string()));
        assert_eq!(
            get_file_extension("document.DOCX"),
            Some("docx".to_string())
        );
        assert_eq!(get_file_extension("noext"), None);
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("test.pdf", &["pdf", "docx"]).is_ok());
        assert!(validate_file_extension("test.txt", &["pdf", "docx"]).is_err());
        assert!(validate_file_extension("noext", &["pdf"]).is_err());
    }

    #[test]
    fn test_document_content_type() {
        assert_eq!(document_content_type("vacancy.PDF").unwrap(), "application/pdf");
        assert!(document_content_type("vacancy.docx")
            .unwrap()
            .ends_with("wordprocessingml.document"));
        assert!(document_content_type("vacancy.doc").is_err());
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("Python", 10), "Python");
        assert_eq!(preview("Разработчик", 4), "Разр…");
    }
}

use std::path::Path;

const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "text"];

/// Plain text of a resume file, or an empty string on any failure.
///
/// Only plain-text formats are read; an empty result means "no resume".
pub fn load_resume_text(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !ext.is_empty() && !TEXT_EXTENSIONS.contains(&ext.as_str()) {
        log::warn!(
            "unsupported resume format {:?}; continuing without resume",
            path.display()
        );
        return String::new();
    }

    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            log::warn!("failed to read resume {}: {e}", path.display());
            return String::new();
        }
    };

    match String::from_utf8(bytes) {
        Ok(text) => text.trim().to_string(),
        Err(_) => {
            log::warn!("resume {} is not UTF-8 text", path.display());
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "\n  Jane Doe\nRust engineer  \n").unwrap();
        assert_eq!(load_resume_text(&path), "Jane Doe\nRust engineer");
    }

    #[test]
    fn failures_become_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_resume_text(&dir.path().join("missing.txt")), "");

        let pdf = dir.path().join("resume.pdf");
        std::fs::write(&pdf, b"%PDF-1.7").unwrap();
        assert_eq!(load_resume_text(&pdf), "");

        let binary = dir.path().join("resume");
        std::fs::write(&binary, [0xff, 0xfe, 0x00]).unwrap();
        assert_eq!(load_resume_text(&binary), "");
    }
}

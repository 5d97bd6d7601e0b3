use docpdf_core::constants::ALLOWED_EXTENSIONS;
use unicode_normalization::UnicodeNormalization;

const MAX_STEM_LENGTH: usize = 200;
const FALLBACK_STEM: &str = "document";

fn is_path_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Upload validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Empty filename")]
    EmptyFilename,

    #[error("Invalid file extension: {extension:?} (allowed: {allowed:?})")]
    UnsupportedExtension {
        extension: String,
        allowed: Vec<String>,
    },
}

/// Filenames derived from an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    /// Filesystem-safe name the upload is saved under, e.g. `My_Report.docx`.
    pub file_name: String,
    /// `file_name` without its extension; the converter writes `<base_name>.pdf`.
    pub base_name: String,
    /// Lowercased extension, one of the allowed set.
    pub extension: String,
}

impl ValidatedUpload {
    /// Name the converted document is offered under.
    pub fn download_name(&self) -> String {
        format!("{}.{}", self.base_name, docpdf_core::constants::TARGET_FORMAT)
    }
}

/// Upload filename validator
///
/// Checks the client-supplied filename before anything touches the disk.
pub struct DocumentValidator {
    allowed_extensions: Vec<String>,
}

impl Default for DocumentValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentValidator {
    pub fn new() -> Self {
        Self {
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Extension after the final `.`, lowercased. `None` when there is no `.`.
    fn extension_of(filename: &str) -> Option<String> {
        filename
            .rsplit_once('.')
            .map(|(_, extension)| extension.to_lowercase())
    }

    /// Validate an uploaded filename and derive the names used on disk.
    pub fn validate(&self, filename: &str) -> Result<ValidatedUpload, ValidationError> {
        if filename.is_empty() {
            return Err(ValidationError::EmptyFilename);
        }

        let extension = Self::extension_of(filename).unwrap_or_default();
        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::UnsupportedExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        // The extension holds no separators, so the final path component still ends with it.
        let last_component = filename
            .rsplit(is_path_separator)
            .next()
            .unwrap_or(filename);
        let raw_stem = last_component
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or_default();

        let base_name = sanitize_stem(raw_stem);
        Ok(ValidatedUpload {
            file_name: format!("{}.{}", base_name, extension),
            base_name,
            extension,
        })
    }
}

/// Reduce a filename stem to ASCII characters that are safe both on disk and
/// inside a `Content-Disposition` header.
///
/// Accented letters fold to their ASCII base (`résumé` -> `resume`), runs of
/// whitespace become a single `_`, and every other character outside
/// `[A-Za-z0-9._-]` is dropped.
pub fn sanitize_stem(raw: &str) -> String {
    let last_component = raw.rsplit(is_path_separator).next().unwrap_or(raw);

    let ascii: String = last_component.nfkd().filter(char::is_ascii).collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    let trimmed: String = kept
        .trim_matches(|c| c == '.' || c == '_')
        .chars()
        .take(MAX_STEM_LENGTH)
        .collect();

    if trimmed.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_allowed_extensions() {
        let validator = DocumentValidator::new();
        let upload = validator.validate("report.docx").unwrap();
        assert_eq!(upload.file_name, "report.docx");
        assert_eq!(upload.base_name, "report");
        assert_eq!(upload.extension, "docx");
        assert_eq!(upload.download_name(), "report.pdf");

        assert!(validator.validate("legacy.doc").is_ok());
        assert!(validator.validate("LOUD.DOCX").is_ok()); // case insensitive
    }

    #[test]
    fn test_validate_empty_filename() {
        let validator = DocumentValidator::new();
        assert!(matches!(
            validator.validate(""),
            Err(ValidationError::EmptyFilename)
        ));
    }

    #[test]
    fn test_validate_rejects_other_extensions() {
        let validator = DocumentValidator::new();
        for name in ["report.txt", "report.pdf", "report.docx.exe", "docx", "report."] {
            assert!(
                matches!(
                    validator.validate(name),
                    Err(ValidationError::UnsupportedExtension { .. })
                ),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_strips_directories() {
        let validator = DocumentValidator::new();
        let upload = validator.validate("../../etc/passwd.docx").unwrap();
        assert_eq!(upload.file_name, "passwd.docx");

        let upload = validator.validate("C:\\Users\\me\\Q3 plan.doc").unwrap();
        assert_eq!(upload.file_name, "Q3_plan.doc");
        assert_eq!(upload.download_name(), "Q3_plan.pdf");
    }

    #[test]
    fn test_validate_lowercases_extension_in_saved_name() {
        let validator = DocumentValidator::new();
        let upload = validator.validate("My Report.DOCX").unwrap();
        assert_eq!(upload.file_name, "My_Report.docx");
        assert_eq!(upload.base_name, "My_Report");
    }

    #[test]
    fn test_validate_falls_back_when_stem_is_unusable() {
        let validator = DocumentValidator::new();
        assert_eq!(validator.validate(".docx").unwrap().base_name, "document");
        assert_eq!(validator.validate("отчёт.docx").unwrap().base_name, "document");
        assert_eq!(validator.validate("(#).docx").unwrap().base_name, "document");
    }

    #[test]
    fn test_validate_strips_unsafe_characters() {
        let validator = DocumentValidator::new();
        let upload = validator.validate("report(1).docx").unwrap();
        assert_eq!(upload.file_name, "report1.docx");
        assert_eq!(upload.download_name(), "report1.pdf");

        let upload = validator.validate("résumé.docx").unwrap();
        assert_eq!(upload.base_name, "resume");
    }

    #[test]
    fn test_sanitize_stem() {
        assert_eq!(sanitize_stem("my-file_1"), "my-file_1");
        assert_eq!(sanitize_stem("..hidden"), "hidden");
        assert_eq!(sanitize_stem("a\"b;c"), "abc");
        assert_eq!(sanitize_stem("report(1)"), "report1");
        assert_eq!(sanitize_stem("Q3  plan\tfinal"), "Q3_plan_final");
        assert_eq!(sanitize_stem("Crème Brûlée"), "Creme_Brulee");
        assert_eq!(sanitize_stem("ﬁle"), "file");
        assert_eq!(sanitize_stem(" _draft_ "), "draft");
        assert_eq!(sanitize_stem(""), "document");
        assert_eq!(sanitize_stem(&"x".repeat(500)).len(), 200);
    }
}

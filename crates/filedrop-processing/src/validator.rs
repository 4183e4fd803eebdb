use filedrop_core::{ExtensionMatch, UploadError};

/// Extension allow-list check.
///
/// Entries carry no leading dot. An empty extension always passes; callers that
/// must refuse extensionless files need a separate rule.
#[derive(Debug, Clone)]
pub struct ExtensionPolicy<'a> {
    allowed_extensions: &'a [String],
    matching: ExtensionMatch,
}

impl<'a> ExtensionPolicy<'a> {
    pub fn new(allowed_extensions: &'a [String], matching: ExtensionMatch) -> Self {
        Self {
            allowed_extensions,
            matching,
        }
    }

    pub fn is_allowed(&self, extension: &str) -> bool {
        if extension.is_empty() {
            return true;
        }

        match self.matching {
            ExtensionMatch::CaseSensitive => {
                self.allowed_extensions.iter().any(|ext| ext == extension)
            }
            ExtensionMatch::CaseInsensitive => self
                .allowed_extensions
                .iter()
                .any(|ext| ext.eq_ignore_ascii_case(extension)),
        }
    }

    /// Validate file extension
    pub fn validate(&self, extension: &str) -> Result<(), UploadError> {
        if self.is_allowed(extension) {
            Ok(())
        } else {
            Err(UploadError::ExtensionNotAllowed {
                extension: extension.to_string(),
            })
        }
    }
}

//! Name validation shared by folders and tags.

use folio_error::{FolioResult, LibraryError, LibraryErrorKind};

/// Trim a folder or tag name and reject empty names and names containing `/`.
///
/// # Examples
///
/// ```
/// use folio_database::validate_name;
///
/// assert_eq!(validate_name("  Photos ").unwrap(), "Photos");
/// assert!(validate_name("   ").is_err());
/// assert!(validate_name("a/b").is_err());
/// ```
pub fn validate_name(name: &str) -> FolioResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LibraryError::new(LibraryErrorKind::InvalidName(
            "name must not be empty".to_string(),
        ))
        .into());
    }
    if trimmed.contains('/') {
        return Err(LibraryError::new(LibraryErrorKind::InvalidName(format!(
            "{:?} must not contain '/'",
            trimmed
        )))
        .into());
    }
    Ok(trimmed.to_string())
}

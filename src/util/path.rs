use std::path::Path;

pub trait PathExt {
    /// Extension matches one of `extensions` (lowercase, no dot), ignoring case.
    fn has_extension_ci(&self, extensions: &[String]) -> bool;
    /// Lowercased extension without the dot.
    fn extension_lowercase(&self) -> Option<String>;
    /// File stem as a `String`, lossy for non-UTF-8 names.
    fn stem_lossy(&self) -> String;
    /// Office owner/lock files look like `~$Book.xlsx`.
    fn is_office_lock_file(&self) -> bool;
}

impl PathExt for Path {
    fn has_extension_ci(&self, extensions: &[String]) -> bool {
        self.extension_lowercase()
            .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
            .unwrap_or(false)
    }

    fn extension_lowercase(&self) -> Option<String> {
        self.extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    fn stem_lossy(&self) -> String {
        self.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn is_office_lock_file(&self) -> bool {
        self.file_name()
            .map(|n| n.to_string_lossy().starts_with("~$"))
            .unwrap_or(false)
    }
}

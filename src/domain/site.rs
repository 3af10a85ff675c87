//! Site naming: spreadsheet stem to display name and output file name.

use regex::Regex;

use crate::domain::error::DomainError;

/// Strips the tree-data suffix phrase from spreadsheet stems.
#[derive(Debug, Clone)]
pub struct SiteNamer {
    suffix: Regex,
    output_suffix: String,
}

impl SiteNamer {
    pub fn new(suffix_pattern: &str, output_suffix: &str) -> Result<Self, DomainError> {
        let suffix = Regex::new(suffix_pattern).map_err(|e| DomainError::InvalidSitePattern {
            pattern: suffix_pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            suffix,
            output_suffix: output_suffix.to_string(),
        })
    }

    /// `"Lincoln Elementary Tree Data"` → `"Lincoln Elementary"`.
    ///
    /// Falls back to the whole stem when nothing else is left.
    pub fn site_name(&self, stem: &str) -> String {
        let stripped = self.suffix.replace_all(stem, "");
        let name = stripped.trim();
        if name.is_empty() {
            stem.trim().to_string()
        } else {
            name.to_string()
        }
    }

    /// `"Lincoln Elementary"` → `"Lincoln_Elementary_tree_map.html"`.
    pub fn output_file_name(&self, site_name: &str) -> String {
        format!("{}{}", site_name.replace(' ', "_"), self.output_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn namer() -> SiteNamer {
        SiteNamer::new("(?i)tree data", "_tree_map.html").unwrap()
    }

    #[test]
    fn given_stem_with_suffix_when_naming_then_strips_suffix() {
        assert_eq!(namer().site_name("Lincoln Elementary Tree Data"), "Lincoln Elementary");
        assert_eq!(namer().site_name("Oak Park tree data"), "Oak Park");
    }

    #[test]
    fn given_stem_without_suffix_when_naming_then_keeps_stem() {
        assert_eq!(namer().site_name("Inventory 2024"), "Inventory 2024");
    }

    #[test]
    fn given_stem_that_is_only_suffix_when_naming_then_keeps_stem() {
        assert_eq!(namer().site_name("Tree Data"), "Tree Data");
    }

    #[test]
    fn given_site_with_spaces_when_building_output_name_then_uses_underscores() {
        assert_eq!(
            namer().output_file_name("Lincoln Elementary"),
            "Lincoln_Elementary_tree_map.html"
        );
    }

    #[test]
    fn given_invalid_pattern_when_creating_then_errors() {
        let result = SiteNamer::new("(unclosed", "_tree_map.html");
        assert!(matches!(
            result,
            Err(DomainError::InvalidSitePattern { .. })
        ));
    }
}

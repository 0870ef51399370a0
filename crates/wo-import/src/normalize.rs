//! Field normalization
//!
//! All comparisons in the import pipeline happen on trimmed, lowercased,
//! diacritic-stripped text, so `MECÂNICO`, `mecanica` and `Oficina Mecânica`
//! all land on the same key.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Trimmed, lowercased, diacritic-stripped form of a string. `None` when
/// the input is empty after trimming. Pure; no allocation on empty input.
pub fn normalize_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized: String = trimmed
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    Some(normalized)
}

/// Trimmed-lowercased form of an OS number. `None` when empty.
pub fn normalize_os_number(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Canonical office classification used to route imported rows to a
/// sub-package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfficeKey {
    Mechanical,
    Electrical,
    /// Any other workshop, carried as its normalized name
    Custom(String),
}

impl OfficeKey {
    /// Derive the office key from a raw cell value: anything containing
    /// `mec` is mechanical, anything containing `eletr` is electrical, and
    /// the rest is a custom office kept under its normalized name.
    pub fn derive(value: &str) -> Option<OfficeKey> {
        let normalized = normalize_text(value)?;
        if normalized.contains("mec") {
            Some(OfficeKey::Mechanical)
        } else if normalized.contains("eletr") {
            Some(OfficeKey::Electrical)
        } else {
            Some(OfficeKey::Custom(normalized))
        }
    }

    /// The normalized comparison key
    pub fn key(&self) -> &str {
        match self {
            OfficeKey::Mechanical => "mecanico",
            OfficeKey::Electrical => "eletrico",
            OfficeKey::Custom(name) => name,
        }
    }

    /// Display name for an auto-created sub-package
    pub fn display_name(&self) -> &str {
        match self {
            OfficeKey::Mechanical => "Mecânico",
            OfficeKey::Electrical => "Elétrico",
            OfficeKey::Custom(name) => name,
        }
    }

    /// Whether an existing sub-package name matches this office.
    /// Substring-based and accent-insensitive; no scoring.
    pub fn matches(&self, sub_package_name: &str) -> bool {
        normalize_text(sub_package_name)
            .map(|name| name.contains(self.key()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_strips_diacritics() {
        assert_eq!(normalize_text("  Mecânico  "), Some("mecanico".into()));
        assert_eq!(normalize_text("ELÉTRICO"), Some("eletrico".into()));
        assert_eq!(normalize_text("Descrição"), Some("descricao".into()));
    }

    #[test]
    fn test_normalize_text_empty() {
        assert_eq!(normalize_text(""), None);
        assert_eq!(normalize_text("   "), None);
    }

    #[test]
    fn test_normalize_os_number() {
        assert_eq!(normalize_os_number(" OS-123 "), Some("os-123".into()));
        assert_eq!(normalize_os_number(""), None);
    }

    #[test]
    fn test_derive_mechanical_and_electrical() {
        assert_eq!(OfficeKey::derive("MECÂNICO"), Some(OfficeKey::Mechanical));
        assert_eq!(
            OfficeKey::derive("Oficina Mecanica"),
            Some(OfficeKey::Mechanical)
        );
        assert_eq!(OfficeKey::derive("Elétrico"), Some(OfficeKey::Electrical));
        assert_eq!(OfficeKey::derive("eletrica"), Some(OfficeKey::Electrical));
    }

    #[test]
    fn test_derive_custom_office() {
        assert_eq!(
            OfficeKey::derive("Hidráulica"),
            Some(OfficeKey::Custom("hidraulica".into()))
        );
    }

    #[test]
    fn test_derive_empty() {
        assert_eq!(OfficeKey::derive("   "), None);
    }

    #[test]
    fn test_derivation_idempotent_through_display_name() {
        for raw in ["Mecânico", "Elétrico", "Hidráulica"] {
            let key = OfficeKey::derive(raw).unwrap();
            let rederived = OfficeKey::derive(key.display_name()).unwrap();
            assert_eq!(key, rederived);
        }
    }

    #[test]
    fn test_matches_substring_and_accents() {
        let key = OfficeKey::Mechanical;
        assert!(key.matches("Mecânico"));
        assert!(key.matches("Equipe Mecânico 2"));
        assert!(!key.matches("Elétrico"));
        assert!(!key.matches(""));
    }
}

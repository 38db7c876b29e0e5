use serde::{Deserialize, Serialize};

/// Configuration for fact extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Extract struct fields
    pub include_fields: bool,

    /// Extract interface method sets
    pub include_interface_methods: bool,

    /// Fail extraction when the parse tree contains error nodes.
    /// When false, tree-sitter's error recovery is accepted as-is.
    pub reject_syntax_errors: bool,

    /// Maximum source size in bytes
    pub max_source_bytes: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            include_fields: true,
            include_interface_methods: true,
            reject_syntax_errors: false,
            max_source_bytes: 1_048_576,
        }
    }
}

impl ExtractorConfig {
    /// Create config that only records declarations (no fields, no interface methods)
    pub fn declarations_only() -> Self {
        Self {
            include_fields: false,
            include_interface_methods: false,
            ..Default::default()
        }
    }

    /// Create config that refuses files tree-sitter could not parse cleanly
    pub fn strict() -> Self {
        Self {
            reject_syntax_errors: true,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_source_bytes == 0 {
            return Err("max_source_bytes must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(ExtractorConfig::default().validate().is_ok());
        assert!(ExtractorConfig::declarations_only().validate().is_ok());
        assert!(ExtractorConfig::strict().validate().is_ok());
    }

    #[test]
    fn test_zero_size_cap_rejected() {
        let config = ExtractorConfig {
            max_source_bytes: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

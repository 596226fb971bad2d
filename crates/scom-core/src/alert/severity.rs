use serde::{Deserialize, Serialize};

/// Rendering class for a SCOM severity code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Information,
    Warning,
    Critical,
    Unknown,
}

impl Severity {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "0" => Severity::Information,
            "1" => Severity::Warning,
            "2" => Severity::Critical,
            _ => Severity::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Information => "Information",
            Severity::Warning => "Warning",
            Severity::Critical => "Critical",
            Severity::Unknown => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_classes() {
        assert_eq!(Severity::from_code("0"), Severity::Information);
        assert_eq!(Severity::from_code("1"), Severity::Warning);
        assert_eq!(Severity::from_code("2"), Severity::Critical);
    }

    #[test]
    fn anything_else_is_unknown() {
        assert_eq!(Severity::from_code(""), Severity::Unknown);
        assert_eq!(Severity::from_code("Error"), Severity::Unknown);
        assert_eq!(Severity::from_code("3"), Severity::Unknown);
    }
}

//! Report identity shared by every stage of a round.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One configured report: the remote query id and the artifact name it is saved under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportSpec {
    /// Query identifier on the remote service.
    pub id: u64,
    /// Artifact name (file stem) on local storage.
    pub name: String,
}

impl ReportSpec {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for ReportSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (query {})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let spec = ReportSpec::new(12, "enrollment");
        assert_eq!(spec.to_string(), "enrollment (query 12)");
    }

    #[test]
    fn test_deserialize() {
        let spec: ReportSpec = toml::from_str("id = 3\nname = \"beta\"").unwrap();
        assert_eq!(spec, ReportSpec::new(3, "beta"));
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two legal forms being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegalStatus {
    /// Single-shareholder SAS; the president is taxed like an employee.
    Sasu,
    /// Single-member SARL under corporate tax; the manager is self-employed.
    Eurl,
}

impl LegalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sasu => "SASU",
            Self::Eurl => "EURL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SASU" => Some(Self::Sasu),
            "EURL" => Some(Self::Eurl),
            _ => None,
        }
    }
}

impl fmt::Display for LegalStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

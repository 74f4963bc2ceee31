// src/services/validator.rs

//! Syntactic and deny-list filtering of extracted email tokens.

use regex::Regex;

use crate::error::Result;
use crate::models::ContactPolicy;

const STRICT_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

/// Which deny list and syntax rule to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Contact finder path: full pattern plus the broad deny list
    Strict,
    /// Discovery enrichment path: basic shape plus the narrow deny list
    Enrichment,
}

/// Accepts or rejects email tokens.
pub struct EmailValidator {
    mode: ValidationMode,
    deny: Vec<String>,
    pattern: Regex,
}

impl EmailValidator {
    pub fn new(policy: &ContactPolicy, mode: ValidationMode) -> Result<Self> {
        let deny = match mode {
            ValidationMode::Strict => &policy.strict_deny,
            ValidationMode::Enrichment => &policy.enrichment_deny,
        };
        Ok(Self {
            mode,
            deny: deny.iter().map(|term| term.to_lowercase()).collect(),
            pattern: Regex::new(STRICT_PATTERN)?,
        })
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn is_valid(&self, email: &str) -> bool {
        let email = email.trim();
        if !has_single_at(email) {
            return false;
        }
        if self.mode == ValidationMode::Strict && !self.pattern.is_match(email) {
            return false;
        }
        let lowered = email.to_lowercase();
        !self.deny.iter().any(|term| lowered.contains(term.as_str()))
    }
}

fn has_single_at(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

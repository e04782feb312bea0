//! Secret redaction for command lines and tool output

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionInfo {
    pub context: String,
    pub redaction_type: String,
    pub count: usize,
}

/// Scrubs credentials before text reaches logs or error messages
pub struct Redactor {
    patterns: Vec<(String, Regex)>,
    secrets: Vec<String>,
}

impl Redactor {
    pub fn new() -> Self {
        let mut patterns = Vec::new();

        // Order matters - more specific first
        patterns.push((
            "URL_CREDENTIALS".to_string(),
            Regex::new(r"(?P<prefix>[a-z][a-z0-9+.-]*://[^:/\s@]+:)[^@\s]+@").unwrap(),
        ));
        patterns.push((
            "GITHUB_TOKEN".to_string(),
            Regex::new(r"gh[pousr]_[a-zA-Z0-9]{36,}").unwrap(),
        ));
        patterns.push((
            "GITHUB_PAT".to_string(),
            Regex::new(r"github_pat_[a-zA-Z0-9_]{22,}").unwrap(),
        ));

        Self {
            patterns,
            secrets: Vec::new(),
        }
    }

    /// Also redact this exact value wherever it appears.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        let secret = secret.into();
        if !secret.is_empty() {
            self.secrets.push(secret);
        }
        self
    }

    /// Redact secrets from content
    pub fn redact(&self, context: &str, content: &str) -> (String, Vec<RedactionInfo>) {
        let mut result = content.to_string();
        let mut redactions = Vec::new();

        for secret in &self.secrets {
            let count = result.matches(secret.as_str()).count();
            if count > 0 {
                result = result.replace(secret.as_str(), "[REDACTED:SECRET]");
                redactions.push(RedactionInfo {
                    context: context.to_string(),
                    redaction_type: "SECRET".to_string(),
                    count,
                });
            }
        }

        for (secret_type, pattern) in &self.patterns {
            let count = pattern.find_iter(&result).count();

            if count > 0 {
                let replacement = if secret_type == "URL_CREDENTIALS" {
                    "${prefix}[REDACTED]@".to_string()
                } else {
                    format!("[REDACTED:{}]", secret_type)
                };
                result = pattern.replace_all(&result, replacement.as_str()).to_string();

                redactions.push(RedactionInfo {
                    context: context.to_string(),
                    redaction_type: secret_type.clone(),
                    count,
                });
            }
        }

        (result, redactions)
    }

    /// Redacted text only
    pub fn scrub(&self, content: &str) -> String {
        self.redact("", content).0
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}

use crate::lang::{Family, LanguageTable};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub languages: LanguageConfig,
}

/// Extra language-identifier prefixes per family, on top of the built-in
/// `javascript`, `typescript` and `json`.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LanguageConfig {
    #[serde(default)]
    pub script: Vec<String>,
    #[serde(default)]
    pub typed_script: Vec<String>,
    #[serde(default)]
    pub data: Vec<String>,
}

impl LanguageConfig {
    fn entries(&self) -> impl Iterator<Item = (&str, Family)> {
        let script = self.script.iter().map(|p| (p.as_str(), Family::Script));
        let typed = self
            .typed_script
            .iter()
            .map(|p| (p.as_str(), Family::TypedScript));
        let data = self.data.iter().map(|p| (p.as_str(), Family::Data));
        script.chain(typed).chain(data)
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();
        let builtin = LanguageTable::builtin();
        let mut seen: Vec<(String, Family)> = Vec::new();

        for (prefix, family) in self.languages.entries() {
            let normalized = prefix.trim().to_ascii_lowercase();
            if normalized.is_empty() {
                issues.push(ValidationIssue::EmptyPrefix { family });
                continue;
            }

            if let Some(existing) = builtin.exact(&normalized).filter(|f| *f != family) {
                issues.push(ValidationIssue::BuiltinConflict {
                    prefix: normalized.clone(),
                    builtin: existing,
                    family,
                });
            }

            match seen.iter().find(|(p, _)| *p == normalized) {
                Some((_, first)) if *first != family => {
                    issues.push(ValidationIssue::DuplicatePrefix {
                        prefix: normalized.clone(),
                        first: *first,
                        second: family,
                    });
                }
                Some(_) => {}
                None => seen.push((normalized, family)),
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    /// The built-in table extended with the configured prefixes.
    pub fn language_table(&self) -> LanguageTable {
        let mut table = LanguageTable::builtin();
        for (prefix, family) in self.languages.entries() {
            table.insert(prefix.trim(), family);
        }
        table
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptyPrefix {
        family: Family,
    },
    DuplicatePrefix {
        prefix: String,
        first: Family,
        second: Family,
    },
    BuiltinConflict {
        prefix: String,
        builtin: Family,
        family: Family,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyPrefix { family } => {
                write!(f, "empty language prefix in '{family}' list")
            }
            ValidationIssue::DuplicatePrefix {
                prefix,
                first,
                second,
            } => write!(
                f,
                "language prefix '{prefix}' is listed under both '{first}' and '{second}'"
            ),
            ValidationIssue::BuiltinConflict {
                prefix,
                builtin,
                family,
            } => write!(
                f,
                "language prefix '{prefix}' is built in as '{builtin}' and cannot be remapped to '{family}'"
            ),
        }
    }
}

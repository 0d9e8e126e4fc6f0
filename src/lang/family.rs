use ast_grep_language::SupportLang;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Language families the engine can parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Family {
    /// JavaScript and its JSX variant
    Script,
    /// TypeScript and its TSX variant
    TypedScript,
    /// JSON and JSON-with-comments
    Data,
}

impl Family {
    pub fn name(&self) -> &'static str {
        match self {
            Family::Script => "script",
            Family::TypedScript => "typed-script",
            Family::Data => "data",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Concrete grammar used for one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// tree-sitter-javascript; accepts JSX natively
    JavaScript,
    TypeScript,
    /// TypeScript with the JSX extension
    Tsx,
    Json,
}

impl Grammar {
    /// Pick the grammar for a classified language identifier.
    ///
    /// Editors report the React-flavoured variants as `javascriptreact` and
    /// `typescriptreact`; only the typed family needs a separate grammar for
    /// them.
    pub fn select(family: Family, language_id: &str) -> Self {
        match family {
            Family::Script => Grammar::JavaScript,
            Family::TypedScript if is_react_variant(language_id) => Grammar::Tsx,
            Family::TypedScript => Grammar::TypeScript,
            Family::Data => Grammar::Json,
        }
    }

    pub fn family(&self) -> Family {
        match self {
            Grammar::JavaScript => Family::Script,
            Grammar::TypeScript | Grammar::Tsx => Family::TypedScript,
            Grammar::Json => Family::Data,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Grammar::JavaScript => "javascript",
            Grammar::TypeScript => "typescript",
            Grammar::Tsx => "tsx",
            Grammar::Json => "json",
        }
    }

    pub(crate) fn support_lang(&self) -> SupportLang {
        match self {
            Grammar::JavaScript => SupportLang::JavaScript,
            Grammar::TypeScript => SupportLang::TypeScript,
            Grammar::Tsx => SupportLang::Tsx,
            Grammar::Json => SupportLang::Json,
        }
    }
}

fn is_react_variant(language_id: &str) -> bool {
    let id = language_id.to_ascii_lowercase();
    id.ends_with("react") || id.ends_with("tsx")
}

/// Built-in identifier prefixes, one per family.
const BUILTIN_PREFIXES: &[(&str, Family)] = &[
    ("javascript", Family::Script),
    ("typescript", Family::TypedScript),
    ("json", Family::Data),
];

/// Maximum edit distance for a "did you mean" suggestion.
const SUGGESTION_DISTANCE: usize = 3;

/// Maps editor language identifiers to families by prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTable {
    prefixes: Vec<(String, Family)>,
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LanguageTable {
    /// The built-in table: `javascript*`, `typescript*`, `json*`.
    pub fn builtin() -> Self {
        Self {
            prefixes: BUILTIN_PREFIXES
                .iter()
                .map(|(prefix, family)| (prefix.to_string(), *family))
                .collect(),
        }
    }

    /// Add a prefix, replacing any existing mapping for the same prefix.
    pub fn insert(&mut self, prefix: impl Into<String>, family: Family) {
        let prefix = prefix.into().to_ascii_lowercase();
        match self.prefixes.iter_mut().find(|(p, _)| *p == prefix) {
            Some(entry) => entry.1 = family,
            None => self.prefixes.push((prefix, family)),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>, family: Family) -> Self {
        self.insert(prefix, family);
        self
    }

    /// Family registered for exactly this prefix.
    pub fn exact(&self, prefix: &str) -> Option<Family> {
        let prefix = prefix.to_ascii_lowercase();
        self.prefixes
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, family)| *family)
    }

    /// Classify a language identifier. The longest matching prefix wins, so
    /// a `js` prefix never shadows `json`.
    pub fn classify(&self, language_id: &str) -> Option<Family> {
        let id = language_id.to_ascii_lowercase();
        self.prefixes
            .iter()
            .filter(|(prefix, _)| !prefix.is_empty() && id.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, family)| *family)
    }

    /// Closest registered prefix to an unrecognized identifier.
    pub fn suggest(&self, language_id: &str) -> Option<&str> {
        let id = language_id.to_ascii_lowercase();
        self.prefixes
            .iter()
            .map(|(prefix, _)| (strsim::levenshtein(&id, prefix), prefix.as_str()))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, prefix)| prefix)
    }

    pub fn prefixes(&self) -> impl Iterator<Item = (&str, Family)> {
        self.prefixes.iter().map(|(p, f)| (p.as_str(), *f))
    }
}

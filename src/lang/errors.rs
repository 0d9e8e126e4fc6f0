use thiserror::Error;

/// A grammar could not produce a complete tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("failed to set {grammar} language for parser")]
    LanguageSet { grammar: &'static str },

    #[error("parser returned no tree")]
    Aborted,

    #[error(
        "{} at line {line}, column {column}{}",
        error_kind(.missing),
        more_errors(.count)
    )]
    Syntax {
        /// 1-based line of the first error
        line: usize,
        /// 1-based column of the first error, in UTF-16 code units
        column: usize,
        /// UTF-16 offset of the first error
        offset: usize,
        /// Number of error nodes in the tree
        count: usize,
        /// The first error is a token the parser had to insert
        missing: bool,
    },
}

fn error_kind(missing: &bool) -> &'static str {
    if *missing {
        "missing token"
    } else {
        "syntax error"
    }
}

fn more_errors(count: &usize) -> String {
    match *count {
        0 | 1 => String::new(),
        n => format!(" (and {} more)", n - 1),
    }
}

/// Terminal failure of one dispatch: nothing is parsed, nothing is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unsupported language '{language}'{}", did_you_mean(.suggestion))]
    UnsupportedLanguage {
        language: String,
        suggestion: Option<String>,
    },

    #[error("failed to parse {language} source: {source}")]
    ParseFailure {
        language: String,
        #[source]
        source: ParseError,
    },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

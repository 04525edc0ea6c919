//! Finite automata for a small regular expression language.
//!
//! Patterns are built from literal characters, grouping `( )`, alternation
//! `|` and the postfix operators `*`, `+` and `?`. A pattern is compiled into
//! a Thompson NFA, which can be searched directly with a backtracking
//! matcher, or determinized with the subset construction into a table-driven
//! DFA that matches in linear time.
//!
//! ```
//! use fa_regex_automata::{compile, match_nfa, DFA};
//!
//! let nfa = compile("a(b|c)*").unwrap();
//! assert!(match_nfa(&nfa, "abbccb").unwrap().accepted);
//!
//! let dfa = DFA::new(&nfa);
//! assert!(dfa.is_match("abbccb").unwrap());
//! assert!(!dfa.is_match("acca").unwrap());
//! ```

#[macro_use]
mod macros;

pub mod alphabet;
pub mod backtrack;
pub mod compiler;
pub mod dfa;
pub mod nfa;
pub mod reader;

pub use alphabet::Alphabet;
pub use backtrack::{match_nfa, Backtracker, Search, Step, Trail};
pub use compiler::{compile, Compiler};
pub use dfa::{DStateId, DFA};
pub use nfa::{Fragment, Label, State, StateId, NFA};

/// The result of compiling a pattern to a Thompson NFA
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that can occur during compilation
///
/// Every position is a character offset into the full pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A `(` with no matching `)`
    UnclosedGroup { position: usize },
    /// A `)` with no preceding `(`
    UnopenedGroup { position: usize },
    /// A postfix operator with nothing to apply it to
    MissingOperand { operator: char, position: usize },
    /// Groups are nested deeper than the configured limit
    NestLimitExceeded { limit: u32 },
    /// The tokenizer was asked to read past the end of its scope. `len` is
    /// the length of the whole pattern, in characters.
    Bounds { position: usize, len: usize },
}

impl CompileError {
    /// Returns true for errors caused by a malformed pattern, as opposed to
    /// an internal tokenizer fault.
    pub fn is_structural(&self) -> bool {
        !matches!(self, CompileError::Bounds { .. })
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::UnclosedGroup { position } => {
                write!(f, "unclosed group opened at position {}", position)
            }
            CompileError::UnopenedGroup { position } => {
                write!(f, "unopened group closed at position {}", position)
            }
            CompileError::MissingOperand { operator, position } => write!(
                f,
                "repetition operator '{}' at position {} has no operand",
                operator, position
            ),
            CompileError::NestLimitExceeded { limit } => {
                write!(f, "group nesting exceeds limit of {}", limit)
            }
            CompileError::Bounds { position, len } => write!(
                f,
                "internal error: read past end of scope (pattern length: {}, position: {})",
                len, position
            ),
        }
    }
}

impl std::error::Error for CompileError {}

/// Errors that can occur while running a matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// The input contains a symbol outside the alphabet a DFA was restricted
    /// to. This is a usage error, not a failed match.
    Alphabet { symbol: char, offset: usize },
    /// The backtracker attempted more transitions than its budget allows
    StepLimit { limit: usize },
}

impl std::fmt::Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchError::Alphabet { symbol, offset } => write!(
                f,
                "no such transition: symbol {:?} at offset {} is not in the alphabet",
                symbol, offset
            ),
            MatchError::StepLimit { limit } => {
                write!(f, "backtracking gave up after {} steps", limit)
            }
        }
    }
}

impl std::error::Error for MatchError {}

/// Errors that can occur while determinizing an NFA
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Subset construction discovered more DFA states than permitted
    TooManyStates { limit: usize },
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::TooManyStates { limit } => {
                write!(f, "DFA exceeds state limit of {}", limit)
            }
        }
    }
}

impl std::error::Error for BuildError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_errors() {
        assert!(CompileError::UnclosedGroup { position: 0 }.is_structural());
        assert!(CompileError::MissingOperand { operator: '*', position: 0 }
            .is_structural());
        assert!(!CompileError::Bounds { position: 3, len: 3 }.is_structural());
    }

    #[test]
    fn error_messages() {
        let err = CompileError::UnclosedGroup { position: 4 };
        assert_eq!(err.to_string(), "unclosed group opened at position 4");

        let err = MatchError::Alphabet { symbol: 'z', offset: 2 };
        assert_eq!(
            err.to_string(),
            "no such transition: symbol 'z' at offset 2 is not in the alphabet"
        );
    }
}

/*!
A small regular expression engine built on finite automata.

A [`Regex`] is compiled once into a Thompson NFA and determinized into a DFA.
[`Regex::is_match`] runs the DFA and takes time linear in the input.
[`Regex::backtrack`] searches the NFA directly and also reports which
transitions led to the result, which is useful for explaining a match.

# Syntax

Every character other than `( ) | * + ?` is a literal. Patterns always
match the entire input.

```text
xy      concatenation
x|y     alternation, the right operand extends to the end of the group
(x)     grouping
x*      zero or more of x
x+      one or more of x
x?      zero or one of x
```

Repetition binds tighter than concatenation, which binds tighter than
alternation.

# Example

```
use fa_regex::Regex;

let re = Regex::new("a(b|c)*").unwrap();
assert!(re.is_match("abbccb").unwrap());
assert!(!re.is_match("acba").unwrap());

let search = re.backtrack("ab").unwrap();
assert!(search.accepted);
assert_eq!(search.trail.consumed(), "ab");
```

# Alphabet

By default any character may appear in the input. The DFA's table has a
column for each literal in the pattern and every other character leads to
its dead state. [`RegexBuilder::alphabet`] restricts the DFA to a fixed
alphabet, e.g. [`Alphabet::classic`], and then matching input with a
character outside it is an error rather than a failed match.

# Crate features

* **logging** - Emits diagnostics from compilation, subset construction and
  backtracking through the `log` crate.
*/

#![deny(missing_docs)]

use std::fmt;
use std::str::FromStr;

#[cfg(doctest)]
doc_comment::doctest!("../README.md");

pub use fa_regex_automata as automata;
pub use fa_regex_automata::{Alphabet, Search, Step, Trail};

use fa_regex_automata::{
    backtrack::{self, Backtracker},
    compiler::{self, Compiler},
    dfa::{self, DFA},
    BuildError, CompileError, MatchError, NFA,
};

/// An error that occurred while building or running a regex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The pattern could not be compiled.
    Compile(CompileError),
    /// The DFA could not be built within the configured limits.
    Build(BuildError),
    /// A matcher failed before deciding whether the input matches.
    Match(MatchError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Compile(ref err) => write!(f, "regex parse error: {}", err),
            Error::Build(ref err) => write!(f, "regex build error: {}", err),
            Error::Match(ref err) => write!(f, "regex match error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Compile(ref err) => Some(err),
            Error::Build(ref err) => Some(err),
            Error::Match(ref err) => Some(err),
        }
    }
}

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Error {
        Error::Compile(err)
    }
}

impl From<BuildError> for Error {
    fn from(err: BuildError) -> Error {
        Error::Build(err)
    }
}

impl From<MatchError> for Error {
    fn from(err: MatchError) -> Error {
        Error::Match(err)
    }
}

/// A compiled regular expression.
#[derive(Clone)]
pub struct Regex {
    pattern: String,
    nfa: NFA,
    dfa: DFA,
    backtrack: backtrack::Config,
}

impl Regex {
    /// Compiles a pattern with the default configuration.
    pub fn new(pattern: &str) -> Result<Regex, Error> {
        RegexBuilder::new(pattern).build()
    }

    /// Returns true if the whole of `haystack` matches, using the DFA.
    pub fn is_match(&self, haystack: &str) -> Result<bool, Error> {
        Ok(self.dfa.is_match(haystack)?)
    }

    /// Searches the NFA with the backtracking matcher.
    ///
    /// The returned trail lists the transitions of the accepting path, or
    /// of the last path tried if there was no match.
    pub fn backtrack(&self, haystack: &str) -> Result<Search, Error> {
        let backtracker = Backtracker::new(&self.nfa).configure(self.backtrack);
        Ok(backtracker.search(haystack)?)
    }

    /// Returns the original pattern.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns the compiled NFA.
    pub fn nfa(&self) -> &NFA {
        &self.nfa
    }

    /// Returns the DFA built from the NFA.
    pub fn dfa(&self) -> &DFA {
        &self.dfa
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Debug for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Regex").field(&self.as_str()).finish()
    }
}

impl FromStr for Regex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Regex, Error> {
        Regex::new(s)
    }
}

/// A configurable builder for a [`Regex`].
#[derive(Clone, Debug)]
pub struct RegexBuilder {
    pattern: String,
    compiler: compiler::Config,
    dfa: dfa::Config,
    backtrack: backtrack::Config,
}

impl RegexBuilder {
    /// Creates a builder with the default configuration.
    pub fn new(pattern: &str) -> RegexBuilder {
        RegexBuilder {
            pattern: pattern.to_string(),
            compiler: compiler::Config::new(),
            dfa: dfa::Config::new(),
            backtrack: backtrack::Config::new(),
        }
    }

    /// Compiles the pattern and builds its DFA.
    pub fn build(&self) -> Result<Regex, Error> {
        let nfa = Compiler::new()
            .configure(self.compiler)
            .compile(&self.pattern)?;
        let dfa = DFA::builder().configure(self.dfa.clone()).build(&nfa)?;
        Ok(Regex {
            pattern: self.pattern.clone(),
            nfa,
            dfa,
            backtrack: self.backtrack,
        })
    }

    /// Sets how deeply groups may be nested. The default is 250.
    pub fn nest_limit(&mut self, limit: u32) -> &mut RegexBuilder {
        self.compiler = self.compiler.nest_limit(limit);
        self
    }

    /// Restricts the DFA to `alphabet`. [`Regex::is_match`] then fails on
    /// input containing any other character.
    pub fn alphabet(&mut self, alphabet: Alphabet) -> &mut RegexBuilder {
        self.dfa = self.dfa.clone().alphabet(alphabet);
        self
    }

    /// Limits the number of DFA states. There is no limit by default.
    pub fn dfa_state_limit(&mut self, limit: Option<usize>) -> &mut RegexBuilder {
        self.dfa = self.dfa.clone().state_limit(limit);
        self
    }

    /// Limits the number of transitions [`Regex::backtrack`] may attempt.
    /// There is no limit by default.
    pub fn backtrack_step_limit(&mut self, limit: Option<usize>) -> &mut RegexBuilder {
        self.backtrack = self.backtrack.step_limit(limit);
        self
    }
}

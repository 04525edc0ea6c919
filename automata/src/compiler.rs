use crate::{
    nfa::{Fragment, NFA},
    reader::Reader,
    CompileError, CompileResult,
};

/// Compile `pattern` into an NFA with the default configuration.
///
/// The end state of the returned NFA is its only accepting state.
pub fn compile(pattern: &str) -> CompileResult<NFA> {
    Compiler::new().compile(pattern)
}

/// Configuration for the pattern compiler
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    nest_limit: Option<u32>,
}

impl Config {
    /// Return a new default compiler configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Set how deeply groups may be nested.
    ///
    /// Only group bodies are compiled recursively, so this bounds the
    /// compiler's recursion depth. A limit of `0` rejects every group.
    pub fn nest_limit(mut self, limit: u32) -> Config {
        self.nest_limit = Some(limit);
        self
    }

    pub fn get_nest_limit(&self) -> u32 {
        self.nest_limit.unwrap_or(250)
    }

    pub(crate) fn overwrite(self, o: Config) -> Config {
        Config {
            nest_limit: o.nest_limit.or(self.nest_limit),
        }
    }
}

/// Compiler that converts a pattern string to a Thompson NFA
///
/// The pattern is scanned left to right with one character of lookahead.
/// Group bodies are compiled recursively as independent sub-patterns over a
/// span of the original input. The branches of `|` within one scope are
/// collected and joined afterwards, so `|` extends to the end of its scope.
#[derive(Debug)]
pub struct Compiler {
    nfa: NFA,
    config: Config,
}

impl Compiler {
    /// Create a new compiler
    pub fn new() -> Self {
        Self {
            nfa: NFA::new(),
            config: Config::default(),
        }
    }

    /// Apply a configuration; options not set in `config` keep their values.
    pub fn configure(mut self, config: Config) -> Self {
        self.config = self.config.overwrite(config);
        self
    }

    /// Compile a pattern to a Thompson NFA and mark its end state accepting
    pub fn compile(mut self, pattern: &str) -> CompileResult<NFA> {
        let chars: Vec<char> = pattern.chars().collect();
        let fragment = self.compile_scope(Reader::new(&chars), 0)?;

        self.nfa.start = fragment.start;
        self.nfa.end = fragment.end;
        self.nfa.set_accepting(fragment.end);

        debug!(
            "compiled {:?} into NFA with {} states (start: {}, end: {})",
            pattern,
            self.nfa.len(),
            fragment.start,
            fragment.end
        );
        Ok(self.nfa)
    }

    /// Compile everything left in `reader` into one fragment
    fn compile_scope(&mut self, mut reader: Reader<'_>, depth: u32) -> CompileResult<Fragment> {
        // Finished alternation branches, `None` for an empty branch.
        let mut branches: Vec<Option<Fragment>> = Vec::new();
        let mut graph: Option<Fragment> = None;

        while reader.has_next() {
            let position = reader.position();
            let ch = reader.next()?;
            match ch {
                '(' => {
                    let limit = self.config.get_nest_limit();
                    if depth >= limit {
                        return Err(CompileError::NestLimitExceeded { limit });
                    }
                    let body = reader.read_group()?;
                    let mut sub = self.compile_scope(reader.scoped(body), depth + 1)?;
                    // Postfix operators bind tighter than concatenation.
                    self.apply_postfix(&mut sub, &mut reader)?;
                    self.append(&mut graph, sub);
                }
                ')' => return Err(CompileError::UnopenedGroup { position }),
                '|' => branches.push(graph.take()),
                '*' | '+' | '?' => {
                    return Err(CompileError::MissingOperand {
                        operator: ch,
                        position,
                    })
                }
                _ => {
                    let mut literal = self.nfa.literal(ch);
                    self.apply_postfix(&mut literal, &mut reader)?;
                    self.append(&mut graph, literal);
                }
            }
        }

        // `a|b|c` is `a|(b|c)`: unions are built from the right.
        let mut right = self.or_empty(graph);
        while let Some(left) = branches.pop() {
            let mut left = self.or_empty(left);
            self.nfa.union(&mut left, right);
            right = left;
        }
        Ok(right)
    }

    fn or_empty(&mut self, frag: Option<Fragment>) -> Fragment {
        match frag {
            Some(frag) => frag,
            None => self.nfa.empty(),
        }
    }

    /// Apply a `*`, `+` or `?` directly following an operand, if any
    fn apply_postfix(&mut self, frag: &mut Fragment, reader: &mut Reader<'_>) -> CompileResult<()> {
        match reader.peek() {
            Some('*') => self.nfa.repeat_star(frag),
            Some('+') => self.nfa.repeat_plus(frag),
            Some('?') => self.nfa.optional(frag),
            _ => return Ok(()),
        }
        reader.next()?;
        Ok(())
    }

    /// Concatenate `next` onto the running graph
    fn append(&mut self, graph: &mut Option<Fragment>, next: Fragment) {
        match graph {
            Some(graph) => self.nfa.concat(graph, next),
            None => *graph = Some(next),
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nfa::Label;

    fn epsilons(nfa: &NFA, id: usize) -> Vec<usize> {
        nfa.state(id).unwrap().epsilons().collect()
    }

    #[test]
    fn test_single_literal() {
        let nfa = compile("a").unwrap();
        assert_eq!(nfa.len(), 2);
        assert_eq!((nfa.start, nfa.end), (0, 1));
        let targets: Vec<_> = nfa.state(0).unwrap().targets(Label::Symbol('a')).collect();
        assert_eq!(targets, vec![1]);
        assert!(nfa.state(1).unwrap().is_accepting());
        assert!(!nfa.state(0).unwrap().is_accepting());
    }

    #[test]
    fn test_only_outermost_end_accepts() {
        let nfa = compile("a(b|c)*d").unwrap();
        let accepting: Vec<_> = (0..nfa.len())
            .filter(|&id| nfa.state(id).unwrap().is_accepting())
            .collect();
        assert_eq!(accepting, vec![nfa.end]);
    }

    #[test]
    fn test_concatenation_shape() {
        let nfa = compile("ab").unwrap();
        assert_eq!(nfa.len(), 4);
        assert_eq!((nfa.start, nfa.end), (0, 3));
        assert_eq!(epsilons(&nfa, 1), vec![2]);
    }

    #[test]
    fn test_group_with_star_shape() {
        let nfa = compile("a(b|c)*").unwrap();
        // a: 0-1, b: 2-3, c: 4-5, union: 6-7, star: 8-9
        assert_eq!(nfa.len(), 10);
        assert_eq!((nfa.start, nfa.end), (0, 9));
        assert_eq!(epsilons(&nfa, 1), vec![8]);
        assert_eq!(epsilons(&nfa, 6), vec![2, 4]);
        assert_eq!(epsilons(&nfa, 7), vec![6, 9]);
        assert_eq!(epsilons(&nfa, 8), vec![6, 9]);
    }

    #[test]
    fn test_alternation_takes_rest_of_scope() {
        // `ab|cd` is `(ab)|(cd)`, not `a(b|c)d`.
        let nfa = compile("ab|cd").unwrap();
        assert_eq!(nfa.len(), 10);
        assert_eq!(epsilons(&nfa, nfa.start), vec![0, 4]);
    }

    #[test]
    fn test_alternation_chain_shape() {
        // a: 0-1, b: 2-3, c: 4-5, b|c: 6-7, a|(b|c): 8-9
        let nfa = compile("a|b|c").unwrap();
        assert_eq!(nfa.len(), 10);
        assert_eq!((nfa.start, nfa.end), (8, 9));
        assert_eq!(epsilons(&nfa, 8), vec![0, 6]);
        assert_eq!(epsilons(&nfa, 6), vec![2, 4]);

        // Missing branches become empty fragments, created right to left.
        let nfa = compile("||a").unwrap();
        assert_eq!(nfa.len(), 10);
        assert_eq!(epsilons(&nfa, nfa.start), vec![4, 6]);
        assert_eq!(epsilons(&nfa, 4), vec![0, 2]);
    }

    #[test]
    fn test_long_alternation_chain() {
        let branches = 20_000;
        let pattern = "a|".repeat(branches - 1) + "a";
        let nfa = compile(&pattern).unwrap();
        // Two states per literal and two per union.
        assert_eq!(nfa.len(), 2 * branches + 2 * (branches - 1));

        let compiler = Compiler::new().configure(Config::new().nest_limit(1));
        assert!(compiler.compile(&pattern).is_ok());
    }

    #[test]
    fn test_empty_operands() {
        let nfa = compile("").unwrap();
        assert_eq!(nfa.len(), 2);
        assert_eq!(epsilons(&nfa, nfa.start), vec![nfa.end]);

        // Right operand compiled first, then the empty left operand.
        let nfa = compile("|a").unwrap();
        assert_eq!(nfa.len(), 6);
        assert_eq!(epsilons(&nfa, nfa.start), vec![0, 2]);
        assert_eq!(epsilons(&nfa, 2), vec![3]);

        assert!(compile("a|").is_ok());
        assert!(compile("()").is_ok());
        assert!(compile("a()*b").is_ok());
    }

    #[test]
    fn test_optional_adds_no_states() {
        assert_eq!(compile("a?").unwrap().len(), compile("a").unwrap().len());
    }

    #[test]
    fn test_compilations_are_independent() {
        let first = compile("a(b|c)*").unwrap();
        let second = compile("a(b|c)*").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unclosed_group() {
        assert_eq!(compile("(a"), Err(CompileError::UnclosedGroup { position: 0 }));
        assert_eq!(
            compile("a((b)"),
            Err(CompileError::UnclosedGroup { position: 1 })
        );
        assert_eq!(
            compile("(a|(b)"),
            Err(CompileError::UnclosedGroup { position: 0 })
        );
    }

    #[test]
    fn test_unopened_group() {
        assert_eq!(compile("a)"), Err(CompileError::UnopenedGroup { position: 1 }));
        assert_eq!(
            compile("(a))"),
            Err(CompileError::UnopenedGroup { position: 3 })
        );
    }

    #[test]
    fn test_missing_operand() {
        assert_eq!(
            compile("*a"),
            Err(CompileError::MissingOperand { operator: '*', position: 0 })
        );
        assert_eq!(
            compile("a**"),
            Err(CompileError::MissingOperand { operator: '*', position: 2 })
        );
        assert_eq!(
            compile("a|+b"),
            Err(CompileError::MissingOperand { operator: '+', position: 2 })
        );
        assert_eq!(
            compile("(?)"),
            Err(CompileError::MissingOperand { operator: '?', position: 1 })
        );
    }

    #[test]
    fn test_nest_limit() {
        let compiler = Compiler::new().configure(Config::new().nest_limit(2));
        assert!(compiler.compile("((a))").is_ok());

        let compiler = Compiler::new().configure(Config::new().nest_limit(2));
        assert_eq!(
            compiler.compile("(((a)))"),
            Err(CompileError::NestLimitExceeded { limit: 2 })
        );

        let compiler = Compiler::new().configure(Config::new().nest_limit(0));
        assert!(compiler.compile("a|b").is_ok());
    }

    #[test]
    fn test_config_overwrite_keeps_unset_options() {
        let config = Config::new().nest_limit(3).overwrite(Config::new());
        assert_eq!(config.get_nest_limit(), 3);
        assert_eq!(Config::new().get_nest_limit(), 250);
    }
}

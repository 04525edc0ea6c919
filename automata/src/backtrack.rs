//! A backtracking matcher that runs directly on the NFA.
//!
//! The search is a depth-first walk over the NFA's nondeterministic choices.
//! At every state epsilon transitions are tried before consuming the next
//! input symbol, and targets are tried in ascending ID order. The first
//! accepting path wins and is reported as a [`Trail`].
//!
//! The walk keeps its own stack of frames on the heap, so long inputs do not
//! grow the call stack.
//!
//! Worst-case time is exponential in the input length; use
//! [`Config::step_limit`] to bound it, or the DFA for linear-time matching.

use std::fmt;

use crate::{
    nfa::{Label, State, StateId, NFA},
    MatchError,
};

/// Check whether `nfa` accepts all of `input`, recording the path taken.
///
/// Uses the default configuration, which has no step limit.
pub fn match_nfa(nfa: &NFA, input: &str) -> Result<Search, MatchError> {
    Backtracker::new(nfa).search(input)
}

/// Configuration for the backtracker
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    step_limit: Option<Option<usize>>,
}

impl Config {
    /// Return a new default backtracker configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Give up with [`MatchError::StepLimit`] after attempting more than
    /// `limit` transitions. `None`, the default, never gives up.
    pub fn step_limit(mut self, limit: Option<usize>) -> Config {
        self.step_limit = Some(limit);
        self
    }

    pub fn get_step_limit(&self) -> Option<usize> {
        self.step_limit.flatten()
    }

    pub(crate) fn overwrite(self, o: Config) -> Config {
        Config {
            step_limit: o.step_limit.or(self.step_limit),
        }
    }
}

/// One transition taken by the backtracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub from: StateId,
    pub label: Label,
    pub to: StateId,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{}--> {}", self.from, self.label, self.to)
    }
}

/// The transitions on the path most recently explored
///
/// Taking a step at depth `d` discards whatever was recorded at depth `d`
/// or deeper, so after a successful search the trail is one accepting path
/// from the start state. After a failed search it is the last path tried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trail {
    steps: Vec<Step>,
}

impl Trail {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The symbols consumed along the trail, in order
    pub fn consumed(&self) -> String {
        self.steps
            .iter()
            .filter_map(|step| match step.label {
                Label::Symbol(ch) => Some(ch),
                Label::Epsilon => None,
            })
            .collect()
    }

    fn record(&mut self, depth: usize, step: Step) {
        self.steps.truncate(depth);
        self.steps.push(step);
    }
}

impl fmt::Display for Trail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            writeln!(f, "{}", step)?;
        }
        Ok(())
    }
}

/// The outcome of a backtracking search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Search {
    pub accepted: bool,
    pub trail: Trail,
}

/// A backtracking matcher over a borrowed NFA
#[derive(Clone, Debug)]
pub struct Backtracker<'a> {
    nfa: &'a NFA,
    config: Config,
}

impl<'a> Backtracker<'a> {
    /// Create a new matcher for the given NFA
    pub fn new(nfa: &'a NFA) -> Self {
        Self {
            nfa,
            config: Config::default(),
        }
    }

    pub fn configure(mut self, config: Config) -> Self {
        self.config = self.config.overwrite(config);
        self
    }

    /// Check if the entire input matches
    pub fn is_match(&self, input: &str) -> Result<bool, MatchError> {
        self.search(input).map(|search| search.accepted)
    }

    /// Search for an accepting path that consumes all of `input`
    pub fn search(&self, input: &str) -> Result<Search, MatchError> {
        let mut run = Run {
            nfa: self.nfa,
            input: input.chars().collect(),
            limit: self.config.get_step_limit(),
            steps: 0,
            trail: Trail::default(),
            stack: Vec::new(),
        };
        let accepted = run.run(self.nfa.start)?;

        debug!(
            "backtracking over {} symbols {} after {} steps",
            run.input.len(),
            if accepted { "matched" } else { "failed" },
            run.steps
        );
        Ok(Search {
            accepted,
            trail: run.trail,
        })
    }
}

/// State of a single search
struct Run<'a> {
    nfa: &'a NFA,
    input: Vec<char>,
    limit: Option<usize>,
    steps: usize,
    trail: Trail,
    /// The current path, one frame per state. A frame's index is its depth.
    stack: Vec<Frame>,
}

/// A state on the current path
#[derive(Clone, Copy, Debug)]
struct Frame {
    state: StateId,
    /// Input offset when the state was entered
    pos: usize,
    /// Index of the first frame entered since the last consumed symbol
    run_start: usize,
    /// Number of outgoing transitions already tried
    tried: usize,
}

impl<'a> Run<'a> {
    fn run(&mut self, start: StateId) -> Result<bool, MatchError> {
        self.stack.push(Frame { state: start, pos: 0, run_start: 0, tried: 0 });

        while let Some(&frame) = self.stack.last() {
            let depth = self.stack.len() - 1;
            let Some(step) = self.edge(&frame) else {
                // Every transition failed, so only the state itself is left.
                if frame.pos == self.input.len()
                    && self.nfa.state(frame.state).map_or(false, State::is_accepting)
                {
                    return Ok(true);
                }
                self.stack.pop();
                continue;
            };
            self.stack[depth].tried += 1;

            let (pos, run_start) = match step.label {
                Label::Epsilon => {
                    // A state already on this epsilon-only run would only
                    // repeat the search.
                    if self.stack[frame.run_start..].iter().any(|f| f.state == step.to) {
                        continue;
                    }
                    (frame.pos, frame.run_start)
                }
                Label::Symbol(_) => (frame.pos + 1, self.stack.len()),
            };
            self.attempt(depth, step)?;
            self.stack.push(Frame { state: step.to, pos, run_start, tried: 0 });
        }
        Ok(false)
    }

    /// The next transition to try out of `frame`: epsilons first, then those
    /// on the next input symbol, each in ascending target order.
    fn edge(&self, frame: &Frame) -> Option<Step> {
        let current = self.nfa.state(frame.state)?;
        let from = frame.state;
        let epsilons = current
            .epsilons()
            .map(move |to| Step { from, label: Label::Epsilon, to });
        let symbols = self.input.get(frame.pos).into_iter().flat_map(move |&ch| {
            let label = Label::Symbol(ch);
            current.targets(label).map(move |to| Step { from, label, to })
        });
        epsilons.chain(symbols).nth(frame.tried)
    }

    fn attempt(&mut self, depth: usize, step: Step) -> Result<(), MatchError> {
        self.steps += 1;
        if let Some(limit) = self.limit {
            if self.steps > limit {
                return Err(MatchError::StepLimit { limit });
            }
        }
        trace!("depth {}: {}", depth, step);
        self.trail.record(depth, step);
        Ok(())
    }
}

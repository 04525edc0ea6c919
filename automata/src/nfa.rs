use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A state ID in the NFA
///
/// IDs are handed out in creation order by the NFA that owns the state, so
/// every compilation numbers its states from zero.
pub type StateId = usize;

/// The label on an NFA transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    /// Transition that consumes no input
    Epsilon,
    /// Transition that consumes exactly this symbol
    Symbol(char),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Epsilon => write!(f, "ε"),
            Label::Symbol(ch) => write!(f, "{}", ch),
        }
    }
}

/// A Thompson NFA state
///
/// Destinations are stored as a set per label, so adding the same
/// transition twice has no effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    transitions: BTreeMap<Label, BTreeSet<StateId>>,
    accepting: bool,
}

impl State {
    /// Destinations reachable over `label`, in ascending ID order
    pub fn targets(&self, label: Label) -> impl Iterator<Item = StateId> + '_ {
        self.transitions.get(&label).into_iter().flatten().copied()
    }

    /// Destinations reachable without consuming input
    pub fn epsilons(&self) -> impl Iterator<Item = StateId> + '_ {
        self.targets(Label::Epsilon)
    }

    /// All outgoing transitions as `(label, destination)` pairs
    pub fn transitions(&self) -> impl Iterator<Item = (Label, StateId)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(&label, targets)| targets.iter().map(move |&to| (label, to)))
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }
}

/// Fragment of an NFA with start and end states
///
/// The compiler composes fragments in place: every operator rewires edges
/// between existing states and moves the `start`/`end` pointers, states are
/// never copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub start: StateId,
    pub end: StateId,
}

/// A Thompson NFA
///
/// All states live in one arena and refer to each other by index, which
/// lets the graph contain the cycles introduced by `*` and `+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NFA {
    /// All states in the NFA
    states: Vec<State>,
    /// Starting state
    pub start: StateId,
    /// End state of the outermost fragment
    pub end: StateId,
    /// Next available state ID
    next_id: StateId,
}

impl NFA {
    /// Create a new empty NFA
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            start: 0,
            end: 0,
            next_id: 0,
        }
    }

    /// Add a new non-accepting state with no transitions and return its ID
    pub fn add_state(&mut self) -> StateId {
        let id = self.next_id;
        self.states.push(State::default());
        self.next_id += 1;
        id
    }

    /// Add a transition from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if `from` is not a state of this NFA.
    pub fn add_transition(&mut self, from: StateId, label: Label, to: StateId) {
        self.states[from]
            .transitions
            .entry(label)
            .or_default()
            .insert(to);
    }

    /// Connect two states with an epsilon transition
    pub fn connect(&mut self, from: StateId, to: StateId) {
        self.add_transition(from, Label::Epsilon, to);
    }

    /// Mark a state as accepting
    pub fn set_accepting(&mut self, id: StateId) {
        self.states[id].accepting = true;
    }

    /// Look up a state by ID
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id)
    }

    /// All states, indexed by ID
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Every symbol that labels at least one transition, ascending
    pub fn symbols(&self) -> BTreeSet<char> {
        self.states
            .iter()
            .flat_map(|state| state.transitions.keys())
            .filter_map(|label| match *label {
                Label::Symbol(ch) => Some(ch),
                Label::Epsilon => None,
            })
            .collect()
    }

    /// Get epsilon closure of a set of states
    pub fn epsilon_closure(&self, states: &BTreeSet<StateId>) -> BTreeSet<StateId> {
        let mut closure = states.clone();
        let mut stack: Vec<StateId> = states.iter().copied().collect();

        while let Some(state_id) = stack.pop() {
            let Some(state) = self.states.get(state_id) else {
                continue;
            };
            for next in state.epsilons() {
                if closure.insert(next) {
                    stack.push(next);
                }
            }
        }

        closure
    }

    /// States reachable from any of `states` by exactly one transition on
    /// `symbol`. Epsilon transitions are not followed.
    pub fn step<I>(&self, states: I, symbol: char) -> BTreeSet<StateId>
    where
        I: IntoIterator<Item = StateId>,
    {
        states
            .into_iter()
            .filter_map(|id| self.states.get(id))
            .flat_map(|state| state.targets(Label::Symbol(symbol)))
            .collect()
    }

    /// Check if any state in the set is accepting
    pub fn is_accepting<I>(&self, states: I) -> bool
    where
        I: IntoIterator<Item = StateId>,
    {
        states
            .into_iter()
            .any(|id| self.states.get(id).map_or(false, State::is_accepting))
    }

    /// Thompson base case: `start --ch--> end`.
    pub fn literal(&mut self, ch: char) -> Fragment {
        let start = self.add_state();
        let end = self.add_state();
        self.add_transition(start, Label::Symbol(ch), end);
        Fragment { start, end }
    }

    /// A fragment matching only the empty string: `start --ε--> end`.
    pub fn empty(&mut self) -> Fragment {
        let start = self.add_state();
        let end = self.add_state();
        self.connect(start, end);
        Fragment { start, end }
    }

    /// Concatenation: `frag` followed by `next`
    pub fn concat(&mut self, frag: &mut Fragment, next: Fragment) {
        self.connect(frag.end, next.start);
        frag.end = next.end;
    }

    /// Union: a new start branches into both operands, and both operand ends
    /// join at a new end.
    pub fn union(&mut self, frag: &mut Fragment, other: Fragment) {
        let start = self.add_state();
        let end = self.add_state();
        self.connect(start, frag.start);
        self.connect(start, other.start);
        self.connect(frag.end, end);
        self.connect(other.end, end);
        *frag = Fragment { start, end };
    }

    /// One or more repetitions (`+`)
    pub fn repeat_plus(&mut self, frag: &mut Fragment) {
        let start = self.add_state();
        let end = self.add_state();
        self.connect(start, frag.start);
        self.connect(frag.end, end);
        self.connect(frag.end, frag.start);
        *frag = Fragment { start, end };
    }

    /// Zero or more repetitions (`*`): `+` plus a bypass edge.
    pub fn repeat_star(&mut self, frag: &mut Fragment) {
        self.repeat_plus(frag);
        self.optional(frag);
    }

    /// Zero or one occurrence (`?`). Adds no states.
    pub fn optional(&mut self, frag: &mut Fragment) {
        self.connect(frag.start, frag.end);
    }
}

impl Default for NFA {
    fn default() -> Self {
        Self::new()
    }
}

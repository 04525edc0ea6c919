//! Subset construction and the table-driven DFA matcher.
//!
//! Each DFA state stands for the epsilon-closed set of NFA states the NFA
//! could be in at once. The sorted list of member NFA state IDs is the
//! state's identity: two sets with the same members are always the same DFA
//! state, however they were reached.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::convert::Infallible;

use crate::{
    alphabet::Alphabet,
    nfa::{StateId, NFA},
    BuildError, MatchError,
};

/// A state ID in the DFA
pub type DStateId = usize;

/// A DFA state: a set of NFA states reachable together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DState {
    members: Vec<StateId>,
    accepting: bool,
}

impl DState {
    /// Member NFA state IDs, ascending
    pub fn members(&self) -> &[StateId] {
        &self.members
    }

    /// True iff some member NFA state is accepting
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// A state with no members can never reach a match.
    pub fn is_dead(&self) -> bool {
        self.members.is_empty()
    }
}

/// Configuration for subset construction
#[derive(Clone, Debug, Default)]
pub struct Config {
    alphabet: Option<Alphabet>,
    state_limit: Option<Option<usize>>,
}

impl Config {
    /// Return a new default DFA configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Restrict the DFA to this alphabet.
    ///
    /// Inputs containing a symbol outside the alphabet are rejected with
    /// [`MatchError::Alphabet`] at match time. Without an explicit alphabet
    /// the table covers the symbols used by the NFA and every other symbol
    /// leads to the dead state.
    pub fn alphabet(mut self, alphabet: Alphabet) -> Config {
        self.alphabet = Some(alphabet);
        self
    }

    /// Fail construction once more than `limit` DFA states are discovered.
    /// `None` means no limit, which is the default.
    pub fn state_limit(mut self, limit: Option<usize>) -> Config {
        self.state_limit = Some(limit);
        self
    }

    pub fn get_alphabet(&self) -> Option<&Alphabet> {
        self.alphabet.as_ref()
    }

    pub fn get_state_limit(&self) -> Option<usize> {
        self.state_limit.flatten()
    }

    pub(crate) fn overwrite(self, o: Config) -> Config {
        Config {
            alphabet: o.alphabet.or(self.alphabet),
            state_limit: o.state_limit.or(self.state_limit),
        }
    }
}

/// A builder for a DFA.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Create a new DFA builder with its default configuration.
    pub fn new() -> Builder {
        Builder::default()
    }

    pub fn configure(&mut self, config: Config) -> &mut Builder {
        self.config = self.config.clone().overwrite(config);
        self
    }

    /// Determinize `nfa`, honoring the configured alphabet and state limit.
    pub fn build(&self, nfa: &NFA) -> Result<DFA, BuildError> {
        let (alphabet, restricted) = match self.config.get_alphabet() {
            Some(alphabet) => (alphabet.clone(), true),
            None => (Alphabet::from_nfa(nfa), false),
        };
        let limit = self.config.get_state_limit();
        determinize(nfa, alphabet, restricted, |len| match limit {
            Some(limit) if len > limit => Err(BuildError::TooManyStates { limit }),
            _ => Ok(()),
        })
    }
}

/// A deterministic finite automaton with a total transition table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DFA {
    states: Vec<DState>,
    /// Row-major: `table[id * alphabet.len() + class]`
    table: Vec<DStateId>,
    alphabet: Alphabet,
    start: DStateId,
    /// Where symbols outside the alphabet lead. `None` if the alphabet was
    /// restricted explicitly, making such symbols an error.
    dead: Option<DStateId>,
}

impl DFA {
    /// Determinize `nfa` with no state limit.
    ///
    /// Every input symbol is accepted: symbols the NFA never consumes lead
    /// to the dead state.
    pub fn new(nfa: &NFA) -> DFA {
        let result: Result<DFA, Infallible> =
            determinize(nfa, Alphabet::from_nfa(nfa), false, |_| Ok(()));
        match result {
            Ok(dfa) => dfa,
            Err(never) => match never {},
        }
    }

    /// Return a builder for configuring subset construction.
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub fn start(&self) -> DStateId {
        self.start
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn state(&self, id: DStateId) -> Option<&DState> {
        self.states.get(id)
    }

    /// All states, indexed by ID
    pub fn states(&self) -> &[DState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The dead state, if symbols outside the alphabet lead there
    pub fn dead_state(&self) -> Option<DStateId> {
        self.dead
    }

    /// The state reached from `id` on `symbol`.
    ///
    /// Returns `None` if `id` is not a state of this DFA, or if `symbol` is
    /// outside an explicitly restricted alphabet.
    pub fn next_state(&self, id: DStateId, symbol: char) -> Option<DStateId> {
        if id >= self.states.len() {
            return None;
        }
        match self.alphabet.index_of(symbol) {
            Some(class) => self.table.get(id * self.alphabet.len() + class).copied(),
            None => self.dead,
        }
    }

    /// Check if the entire input is accepted.
    ///
    /// Runs in time linear in the input length. Only a DFA built over an
    /// explicitly restricted alphabet can fail, when the input contains a
    /// symbol outside that alphabet.
    pub fn is_match(&self, input: &str) -> Result<bool, MatchError> {
        let mut current = self.start;
        for (offset, symbol) in input.chars().enumerate() {
            current = self
                .next_state(current, symbol)
                .ok_or(MatchError::Alphabet { symbol, offset })?;
        }
        Ok(self.states[current].accepting)
    }
}

/// Run the subset construction.
///
/// `check` sees the number of discovered states each time a new one is
/// added and may abort construction. Unless `restricted`, the dead state is
/// always present so that unknown symbols have somewhere to go.
fn determinize<E, F>(
    nfa: &NFA,
    alphabet: Alphabet,
    restricted: bool,
    mut check: F,
) -> Result<DFA, E>
where
    F: FnMut(usize) -> Result<(), E>,
{
    let mut dets = Determinizer {
        nfa,
        width: alphabet.len(),
        states: Vec::new(),
        table: Vec::new(),
        cache: HashMap::new(),
        worklist: VecDeque::new(),
    };

    let start = dets.add(nfa.epsilon_closure(&BTreeSet::from([nfa.start])));
    check(dets.states.len())?;

    while let Some(current) = dets.worklist.pop_front() {
        for (class, symbol) in alphabet.iter().enumerate() {
            let moved = nfa.step(dets.states[current].members.iter().copied(), symbol);
            let closed = nfa.epsilon_closure(&moved);
            let key: Vec<StateId> = closed.into_iter().collect();
            let next = match dets.cache.get(&key).copied() {
                Some(id) => id,
                None => {
                    let id = dets.add_key(key);
                    check(dets.states.len())?;
                    id
                }
            };
            dets.table[current * dets.width + class] = next;
        }
    }

    let dead = if restricted {
        None
    } else {
        match dets.cache.get(&Vec::<StateId>::new()).copied() {
            Some(id) => Some(id),
            None => {
                // A new row already loops back to itself.
                let id = dets.add_key(Vec::new());
                check(dets.states.len())?;
                Some(id)
            }
        }
    };

    debug!(
        "determinized NFA with {} states into DFA with {} states over {} symbols",
        nfa.len(),
        dets.states.len(),
        alphabet.len()
    );
    Ok(DFA {
        states: dets.states,
        table: dets.table,
        alphabet,
        start,
        dead,
    })
}

/// Working state of one subset construction
struct Determinizer<'a> {
    nfa: &'a NFA,
    width: usize,
    states: Vec<DState>,
    table: Vec<DStateId>,
    /// Canonical member list to DFA state
    cache: HashMap<Vec<StateId>, DStateId>,
    /// Discovered states whose transitions have not been computed yet
    worklist: VecDeque<DStateId>,
}

impl<'a> Determinizer<'a> {
    fn add(&mut self, members: BTreeSet<StateId>) -> DStateId {
        self.add_key(members.into_iter().collect())
    }

    fn add_key(&mut self, members: Vec<StateId>) -> DStateId {
        let id = self.states.len();
        let accepting = self.nfa.is_accepting(members.iter().copied());
        trace!("DFA state {} = {:?} (accepting: {})", id, members, accepting);

        self.cache.insert(members.clone(), id);
        self.states.push(DState { members, accepting });
        // Filled in when the state is taken off the worklist.
        self.table.extend(std::iter::repeat(id).take(self.width));
        self.worklist.push_back(id);
        id
    }
}

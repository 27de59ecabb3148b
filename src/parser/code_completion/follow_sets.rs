//! Per-rule follow sets and their cache
//!
//! The follow sets of a rule start state list every token that can begin
//! the rule, each with the sub-rule path leading to it. An `EPSILON` entry
//! means the rule (or a sub-rule on the recorded path) can end without
//! consuming anything.
//!
//! Predicates are evaluated while the sets are computed, so cached sets are
//! only valid for the parser settings they were computed under. Callers
//! changing those settings must [`FollowSetCache::clear`] the grammar.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::trace;

use crate::parser::{
    EPSILON, IntervalSet, Parser, RuleIndex, StateId, StateType, TokenType, Transition,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowSetWithPath {
    pub intervals: IntervalSet,
    pub path: Vec<RuleIndex>,
    pub following: Vec<TokenType>,
}

#[derive(Debug, Clone, Default)]
pub struct FollowSetsHolder {
    pub sets: Vec<FollowSetWithPath>,
    pub combined: IntervalSet,
}

impl FollowSetsHolder {
    /// Compute the follow sets of the rule owning `start`
    pub fn compute<P: Parser + ?Sized>(parser: &P, start: StateId) -> Self {
        let atn = parser.atn();
        let rule = atn.state(start).rule_index;
        let stop = atn.rule_to_stop_state[rule];

        let mut collector = FollowSetCollector {
            parser,
            sets: Vec::new(),
            state_stack: HashSet::new(),
            rule_stack: Vec::new(),
        };
        collector.collect(start, stop);

        let mut combined = IntervalSet::new();
        for set in &collector.sets {
            combined.add_all(&set.intervals);
        }

        Self {
            sets: collector.sets,
            combined,
        }
    }
}

struct FollowSetCollector<'p, P: Parser + ?Sized> {
    parser: &'p P,
    sets: Vec<FollowSetWithPath>,
    state_stack: HashSet<StateId>,
    rule_stack: Vec<RuleIndex>,
}

impl<P: Parser + ?Sized> FollowSetCollector<'_, P> {
    fn collect(&mut self, state: StateId, stop: StateId) {
        if !self.state_stack.insert(state) {
            return;
        }
        self.visit(state, stop);
        self.state_stack.remove(&state);
    }

    fn visit(&mut self, state: StateId, stop: StateId) {
        let atn = self.parser.atn();
        let atn_state = atn.state(state);

        if state == stop || atn_state.state_type == StateType::RuleStop {
            self.sets.push(FollowSetWithPath {
                intervals: IntervalSet::of(EPSILON),
                path: self.rule_stack.clone(),
                following: Vec::new(),
            });
            return;
        }

        for transition in &atn_state.transitions {
            match transition {
                Transition::Rule {
                    target, rule_index, ..
                } => {
                    if self.rule_stack.contains(rule_index) {
                        continue;
                    }
                    self.rule_stack.push(*rule_index);
                    self.collect(*target, stop);
                    self.rule_stack.pop();
                }
                Transition::Predicate {
                    target,
                    rule_index,
                    pred_index,
                } => {
                    if self.parser.sempred(*rule_index, *pred_index) {
                        self.collect(*target, stop);
                    }
                }
                Transition::Epsilon { target } => self.collect(*target, stop),
                Transition::Wildcard { .. } => {
                    self.sets.push(FollowSetWithPath {
                        intervals: atn.user_token_range(),
                        path: self.rule_stack.clone(),
                        following: Vec::new(),
                    });
                }
                _ => {
                    let Some(intervals) = transition.match_set(atn.max_token_type) else {
                        continue;
                    };
                    if intervals.is_empty() {
                        continue;
                    }
                    let following = if intervals.size() == 1 {
                        following_tokens(self.parser, transition.target())
                    } else {
                        Vec::new()
                    };
                    self.sets.push(FollowSetWithPath {
                        intervals,
                        path: self.rule_stack.clone(),
                        following,
                    });
                }
            }
        }
    }
}

/// Tokens that must follow once a transition into `state` was taken
///
/// Walks forward while every state has exactly one outgoing transition,
/// passing through epsilon transitions and collecting single-token labels.
/// Any other transition ends the chain.
pub fn following_tokens<P: Parser + ?Sized>(parser: &P, state: StateId) -> Vec<TokenType> {
    let atn = parser.atn();
    let mut result = Vec::new();
    let mut seen = HashSet::new();
    let mut current = state;

    while seen.insert(current) {
        let transitions = &atn.state(current).transitions;
        if transitions.len() != 1 {
            break;
        }
        match &transitions[0] {
            Transition::Epsilon { target } => current = *target,
            Transition::Atom { target, label } => {
                result.push(*label);
                current = *target;
            }
            Transition::Set { target, set } if set.size() == 1 => {
                result.extend(set.iter());
                current = *target;
            }
            _ => break,
        }
    }
    result
}

type FollowSetsPerState = HashMap<StateId, Arc<FollowSetsHolder>>;

#[derive(Debug, Default)]
struct CacheState {
    grammars: HashMap<String, FollowSetsPerState>,
    /// Bumped by every clear; results computed before a clear are not stored
    generation: u64,
}

/// Follow sets shared between collection runs, keyed by grammar identity
#[derive(Debug, Default)]
pub struct FollowSetCache {
    state: RwLock<CacheState>,
}

impl FollowSetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached follow sets for `start`, computed on first use
    ///
    /// Computation runs outside the lock. A result whose computation
    /// overlapped a [`clear`](Self::clear) is returned to the caller but
    /// not stored.
    pub fn get_or_compute<P: Parser + ?Sized>(
        &self,
        parser: &P,
        start: StateId,
    ) -> Arc<FollowSetsHolder> {
        let grammar = parser.grammar_name();
        let generation = {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(holder) = state.grammars.get(grammar).and_then(|states| states.get(&start))
            {
                return Arc::clone(holder);
            }
            state.generation
        };

        let holder = Arc::new(FollowSetsHolder::compute(parser, start));
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.generation != generation {
            trace!(grammar, start, "discarding follow sets computed before a clear");
            return holder;
        }
        let entry = state
            .grammars
            .entry(grammar.to_string())
            .or_default()
            .entry(start)
            .or_insert(holder);
        Arc::clone(entry)
    }

    /// Drop cached sets of one grammar, or of all grammars
    pub fn clear(&self, grammar: Option<&str>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.generation += 1;
        match grammar {
            Some(name) => {
                state.grammars.remove(name);
            }
            None => state.grammars.clear(),
        }
    }

    /// Clear count so far
    pub fn generation(&self) -> u64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    /// Number of rule start states cached for `grammar`
    pub fn cached_states(&self, grammar: &str) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .grammars
            .get(grammar)
            .map_or(0, HashMap::len)
    }
}

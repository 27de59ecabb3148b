//! Augmented transition network of a grammar
//!
//! The ATN is a graph of numbered states grouped by rule. Every rule has a
//! start state and a stop state; rule stop states have no outgoing
//! transitions. Rule transitions jump into the start state of the invoked
//! rule and record the state to continue from once that rule returns.

use std::fmt;

use super::interval_set::IntervalSet;
use super::token::{MIN_USER_TOKEN_TYPE, TokenType};

pub type StateId = usize;
pub type RuleIndex = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateType {
    Basic,
    RuleStart,
    BlockStart,
    PlusBlockStart,
    StarBlockStart,
    TokenStart,
    RuleStop,
    BlockEnd,
    StarLoopBack,
    StarLoopEntry,
    PlusLoopBack,
    LoopEnd,
}

impl fmt::Display for StateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateType::Basic => "BASIC",
            StateType::RuleStart => "RULE_START",
            StateType::BlockStart => "BLOCK_START",
            StateType::PlusBlockStart => "PLUS_BLOCK_START",
            StateType::StarBlockStart => "STAR_BLOCK_START",
            StateType::TokenStart => "TOKEN_START",
            StateType::RuleStop => "RULE_STOP",
            StateType::BlockEnd => "BLOCK_END",
            StateType::StarLoopBack => "STAR_LOOP_BACK",
            StateType::StarLoopEntry => "STAR_LOOP_ENTRY",
            StateType::PlusLoopBack => "PLUS_LOOP_BACK",
            StateType::LoopEnd => "LOOP_END",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Epsilon {
        target: StateId,
    },
    Atom {
        target: StateId,
        label: TokenType,
    },
    Range {
        target: StateId,
        start: TokenType,
        stop: TokenType,
    },
    Set {
        target: StateId,
        set: IntervalSet,
    },
    NotSet {
        target: StateId,
        set: IntervalSet,
    },
    Wildcard {
        target: StateId,
    },
    Rule {
        target: StateId,
        rule_index: RuleIndex,
        follow_state: StateId,
    },
    Predicate {
        target: StateId,
        rule_index: RuleIndex,
        pred_index: usize,
    },
}

impl Transition {
    pub fn target(&self) -> StateId {
        match self {
            Transition::Epsilon { target }
            | Transition::Atom { target, .. }
            | Transition::Range { target, .. }
            | Transition::Set { target, .. }
            | Transition::NotSet { target, .. }
            | Transition::Wildcard { target }
            | Transition::Rule { target, .. }
            | Transition::Predicate { target, .. } => *target,
        }
    }

    /// Epsilon, rule and predicate transitions consume no input
    pub fn is_epsilon(&self) -> bool {
        matches!(
            self,
            Transition::Epsilon { .. } | Transition::Rule { .. } | Transition::Predicate { .. }
        )
    }

    /// Token label of a matching transition, as written in the grammar
    ///
    /// For `NotSet` this is the excluded set; use [`Transition::match_set`]
    /// to get the tokens that actually match.
    pub fn label(&self) -> Option<IntervalSet> {
        match self {
            Transition::Atom { label, .. } => Some(IntervalSet::of(*label)),
            Transition::Range { start, stop, .. } => Some(IntervalSet::range(*start, *stop)),
            Transition::Set { set, .. } | Transition::NotSet { set, .. } => Some(set.clone()),
            _ => None,
        }
    }

    /// Tokens matched by this transition within `[MIN_USER_TOKEN_TYPE, max_token_type]`
    pub fn match_set(&self, max_token_type: TokenType) -> Option<IntervalSet> {
        match self {
            Transition::NotSet { set, .. } => {
                Some(set.complement(&IntervalSet::range(MIN_USER_TOKEN_TYPE, max_token_type)))
            }
            Transition::Wildcard { .. } => {
                Some(IntervalSet::range(MIN_USER_TOKEN_TYPE, max_token_type))
            }
            _ => self.label(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AtnState {
    pub state_number: StateId,
    pub state_type: StateType,
    pub rule_index: RuleIndex,
    pub transitions: Vec<Transition>,
}

impl AtnState {
    pub fn new(state_number: StateId, state_type: StateType, rule_index: RuleIndex) -> Self {
        Self {
            state_number,
            state_type,
            rule_index,
            transitions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Atn {
    pub states: Vec<AtnState>,
    pub rule_to_start_state: Vec<StateId>,
    pub rule_to_stop_state: Vec<StateId>,
    pub max_token_type: TokenType,
}

impl Atn {
    pub fn state(&self, id: StateId) -> &AtnState {
        &self.states[id]
    }

    pub fn rule_count(&self) -> usize {
        self.rule_to_start_state.len()
    }

    pub fn start_state(&self, rule: RuleIndex) -> Option<StateId> {
        self.rule_to_start_state.get(rule).copied()
    }

    pub fn stop_state(&self, rule: RuleIndex) -> Option<StateId> {
        self.rule_to_stop_state.get(rule).copied()
    }

    /// Every user token type of the grammar
    pub fn user_token_range(&self) -> IntervalSet {
        IntervalSet::range(MIN_USER_TOKEN_TYPE, self.max_token_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_kinds() {
        assert!(Transition::Epsilon { target: 1 }.is_epsilon());
        assert!(
            Transition::Rule {
                target: 1,
                rule_index: 0,
                follow_state: 2
            }
            .is_epsilon()
        );
        assert!(!Transition::Atom { target: 1, label: 3 }.is_epsilon());
        assert_eq!(Transition::Wildcard { target: 7 }.target(), 7);
    }

    #[test]
    fn test_not_set_matches_complement() {
        let transition = Transition::NotSet {
            target: 1,
            set: IntervalSet::from_tokens(&[2, 3]),
        };

        assert_eq!(transition.label().map(|s| s.to_vec()), Some(vec![2, 3]));
        assert_eq!(
            transition.match_set(5).map(|s| s.to_vec()),
            Some(vec![1, 4, 5])
        );
    }
}

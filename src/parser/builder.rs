//! Compiles rule expressions into an [`Atn`]
//!
//! Rules are declared by name first and given a body afterwards, so bodies
//! can reference rules declared later. Each construct is lowered to the
//! usual ANTLR state shapes:
//!
//! ```text
//! alt:   BLOCK_START -e-> alt_i ... -e-> BLOCK_END
//! opt:   BLOCK_START -e-> body -e-> BLOCK_END, BLOCK_START -e-> BLOCK_END
//! star:  STAR_LOOP_ENTRY -e-> body -e-> STAR_LOOP_BACK -e-> STAR_LOOP_ENTRY
//!        STAR_LOOP_ENTRY -e-> LOOP_END
//! plus:  body -e-> PLUS_LOOP_BACK -e-> body, PLUS_LOOP_BACK -e-> LOOP_END
//! ```

use super::Grammar;
use super::atn::{Atn, AtnState, RuleIndex, StateId, StateType, Transition};
use super::interval_set::IntervalSet;
use super::token::{EOF, MIN_USER_TOKEN_TYPE, TokenType, Vocabulary};
use crate::error::GrammarError;

/// Rule body expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Token(TokenType),
    Set(Vec<TokenType>),
    NotSet(Vec<TokenType>),
    Wildcard,
    Rule(RuleIndex),
    Predicate(usize),
    Seq(Vec<Expr>),
    Alt(Vec<Expr>),
    Optional(Box<Expr>),
    Star(Box<Expr>),
    Plus(Box<Expr>),
}

pub fn tok(token: TokenType) -> Expr {
    Expr::Token(token)
}

pub fn set(tokens: &[TokenType]) -> Expr {
    Expr::Set(tokens.to_vec())
}

pub fn not_set(tokens: &[TokenType]) -> Expr {
    Expr::NotSet(tokens.to_vec())
}

pub fn any() -> Expr {
    Expr::Wildcard
}

pub fn rule(index: RuleIndex) -> Expr {
    Expr::Rule(index)
}

pub fn pred(index: usize) -> Expr {
    Expr::Predicate(index)
}

pub fn seq(items: Vec<Expr>) -> Expr {
    Expr::Seq(items)
}

pub fn alt(items: Vec<Expr>) -> Expr {
    Expr::Alt(items)
}

pub fn opt(item: Expr) -> Expr {
    Expr::Optional(Box::new(item))
}

pub fn star(item: Expr) -> Expr {
    Expr::Star(Box::new(item))
}

pub fn plus(item: Expr) -> Expr {
    Expr::Plus(Box::new(item))
}

/// Incrementally declared grammar
pub struct GrammarBuilder {
    name: String,
    vocabulary: Vocabulary,
    rule_names: Vec<String>,
    bodies: Vec<Option<Expr>>,
}

impl GrammarBuilder {
    pub fn new(name: impl Into<String>, vocabulary: Vocabulary) -> Self {
        Self {
            name: name.into(),
            vocabulary,
            rule_names: Vec::new(),
            bodies: Vec::new(),
        }
    }

    /// Declare a rule, or return the index of an already declared one
    ///
    /// The first declared rule has index 0 and is the default start rule.
    pub fn rule(&mut self, name: &str) -> RuleIndex {
        if let Some(index) = self.rule_names.iter().position(|n| n == name) {
            return index;
        }
        self.rule_names.push(name.to_string());
        self.bodies.push(None);
        self.rule_names.len() - 1
    }

    pub fn define(&mut self, rule: RuleIndex, body: Expr) -> Result<(), GrammarError> {
        let slot = self
            .bodies
            .get_mut(rule)
            .ok_or(GrammarError::UnknownRuleIndex(rule))?;
        if slot.is_some() {
            return Err(GrammarError::DuplicateRule(self.rule_names[rule].clone()));
        }
        *slot = Some(body);
        Ok(())
    }

    pub fn build(self) -> Result<Grammar, GrammarError> {
        if self.rule_names.is_empty() {
            return Err(GrammarError::Empty);
        }

        let mut compiler = AtnCompiler {
            atn: Atn {
                max_token_type: self.vocabulary.max_token_type(),
                ..Atn::default()
            },
            rule_names: &self.rule_names,
        };

        // Start and stop states first so rule transitions can target any rule.
        for rule in 0..self.rule_names.len() {
            let start = compiler.new_state(StateType::RuleStart, rule);
            let stop = compiler.new_state(StateType::RuleStop, rule);
            compiler.atn.rule_to_start_state.push(start);
            compiler.atn.rule_to_stop_state.push(stop);
        }

        for (rule, body) in self.bodies.iter().enumerate() {
            let body = body
                .as_ref()
                .ok_or_else(|| GrammarError::UndefinedRule(self.rule_names[rule].clone()))?;
            let fragment = compiler.compile(rule, body)?;
            let start = compiler.atn.rule_to_start_state[rule];
            let stop = compiler.atn.rule_to_stop_state[rule];
            compiler.epsilon(start, fragment.entry);
            compiler.epsilon(fragment.exit, stop);
        }

        let atn = compiler.atn;
        Ok(Grammar {
            name: self.name,
            atn,
            vocabulary: self.vocabulary,
            rule_names: self.rule_names,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Fragment {
    entry: StateId,
    exit: StateId,
}

struct AtnCompiler<'a> {
    atn: Atn,
    rule_names: &'a [String],
}

impl AtnCompiler<'_> {
    fn new_state(&mut self, state_type: StateType, rule: RuleIndex) -> StateId {
        let id = self.atn.states.len();
        self.atn.states.push(AtnState::new(id, state_type, rule));
        id
    }

    fn add(&mut self, from: StateId, transition: Transition) {
        self.atn.states[from].transitions.push(transition);
    }

    fn epsilon(&mut self, from: StateId, to: StateId) {
        self.add(from, Transition::Epsilon { target: to });
    }

    fn check_token(&self, rule: RuleIndex, token: TokenType) -> Result<(), GrammarError> {
        if token == EOF || (MIN_USER_TOKEN_TYPE..=self.atn.max_token_type).contains(&token) {
            Ok(())
        } else {
            Err(GrammarError::InvalidToken {
                rule: self.rule_names[rule].clone(),
                token,
            })
        }
    }

    fn token_set(&self, rule: RuleIndex, tokens: &[TokenType]) -> Result<IntervalSet, GrammarError> {
        for token in tokens {
            self.check_token(rule, *token)?;
        }
        Ok(IntervalSet::from_tokens(tokens))
    }

    /// Two basic states joined by one transition built from the target state
    fn single(&mut self, rule: RuleIndex, make: impl FnOnce(StateId) -> Transition) -> Fragment {
        let entry = self.new_state(StateType::Basic, rule);
        let exit = self.new_state(StateType::Basic, rule);
        self.add(entry, make(exit));
        Fragment { entry, exit }
    }

    fn compile(&mut self, rule: RuleIndex, expr: &Expr) -> Result<Fragment, GrammarError> {
        let fragment = match expr {
            Expr::Token(token) => {
                self.check_token(rule, *token)?;
                let label = *token;
                self.single(rule, |target| Transition::Atom { target, label })
            }
            Expr::Set(tokens) => {
                let set = self.token_set(rule, tokens)?;
                self.single(rule, |target| Transition::Set { target, set })
            }
            Expr::NotSet(tokens) => {
                let set = self.token_set(rule, tokens)?;
                self.single(rule, |target| Transition::NotSet { target, set })
            }
            Expr::Wildcard => self.single(rule, |target| Transition::Wildcard { target }),
            Expr::Rule(invoked) => {
                let start = self
                    .atn
                    .start_state(*invoked)
                    .ok_or(GrammarError::UnknownRuleIndex(*invoked))?;
                let entry = self.new_state(StateType::Basic, rule);
                let exit = self.new_state(StateType::Basic, rule);
                self.add(
                    entry,
                    Transition::Rule {
                        target: start,
                        rule_index: *invoked,
                        follow_state: exit,
                    },
                );
                Fragment { entry, exit }
            }
            Expr::Predicate(pred_index) => {
                let pred_index = *pred_index;
                self.single(rule, |target| Transition::Predicate {
                    target,
                    rule_index: rule,
                    pred_index,
                })
            }
            Expr::Seq(items) => {
                let Some((first, rest)) = items.split_first() else {
                    let state = self.new_state(StateType::Basic, rule);
                    return Ok(Fragment {
                        entry: state,
                        exit: state,
                    });
                };
                let head = self.compile(rule, first)?;
                let mut exit = head.exit;
                for item in rest {
                    let next = self.compile(rule, item)?;
                    self.epsilon(exit, next.entry);
                    exit = next.exit;
                }
                Fragment {
                    entry: head.entry,
                    exit,
                }
            }
            Expr::Alt(items) => {
                let entry = self.new_state(StateType::BlockStart, rule);
                let exit = self.new_state(StateType::BlockEnd, rule);
                for item in items {
                    let branch = self.compile(rule, item)?;
                    self.epsilon(entry, branch.entry);
                    self.epsilon(branch.exit, exit);
                }
                Fragment { entry, exit }
            }
            Expr::Optional(item) => {
                let entry = self.new_state(StateType::BlockStart, rule);
                let exit = self.new_state(StateType::BlockEnd, rule);
                let body = self.compile(rule, item)?;
                self.epsilon(entry, body.entry);
                self.epsilon(entry, exit);
                self.epsilon(body.exit, exit);
                Fragment { entry, exit }
            }
            Expr::Star(item) => {
                let entry = self.new_state(StateType::StarLoopEntry, rule);
                let loop_end = self.new_state(StateType::LoopEnd, rule);
                let loop_back = self.new_state(StateType::StarLoopBack, rule);
                let body = self.compile(rule, item)?;
                self.epsilon(entry, body.entry);
                self.epsilon(entry, loop_end);
                self.epsilon(body.exit, loop_back);
                self.epsilon(loop_back, entry);
                Fragment {
                    entry,
                    exit: loop_end,
                }
            }
            Expr::Plus(item) => {
                let entry = self.new_state(StateType::PlusBlockStart, rule);
                let body = self.compile(rule, item)?;
                let loop_back = self.new_state(StateType::PlusLoopBack, rule);
                let loop_end = self.new_state(StateType::LoopEnd, rule);
                self.epsilon(entry, body.entry);
                self.epsilon(body.exit, loop_back);
                self.epsilon(loop_back, entry);
                self.epsilon(loop_back, loop_end);
                Fragment {
                    entry,
                    exit: loop_end,
                }
            }
        };
        Ok(fragment)
    }
}

//! Candidate collection by walking the ATN over a token prefix
//!
//! The walker simulates the parser over the tokens from the start of the
//! run up to the caret. Whenever a path reaches the caret it records what
//! could come next: tokens, or the outermost preferred rule on the current
//! rule stack. Per-run state lives in a [`Walk`] that is threaded through
//! the recursion; only the follow-set cache outlives a run.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, info};

use super::candidates::CandidatesCollection;
use super::follow_sets::{FollowSetCache, following_tokens};
use crate::parser::{
    EOF, EPSILON, MIN_USER_TOKEN_TYPE, Parser, RuleContext, RuleIndex, StateId, StateType,
    TokenType, Transition,
};

/// Token positions (relative to the run start) at which a rule can end
type RuleEndStatus = BTreeSet<usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PipelineEntry {
    state: StateId,
    token_index: usize,
}

/// Rule invocation currently being computed at a given position
///
/// Re-entering the same rule at the same position without consuming input
/// is left recursion; such calls see `seed` instead of recursing again.
#[derive(Debug)]
struct ActiveRule {
    rule: RuleIndex,
    token_index: usize,
    seed: RuleEndStatus,
    recursed: bool,
}

/// State of a single collection run
struct Walk {
    tokens: Vec<TokenType>,
    call_stack: Vec<RuleIndex>,
    shortcut_map: HashMap<RuleIndex, HashMap<usize, RuleEndStatus>>,
    active: Vec<ActiveRule>,
    /// Shallowest active entry whose seed was read since the last reset
    seed_read_depth: usize,
    candidates: CandidatesCollection,
    states_processed: usize,
}

impl Walk {
    fn caret_index(&self) -> usize {
        self.tokens.len() - 1
    }
}

/// Collects completion candidates for a parser
pub struct CodeCompletionCore<'a, P: Parser + ?Sized> {
    parser: &'a P,
    follow_sets: &'a FollowSetCache,

    /// Tokens never reported as candidates
    pub ignored_tokens: HashSet<TokenType>,

    /// Rules reported instead of the tokens they would produce
    pub preferred_rules: HashSet<RuleIndex>,

    pub show_result: bool,
    pub show_debug_output: bool,
    pub debug_output_with_transitions: bool,
    pub show_rule_stack: bool,
}

impl<'a, P: Parser + ?Sized> CodeCompletionCore<'a, P> {
    pub fn new(parser: &'a P, follow_sets: &'a FollowSetCache) -> Self {
        Self {
            parser,
            follow_sets,
            ignored_tokens: HashSet::new(),
            preferred_rules: HashSet::new(),
            show_result: false,
            show_debug_output: false,
            debug_output_with_transitions: false,
            show_rule_stack: false,
        }
    }

    pub fn parser(&self) -> &P {
        self.parser
    }

    /// Drop cached follow sets for this parser's grammar, or for all grammars
    pub fn clear_follow_sets(&self, all_grammars: bool) {
        if all_grammars {
            self.follow_sets.clear(None);
        } else {
            self.follow_sets.clear(Some(self.parser.grammar_name()));
        }
    }

    /// Collect candidates for the token at `caret_token_index`
    ///
    /// Without a context the run starts at the first token with rule 0.
    /// Hidden-channel tokens are skipped; the caret is clamped to EOF.
    pub fn collect_candidates(
        &self,
        caret_token_index: usize,
        context: Option<&RuleContext>,
    ) -> CandidatesCollection {
        let context = context
            .copied()
            .unwrap_or_else(|| RuleContext::new(0, 0));
        let atn = self.parser.atn();
        let Some(start_state) = atn.start_state(context.rule_index) else {
            return CandidatesCollection::new();
        };

        let mut tokens = Vec::new();
        for token in self
            .parser
            .token_stream()
            .tokens()
            .iter()
            .skip(context.start_token_index)
        {
            if token.is_default_channel() {
                tokens.push(token.token_type);
                if token.token_index >= caret_token_index {
                    break;
                }
            }
            if token.is_eof() {
                break;
            }
        }
        if tokens.is_empty() {
            tokens.push(EOF);
        }

        let mut walk = Walk {
            tokens,
            call_stack: Vec::new(),
            shortcut_map: HashMap::new(),
            active: Vec::new(),
            seed_read_depth: usize::MAX,
            candidates: CandidatesCollection::new(),
            states_processed: 0,
        };

        self.process_rule(&mut walk, start_state, 0, 0);

        if self.show_result {
            self.log_result(&walk);
        }
        walk.candidates
    }

    fn process_rule(
        &self,
        walk: &mut Walk,
        start_state: StateId,
        token_index: usize,
        indentation: usize,
    ) -> RuleEndStatus {
        let atn = self.parser.atn();
        let rule = atn.state(start_state).rule_index;

        if let Some(status) = walk
            .shortcut_map
            .get(&rule)
            .and_then(|positions| positions.get(&token_index))
        {
            if self.show_debug_output {
                debug!(
                    "{:indent$}=====> shortcut {}",
                    "",
                    self.parser.grammar().rule_name(rule),
                    indent = indentation * 2
                );
            }
            return status.clone();
        }

        if let Some(depth) = walk
            .active
            .iter()
            .position(|entry| entry.rule == rule && entry.token_index == token_index)
        {
            walk.active[depth].recursed = true;
            walk.seed_read_depth = walk.seed_read_depth.min(depth);
            return walk.active[depth].seed.clone();
        }

        let follow_sets = self.follow_sets.get_or_compute(self.parser, start_state);
        walk.call_stack.push(rule);

        if token_index >= walk.caret_index() {
            if self.preferred_rules.contains(&rule) {
                walk.candidates
                    .translate_stack(&walk.call_stack, &self.preferred_rules);
            } else {
                for set in &follow_sets.sets {
                    let mut full_path = walk.call_stack.clone();
                    full_path.extend_from_slice(&set.path);
                    if walk
                        .candidates
                        .translate_stack(&full_path, &self.preferred_rules)
                    {
                        continue;
                    }
                    let following = self.truncate_following(&set.following);
                    for symbol in set.intervals.iter() {
                        if symbol != EPSILON && !self.ignored_tokens.contains(&symbol) {
                            if self.show_debug_output {
                                debug!(
                                    "{:indent$}=====> collected: {}",
                                    "",
                                    self.parser.vocabulary().display_name(symbol),
                                    indent = indentation * 2
                                );
                            }
                            walk.candidates.add_token(symbol, following.clone());
                        }
                    }
                }
            }
            walk.call_stack.pop();
            return RuleEndStatus::new();
        }

        let current_symbol = walk.tokens[token_index];
        if !follow_sets.combined.contains(EPSILON) && !follow_sets.combined.contains(current_symbol)
        {
            walk.call_stack.pop();
            return RuleEndStatus::new();
        }

        let depth = walk.active.len();
        let outer_read_depth = std::mem::replace(&mut walk.seed_read_depth, usize::MAX);
        walk.active.push(ActiveRule {
            rule,
            token_index,
            seed: RuleEndStatus::new(),
            recursed: false,
        });

        // Grow the seed until a left-recursive call adds no new end positions.
        let result = loop {
            let result = self.walk_rule(walk, start_state, token_index, indentation);
            let entry = &mut walk.active[depth];
            if entry.recursed && result != entry.seed {
                entry.seed = result;
                entry.recursed = false;
                continue;
            }
            break result;
        };

        walk.active.pop();
        let inner_read_depth = walk.seed_read_depth;
        let depends_on_caller = inner_read_depth < depth;
        walk.seed_read_depth = if depends_on_caller {
            outer_read_depth.min(inner_read_depth)
        } else {
            outer_read_depth
        };
        walk.call_stack.pop();

        if !depends_on_caller {
            walk.shortcut_map
                .entry(rule)
                .or_default()
                .insert(token_index, result.clone());
        }
        result
    }

    /// Run the state pipeline of one rule invocation
    fn walk_rule(
        &self,
        walk: &mut Walk,
        start_state: StateId,
        token_index: usize,
        indentation: usize,
    ) -> RuleEndStatus {
        let atn = self.parser.atn();
        let mut result = RuleEndStatus::new();
        let mut processed = HashSet::new();
        let mut pipeline = vec![PipelineEntry {
            state: start_state,
            token_index,
        }];

        while let Some(entry) = pipeline.pop() {
            if !processed.insert(entry) {
                continue;
            }
            walk.states_processed += 1;

            let current_symbol = walk.tokens[entry.token_index];
            let at_caret = entry.token_index >= walk.caret_index();
            let state = atn.state(entry.state);

            if self.show_debug_output {
                self.log_state(walk, entry, current_symbol, indentation);
                if self.show_rule_stack {
                    self.log_rule_stack(walk, indentation);
                }
            }

            if state.state_type == StateType::RuleStop {
                result.insert(entry.token_index);
                continue;
            }

            for transition in &state.transitions {
                match transition {
                    Transition::Rule {
                        target,
                        follow_state,
                        ..
                    } => {
                        let end_status =
                            self.process_rule(walk, *target, entry.token_index, indentation + 1);
                        for position in end_status {
                            pipeline.push(PipelineEntry {
                                state: *follow_state,
                                token_index: position,
                            });
                        }
                    }
                    Transition::Predicate {
                        target,
                        rule_index,
                        pred_index,
                    } => {
                        if self.parser.sempred(*rule_index, *pred_index) {
                            pipeline.push(PipelineEntry {
                                state: *target,
                                token_index: entry.token_index,
                            });
                        }
                    }
                    Transition::Wildcard { target } => {
                        if at_caret {
                            if !walk
                                .candidates
                                .translate_stack(&walk.call_stack, &self.preferred_rules)
                            {
                                for symbol in MIN_USER_TOKEN_TYPE..=atn.max_token_type {
                                    if !self.ignored_tokens.contains(&symbol) {
                                        walk.candidates.add_token(symbol, Vec::new());
                                    }
                                }
                            }
                        } else {
                            pipeline.push(PipelineEntry {
                                state: *target,
                                token_index: entry.token_index + 1,
                            });
                        }
                    }
                    Transition::Epsilon { target } => {
                        if at_caret {
                            walk.candidates
                                .translate_stack(&walk.call_stack, &self.preferred_rules);
                        }
                        pipeline.push(PipelineEntry {
                            state: *target,
                            token_index: entry.token_index,
                        });
                    }
                    _ => {
                        let Some(set) = transition.match_set(atn.max_token_type) else {
                            continue;
                        };
                        if set.is_empty() {
                            continue;
                        }
                        if at_caret {
                            if walk
                                .candidates
                                .translate_stack(&walk.call_stack, &self.preferred_rules)
                            {
                                continue;
                            }
                            let add_following = set.size() == 1;
                            for symbol in set.iter() {
                                if self.ignored_tokens.contains(&symbol) {
                                    continue;
                                }
                                if self.show_debug_output {
                                    debug!(
                                        "{:indent$}=====> collected: {}",
                                        "",
                                        self.parser.vocabulary().display_name(symbol),
                                        indent = indentation * 2
                                    );
                                }
                                let following = if add_following {
                                    self.truncate_following(&following_tokens(
                                        self.parser,
                                        transition.target(),
                                    ))
                                } else {
                                    Vec::new()
                                };
                                walk.candidates.add_token(symbol, following);
                            }
                        } else if set.contains(current_symbol) {
                            if self.show_debug_output {
                                debug!(
                                    "{:indent$}=====> consumed: {}",
                                    "",
                                    self.parser.vocabulary().display_name(current_symbol),
                                    indent = indentation * 2
                                );
                            }
                            pipeline.push(PipelineEntry {
                                state: transition.target(),
                                token_index: entry.token_index + 1,
                            });
                        }
                    }
                }
            }
        }

        result
    }

    /// Following tokens up to the first ignored one
    fn truncate_following(&self, following: &[TokenType]) -> Vec<TokenType> {
        following
            .iter()
            .take_while(|token| !self.ignored_tokens.contains(token))
            .copied()
            .collect()
    }

    fn log_state(
        &self,
        walk: &Walk,
        entry: PipelineEntry,
        current_symbol: TokenType,
        indentation: usize,
    ) {
        let grammar = self.parser.grammar();
        let state = grammar.atn.state(entry.state);
        let mut output = format!(
            "{:indent$}{} {} ({}), token: {} [{}]",
            "",
            state.state_number,
            state.state_type,
            grammar.rule_name(state.rule_index),
            entry.token_index,
            grammar.vocabulary.display_name(current_symbol),
            indent = indentation * 2
        );

        if self.debug_output_with_transitions {
            let transitions: Vec<String> = state
                .transitions
                .iter()
                .map(|transition| self.describe_transition(transition))
                .collect();
            output.push_str(&format!(" -> {}", transitions.join(", ")));
        }
        debug!(states_processed = walk.states_processed, "{output}");
    }

    fn describe_transition(&self, transition: &Transition) -> String {
        let grammar = self.parser.grammar();
        let vocabulary = &grammar.vocabulary;
        let names = |tokens: Vec<TokenType>| -> String {
            tokens
                .into_iter()
                .map(|token| vocabulary.display_name(token))
                .collect::<Vec<_>>()
                .join(" ")
        };

        match transition {
            Transition::Epsilon { target } => format!("EPSILON {target}"),
            Transition::Rule {
                target, rule_index, ..
            } => format!("RULE {} {target}", grammar.rule_name(*rule_index)),
            Transition::Predicate {
                target, pred_index, ..
            } => format!("PREDICATE {pred_index} {target}"),
            Transition::Wildcard { target } => format!("WILDCARD {target}"),
            Transition::NotSet { target, set } => format!("NOT_SET {} {target}", names(set.to_vec())),
            Transition::Set { target, set } => format!("SET {} {target}", names(set.to_vec())),
            Transition::Range { target, start, stop } => format!(
                "RANGE {}..{} {target}",
                vocabulary.display_name(*start),
                vocabulary.display_name(*stop)
            ),
            Transition::Atom { target, label } => {
                format!("ATOM {} {target}", vocabulary.display_name(*label))
            }
        }
    }

    fn log_rule_stack(&self, walk: &Walk, indentation: usize) {
        let grammar = self.parser.grammar();
        let stack: Vec<&str> = walk
            .call_stack
            .iter()
            .map(|rule| grammar.rule_name(*rule))
            .collect();
        debug!(
            "{:indent$}rule stack: {}",
            "",
            stack.join(" > "),
            indent = indentation * 2
        );
    }

    fn log_result(&self, walk: &Walk) {
        let grammar = self.parser.grammar();
        let vocabulary = &grammar.vocabulary;
        info!(
            states_processed = walk.states_processed,
            "collection finished"
        );

        for (token, following) in &walk.candidates.tokens {
            let following: Vec<String> = following
                .iter()
                .map(|token| vocabulary.display_name(*token))
                .collect();
            info!(
                "token candidate: {} {}",
                vocabulary.display_name(*token),
                following.join(" ")
            );
        }
        for (rule, path) in &walk.candidates.rules {
            let path: Vec<&str> = path.iter().map(|rule| grammar.rule_name(*rule)).collect();
            info!(
                "rule candidate: {} [{}]",
                grammar.rule_name(*rule),
                path.join(", ")
            );
        }
    }
}

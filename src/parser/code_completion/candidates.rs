use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::parser::{RuleIndex, TokenType};

/// Result of one collection run
///
/// `tokens` maps each candidate token to the tokens that must directly
/// follow it (empty when there is no unambiguous continuation). `rules`
/// maps each preferred rule to the rule path that led to it, outermost
/// first, excluding the start rule and the preferred rule itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CandidatesCollection {
    pub tokens: BTreeMap<TokenType, Vec<TokenType>>,
    pub rules: BTreeMap<RuleIndex, Vec<RuleIndex>>,
}

impl CandidatesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.rules.is_empty()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.rules.clear();
    }

    /// Record a token candidate
    ///
    /// A token reached again with a different following list keeps no
    /// following list at all.
    pub fn add_token(&mut self, token: TokenType, following: Vec<TokenType>) {
        match self.tokens.get_mut(&token) {
            None => {
                self.tokens.insert(token, following);
            }
            Some(existing) => {
                if *existing != following {
                    existing.clear();
                }
            }
        }
    }

    /// Record the outermost preferred rule on `rule_stack`, if any
    ///
    /// `rule_stack[0]` is the start rule of the run. The first path found
    /// for a rule is kept. Returns whether a preferred rule was found.
    pub fn translate_stack(
        &mut self,
        rule_stack: &[RuleIndex],
        preferred_rules: &HashSet<RuleIndex>,
    ) -> bool {
        if preferred_rules.is_empty() {
            return false;
        }

        for (depth, rule) in rule_stack.iter().enumerate() {
            if preferred_rules.contains(rule) {
                let path = rule_stack.get(1..depth).unwrap_or_default().to_vec();
                self.rules.entry(*rule).or_insert(path);
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preferred(rules: &[RuleIndex]) -> HashSet<RuleIndex> {
        rules.iter().copied().collect()
    }

    #[test]
    fn test_add_token_keeps_identical_following() {
        let mut candidates = CandidatesCollection::new();
        candidates.add_token(4, vec![5]);
        candidates.add_token(4, vec![5]);

        assert_eq!(candidates.tokens.get(&4), Some(&vec![5]));
    }

    #[test]
    fn test_add_token_clears_conflicting_following() {
        let mut candidates = CandidatesCollection::new();
        candidates.add_token(4, vec![5]);
        candidates.add_token(4, vec![6]);
        candidates.add_token(4, vec![5]);

        assert_eq!(candidates.tokens.get(&4), Some(&vec![]));
    }

    #[test]
    fn test_translate_picks_outermost_preferred_rule() {
        let mut candidates = CandidatesCollection::new();
        let found = candidates.translate_stack(&[0, 3, 5, 7], &preferred(&[5, 7]));

        assert!(found);
        assert_eq!(candidates.rules.get(&5), Some(&vec![3]));
        assert!(!candidates.rules.contains_key(&7));
    }

    #[test]
    fn test_translate_path_excludes_start_rule() {
        let mut candidates = CandidatesCollection::new();
        candidates.translate_stack(&[0, 2], &preferred(&[2]));
        candidates.translate_stack(&[2], &preferred(&[2]));

        assert_eq!(candidates.rules.get(&2), Some(&vec![]));
    }

    #[test]
    fn test_translate_first_path_wins() {
        let mut candidates = CandidatesCollection::new();
        candidates.translate_stack(&[0, 1, 4], &preferred(&[4]));
        candidates.translate_stack(&[0, 2, 4], &preferred(&[4]));

        assert_eq!(candidates.rules.get(&4), Some(&vec![1]));
    }

    #[test]
    fn test_translate_without_preferred_rules() {
        let mut candidates = CandidatesCollection::new();
        assert!(!candidates.translate_stack(&[0, 1], &HashSet::new()));
        assert!(candidates.is_empty());
    }
}

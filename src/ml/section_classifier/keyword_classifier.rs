//! Keyword-based section matching.
//!
//! A fixed rule table maps each section to the words and phrases that point
//! to it. Matching is a case-insensitive substring test on the raw text, so
//! `"stolen"` also matches inside `"stolen goods"` and `"hit"` inside
//! `"white"`.

use super::types::{Candidate, SectionCode};

/// Highest confidence a keyword match can report.
pub const MAX_KEYWORD_CONFIDENCE: f64 = 0.85;

/// Number of matched keywords that would reach full confidence before capping.
pub const KEYWORD_CONFIDENCE_DENOMINATOR: f64 = 3.0;

/// A section and the keywords that select it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    /// Section selected by this rule.
    pub section: &'static str,
    /// Lowercase keywords and phrases.
    pub keywords: &'static [&'static str],
}

/// Default rule table, in tie-breaking order.
pub const DEFAULT_KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        section: "323",
        keywords: &["hit", "punch", "beat", "slap", "assault", "attack", "physically"],
    },
    KeywordRule {
        section: "379",
        keywords: &["stole", "stolen", "theft", "robbed", "took", "property"],
    },
    KeywordRule {
        section: "420",
        keywords: &[
            "cheat",
            "fraud",
            "deceive",
            "scam",
            "fake",
            "dishonest",
            "not delivered",
        ],
    },
    KeywordRule {
        section: "506",
        keywords: &["threat", "threaten", "intimidate", "kill", "harm", "danger"],
    },
    KeywordRule {
        section: "354",
        keywords: &["molest", "inappropriate", "touch", "harassment", "modesty"],
    },
    KeywordRule {
        section: "376",
        keywords: &["rape", "sexual assault", "sexual violence"],
    },
    KeywordRule {
        section: "302",
        keywords: &["murder", "killed", "homicide", "dead"],
    },
    KeywordRule {
        section: "406",
        keywords: &["breach of trust", "misappropriate", "entrust"],
    },
    KeywordRule {
        section: "498A",
        keywords: &["dowry", "husband", "in-laws", "domestic violence", "torture"],
    },
    KeywordRule {
        section: "392",
        keywords: &["robbery", "dacoity", "gunpoint", "armed"],
    },
    KeywordRule {
        section: "66D",
        keywords: &["cyber", "hacking", "phishing", "online fraud", "credit card fraud"],
    },
    KeywordRule {
        section: "467",
        keywords: &["forged", "forgery", "fake signature", "counterfeit"],
    },
    KeywordRule {
        section: "504",
        keywords: &["insult", "provocation", "abuse"],
    },
    KeywordRule {
        section: "509",
        keywords: &["vulgar", "obscene", "gesture", "eve teasing"],
    },
    KeywordRule {
        section: "304",
        keywords: &["negligence", "culpable homicide"],
    },
    KeywordRule {
        section: "307",
        // Overlapping phrases let an attempt outscore the bare "murder" (302)
        // and "kill" (506) rules declared before it
        keywords: &[
            "attempt to murder",
            "attempted murder",
            "tried to kill",
            "attempt",
            "tried to",
        ],
    },
    KeywordRule {
        section: "447",
        keywords: &["trespass", "broke into", "entered my house", "intrude"],
    },
];

/// Stateless keyword rule engine.
///
/// # Examples
///
/// ```
/// use statute_classifier::ml::section_classifier::KeywordRuleEngine;
///
/// let engine = KeywordRuleEngine::new();
///
/// let candidate = engine.match_text("Someone STOLE my property");
/// assert_eq!(candidate.section.unwrap().as_str(), "379");
/// assert!((candidate.confidence - 2.0 / 3.0).abs() < 1e-12);
///
/// assert!(engine.match_text("nothing relevant here").is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct KeywordRuleEngine {
    rules: &'static [KeywordRule],
}

impl KeywordRuleEngine {
    /// Create an engine over the default rule table.
    pub fn new() -> Self {
        Self::with_rules(DEFAULT_KEYWORD_RULES)
    }

    /// Create an engine over a custom rule table.
    pub fn with_rules(rules: &'static [KeywordRule]) -> Self {
        KeywordRuleEngine { rules }
    }

    /// The rule table, in tie-breaking order.
    pub fn rules(&self) -> &[KeywordRule] {
        self.rules
    }

    /// Number of distinct keywords of `rule` found in lowercased text.
    fn score(rule: &KeywordRule, text_lower: &str) -> usize {
        rule.keywords
            .iter()
            .filter(|keyword| text_lower.contains(*keyword))
            .count()
    }

    /// Match text against the rule table.
    ///
    /// The rule with the most matching keywords wins; among equal counts the
    /// rule declared first wins. Confidence is `min(count / 3, 0.85)`.
    pub fn match_text(&self, text: &str) -> Candidate {
        let text_lower = text.to_lowercase();

        let mut best: Option<(&KeywordRule, usize)> = None;
        for rule in self.rules {
            let score = Self::score(rule, &text_lower);
            if score == 0 {
                continue;
            }
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((rule, score));
            }
        }

        match best {
            Some((rule, score)) => Candidate::new(
                SectionCode::new(rule.section),
                (score as f64 / KEYWORD_CONFIDENCE_DENOMINATOR).min(MAX_KEYWORD_CONFIDENCE),
            ),
            None => Candidate::empty(),
        }
    }
}

impl Default for KeywordRuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

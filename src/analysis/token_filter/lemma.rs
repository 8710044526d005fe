//! Lemmatization: reducing inflected words to their dictionary form.
//!
//! [`EnglishLemmatizer`] is rule based. Irregular forms come from an exception
//! table; regular plurals and verb inflections are handled by suffix rules
//! that undo consonant doubling (`robbed` to `rob`) and restore a silent `e`
//! (`deceived` to `deceive`, `torturing` to `torture`).

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock};

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Trait for lemmatization algorithms.
pub trait Lemmatizer: Send + Sync {
    /// Reduce a lowercase word to its lemma.
    fn lemmatize(&self, word: &str) -> String;

    /// Get the name of this lemmatizer.
    fn name(&self) -> &'static str;
}

/// Irregular inflections and words the suffix rules would mangle.
const ENGLISH_EXCEPTIONS: &[(&str, &str)] = &[
    ("was", "be"),
    ("were", "be"),
    ("is", "be"),
    ("been", "be"),
    ("has", "have"),
    ("had", "have"),
    ("did", "do"),
    ("done", "do"),
    ("went", "go"),
    ("gone", "go"),
    ("goes", "go"),
    ("came", "come"),
    ("got", "get"),
    ("gotten", "get"),
    ("gave", "give"),
    ("given", "give"),
    ("knew", "know"),
    ("known", "know"),
    ("saw", "see"),
    ("seen", "see"),
    ("said", "say"),
    ("made", "make"),
    ("took", "take"),
    ("taken", "take"),
    ("stole", "steal"),
    ("stolen", "steal"),
    ("broke", "break"),
    ("broken", "break"),
    ("shot", "shoot"),
    ("beaten", "beat"),
    ("ran", "run"),
    ("fought", "fight"),
    ("caught", "catch"),
    ("bought", "buy"),
    ("sold", "sell"),
    ("told", "tell"),
    ("threw", "throw"),
    ("thrown", "throw"),
    ("struck", "strike"),
    ("bit", "bite"),
    ("bitten", "bite"),
    ("drove", "drive"),
    ("driven", "drive"),
    ("lost", "lose"),
    ("left", "leave"),
    ("sent", "send"),
    ("spent", "spend"),
    ("paid", "pay"),
    ("fled", "flee"),
    ("hid", "hide"),
    ("hidden", "hide"),
    ("kept", "keep"),
    ("held", "hold"),
    ("met", "meet"),
    ("wrote", "write"),
    ("written", "write"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("tore", "tear"),
    ("torn", "tear"),
    ("swore", "swear"),
    ("sworn", "swear"),
    ("felt", "feel"),
    ("found", "find"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("died", "die"),
    ("lied", "lie"),
    ("tied", "tie"),
    ("used", "use"),
    ("misused", "misuse"),
    ("misusing", "misuse"),
    ("abused", "abuse"),
    ("abusing", "abuse"),
    ("news", "news"),
    ("series", "series"),
    ("species", "species"),
    ("physics", "physics"),
    ("alias", "alias"),
];

/// `-ing` words that are nouns in their own right.
const ING_NOUNS: &[&str] = &[
    "morning",
    "evening",
    "building",
    "wedding",
    "ceiling",
    "during",
    "nothing",
    "something",
    "anything",
    "everything",
];

static EXCEPTIONS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ENGLISH_EXCEPTIONS.iter().copied().collect());

static ING_NOUN_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ING_NOUNS.iter().copied().collect());

/// Stem endings that take a silent `e` back after `-ed`/`-ing` removal.
const E_RESTORING_ENDINGS: &[&str] = &["iz", "rg", "dg", "nc", "rc", "uc", "tur", "jur", "sur"];

fn is_vowel(c: u8) -> bool {
    matches!(c, b'a' | b'e' | b'i' | b'o' | b'u')
}

fn has_vowel(word: &str) -> bool {
    word.bytes().any(|c| is_vowel(c) || c == b'y')
}

fn vowel_groups(word: &str) -> usize {
    let mut groups = 0;
    let mut in_group = false;
    for c in word.bytes() {
        if is_vowel(c) {
            if !in_group {
                groups += 1;
            }
            in_group = true;
        } else {
            in_group = false;
        }
    }
    groups
}

/// English rule-based lemmatizer.
///
/// # Examples
///
/// ```
/// use statute_classifier::analysis::token_filter::lemma::{EnglishLemmatizer, Lemmatizer};
///
/// let lemmatizer = EnglishLemmatizer::new();
/// assert_eq!(lemmatizer.lemmatize("stolen"), "steal");
/// assert_eq!(lemmatizer.lemmatize("threats"), "threat");
/// assert_eq!(lemmatizer.lemmatize("robbed"), "rob");
/// assert_eq!(lemmatizer.lemmatize("intimidating"), "intimidate");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnglishLemmatizer;

impl EnglishLemmatizer {
    /// Create a new English lemmatizer.
    pub fn new() -> Self {
        EnglishLemmatizer
    }

    /// Rebuild a verb base from a stem left by `-ed`/`-ing` removal.
    fn restore_stem(stem: &str) -> String {
        let bytes = stem.as_bytes();
        let len = bytes.len();

        // Undo consonant doubling: robb -> rob, occurr -> occur
        if len > 3 {
            let last = bytes[len - 1];
            if last == bytes[len - 2] && !is_vowel(last) && !matches!(last, b'l' | b's' | b'z') {
                return stem[..len - 1].to_string();
            }
        }

        if Self::needs_silent_e(stem) {
            format!("{stem}e")
        } else {
            stem.to_string()
        }
    }

    fn needs_silent_e(stem: &str) -> bool {
        let bytes = stem.as_bytes();
        let len = bytes.len();
        let last = bytes[len - 1];

        if matches!(last, b'v' | b'u') {
            return true;
        }
        if E_RESTORING_ENDINGS.iter().any(|ending| stem.ends_with(ending)) {
            return true;
        }

        let groups = vowel_groups(stem);
        if groups > 1 {
            // intimidat -> intimidate, outrag -> outrage; threat stays
            if stem.ends_with("at") && len > 2 && !matches!(bytes[len - 3], b'e' | b'o') {
                return true;
            }
            if stem.ends_with("ag") {
                return true;
            }
            return false;
        }

        // Single syllable ending consonant-vowel-consonant: rap -> rape, us -> use
        groups == 1
            && !is_vowel(last)
            && !matches!(last, b'w' | b'x' | b'y')
            && len >= 2
            && is_vowel(bytes[len - 2])
            && (len < 3 || !is_vowel(bytes[len - 3]))
    }
}

impl Lemmatizer for EnglishLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        if let Some(lemma) = EXCEPTIONS.get(word) {
            return (*lemma).to_string();
        }

        // Suffix rules assume ASCII letters
        if word.len() <= 3 || !word.is_ascii() {
            return word.to_string();
        }

        let len = word.len();

        if (word.ends_with("ies") || word.ends_with("ied")) && len > 4 {
            return format!("{}y", &word[..len - 3]);
        }

        if word.ends_with("ing") {
            let stem = &word[..len - 3];
            if !ING_NOUN_SET.contains(word) && stem.len() >= 2 && has_vowel(stem) {
                return Self::restore_stem(stem);
            }
            return word.to_string();
        }

        if word.ends_with("ed") && !word.ends_with("eed") {
            let stem = &word[..len - 2];
            if stem.len() >= 2 && has_vowel(stem) {
                return Self::restore_stem(stem);
            }
            return word.to_string();
        }

        if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
            return word.to_string();
        }

        if word.ends_with("sses")
            || word.ends_with("ches")
            || word.ends_with("shes")
            || word.ends_with("xes")
            || word.ends_with("zzes")
        {
            return word[..len - 2].to_string();
        }

        if word.ends_with('s') {
            return word[..len - 1].to_string();
        }

        word.to_string()
    }

    fn name(&self) -> &'static str {
        "english"
    }
}

/// Filter that replaces each token with its lemma.
pub struct LemmaFilter {
    lemmatizer: Arc<dyn Lemmatizer>,
}

impl std::fmt::Debug for LemmaFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LemmaFilter")
            .field("lemmatizer", &self.lemmatizer.name())
            .finish()
    }
}

impl LemmaFilter {
    /// Create a new lemma filter with the English lemmatizer.
    pub fn new() -> Self {
        LemmaFilter {
            lemmatizer: Arc::new(EnglishLemmatizer::new()),
        }
    }

    /// Create a lemma filter with a custom lemmatizer.
    pub fn with_lemmatizer(lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        LemmaFilter { lemmatizer }
    }
}

impl Default for LemmaFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for LemmaFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens = tokens
            .map(|token| {
                if token.is_stopped() {
                    token
                } else {
                    let lemma = self.lemmatizer.lemmatize(&token.text);
                    token.with_text(lemma)
                }
            })
            .collect::<Vec<_>>();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "lemma"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    fn lemma(word: &str) -> String {
        EnglishLemmatizer::new().lemmatize(word)
    }

    #[test]
    fn test_irregular_forms() {
        assert_eq!(lemma("stole"), "steal");
        assert_eq!(lemma("took"), "take");
        assert_eq!(lemma("said"), "say");
        assert_eq!(lemma("shot"), "shoot");
        assert_eq!(lemma("women"), "woman");
    }

    #[test]
    fn test_plurals() {
        assert_eq!(lemma("threats"), "threat");
        assert_eq!(lemma("messages"), "message");
        assert_eq!(lemma("injuries"), "injury");
        assert_eq!(lemma("witnesses"), "witness");
        assert_eq!(lemma("punches"), "punch");
        assert_eq!(lemma("laws"), "law");
        assert_eq!(lemma("business"), "business");
        assert_eq!(lemma("dangerous"), "dangerous");
    }

    #[test]
    fn test_verb_inflections() {
        assert_eq!(lemma("punched"), "punch");
        assert_eq!(lemma("killed"), "kill");
        assert_eq!(lemma("robbed"), "rob");
        assert_eq!(lemma("slapped"), "slap");
        assert_eq!(lemma("occurred"), "occur");
        assert_eq!(lemma("passed"), "pass");
        assert_eq!(lemma("added"), "add");
        assert_eq!(lemma("tried"), "try");
        assert_eq!(lemma("threatened"), "threaten");
        assert_eq!(lemma("delivered"), "deliver");
        assert_eq!(lemma("cheating"), "cheat");
        assert_eq!(lemma("shopping"), "shop");
    }

    #[test]
    fn test_silent_e_restoration() {
        assert_eq!(lemma("deceived"), "deceive");
        assert_eq!(lemma("received"), "receive");
        assert_eq!(lemma("torturing"), "torture");
        assert_eq!(lemma("forged"), "forge");
        assert_eq!(lemma("outraging"), "outrage");
        assert_eq!(lemma("misappropriated"), "misappropriate");
        assert_eq!(lemma("raped"), "rape");
        assert_eq!(lemma("cheated"), "cheat");
        assert_eq!(lemma("armed"), "arm");
    }

    #[test]
    fn test_words_left_alone() {
        assert_eq!(lemma("morning"), "morning");
        assert_eq!(lemma("thing"), "thing");
        assert_eq!(lemma("need"), "need");
        assert_eq!(lemma("bed"), "bed");
        assert_eq!(lemma("dowry"), "dowry");
        assert_eq!(lemma("café"), "café");
    }

    #[test]
    fn test_lemma_filter() {
        let filter = LemmaFilter::new();
        let tokens = vec![Token::new("stolen", 0), Token::new("phones", 1)];

        let result: Vec<String> = filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .map(|t| t.text)
            .collect();

        assert_eq!(result, vec!["steal", "phone"]);
        assert_eq!(filter.name(), "lemma");
    }
}

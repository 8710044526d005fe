//! The fixed training corpus.
//!
//! This table is the only source of truth for retraining. Every section code
//! the engine can predict appears here.

use std::collections::{BTreeMap, BTreeSet};

use super::types::{LabeledExample, SectionCode};

/// Labeled incident descriptions, grouped by section.
pub const TRAINING_DATA: &[LabeledExample] = &[
    // 323 - voluntarily causing hurt
    LabeledExample::new("He hit me in the street", "323"),
    LabeledExample::new("Someone punched me", "323"),
    LabeledExample::new("He beat me up", "323"),
    LabeledExample::new("Physical assault happened", "323"),
    LabeledExample::new("He slapped me", "323"),
    LabeledExample::new("Someone attacked me physically", "323"),
    // 379 - theft
    LabeledExample::new("Someone stole my bag", "379"),
    LabeledExample::new("My phone was stolen", "379"),
    LabeledExample::new("Theft of my property", "379"),
    LabeledExample::new("Someone took my wallet", "379"),
    LabeledExample::new("My bike was stolen", "379"),
    LabeledExample::new("Property theft occurred", "379"),
    // 420 - cheating
    LabeledExample::new("He cheated me online", "420"),
    LabeledExample::new("Fraud in online transaction", "420"),
    LabeledExample::new("He deceived me for money", "420"),
    LabeledExample::new("Online shopping fraud", "420"),
    LabeledExample::new("Product not delivered after payment", "420"),
    LabeledExample::new("He took money and disappeared", "420"),
    LabeledExample::new("Cheating in business deal", "420"),
    // 506 - criminal intimidation
    LabeledExample::new("He threatened to kill me", "506"),
    LabeledExample::new("Death threats received", "506"),
    LabeledExample::new("Someone is threatening my family", "506"),
    LabeledExample::new("Received intimidating messages", "506"),
    LabeledExample::new("He said he will harm me", "506"),
    // 354 - assault on a woman with intent to outrage modesty
    LabeledExample::new("Molestation happened", "354"),
    LabeledExample::new("Inappropriate touching", "354"),
    LabeledExample::new("Sexual harassment at workplace", "354"),
    LabeledExample::new("Outraging modesty of woman", "354"),
    // 376 - rape
    LabeledExample::new("Sexual assault happened", "376"),
    LabeledExample::new("Rape incident", "376"),
    LabeledExample::new("Sexual violence", "376"),
    // 302 - murder
    LabeledExample::new("Someone killed my brother", "302"),
    LabeledExample::new("Murder happened", "302"),
    LabeledExample::new("He was killed", "302"),
    LabeledExample::new("Culpable homicide", "302"),
    // 406 - criminal breach of trust
    LabeledExample::new("Money was entrusted and misappropriated", "406"),
    LabeledExample::new("He misused my funds", "406"),
    LabeledExample::new("Breach of trust in business", "406"),
    // 498A - cruelty by husband or relatives
    LabeledExample::new("Dowry harassment", "498A"),
    LabeledExample::new("Husband torturing me", "498A"),
    LabeledExample::new("In-laws demanding dowry", "498A"),
    LabeledExample::new("Domestic violence by husband", "498A"),
    // 304 - culpable homicide not amounting to murder
    LabeledExample::new("Death due to negligence", "304"),
    LabeledExample::new("Culpable homicide not murder", "304"),
    // 392 - robbery
    LabeledExample::new("Armed robbery happened", "392"),
    LabeledExample::new("Robbed at gunpoint", "392"),
    LabeledExample::new("Dacoity incident", "392"),
    // 467 - forgery of valuable security
    LabeledExample::new("Forged documents", "467"),
    LabeledExample::new("Fake signature on papers", "467"),
    LabeledExample::new("Document forgery", "467"),
    // 66D - cheating by personation using a computer resource
    LabeledExample::new("Cyber fraud", "66D"),
    LabeledExample::new("Online hacking", "66D"),
    LabeledExample::new("Phishing scam", "66D"),
    LabeledExample::new("Credit card fraud online", "66D"),
    // 504 - intentional insult to provoke breach of peace
    LabeledExample::new("He insulted me publicly", "504"),
    LabeledExample::new("Deliberate provocation", "504"),
    // 509 - word or gesture to insult the modesty of a woman
    LabeledExample::new("Passed vulgar comments", "509"),
    LabeledExample::new("Made obscene gestures", "509"),
    // 307 - attempt to murder
    LabeledExample::new("He tried to kill me with a knife", "307"),
    LabeledExample::new("Attempt to murder my father", "307"),
    LabeledExample::new("He shot at me but I survived", "307"),
    // 447 - criminal trespass
    LabeledExample::new("Someone trespassed into my house", "447"),
    LabeledExample::new("Criminal trespass on my land", "447"),
    LabeledExample::new("He broke into my house at night", "447"),
];

/// Distinct section codes of a corpus, sorted.
pub fn sections(corpus: &[LabeledExample]) -> Vec<SectionCode> {
    corpus
        .iter()
        .map(LabeledExample::section_code)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Number of examples per section code.
pub fn section_counts(corpus: &[LabeledExample]) -> BTreeMap<SectionCode, usize> {
    let mut counts = BTreeMap::new();
    for example in corpus {
        *counts.entry(example.section_code()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_shape() {
        assert_eq!(TRAINING_DATA.len(), 64);
        let sections = sections(TRAINING_DATA);
        assert_eq!(sections.len(), 17);
        assert_eq!(sections.first().map(SectionCode::as_str), Some("302"));
        assert_eq!(sections.last().map(SectionCode::as_str), Some("66D"));
    }

    #[test]
    fn test_section_counts() {
        let counts = section_counts(TRAINING_DATA);
        assert_eq!(counts[&SectionCode::new("420")], 7);
        assert_eq!(counts[&SectionCode::new("307")], 3);
        assert_eq!(counts.values().sum::<usize>(), TRAINING_DATA.len());
    }

    #[test]
    fn test_no_empty_entries() {
        assert!(
            TRAINING_DATA
                .iter()
                .all(|e| !e.text.trim().is_empty() && !e.section.is_empty())
        );
    }
}

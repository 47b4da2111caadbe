//! Sample word sets for testing and demonstration.
//!
//! Each set exercises a different part of the pipeline.

use crate::word::Word;

/// A short everyday set: plain flashcard material, no academic data.
pub fn starter_set() -> Vec<Word> {
    vec![
        Word::new("s1", "run", "koşmak").with_synonym("jog"),
        Word::new("s2", "book", "kitap"),
        Word::new("s3", "apple", "elma"),
        Word::new("s4", "to look forward to", "dört gözle beklemek"),
        Word::new("s5", "window", "pencere"),
        Word::new("s6", "thoughtful", "düşünceli").with_synonym("considerate"),
        Word::new("s7", "bridge", "köprü"),
    ]
}

/// Words with definitions, part-of-speech tags and emphasised sentences,
/// one of them deliberately incomplete.
pub fn academic_set() -> Vec<Word> {
    vec![
        Word::new("a1", "run", "koşmak")
            .with_synonym("jog")
            .with_type("verb")
            .with_definition("To move **swiftly** on foot.")
            .with_sentences(["I **run** every morning before class."]),
        Word::new("a2", "hypothesis", "hipotez")
            .with_type("noun")
            .with_definition("A **proposed explanation** made on limited evidence.")
            .with_sentences([
                "The **hypothesis** was tested across three independent cohorts, and \
                 although the early results were promising, the later replications \
                 did not confirm the expected effect size.",
            ]),
        Word::new("a3", "significant", "anlamlı, önemli")
            .with_synonym("notable, meaningful")
            .with_type("adjective")
            .with_sentences(["The difference was **statistically significant**."]),
        Word::new("a4", "allocate", "tahsis etmek")
            .with_type("verb")
            .with_definition("To distribute resources for a particular purpose."),
        Word::new("a5", "subsequently", "daha sonra")
            .with_type("adverb")
            .with_sentences(["The data were **subsequently** reanalysed."]),
    ]
}

/// `n` generated words whose lengths cycle through every font tier.
pub fn large_set(n: usize) -> Vec<Word> {
    const TERMS: [&str; 4] = [
        "cat",
        "remarkably long term",
        "a phrase long enough to reach the third size tier",
        "an expression so long that it needs the very smallest tier of all to fit inside",
    ];
    (1..=n)
        .map(|i| {
            let term = TERMS[(i - 1) % TERMS.len()];
            Word::new(format!("g{i}"), format!("{term} {i}"), format!("çeviri {i}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_words;
    use crate::font_scale::{FontScaleTable, FontTier};

    #[test]
    fn academic_set_has_one_incomplete_word() {
        let words = academic_set();
        assert_eq!(filter_words(&words, false).len(), words.len() - 1);
    }

    #[test]
    fn large_set_covers_all_tiers() {
        let table = FontScaleTable::default();
        let tiers: Vec<FontTier> = large_set(4).iter().map(|w| table.classify(&w.eng)).collect();
        assert_eq!(
            tiers,
            vec![FontTier::Tier1, FontTier::Tier2, FontTier::Tier3, FontTier::Tier4]
        );
    }
}

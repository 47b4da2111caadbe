//! Word selection for a print run.

use crate::word::Word;

/// Select the words eligible for printing, preserving input order.
///
/// With `include_incomplete` every word is kept; otherwise only words that
/// carry at least one academic sentence survive.
pub fn filter_words(words: &[Word], include_incomplete: bool) -> Vec<&Word> {
    words
        .iter()
        .filter(|w| include_incomplete || w.is_complete())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn word(id: usize, complete: bool) -> Word {
        let w = Word::new(id.to_string(), format!("eng{id}"), format!("tr{id}"));
        if complete {
            w.with_sentences([format!("sentence {id}")])
        } else {
            w
        }
    }

    #[test]
    fn empty_input() {
        assert!(filter_words(&[], false).is_empty());
        assert!(filter_words(&[], true).is_empty());
    }

    #[test]
    fn drops_incomplete_words_in_order() {
        let words = vec![word(1, true), word(2, false), word(3, true)];
        let ids: Vec<&str> = filter_words(&words, false)
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn empty_sentence_list_is_incomplete() {
        let words = vec![word(1, false).with_sentences(Vec::<String>::new())];
        assert!(filter_words(&words, false).is_empty());
    }

    proptest! {
        #[test]
        fn include_all_is_identity(flags in prop::collection::vec(any::<bool>(), 0..40)) {
            let words: Vec<Word> = flags.iter().enumerate().map(|(i, &c)| word(i, c)).collect();
            let kept: Vec<Word> = filter_words(&words, true).into_iter().cloned().collect();
            prop_assert_eq!(kept, words);
        }

        #[test]
        fn keeps_exactly_the_complete_words(flags in prop::collection::vec(any::<bool>(), 0..40)) {
            let words: Vec<Word> = flags.iter().enumerate().map(|(i, &c)| word(i, c)).collect();
            let kept: Vec<&Word> = filter_words(&words, false);
            let expected: Vec<&Word> = words.iter().filter(|w| w.is_complete()).collect();
            prop_assert_eq!(kept, expected);
        }
    }
}

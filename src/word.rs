//! Vocabulary records as handed over by the storage side.
//!
//! The layout engine only ever reads words. [`load_words`] stands in for the
//! storage collaborator when words come from a JSON file: it checks the
//! fields the storage layer would have required and assigns ids to records
//! that arrive without one.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    #[serde(default)]
    pub id: String,
    /// English term.
    pub eng: String,
    /// Turkish translation.
    pub tr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonym: Option<String>,
    /// Part-of-speech tag such as `noun` or `adj`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub word_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eng_definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_sentences: Option<Vec<String>>,
}

impl Word {
    pub fn new(id: impl Into<String>, eng: impl Into<String>, tr: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            eng: eng.into(),
            tr: tr.into(),
            ..Self::default()
        }
    }

    pub fn with_synonym(mut self, synonym: impl Into<String>) -> Self {
        self.synonym = Some(synonym.into());
        self
    }

    pub fn with_type(mut self, word_type: impl Into<String>) -> Self {
        self.word_type = Some(word_type.into());
        self
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.eng_definition = Some(definition.into());
        self
    }

    pub fn with_sentences<I, S>(mut self, sentences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.academic_sentences = Some(sentences.into_iter().map(Into::into).collect());
        self
    }

    /// A word is complete once it carries at least one academic sentence.
    pub fn is_complete(&self) -> bool {
        self.academic_sentences
            .as_ref()
            .is_some_and(|sentences| !sentences.is_empty())
    }

    /// The sentence shown on an academic card, if any.
    pub fn first_sentence(&self) -> Option<&str> {
        self.academic_sentences
            .as_ref()
            .and_then(|sentences| sentences.first())
            .map(String::as_str)
    }

    /// Synonym text, treating blank strings as absent.
    pub fn synonym_text(&self) -> Option<&str> {
        self.synonym.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Parse and validate a JSON array of words.
///
/// `eng` and `tr` are trimmed and must be non-empty. Records without an id
/// get `w{n}` (1-based position); ids must be unique afterwards.
pub fn load_words(json: &str) -> Result<Vec<Word>, ValidationError> {
    let mut words: Vec<Word> = serde_json::from_str(json)?;
    let mut seen = HashSet::new();

    for (index, word) in words.iter_mut().enumerate() {
        word.eng = word.eng.trim().to_string();
        word.tr = word.tr.trim().to_string();
        if word.eng.is_empty() {
            return Err(ValidationError::MissingField { index, field: "eng" });
        }
        if word.tr.is_empty() {
            return Err(ValidationError::MissingField { index, field: "tr" });
        }
        if word.id.trim().is_empty() {
            word.id = format!("w{}", index + 1);
        }
        if !seen.insert(word.id.clone()) {
            return Err(ValidationError::DuplicateId(word.id.clone()));
        }
    }

    log::debug!("loaded {} words", words.len());
    Ok(words)
}

/// Read a word list from a JSON file.
pub fn load_words_file(path: &Path) -> Result<Vec<Word>, ValidationError> {
    let json = std::fs::read_to_string(path)?;
    load_words(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completeness_requires_a_sentence() {
        let bare = Word::new("1", "run", "koşmak");
        assert!(!bare.is_complete());
        let empty = bare.clone().with_sentences(Vec::<String>::new());
        assert!(!empty.is_complete());
        let full = bare.with_sentences(["She runs daily."]);
        assert!(full.is_complete());
    }

    #[test]
    fn loads_camel_case_fields() {
        let json = r#"[{
            "id": "a",
            "eng": " jog ",
            "tr": "hafif koşmak",
            "type": "verb",
            "engDefinition": "to run slowly",
            "academicSentences": ["**Running** is healthy."]
        }]"#;
        let words = load_words(json).unwrap();
        assert_eq!(words[0].eng, "jog");
        assert_eq!(words[0].word_type.as_deref(), Some("verb"));
        assert_eq!(words[0].first_sentence(), Some("**Running** is healthy."));
    }

    #[test]
    fn missing_translation_is_rejected() {
        let json = r#"[{"eng": "run", "tr": "  "}]"#;
        match load_words(json) {
            Err(ValidationError::MissingField { index: 0, field: "tr" }) => {}
            other => panic!("expected missing tr, got {other:?}"),
        }
    }

    #[test]
    fn ids_are_assigned_and_checked() {
        let words = load_words(r#"[{"eng":"a","tr":"b"},{"eng":"c","tr":"d"}]"#).unwrap();
        assert_eq!(words[0].id, "w1");
        assert_eq!(words[1].id, "w2");

        let dup = r#"[{"id":"x","eng":"a","tr":"b"},{"id":"x","eng":"c","tr":"d"}]"#;
        assert!(matches!(load_words(dup), Err(ValidationError::DuplicateId(_))));
    }

    #[test]
    fn blank_synonym_counts_as_absent() {
        let w = Word::new("1", "run", "koşmak").with_synonym("  ");
        assert_eq!(w.synonym_text(), None);
    }
}

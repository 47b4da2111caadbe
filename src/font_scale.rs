//! Length-driven font sizing for fixed-size card boxes.
//!
//! Card faces pick one of four size tiers from the length of their text so
//! long phrases shrink instead of overflowing. Academic cards use separate
//! two-step rules for the example sentence and the translation footer.
//! Lengths are counted in Unicode scalar values.

use serde::{Deserialize, Serialize};

/// Discrete size tier, `Tier1` being the largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontTier {
    Tier1,
    Tier2,
    Tier3,
    Tier4,
}

impl FontTier {
    pub fn index(self) -> usize {
        match self {
            FontTier::Tier1 => 0,
            FontTier::Tier2 => 1,
            FontTier::Tier3 => 2,
            FontTier::Tier4 => 3,
        }
    }
}

/// Four-tier table. A text shorter than `tier1_below` characters gets
/// `Tier1`, shorter than `tier2_below` gets `Tier2`, and so on; anything
/// longer than `tier3_below` falls through to `Tier4`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontScaleTable {
    pub tier1_below: usize,
    pub tier2_below: usize,
    pub tier3_below: usize,
    /// Point size per tier, largest first.
    pub sizes_pt: [f32; 4],
}

impl Default for FontScaleTable {
    fn default() -> Self {
        Self {
            tier1_below: 10,
            tier2_below: 25,
            tier3_below: 60,
            sizes_pt: [22.0, 16.0, 12.0, 10.0],
        }
    }
}

impl FontScaleTable {
    pub fn classify(&self, text: &str) -> FontTier {
        let len = text.chars().count();
        if len < self.tier1_below {
            FontTier::Tier1
        } else if len < self.tier2_below {
            FontTier::Tier2
        } else if len < self.tier3_below {
            FontTier::Tier3
        } else {
            FontTier::Tier4
        }
    }

    pub fn size_pt(&self, tier: FontTier) -> f32 {
        self.sizes_pt[tier.index()]
    }

    /// Thresholds must be strictly increasing.
    pub fn is_monotonic(&self) -> bool {
        self.tier1_below < self.tier2_below && self.tier2_below < self.tier3_below
    }
}

/// Which of the two sizes a [`TwoStepScale`] picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeStep {
    Regular,
    Reduced,
}

/// Texts longer than `reduce_above` characters use the smaller size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoStepScale {
    pub reduce_above: usize,
    pub regular_pt: f32,
    pub reduced_pt: f32,
}

impl TwoStepScale {
    /// Rule for the academic sentence: over 150 characters shrinks.
    pub fn academic_sentence() -> Self {
        Self {
            reduce_above: 150,
            regular_pt: 10.5,
            reduced_pt: 9.0,
        }
    }

    /// Rule for the translation footer of an academic card.
    pub fn academic_footer() -> Self {
        Self {
            reduce_above: 20,
            regular_pt: 15.0,
            reduced_pt: 13.5,
        }
    }

    pub fn select(&self, text: &str) -> SizeStep {
        if text.chars().count() > self.reduce_above {
            SizeStep::Reduced
        } else {
            SizeStep::Regular
        }
    }

    pub fn size_pt(&self, step: SizeStep) -> f32 {
        match step {
            SizeStep::Regular => self.regular_pt,
            SizeStep::Reduced => self.reduced_pt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn text(len: usize) -> String {
        "x".repeat(len)
    }

    #[test]
    fn boundaries_fall_to_next_tier() {
        let table = FontScaleTable::default();
        let cases = [
            (0, FontTier::Tier1),
            (9, FontTier::Tier1),
            (10, FontTier::Tier2),
            (24, FontTier::Tier2),
            (25, FontTier::Tier3),
            (59, FontTier::Tier3),
            (60, FontTier::Tier4),
            (400, FontTier::Tier4),
        ];
        for (len, tier) in cases {
            assert_eq!(table.classify(&text(len)), tier, "length {len}");
        }
    }

    #[test]
    fn counts_characters_not_bytes() {
        let table = FontScaleTable::default();
        // 9 characters, 13 bytes.
        assert_eq!(table.classify("şğüöçıİşğ"), FontTier::Tier1);
    }

    #[test]
    fn sentence_rule_is_strictly_greater() {
        let rule = TwoStepScale::academic_sentence();
        assert_eq!(rule.select(&text(150)), SizeStep::Regular);
        assert_eq!(rule.select(&text(151)), SizeStep::Reduced);
        assert!(rule.size_pt(SizeStep::Reduced) < rule.size_pt(SizeStep::Regular));
    }

    #[test]
    fn custom_table_thresholds() {
        let table = FontScaleTable {
            tier1_below: 3,
            tier2_below: 5,
            tier3_below: 7,
            ..FontScaleTable::default()
        };
        assert_eq!(table.classify("ab"), FontTier::Tier1);
        assert_eq!(table.classify("abcd"), FontTier::Tier2);
        assert_eq!(table.classify("abcdefg"), FontTier::Tier4);
    }

    proptest! {
        #[test]
        fn classify_is_monotonic(a in 0usize..200, b in 0usize..200) {
            let table = FontScaleTable::default();
            let (short, long) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(table.classify(&text(short)) <= table.classify(&text(long)));
        }
    }
}

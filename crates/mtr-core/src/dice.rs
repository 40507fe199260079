//! Dice specifications and rolling.
//!
//! A table's roll value comes from a [`DiceSpec`]: a number of dice, their
//! side count, and how the individual results are combined. Most tables sum
//! their dice (`2d6`), while "d66"-style tables read each die as one digit of
//! a multi-digit number.

use std::sync::LazyLock;

use rand::Rng;
use rand::rngs::StdRng;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Matches two-digit die markers like `1d66`, `d66`, or `d88`.
static DIGIT_DIE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b\d*d(66|88)\b").expect("valid digit die pattern"));

/// Matches standard dice expressions like `2d6` and captures count and sides.
static STANDARD_DIE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+)d(\d+)\b").expect("valid dice pattern"));

/// Largest die a table header may declare.
pub const MAX_SIDES: u32 = 10_000;

/// Largest number of dice a table header may declare.
pub const MAX_COUNT: u32 = 100;

/// How individual die results combine into one roll value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interpretation {
    /// Add all dice together.
    Sum,
    /// Read each die as one digit, first die most significant.
    DigitConcat,
}

impl Interpretation {
    /// Combine individual die values into a single roll value.
    pub fn combine(self, values: &[u32]) -> u32 {
        match self {
            Self::Sum => values.iter().sum(),
            Self::DigitConcat => values.iter().fold(0, |acc, v| acc * 10 + v),
        }
    }
}

/// The dice a table is rolled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceSpec {
    count: u32,
    sides: u32,
    interpretation: Interpretation,
}

impl DiceSpec {
    /// Create a dice specification, or `None` if the dice can't be rolled.
    ///
    /// Counts and sides must be at least 1 and within [`MAX_COUNT`] and
    /// [`MAX_SIDES`]. Digit dice are limited to single-digit faces.
    pub fn new(count: u32, sides: u32, interpretation: Interpretation) -> Option<Self> {
        if count == 0 || sides == 0 || count > MAX_COUNT || sides > MAX_SIDES {
            return None;
        }
        if interpretation == Interpretation::DigitConcat && (sides > 9 || count > 9) {
            return None;
        }
        Some(Self {
            count,
            sides,
            interpretation,
        })
    }

    /// A single die with `sides` faces. Used as the default for tables
    /// without a dice header, so it isn't limited by [`MAX_SIDES`].
    pub fn uniform(sides: u32) -> Option<Self> {
        (sides > 0).then_some(Self {
            count: 1,
            sides,
            interpretation: Interpretation::Sum,
        })
    }

    /// Parse a dice expression embedded in `s`.
    ///
    /// Two-digit markers (`1d66`, `d88`) take priority and produce two digit
    /// dice. Otherwise the first `<count>d<sides>` expression is used.
    /// Returns `None` when no usable expression is present.
    pub fn parse(s: &str) -> Option<Self> {
        if let Some(caps) = DIGIT_DIE.captures(s) {
            let sides = caps[1].chars().next()?.to_digit(10)?;
            return Self::new(2, sides, Interpretation::DigitConcat);
        }

        let caps = STANDARD_DIE.captures(s)?;
        let count = caps[1].parse::<u32>().ok()?;
        let sides = caps[2].parse::<u32>().ok()?;
        Self::new(count, sides, Interpretation::Sum)
    }

    /// Number of dice rolled.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Faces on each die.
    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// How the dice combine.
    pub fn interpretation(&self) -> Interpretation {
        self.interpretation
    }

    /// Smallest value these dice can produce.
    pub fn min_value(&self) -> u32 {
        self.interpretation.combine(&vec![1; self.count as usize])
    }

    /// Largest value these dice can produce.
    pub fn max_value(&self) -> u32 {
        self.interpretation
            .combine(&vec![self.sides; self.count as usize])
    }

    /// Every value these dice can produce, in ascending order.
    pub fn outcomes(&self) -> impl Iterator<Item = u32> {
        let spec = *self;
        (self.min_value()..=self.max_value()).filter(move |&value| spec.is_digit_outcome(value))
    }

    /// Whether every digit of `value` is a face of these dice. Always true
    /// for summed dice.
    fn is_digit_outcome(&self, mut value: u32) -> bool {
        if self.interpretation == Interpretation::Sum {
            return true;
        }
        while value > 0 {
            if !(1..=self.sides).contains(&(value % 10)) {
                return false;
            }
            value /= 10;
        }
        true
    }

    /// Roll the dice using the given RNG.
    pub fn roll(&self, rng: &mut StdRng) -> DiceRoll {
        let dice: Vec<u32> = (0..self.count)
            .map(|_| rng.random_range(1..=self.sides))
            .collect();
        let value = self.interpretation.combine(&dice);
        tracing::debug!(dice = %self, rolled = ?dice, value, "rolled dice");
        DiceRoll { dice, value }
    }
}

impl std::fmt::Display for DiceSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.interpretation {
            Interpretation::Sum => write!(f, "{}d{}", self.count, self.sides),
            Interpretation::DigitConcat => {
                write!(f, "d{}", self.sides.to_string().repeat(self.count as usize))
            }
        }
    }
}

/// The result of rolling a [`DiceSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    /// Individual die values, in rolling order.
    pub dice: Vec<u32>,
    /// The combined roll value.
    pub value: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn parse_standard() {
        let dice = DiceSpec::parse(" 2d6 ").unwrap();
        assert_eq!(dice.count(), 2);
        assert_eq!(dice.sides(), 6);
        assert_eq!(dice.interpretation(), Interpretation::Sum);
    }

    #[test]
    fn parse_table_header() {
        let dice = DiceSpec::parse("| 2d6 | result |").unwrap();
        assert_eq!((dice.count(), dice.sides()), (2, 6));
        assert_eq!(DiceSpec::parse("1D20"), DiceSpec::new(1, 20, Interpretation::Sum));
    }

    #[test]
    fn parse_digit_dice() {
        let dice = DiceSpec::parse("| 1d66 | result |").unwrap();
        assert_eq!(dice.count(), 2);
        assert_eq!(dice.sides(), 6);
        assert_eq!(dice.interpretation(), Interpretation::DigitConcat);

        let dice = DiceSpec::parse("d88").unwrap();
        assert_eq!(dice.sides(), 8);
        assert_eq!(dice.interpretation(), Interpretation::DigitConcat);
    }

    #[test]
    fn parse_rejects_non_dice() {
        assert_eq!(DiceSpec::parse("Result"), None);
        assert_eq!(DiceSpec::parse("1-6"), None);
        assert_eq!(DiceSpec::parse("0d6"), None);
        assert_eq!(DiceSpec::parse("2d0"), None);
        assert_eq!(DiceSpec::parse("99999999999d6"), None);
        assert_eq!(DiceSpec::parse(""), None);
    }

    #[test]
    fn combine() {
        assert_eq!(Interpretation::Sum.combine(&[1, 2, 3]), 6);
        assert_eq!(Interpretation::DigitConcat.combine(&[1, 2, 3]), 123);
        assert_eq!(Interpretation::DigitConcat.combine(&[3, 5]), 35);
    }

    #[test]
    fn value_bounds() {
        let sum = DiceSpec::new(2, 6, Interpretation::Sum).unwrap();
        assert_eq!((sum.min_value(), sum.max_value()), (2, 12));
        let digits = DiceSpec::new(2, 6, Interpretation::DigitConcat).unwrap();
        assert_eq!((digits.min_value(), digits.max_value()), (11, 66));
    }

    #[test]
    fn digit_outcomes() {
        let digits = DiceSpec::new(2, 6, Interpretation::DigitConcat).unwrap();
        let outcomes: Vec<u32> = digits.outcomes().collect();
        assert_eq!(outcomes.len(), 36);
        assert_eq!(outcomes.first(), Some(&11));
        assert_eq!(outcomes.last(), Some(&66));
        assert!(!outcomes.contains(&17));
        assert!(!outcomes.contains(&20));
    }

    #[test]
    fn display() {
        assert_eq!(DiceSpec::parse("2d6").unwrap().to_string(), "2d6");
        assert_eq!(DiceSpec::parse("1d66").unwrap().to_string(), "d66");
    }

    #[test]
    fn roll_single_sided() {
        let mut rng = StdRng::seed_from_u64(7);
        let dice = DiceSpec::new(5, 1, Interpretation::Sum).unwrap();
        assert_eq!(dice.roll(&mut rng).value, 5);
    }

    #[test]
    fn roll_deterministic_with_seed() {
        let dice = DiceSpec::new(3, 20, Interpretation::Sum).unwrap();
        let mut rng1 = StdRng::seed_from_u64(99);
        let mut rng2 = StdRng::seed_from_u64(99);
        assert_eq!(dice.roll(&mut rng1), dice.roll(&mut rng2));
    }

    proptest! {
        #[test]
        fn sum_rolls_stay_in_range(count in 1u32..10, sides in 1u32..30, seed: u64) {
            let dice = DiceSpec::new(count, sides, Interpretation::Sum).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let roll = dice.roll(&mut rng);
            prop_assert_eq!(roll.dice.len(), count as usize);
            prop_assert!(roll.value >= count && roll.value <= count * sides);
        }

        #[test]
        fn d66_rolls_are_digit_pairs(seed: u64) {
            let dice = DiceSpec::parse("d66").unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let value = dice.roll(&mut rng).value;
            prop_assert!((1..=6).contains(&(value / 10)));
            prop_assert!((1..=6).contains(&(value % 10)));
        }
    }
}

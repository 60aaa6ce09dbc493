//! FILENAME: core/engine/src/tenure.rs
//! PURPOSE: Fixed-bin bucketing of years of service into tenure cohorts.
//! CONTEXT: Eight right-open bands. The lower bound of each band is
//! inclusive, so exactly 1.0 year falls in "1-3 Year".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A discretized bucket of years of service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TenureCohort {
    #[serde(rename = "<1 Year")]
    UnderOne,
    #[serde(rename = "1-3 Year")]
    OneToThree,
    #[serde(rename = "4-6 Year")]
    FourToSix,
    #[serde(rename = "6-10 Year")]
    SixToTen,
    #[serde(rename = "11-15 Year")]
    ElevenToFifteen,
    #[serde(rename = "16-20 Year")]
    SixteenToTwenty,
    #[serde(rename = "20-25 Year")]
    TwentyToTwentyFive,
    #[serde(rename = ">25 Year")]
    OverTwentyFive,
}

/// Lower bounds of the bands, ascending. The last band is unbounded above.
const LOWER_BOUNDS: [f64; 8] = [0.0, 1.0, 3.0, 6.0, 10.0, 15.0, 20.0, 25.0];

impl TenureCohort {
    /// All cohorts in ascending order.
    pub const ALL: [TenureCohort; 8] = [
        TenureCohort::UnderOne,
        TenureCohort::OneToThree,
        TenureCohort::FourToSix,
        TenureCohort::SixToTen,
        TenureCohort::ElevenToFifteen,
        TenureCohort::SixteenToTwenty,
        TenureCohort::TwentyToTwentyFive,
        TenureCohort::OverTwentyFive,
    ];

    /// Buckets a years-of-service value. Negative, NaN and infinite inputs
    /// are out of range and yield `None`.
    pub fn from_years(years: f64) -> Option<TenureCohort> {
        if !years.is_finite() || years < 0.0 {
            return None;
        }
        let idx = LOWER_BOUNDS
            .iter()
            .rposition(|&lower| years >= lower)?;
        Some(Self::ALL[idx])
    }

    pub fn label(self) -> &'static str {
        match self {
            TenureCohort::UnderOne => "<1 Year",
            TenureCohort::OneToThree => "1-3 Year",
            TenureCohort::FourToSix => "4-6 Year",
            TenureCohort::SixToTen => "6-10 Year",
            TenureCohort::ElevenToFifteen => "11-15 Year",
            TenureCohort::SixteenToTwenty => "16-20 Year",
            TenureCohort::TwentyToTwentyFive => "20-25 Year",
            TenureCohort::OverTwentyFive => ">25 Year",
        }
    }

    pub fn from_label(label: &str) -> Option<TenureCohort> {
        Self::ALL.into_iter().find(|c| c.label() == label.trim())
    }

    /// Labels of all cohorts in ascending order.
    pub fn labels() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(TenureCohort::label)
    }
}

impl fmt::Display for TenureCohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TenureCohort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TenureCohort::from_label(s).ok_or_else(|| format!("unknown tenure cohort: {}", s))
    }
}

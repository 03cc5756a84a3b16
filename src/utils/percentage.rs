use std::{fmt::Display, ops::Deref};

/// Signed percentage. Week over week changes can go below zero, so unlike a ratio this isn't
/// bounded.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentage(f64);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 > 0. {
            write!(f, "+{:.0}%", self.0)
        } else {
            write!(f, "{:.0}%", self.0)
        }
    }
}

impl Percentage {
    pub fn new(value: f64) -> Percentage {
        Percentage(value)
    }

    /// `value` as a percentage of `whole`, capped at 100%.
    pub fn capped_ratio(value: f64, whole: f64) -> Percentage {
        if whole <= 0. {
            return Percentage(0.);
        }
        Percentage((value / whole * 100.).clamp(0., 100.))
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

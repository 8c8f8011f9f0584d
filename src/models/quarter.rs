use std::fmt;

/// A calendar quarter parsed from a `Q[1-4]-YYYY` label.
///
/// Field order matters: deriving `Ord` on (year, number) gives the
/// chronological ordering the dashboard needs, which is not the
/// lexicographic ordering of the labels ("Q4-2024" < "Q1-2025").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    pub year: u16,
    pub number: u8,
}

impl Quarter {
    /// Parse a canonical quarter label. Returns None for anything that is
    /// not exactly `Q<1-4>-<4-digit year>`.
    pub fn parse(label: &str) -> Option<Quarter> {
        let rest = label.strip_prefix('Q')?;
        let (num, year) = rest.split_once('-')?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let number: u8 = num.parse().ok()?;
        if !(1..=4).contains(&number) {
            return None;
        }
        let year: u16 = year.parse().ok()?;
        Some(Quarter { year, number })
    }

    pub fn is_valid_label(label: &str) -> bool {
        Quarter::parse(label).is_some()
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}-{}", self.number, self.year)
    }
}

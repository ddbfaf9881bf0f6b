use crate::grade::{Grade, ParseGradeError};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Renegotiation threshold used when a grade D row does not configure one
pub const DEFAULT_MIN_MARGIN_CHECK_PERCENT: f64 = 5.0;

fn default_min_margin_check_percent() -> f64 {
    DEFAULT_MIN_MARGIN_CHECK_PERCENT
}

/// Flat markup (baht) added to the buy price of fresh items, per grade
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(transparent)]
pub struct FreshMarginTable(HashMap<Grade, f64>);

impl FreshMarginTable {
    pub fn new(margins: HashMap<Grade, f64>) -> Self {
        Self(margins)
    }

    pub fn margin_for(&self, grade: Grade) -> Option<f64> {
        self.0.get(&grade).copied()
    }

    pub fn set(&mut self, grade: Grade, margin_baht: f64) {
        self.0.insert(grade, margin_baht);
    }

    pub fn missing_grades(&self) -> Vec<Grade> {
        Grade::ALL
            .into_iter()
            .filter(|g| !self.0.contains_key(g))
            .collect()
    }
}

impl FromIterator<(Grade, f64)> for FreshMarginTable {
    fn from_iter<I: IntoIterator<Item = (Grade, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Multiplier row of the industrial table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndustrialMargin {
    pub pur_multiplier: f64,
    pub min_multiplier: f64,
    #[serde(default)]
    pub mid_multiplier: Option<f64>,
    /// Only read for grade D: margin percent below which the price needs review
    #[serde(default = "default_min_margin_check_percent")]
    pub min_margin_check_percent: f64,
}

impl IndustrialMargin {
    pub fn new(pur_multiplier: f64, min_multiplier: f64) -> Self {
        Self {
            pur_multiplier,
            min_multiplier,
            mid_multiplier: None,
            min_margin_check_percent: DEFAULT_MIN_MARGIN_CHECK_PERCENT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(transparent)]
pub struct IndustrialMarginTable(HashMap<Grade, IndustrialMargin>);

impl IndustrialMarginTable {
    pub fn new(margins: HashMap<Grade, IndustrialMargin>) -> Self {
        Self(margins)
    }

    pub fn entry_for(&self, grade: Grade) -> Option<&IndustrialMargin> {
        self.0.get(&grade)
    }

    pub fn set(&mut self, grade: Grade, margin: IndustrialMargin) {
        self.0.insert(grade, margin);
    }

    pub fn remove(&mut self, grade: Grade) -> Option<IndustrialMargin> {
        self.0.remove(&grade)
    }
}

impl FromIterator<(Grade, IndustrialMargin)> for IndustrialMarginTable {
    fn from_iter<I: IntoIterator<Item = (Grade, IndustrialMargin)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Grade keys are case-insensitive; one grade spelled twice (`S` and `s`) is rejected
/// rather than resolved by map order.
fn collect_by_grade<V>(raw: HashMap<String, V>) -> Result<HashMap<Grade, V>, String> {
    let mut by_grade = HashMap::with_capacity(raw.len());
    for (key, value) in raw {
        let grade: Grade = key.parse().map_err(|e: ParseGradeError| e.to_string())?;
        if by_grade.insert(grade, value).is_some() {
            return Err(format!("grade {} is configured more than once", grade));
        }
    }
    Ok(by_grade)
}

impl<'de> Deserialize<'de> for FreshMarginTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, f64>::deserialize(deserializer)?;
        collect_by_grade(raw).map(Self).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for IndustrialMarginTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, IndustrialMargin>::deserialize(deserializer)?;
        collect_by_grade(raw).map(Self).map_err(de::Error::custom)
    }
}

/// Both margin tables, loaded once per session by the caller
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MarginTables {
    #[serde(default)]
    pub fresh: FreshMarginTable,
    #[serde(default)]
    pub industrial: IndustrialMarginTable,
}

impl MarginTables {
    pub fn new(fresh: FreshMarginTable, industrial: IndustrialMarginTable) -> Self {
        Self { fresh, industrial }
    }

    /// Check the fresh table covers every grade.
    /// A markup that drops between consecutive grades is logged but accepted.
    pub fn validate(&self) -> Result<(), MarginConfigError> {
        if let Some(grade) = self.fresh.missing_grades().into_iter().next() {
            return Err(MarginConfigError::MissingFreshMargin(grade));
        }

        for pair in Grade::ALL.windows(2) {
            let (lower, upper) = (pair[0], pair[1]);
            let lo = self.fresh.margin_for(lower);
            let hi = self.fresh.margin_for(upper);
            if let (Some(lo), Some(hi)) = (lo, hi) {
                if hi < lo {
                    tracing::warn!(
                        "Fresh margin decreases from grade {} ({}) to grade {} ({})",
                        lower, lo, upper, hi
                    );
                }
            }
        }

        for grade in Grade::ALL {
            if self.industrial.entry_for(grade).is_none() {
                tracing::warn!("Industrial margin table has no row for grade {}", grade);
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MarginConfigError {
    #[error("Fresh margin table has no entry for grade {0}")]
    MissingFreshMargin(Grade),
}

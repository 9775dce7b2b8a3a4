//! Operator-submitted feature records and input normalization.

use serde::{Deserialize, Serialize};

/// Structured feature record submitted by an operator for scoring.
///
/// Immutable once constructed. All normalization (string trimming, count
/// coercion) happens at construction time so every downstream consumer can
/// rely on clean fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Free-text pincode (not validated numerically)
    pub pincode: String,
    pub state: String,
    pub district: String,
    /// Enrollments in the 0-5 age band
    pub age_0_5: u32,
    /// Enrollments in the 5-17 age band
    pub age_5_17: u32,
    /// Enrollments in the 18+ age band
    pub age_18_plus: u32,
}

impl FeatureRecord {
    /// Build a record from already-typed counts. String fields are trimmed.
    pub fn new(
        pincode: &str,
        state: &str,
        district: &str,
        age_0_5: u32,
        age_5_17: u32,
        age_18_plus: u32,
    ) -> Self {
        Self {
            pincode: pincode.trim().to_string(),
            state: state.trim().to_string(),
            district: district.trim().to_string(),
            age_0_5,
            age_5_17,
            age_18_plus,
        }
    }

    /// Build a record from raw operator input.
    ///
    /// Counts arrive as free text from form fields; anything that does not
    /// parse as a non-negative integer coerces to 0. This is never an error.
    pub fn from_raw(
        pincode: &str,
        state: &str,
        district: &str,
        age_0_5: &str,
        age_5_17: &str,
        age_18_plus: &str,
    ) -> Self {
        Self::new(
            pincode,
            state,
            district,
            coerce_count(age_0_5),
            coerce_count(age_5_17),
            coerce_count(age_18_plus),
        )
    }

    /// Return a copy with string fields trimmed.
    ///
    /// Records built through [`FeatureRecord::new`] are already clean; this
    /// re-normalizes records deserialized from external payloads.
    pub fn normalized(&self) -> Self {
        Self::new(
            &self.pincode,
            &self.state,
            &self.district,
            self.age_0_5,
            self.age_5_17,
            self.age_18_plus,
        )
    }

    /// Sum of all three age bands.
    pub fn total_enrollments(&self) -> u64 {
        u64::from(self.age_0_5) + u64::from(self.age_5_17) + u64::from(self.age_18_plus)
    }
}

/// Parse a count field, coercing absent or non-numeric input to 0.
fn coerce_count(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

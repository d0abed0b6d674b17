//! Ordinal vegetation-health classification.
//!
//! Maps a scalar NDVI value to one of five health buckets via a cascade of
//! strict greater-than thresholds. Total over all reals: sensor noise can
//! push values outside [0, 1] and those still classify through the same
//! cascade.

use serde::{Deserialize, Serialize};

/// Vegetation-health bucket, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthClass {
    VeryPoor,
    Poor,
    Moderate,
    Good,
    Excellent,
}

/// Classify an NDVI value.
///
/// Thresholds are exclusive: `classify(0.70)` is `Good`, not `Excellent`.
pub fn classify(value: f64) -> HealthClass {
    if value > 0.70 {
        HealthClass::Excellent
    } else if value > 0.50 {
        HealthClass::Good
    } else if value > 0.30 {
        HealthClass::Moderate
    } else if value > 0.10 {
        HealthClass::Poor
    } else {
        HealthClass::VeryPoor
    }
}

impl HealthClass {
    /// Short label shown in the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            HealthClass::Excellent => "Excellent",
            HealthClass::Good => "Good",
            HealthClass::Moderate => "Moderate",
            HealthClass::Poor => "Poor",
            HealthClass::VeryPoor => "Very poor",
        }
    }

    /// One-line description of what the bucket means agronomically.
    pub fn description(&self) -> &'static str {
        match self {
            HealthClass::Excellent => {
                "Dense, vigorous canopy. Vegetation is photosynthesizing at full capacity."
            }
            HealthClass::Good => {
                "Healthy vegetation with good ground cover and steady growth."
            }
            HealthClass::Moderate => {
                "Sparse or stressed canopy. Growth is lagging behind expectations."
            }
            HealthClass::Poor => {
                "Weak vegetation signal. Crop is likely water- or nutrient-stressed."
            }
            HealthClass::VeryPoor => {
                "Little to no living vegetation detected. Bare soil or crop failure."
            }
        }
    }

    /// Suggested action for the grower.
    pub fn recommendation(&self) -> &'static str {
        match self {
            HealthClass::Excellent => "Maintain the current management plan.",
            HealthClass::Good => "Keep monitoring; no intervention needed.",
            HealthClass::Moderate => {
                "Inspect the field for early stress signs and review irrigation."
            }
            HealthClass::Poor => {
                "Scout the field promptly; check irrigation, fertilization and pests."
            }
            HealthClass::VeryPoor => {
                "Immediate field inspection required; consider replanting affected zones."
            }
        }
    }

    /// Hex color used by the chart and table layers.
    pub fn color(&self) -> &'static str {
        match self {
            HealthClass::Excellent => "#22c55e",
            HealthClass::Good => "#84cc16",
            HealthClass::Moderate => "#eab308",
            HealthClass::Poor => "#f97316",
            HealthClass::VeryPoor => "#ef4444",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify_reference_values() {
        assert_eq!(classify(0.75), HealthClass::Excellent);
        assert_eq!(classify(0.55), HealthClass::Good);
        assert_eq!(classify(0.35), HealthClass::Moderate);
        assert_eq!(classify(0.15), HealthClass::Poor);
        assert_eq!(classify(0.05), HealthClass::VeryPoor);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        assert_eq!(classify(0.70), HealthClass::Good);
        assert_eq!(classify(0.50), HealthClass::Moderate);
        assert_eq!(classify(0.30), HealthClass::Poor);
        assert_eq!(classify(0.10), HealthClass::VeryPoor);
    }

    #[test]
    fn test_out_of_range_values_still_classify() {
        assert_eq!(classify(-0.4), HealthClass::VeryPoor);
        assert_eq!(classify(1.3), HealthClass::Excellent);
        assert_eq!(classify(f64::NEG_INFINITY), HealthClass::VeryPoor);
        assert_eq!(classify(f64::INFINITY), HealthClass::Excellent);
    }

    #[test]
    fn test_class_texts_present() {
        for class in [
            HealthClass::Excellent,
            HealthClass::Good,
            HealthClass::Moderate,
            HealthClass::Poor,
            HealthClass::VeryPoor,
        ] {
            assert!(!class.label().is_empty());
            assert!(!class.description().is_empty());
            assert!(!class.recommendation().is_empty());
            assert!(class.color().starts_with('#'));
        }
    }

    proptest! {
        /// classify is total: any finite input maps to some bucket without
        /// panicking, and NaN takes the else branch.
        #[test]
        fn prop_classify_total(value in proptest::num::f64::ANY) {
            let _ = classify(value);
        }

        /// Bucket ordinal never decreases as the value increases.
        #[test]
        fn prop_classify_monotonic(a in -1.0f64..2.0, b in -1.0f64..2.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify(lo) <= classify(hi));
        }
    }
}

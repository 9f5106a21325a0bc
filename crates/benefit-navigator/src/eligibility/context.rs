use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Numeric limits the benefit checks and field visibility rules are calibrated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityThresholds {
    pub minimum_rent_eur: f64,
    pub income_ceiling_per_person_eur: f64,
    pub pension_age: i32,
    pub student_aid_min_age: i32,
    /// Exclusive upper bound.
    pub student_aid_max_age: i32,
    pub citizens_income_min_age: i32,
    pub asset_allowance_base_eur: f64,
    pub asset_allowance_per_year_eur: f64,
    /// Exclusive upper bound for a child to count.
    pub child_age_limit: f64,
    pub child_supplement_min_income_single_parent_eur: f64,
    pub child_supplement_min_income_couple_eur: f64,
}

impl Default for EligibilityThresholds {
    fn default() -> Self {
        Self {
            minimum_rent_eur: 400.0,
            income_ceiling_per_person_eur: 1600.0,
            pension_age: 67,
            student_aid_min_age: 15,
            student_aid_max_age: 36,
            citizens_income_min_age: 15,
            asset_allowance_base_eur: 15_000.0,
            asset_allowance_per_year_eur: 500.0,
            child_age_limit: 25.0,
            child_supplement_min_income_single_parent_eur: 600.0,
            child_supplement_min_income_couple_eur: 900.0,
        }
    }
}

/// Inputs every evaluation cycle shares besides the answers themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationContext {
    pub today: NaiveDate,
    pub thresholds: EligibilityThresholds,
}

impl EvaluationContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            thresholds: EligibilityThresholds::default(),
        }
    }

    pub fn with_thresholds(today: NaiveDate, thresholds: EligibilityThresholds) -> Self {
        Self { today, thresholds }
    }
}

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::checks::Benefit;
use super::domain::{FormData, FormField};

pub(crate) const INCOMPLETE_NOTICE: &str = "Bitte geben Sie alle erforderlichen Informationen an.";

/// Three-way outcome of a single benefit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityStatus {
    Eligible,
    Ineligible,
    Incomplete,
}

impl EligibilityStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EligibilityStatus::Eligible => "eligible",
            EligibilityStatus::Ineligible => "ineligible",
            EligibilityStatus::Incomplete => "incomplete",
        }
    }
}

/// Result of evaluating one benefit check against one answer set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub benefit: Benefit,
    pub subsidy_name: String,
    pub status: EligibilityStatus,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub checked_fields: BTreeSet<FormField>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
    pub missing_fields: BTreeSet<FormField>,
}

impl CheckResult {
    pub fn is_eligible(&self) -> bool {
        self.status == EligibilityStatus::Eligible
    }

    pub fn is_ineligible(&self) -> bool {
        self.status == EligibilityStatus::Ineligible
    }

    pub fn is_incomplete(&self) -> bool {
        self.status == EligibilityStatus::Incomplete
    }
}

/// Explanation attached to an eligible result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rationale {
    pub reason: String,
    pub url: Option<String>,
}

impl Rationale {
    pub fn new(reason: impl Into<String>, url: &str) -> Self {
        Self {
            reason: reason.into(),
            url: Some(url.to_string()),
        }
    }
}

/// Ordered "fail if" rules evaluated against a partial answer set.
///
/// Rules run in declaration order. Each rule marks its fields as checked; absent fields are
/// collected as missing and the rule is skipped without passing or failing. The first rule
/// whose predicate fires latches the failure and every later rule becomes a no-op.
#[derive(Debug)]
pub struct RuleChain<'a> {
    benefit: Benefit,
    data: &'a FormData,
    checked: BTreeSet<FormField>,
    missing: BTreeSet<FormField>,
    failure: Option<String>,
}

impl<'a> RuleChain<'a> {
    pub fn new(benefit: Benefit, data: &'a FormData) -> Self {
        Self {
            benefit,
            data,
            checked: BTreeSet::new(),
            missing: BTreeSet::new(),
            failure: None,
        }
    }

    pub fn data(&self) -> &'a FormData {
        self.data
    }

    pub fn has_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Fail with `message` when `field` is present and `predicate` holds.
    pub fn fail_if<P>(self, field: FormField, predicate: P, message: impl Into<String>) -> Self
    where
        P: FnOnce(&FormData) -> bool,
    {
        self.fail_if_all(&[field], predicate, message)
    }

    /// Fail with `message` when every field is present and `predicate` holds.
    pub fn fail_if_all<P>(
        mut self,
        fields: &[FormField],
        predicate: P,
        message: impl Into<String>,
    ) -> Self
    where
        P: FnOnce(&FormData) -> bool,
    {
        if self.has_failed() {
            return self;
        }

        let mut complete = true;
        for &field in fields {
            self.checked.insert(field);
            if !self.data.contains(field) {
                self.missing.insert(field);
                complete = false;
            }
        }

        if complete && predicate(self.data) {
            self.failure = Some(message.into());
        }

        self
    }

    /// Ask for `field` without being able to fail on it.
    pub fn require(self, field: FormField) -> Self {
        self.fail_if(field, |_| false, String::new())
    }

    /// Append the rules built by `extend` only when `condition` holds.
    pub fn when<F>(self, condition: bool, extend: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition {
            extend(self)
        } else {
            self
        }
    }

    /// Close the chain. `success` only runs when nothing failed and nothing is missing.
    pub fn or_else_success<S>(self, success: S) -> CheckResult
    where
        S: FnOnce(&FormData) -> Rationale,
    {
        let RuleChain {
            benefit,
            data,
            checked,
            missing,
            failure,
        } = self;

        let subsidy_name = benefit.subsidy_name().to_string();

        if let Some(reason) = failure {
            return CheckResult {
                benefit,
                subsidy_name,
                status: EligibilityStatus::Ineligible,
                reason,
                url: None,
                checked_fields: checked,
                missing_fields: BTreeSet::new(),
            };
        }

        if !missing.is_empty() {
            return CheckResult {
                benefit,
                subsidy_name,
                status: EligibilityStatus::Incomplete,
                reason: INCOMPLETE_NOTICE.to_string(),
                url: None,
                checked_fields: checked,
                missing_fields: missing,
            };
        }

        let Rationale { reason, url } = success(data);
        CheckResult {
            benefit,
            subsidy_name,
            status: EligibilityStatus::Eligible,
            reason,
            url,
            checked_fields: checked,
            missing_fields: BTreeSet::new(),
        }
    }
}

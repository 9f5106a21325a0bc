//! Incremental evaluation loop deciding which sections and fields are shown next.
//!
//! Every cycle is a pure function of the prior [`RegistryState`], the caller's answers, an
//! optional prefill source and the [`EvaluationContext`]. It returns the next state and a
//! [`CycleResult`]; nothing inside the registry is mutated.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::checks::{evaluate_all, Benefit};
use super::context::EvaluationContext;
use super::domain::{FormData, FormField};
use super::fields::{apply_defaults_for_hidden_fields, is_answered_or_hidden};
use super::rules::CheckResult;
use super::sections::{SectionId, SectionStrategy, StrategyKind, VisibleSection};

/// Per-session disclosure state carried from one cycle to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    pub visible_fields: BTreeSet<FormField>,
    pub revealed_sections: Vec<SectionId>,
}

/// Everything a hosting UI needs after one evaluation cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleResult {
    pub eligible: Vec<CheckResult>,
    pub ineligible: Vec<CheckResult>,
    pub incomplete: Vec<CheckResult>,
    pub all: Vec<CheckResult>,
    pub visible_sections: Vec<VisibleSection>,
    pub visible_fields: Vec<FormField>,
    pub prefilled_fields: FormData,
    pub missing_fields: BTreeSet<FormField>,
}

impl CycleResult {
    pub fn result(&self, benefit: Benefit) -> Option<&CheckResult> {
        self.all.iter().find(|result| result.benefit == benefit)
    }

    pub fn revealed_section_ids(&self) -> Vec<&SectionId> {
        self.visible_sections.iter().map(|section| &section.id).collect()
    }
}

/// Results of running every check once against a defaulted working copy.
struct Evaluation {
    results: Vec<CheckResult>,
    missing: BTreeSet<FormField>,
    checked: BTreeSet<FormField>,
}

impl Evaluation {
    fn run(answers: &FormData, context: &EvaluationContext) -> Self {
        let working = apply_defaults_for_hidden_fields(answers, context);
        let results = evaluate_all(&working, context);

        let mut missing = BTreeSet::new();
        let mut checked = BTreeSet::new();
        for result in &results {
            missing.extend(result.missing_fields.iter().copied());
            checked.extend(result.checked_fields.iter().copied());
        }

        Self {
            results,
            missing,
            checked,
        }
    }
}

/// Orchestrates benefit checks and progressive section disclosure.
#[derive(Clone)]
pub struct EligibilityRegistry {
    strategy: Arc<dyn SectionStrategy>,
}

impl std::fmt::Debug for EligibilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EligibilityRegistry")
            .field("sections", &self.strategy.sections().len())
            .finish()
    }
}

impl Default for EligibilityRegistry {
    fn default() -> Self {
        Self::from_kind(StrategyKind::default())
    }
}

impl EligibilityRegistry {
    pub fn new(strategy: Arc<dyn SectionStrategy>) -> Self {
        Self { strategy }
    }

    pub fn from_kind(kind: StrategyKind) -> Self {
        Self::new(kind.build())
    }

    pub fn strategy(&self) -> &dyn SectionStrategy {
        self.strategy.as_ref()
    }

    /// Run one evaluation cycle.
    ///
    /// Prefill values are only taken for fields the caller has not answered and are reported
    /// in [`CycleResult::prefilled_fields`]; they are never written back into `answers`.
    pub fn evaluate(
        &self,
        state: &RegistryState,
        answers: &FormData,
        prefill: Option<&FormData>,
        context: &EvaluationContext,
    ) -> (RegistryState, CycleResult) {
        let mut working = answers.clone();
        let mut prefilled = FormData::new();
        let mut evaluation = Evaluation::run(&working, context);

        let mut visible: BTreeSet<FormField> = state
            .visible_fields
            .iter()
            .filter(|field| evaluation.checked.contains(field))
            .copied()
            .collect();
        let pruned = state.visible_fields.len() - visible.len();
        if pruned > 0 {
            debug!(pruned, "pruned fields no check still needs");
        }

        for id in &state.revealed_sections {
            for &field in self.strategy.section_fields(id) {
                let relevant = evaluation.missing.contains(&field) || visible.contains(&field);
                if relevant && visible.insert(field) {
                    take_prefill(field, &working, prefill, &mut prefilled);
                }
            }
        }

        working = working.merged(&prefilled);
        let settled = visible
            .iter()
            .all(|&field| is_answered_or_hidden(field, &working, context));

        let mut revealed = state.revealed_sections.clone();
        let mut considered = revealed.clone();
        let section_count = self.strategy.sections().len();

        if settled {
            while considered.len() < section_count {
                let Some(next) =
                    self.strategy
                        .next_section(&considered, &working, &evaluation.results)
                else {
                    break;
                };
                considered.push(next.clone());

                let new_fields: Vec<FormField> = self
                    .strategy
                    .section_fields(&next)
                    .iter()
                    .filter(|field| evaluation.missing.contains(field))
                    .copied()
                    .collect();

                if new_fields.is_empty() {
                    debug!(section = %next, "skipped section without missing fields");
                    continue;
                }

                debug!(section = %next, fields = new_fields.len(), "revealed section");
                revealed.push(next.clone());

                let mut section_prefilled = FormData::new();
                let mut complete = true;
                for field in new_fields {
                    visible.insert(field);
                    complete &= take_prefill(field, &working, prefill, &mut section_prefilled);
                }

                working = working.merged(&section_prefilled);
                prefilled = prefilled.merged(&section_prefilled);

                if !complete {
                    debug!(section = %next, "waiting for manual answers");
                    break;
                }

                evaluation = Evaluation::run(&working, context);
            }
        }

        let visible_sections = revealed
            .iter()
            .filter_map(|id| self.strategy.section(id))
            .map(|section| VisibleSection {
                id: section.id.clone(),
                title: section.title.clone(),
                fields: section
                    .fields
                    .iter()
                    .filter(|field| visible.contains(field))
                    .copied()
                    .collect(),
            })
            .collect();

        let Evaluation {
            results, missing, ..
        } = evaluation;

        let partition = |predicate: fn(&CheckResult) -> bool| -> Vec<CheckResult> {
            results.iter().filter(|result| predicate(result)).cloned().collect()
        };

        let result = CycleResult {
            eligible: partition(CheckResult::is_eligible),
            ineligible: partition(CheckResult::is_ineligible),
            incomplete: partition(CheckResult::is_incomplete),
            all: results.clone(),
            visible_sections,
            visible_fields: visible.iter().copied().collect(),
            prefilled_fields: prefilled,
            missing_fields: missing,
        };

        let next_state = RegistryState {
            visible_fields: visible,
            revealed_sections: revealed,
        };

        (next_state, result)
    }
}

/// Satisfy `field` from `prefill` unless it is already answered. Returns whether the field
/// now has a value.
fn take_prefill(
    field: FormField,
    answers: &FormData,
    prefill: Option<&FormData>,
    prefilled: &mut FormData,
) -> bool {
    if answers.contains(field) {
        return true;
    }

    match prefill.and_then(|source| source.get(field)) {
        Some(value) => {
            prefilled.insert(field, value.clone());
            true
        }
        None => false,
    }
}

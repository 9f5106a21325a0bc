use std::collections::BTreeSet;

use serde::Serialize;

use super::context::EvaluationContext;
use super::domain::{FieldValue, FormData, FormField};
use super::fields::metadata;
use super::registry::CycleResult;

/// Completion metric derived from one cycle and the answers the user has given so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormProgress {
    pub filled: usize,
    pub total: usize,
    pub percent: u8,
    pub complete: bool,
}

impl FormProgress {
    /// `answers` should already include the values prefilled by `cycle`.
    pub fn from_cycle(cycle: &CycleResult, answers: &FormData) -> Self {
        let filled = cycle
            .visible_fields
            .iter()
            .filter(|&&field| is_filled(answers.get(field)))
            .count();

        let total = cycle
            .missing_fields
            .iter()
            .chain(cycle.visible_fields.iter())
            .collect::<BTreeSet<_>>()
            .len();

        let percent = if total == 0 {
            0
        } else {
            ((filled as f64 / total as f64) * 100.0).round().min(100.0) as u8
        };

        Self {
            filled,
            total,
            percent,
            complete: percent == 100 && filled > 0,
        }
    }
}

fn is_filled(value: Option<&FieldValue>) -> bool {
    match value {
        None => false,
        Some(FieldValue::Text(text)) => !text.trim().is_empty(),
        Some(_) => true,
    }
}

/// Whether a hosting UI should render `field` right now.
pub fn should_show_field(
    field: FormField,
    visible_fields: &[FormField],
    answers: &FormData,
    context: &EvaluationContext,
) -> bool {
    visible_fields.contains(&field) && !metadata(field).is_hidden(answers, context)
}

//! Benefit checks, field catalog and the progressive-disclosure registry.
//!
//! A hosting layer keeps one [`RegistryState`] per form session and calls
//! [`EligibilityRegistry::evaluate`] whenever the answers change. The
//! [`EligibilitySessionService`] and [`eligibility_router`] do exactly that over HTTP.

pub mod checks;
pub mod context;
pub mod domain;
pub mod fields;
pub mod import;
pub mod progress;
pub mod registry;
pub mod router;
pub mod rules;
pub mod sections;
pub mod session;
pub mod store;

#[cfg(test)]
mod tests;

pub use checks::{evaluate_all, Benefit};
pub use context::{EligibilityThresholds, EvaluationContext};
pub use domain::{
    calculate_age, EducationLevel, EmploymentStatus, FieldValue, FieldValueError, FormData,
    FormField, Gender, HealthInsurance, MaritalStatus, Nationality, ResidenceStatus,
    UnknownFieldError, ValueType, WorkAbility,
};
pub use fields::{
    apply_defaults_for_hidden_fields, catalog, metadata, FieldDescriptor, FieldKind,
    FieldMetadata, HiddenDefault,
};
pub use import::{load_answers, parse_answers, AnswerImportError};
pub use progress::{should_show_field, FormProgress};
pub use registry::{CycleResult, EligibilityRegistry, RegistryState};
pub use router::eligibility_router;
pub use rules::{CheckResult, EligibilityStatus, Rationale, RuleChain};
pub use sections::{
    OrderedSectionStrategy, RapidQuestionsFirstStrategy, SectionDefinition, SectionId,
    SectionStrategy, StrategyKind, UnknownStrategyError, VisibleSection,
    RAPID_QUESTIONS_SECTION,
};
pub use session::{
    EligibilitySessionService, FormSession, RefreshOutcome, RefreshRequest, SessionError,
    SessionId,
};
pub use store::{AnswerStore, StoreError, UserId};

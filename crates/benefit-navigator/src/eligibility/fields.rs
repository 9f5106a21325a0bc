//! Static catalog describing how every questionnaire field is rendered and when it applies.

use std::fmt;

use serde::Serialize;

use super::context::EvaluationContext;
use super::domain::{
    FieldValue, FormData, FormField, Gender, Nationality, ResidenceStatus, WorkAbility,
};

/// Predicate deciding whether a field applies. `None` means a prerequisite is unanswered.
pub type VisibilityRule = fn(&FormData, &EvaluationContext) -> Option<bool>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Input widget family a hosting UI renders for the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Select(&'static [FieldOption]),
    YesNo,
    NumberList,
}

impl FieldKind {
    pub const fn label(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Select(_) => "select",
            FieldKind::YesNo => "yesno",
            FieldKind::NumberList => "numberArray",
        }
    }

    pub fn options(self) -> &'static [FieldOption] {
        match self {
            FieldKind::Select(options) => options,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FieldValidation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

/// Value substituted for a field while it is hidden.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HiddenDefault {
    Flag(bool),
    Number(f64),
    EmptyList,
    ResidenceStatus(ResidenceStatus),
    WorkAbility(WorkAbility),
}

impl HiddenDefault {
    pub fn value(self) -> FieldValue {
        match self {
            HiddenDefault::Flag(value) => FieldValue::Flag(value),
            HiddenDefault::Number(value) => FieldValue::Number(value),
            HiddenDefault::EmptyList => FieldValue::Numbers(Vec::new()),
            HiddenDefault::ResidenceStatus(value) => FieldValue::ResidenceStatus(value),
            HiddenDefault::WorkAbility(value) => FieldValue::WorkAbility(value),
        }
    }
}

#[derive(Clone, Copy)]
pub struct FieldMetadata {
    pub field: FormField,
    pub label: &'static str,
    pub kind: FieldKind,
    pub explanation: Option<&'static str>,
    pub validation: Option<FieldValidation>,
    pub visible_when: Option<VisibilityRule>,
    pub default_when_hidden: Option<HiddenDefault>,
}

impl fmt::Debug for FieldMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMetadata")
            .field("field", &self.field)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("conditional", &self.is_conditional())
            .field("default_when_hidden", &self.default_when_hidden)
            .finish()
    }
}

impl FieldMetadata {
    const fn new(field: FormField, label: &'static str, kind: FieldKind) -> Self {
        Self {
            field,
            label,
            kind,
            explanation: None,
            validation: None,
            visible_when: None,
            default_when_hidden: None,
        }
    }

    fn explained(mut self, explanation: &'static str) -> Self {
        self.explanation = Some(explanation);
        self
    }

    fn validated(mut self, min: Option<f64>, max: Option<f64>, step: Option<f64>) -> Self {
        self.validation = Some(FieldValidation { min, max, step });
        self
    }

    fn conditional(mut self, rule: VisibilityRule, default: HiddenDefault) -> Self {
        self.visible_when = Some(rule);
        self.default_when_hidden = Some(default);
        self
    }

    /// `Some(true)` for unconditional fields.
    pub fn visibility(&self, data: &FormData, context: &EvaluationContext) -> Option<bool> {
        match self.visible_when {
            Some(rule) => rule(data, context),
            None => Some(true),
        }
    }

    pub fn is_hidden(&self, data: &FormData, context: &EvaluationContext) -> bool {
        self.visibility(data, context) == Some(false)
    }

    pub fn is_conditional(&self) -> bool {
        self.visible_when.is_some()
    }

    pub fn descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            id: self.field,
            label: self.label,
            kind: self.kind.label(),
            options: self.kind.options(),
            explanation: self.explanation,
            validation: self.validation,
            conditional: self.is_conditional(),
        }
    }
}

/// Serializable projection of [`FieldMetadata`] for API consumers.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    pub id: FormField,
    pub label: &'static str,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "has_no_options")]
    pub options: &'static [FieldOption],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    pub conditional: bool,
}

fn has_no_options(options: &&'static [FieldOption]) -> bool {
    options.is_empty()
}

const GENDER_OPTIONS: &[FieldOption] = &[
    FieldOption { value: "male", label: "Männlich" },
    FieldOption { value: "female", label: "Weiblich" },
    FieldOption { value: "diverse", label: "Divers" },
    FieldOption { value: "unspecified", label: "Keine Angabe" },
];

const MARITAL_STATUS_OPTIONS: &[FieldOption] = &[
    FieldOption { value: "single", label: "Ledig" },
    FieldOption { value: "married", label: "Verheiratet" },
    FieldOption { value: "divorced", label: "Geschieden" },
    FieldOption { value: "widowed", label: "Verwitwet" },
    FieldOption { value: "separated", label: "Getrennt" },
];

const NATIONALITY_OPTIONS: &[FieldOption] = &[
    FieldOption { value: "German", label: "Deutsch" },
    FieldOption { value: "EU", label: "Europäisch (EU)" },
    FieldOption { value: "Non-EU", label: "Nicht-EU" },
];

const RESIDENCE_STATUS_OPTIONS: &[FieldOption] = &[
    FieldOption { value: "residence_permit", label: "Aufenthaltserlaubnis" },
    FieldOption { value: "permanent_residence", label: "Niederlassungserlaubnis" },
    FieldOption { value: "none", label: "Keine" },
];

const EMPLOYMENT_STATUS_OPTIONS: &[FieldOption] = &[
    FieldOption { value: "employed", label: "Angestellt" },
    FieldOption { value: "self_employed", label: "Selbstständig" },
    FieldOption { value: "unemployed", label: "Arbeitslos" },
    FieldOption { value: "student", label: "Student/in" },
    FieldOption { value: "retired", label: "Rentner/in" },
    FieldOption { value: "other", label: "Sonstiges" },
];

const EDUCATION_LEVEL_OPTIONS: &[FieldOption] = &[
    FieldOption { value: "no_degree", label: "Kein Abschluss" },
    FieldOption { value: "lower_secondary", label: "Hauptschule" },
    FieldOption { value: "secondary", label: "Realschule" },
    FieldOption { value: "high_school", label: "Abitur" },
    FieldOption { value: "vocational_training", label: "Ausbildung" },
    FieldOption { value: "university", label: "Studium" },
];

const HEALTH_INSURANCE_OPTIONS: &[FieldOption] = &[
    FieldOption { value: "public", label: "Gesetzlich" },
    FieldOption { value: "private", label: "Privat" },
    FieldOption { value: "none", label: "Keine" },
];

const WORK_ABILITY_OPTIONS: &[FieldOption] = &[
    FieldOption { value: "full", label: "Voll arbeitsfähig" },
    FieldOption { value: "limited", label: "Eingeschränkt arbeitsfähig" },
    FieldOption { value: "none", label: "Nicht arbeitsfähig" },
];

fn non_german(data: &FormData, _: &EvaluationContext) -> Option<bool> {
    data.nationality()
        .map(|nationality| nationality != Nationality::German)
}

fn shares_household(data: &FormData, _: &EvaluationContext) -> Option<bool> {
    data.number(FormField::HouseholdSize).map(|size| size > 1.0)
}

fn has_children(data: &FormData, _: &EvaluationContext) -> Option<bool> {
    data.number(FormField::NumberOfChildren)
        .map(|children| children > 0.0)
}

fn has_disability(data: &FormData, _: &EvaluationContext) -> Option<bool> {
    data.flag(FormField::HasDisability)
}

fn may_be_pregnant(data: &FormData, _: &EvaluationContext) -> Option<bool> {
    data.gender()
        .map(|gender| matches!(gender, Gender::Female | Gender::Diverse))
}

fn below_pension_age_without_pension(
    data: &FormData,
    context: &EvaluationContext,
) -> Option<bool> {
    let receives_pension = data.flag(FormField::ReceivesPension)?;
    let age = data.age_on(context.today)?;
    Some(!receives_pension && age < context.thresholds.pension_age)
}

fn is_student(data: &FormData, _: &EvaluationContext) -> Option<bool> {
    data.flag(FormField::IsStudent)
}

/// Metadata for a single field.
pub fn metadata(field: FormField) -> FieldMetadata {
    use FieldKind::{Date, Number, NumberList, Select, Text, YesNo};
    use FormField as F;

    match field {
        F::FirstName => FieldMetadata::new(field, "Vorname", Text),
        F::LastName => FieldMetadata::new(field, "Nachname", Text),
        F::DateOfBirth => FieldMetadata::new(field, "Geburtsdatum", Date),
        F::Gender => FieldMetadata::new(field, "Geschlecht", Select(GENDER_OPTIONS)),
        F::MaritalStatus => {
            FieldMetadata::new(field, "Familienstand", Select(MARITAL_STATUS_OPTIONS))
        }
        F::Nationality => FieldMetadata::new(
            field,
            "Staatsangehörigkeit",
            Select(NATIONALITY_OPTIONS),
        )
        .explained(
            "Wenn sie neben deutscher Staatsangehörigkeit noch andere Staatsangehörigkeiten haben, wählen Sie Deutsch.",
        ),
        F::ResidenceStatus => FieldMetadata::new(
            field,
            "Aufenthaltsstatus",
            Select(RESIDENCE_STATUS_OPTIONS),
        )
        .conditional(
            non_german,
            HiddenDefault::ResidenceStatus(ResidenceStatus::ResidencePermit),
        ),
        F::ResidenceInGermany => {
            FieldMetadata::new(field, "Gewöhnlicher Aufenthalt in Deutschland", YesNo).explained(
                "Ihr gewöhnlicher Aufenthalt ist dort, wo Sie sich dauerhaft aufhalten und Ihren Lebensmittelpunkt haben.",
            )
        }
        F::GrossMonthlyIncome => {
            FieldMetadata::new(field, "Monatliches Bruttoeinkommen (€)", Number)
                .validated(Some(0.0), None, None)
                .explained(
                    "Das Bruttoeinkommen ist Ihr Gehalt vor Abzug von Steuern und Sozialabgaben.",
                )
        }
        F::NetMonthlyIncome => FieldMetadata::new(field, "Monatliches Nettoeinkommen (€)", Number)
            .validated(Some(0.0), None, None)
            .explained(
                "Das Nettoeinkommen ist der Betrag, der nach Abzug aller Steuern und Sozialabgaben auf Ihrem Konto eingeht.",
            ),
        F::Assets => FieldMetadata::new(field, "Vermögen (€)", Number)
            .validated(Some(0.0), None, None)
            .explained(
                "Zum Vermögen zählen Bargeld, Sparguthaben, Wertpapiere, Immobilien und andere Sachwerte.",
            ),
        F::MonthlyRent => FieldMetadata::new(field, "Monatliche Miete (€)", Number)
            .validated(Some(0.0), None, None),
        F::HouseholdSize => FieldMetadata::new(field, "Anzahl Personen im Haushalt", Number)
            .validated(Some(1.0), None, Some(1.0))
            .explained(
                "Alle Personen, die dauerhaft in Ihrer Wohnung leben und gemeinsam wirtschaften (inkl. Sie selbst).",
            ),
        F::NumberOfChildren => FieldMetadata::new(field, "Anzahl Kinder", Number)
            .validated(Some(0.0), None, Some(1.0))
            .conditional(shares_household, HiddenDefault::Number(0.0)),
        F::ChildrenAges => {
            FieldMetadata::new(field, "Alter der Kinder (kommagetrennt)", NumberList)
                .conditional(has_children, HiddenDefault::EmptyList)
        }
        F::LivesWithParents => FieldMetadata::new(field, "Wohnen Sie bei Ihren Eltern?", YesNo),
        F::IsSingleParent => FieldMetadata::new(field, "Sind Sie Alleinerziehend?", YesNo)
            .conditional(has_children, HiddenDefault::Flag(false)),
        F::EmploymentStatus => FieldMetadata::new(
            field,
            "Beschäftigungsstatus",
            Select(EMPLOYMENT_STATUS_OPTIONS),
        ),
        F::EducationLevel => {
            FieldMetadata::new(field, "Bildungsstand", Select(EDUCATION_LEVEL_OPTIONS))
        }
        F::IsStudent => FieldMetadata::new(field, "Ich bin Student/in", YesNo),
        F::HasDisability => FieldMetadata::new(field, "Behinderung", YesNo),
        F::DisabilityDegree => FieldMetadata::new(field, "Grad der Behinderung (%)", Number)
            .validated(Some(0.0), Some(100.0), None)
            .conditional(has_disability, HiddenDefault::Number(0.0)),
        F::IsPregnant => FieldMetadata::new(field, "Schwanger", YesNo)
            .conditional(may_be_pregnant, HiddenDefault::Flag(false)),
        F::HasCareNeeds => FieldMetadata::new(field, "Pflegebedürftigkeit", YesNo),
        F::PensionEligible => {
            FieldMetadata::new(field, "Rentenberechtigt (Rentenalter erreicht)", YesNo)
        }
        F::CitizenBenefitLast3Years => {
            FieldMetadata::new(field, "Bürgergeld in den letzten 3 Jahren bezogen", YesNo)
        }
        F::HasFinancialHardship => FieldMetadata::new(field, "Finanzielle Notlage", YesNo)
            .explained(
                "Eine finanzielle Notlage bedeutet, dass jemand nicht genug Geld hat, um die grundlegenden Lebenshaltungskosten zu decken (Miete, Strom, Essen).",
            ),
        F::WorkAbility => {
            FieldMetadata::new(field, "Arbeitsfähigkeit", Select(WORK_ABILITY_OPTIONS))
                .conditional(
                    below_pension_age_without_pension,
                    HiddenDefault::WorkAbility(WorkAbility::None),
                )
        }
        F::ReceivesUnemploymentBenefit1 => {
            FieldMetadata::new(field, "Beziehe Arbeitslosengeld I", YesNo)
        }
        F::ReceivesUnemploymentBenefit2 => {
            FieldMetadata::new(field, "Beziehe Bürgergeld (ALG II)", YesNo)
        }
        F::ReceivesPension => FieldMetadata::new(field, "Beziehe Rente", YesNo),
        F::HealthInsurance => {
            FieldMetadata::new(field, "Krankenversicherung", Select(HEALTH_INSURANCE_OPTIONS))
        }
        F::HasCareInsurance => FieldMetadata::new(field, "Habe Pflegeversicherung", YesNo),
        F::ReceivesChildBenefit => FieldMetadata::new(field, "Beziehe Kindergeld", YesNo)
            .conditional(has_children, HiddenDefault::Flag(false)),
        F::ReceivesHousingBenefit => FieldMetadata::new(field, "Beziehe Wohngeld", YesNo),
        F::ReceivesStudentAid => FieldMetadata::new(field, "Beziehe BAföG", YesNo)
            .conditional(is_student, HiddenDefault::Flag(false)),
    }
}

/// Every field in catalog order.
pub fn catalog() -> impl Iterator<Item = FieldMetadata> {
    FormField::ALL.into_iter().map(metadata)
}

/// Copy of `data` where every currently hidden field carries its hidden default.
pub fn apply_defaults_for_hidden_fields(data: &FormData, context: &EvaluationContext) -> FormData {
    let mut result = data.clone();
    for meta in catalog() {
        if let Some(default) = meta.default_when_hidden {
            if meta.is_hidden(data, context) {
                result.insert(meta.field, default.value());
            }
        }
    }
    result
}

/// Hidden fields count as satisfied even when unanswered.
pub fn is_answered_or_hidden(field: FormField, data: &FormData, context: &EvaluationContext) -> bool {
    data.contains(field) || metadata(field).is_hidden(data, context)
}

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::de::{self, DeserializeOwned};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Identifier of every answerable questionnaire field.
///
/// The declaration order doubles as the catalog order used for iteration and for sorted
/// field sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    FirstName,
    LastName,
    DateOfBirth,
    Gender,
    MaritalStatus,
    Nationality,
    ResidenceStatus,
    ResidenceInGermany,
    GrossMonthlyIncome,
    NetMonthlyIncome,
    Assets,
    MonthlyRent,
    HouseholdSize,
    NumberOfChildren,
    ChildrenAges,
    LivesWithParents,
    IsSingleParent,
    EmploymentStatus,
    EducationLevel,
    IsStudent,
    HasDisability,
    DisabilityDegree,
    IsPregnant,
    HasCareNeeds,
    PensionEligible,
    CitizenBenefitLast3Years,
    HasFinancialHardship,
    WorkAbility,
    ReceivesUnemploymentBenefit1,
    ReceivesUnemploymentBenefit2,
    ReceivesPension,
    HealthInsurance,
    HasCareInsurance,
    ReceivesChildBenefit,
    ReceivesHousingBenefit,
    ReceivesStudentAid,
}

impl FormField {
    pub const ALL: [FormField; 36] = [
        FormField::FirstName,
        FormField::LastName,
        FormField::DateOfBirth,
        FormField::Gender,
        FormField::MaritalStatus,
        FormField::Nationality,
        FormField::ResidenceStatus,
        FormField::ResidenceInGermany,
        FormField::GrossMonthlyIncome,
        FormField::NetMonthlyIncome,
        FormField::Assets,
        FormField::MonthlyRent,
        FormField::HouseholdSize,
        FormField::NumberOfChildren,
        FormField::ChildrenAges,
        FormField::LivesWithParents,
        FormField::IsSingleParent,
        FormField::EmploymentStatus,
        FormField::EducationLevel,
        FormField::IsStudent,
        FormField::HasDisability,
        FormField::DisabilityDegree,
        FormField::IsPregnant,
        FormField::HasCareNeeds,
        FormField::PensionEligible,
        FormField::CitizenBenefitLast3Years,
        FormField::HasFinancialHardship,
        FormField::WorkAbility,
        FormField::ReceivesUnemploymentBenefit1,
        FormField::ReceivesUnemploymentBenefit2,
        FormField::ReceivesPension,
        FormField::HealthInsurance,
        FormField::HasCareInsurance,
        FormField::ReceivesChildBenefit,
        FormField::ReceivesHousingBenefit,
        FormField::ReceivesStudentAid,
    ];

    /// Wire identifier, identical to the serde representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            FormField::FirstName => "firstName",
            FormField::LastName => "lastName",
            FormField::DateOfBirth => "dateOfBirth",
            FormField::Gender => "gender",
            FormField::MaritalStatus => "maritalStatus",
            FormField::Nationality => "nationality",
            FormField::ResidenceStatus => "residenceStatus",
            FormField::ResidenceInGermany => "residenceInGermany",
            FormField::GrossMonthlyIncome => "grossMonthlyIncome",
            FormField::NetMonthlyIncome => "netMonthlyIncome",
            FormField::Assets => "assets",
            FormField::MonthlyRent => "monthlyRent",
            FormField::HouseholdSize => "householdSize",
            FormField::NumberOfChildren => "numberOfChildren",
            FormField::ChildrenAges => "childrenAges",
            FormField::LivesWithParents => "livesWithParents",
            FormField::IsSingleParent => "isSingleParent",
            FormField::EmploymentStatus => "employmentStatus",
            FormField::EducationLevel => "educationLevel",
            FormField::IsStudent => "isStudent",
            FormField::HasDisability => "hasDisability",
            FormField::DisabilityDegree => "disabilityDegree",
            FormField::IsPregnant => "isPregnant",
            FormField::HasCareNeeds => "hasCareNeeds",
            FormField::PensionEligible => "pensionEligible",
            FormField::CitizenBenefitLast3Years => "citizenBenefitLast3Years",
            FormField::HasFinancialHardship => "hasFinancialHardship",
            FormField::WorkAbility => "workAbility",
            FormField::ReceivesUnemploymentBenefit1 => "receivesUnemploymentBenefit1",
            FormField::ReceivesUnemploymentBenefit2 => "receivesUnemploymentBenefit2",
            FormField::ReceivesPension => "receivesPension",
            FormField::HealthInsurance => "healthInsurance",
            FormField::HasCareInsurance => "hasCareInsurance",
            FormField::ReceivesChildBenefit => "receivesChildBenefit",
            FormField::ReceivesHousingBenefit => "receivesHousingBenefit",
            FormField::ReceivesStudentAid => "receivesStudentAid",
        }
    }

    /// Semantic type every value stored under this field must have.
    pub const fn value_type(self) -> ValueType {
        match self {
            FormField::FirstName | FormField::LastName => ValueType::Text,
            FormField::DateOfBirth => ValueType::Date,
            FormField::Gender => ValueType::Gender,
            FormField::MaritalStatus => ValueType::MaritalStatus,
            FormField::Nationality => ValueType::Nationality,
            FormField::ResidenceStatus => ValueType::ResidenceStatus,
            FormField::EmploymentStatus => ValueType::EmploymentStatus,
            FormField::EducationLevel => ValueType::EducationLevel,
            FormField::WorkAbility => ValueType::WorkAbility,
            FormField::HealthInsurance => ValueType::HealthInsurance,
            FormField::GrossMonthlyIncome
            | FormField::NetMonthlyIncome
            | FormField::Assets
            | FormField::MonthlyRent
            | FormField::HouseholdSize
            | FormField::NumberOfChildren
            | FormField::DisabilityDegree => ValueType::Number,
            FormField::ChildrenAges => ValueType::NumberList,
            FormField::ResidenceInGermany
            | FormField::LivesWithParents
            | FormField::IsSingleParent
            | FormField::IsStudent
            | FormField::HasDisability
            | FormField::IsPregnant
            | FormField::HasCareNeeds
            | FormField::PensionEligible
            | FormField::CitizenBenefitLast3Years
            | FormField::HasFinancialHardship
            | FormField::ReceivesUnemploymentBenefit1
            | FormField::ReceivesUnemploymentBenefit2
            | FormField::ReceivesPension
            | FormField::HasCareInsurance
            | FormField::ReceivesChildBenefit
            | FormField::ReceivesHousingBenefit
            | FormField::ReceivesStudentAid => ValueType::Flag,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a string does not name a known field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form field '{0}'")]
pub struct UnknownFieldError(pub String);

impl FromStr for FormField {
    type Err = UnknownFieldError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        FormField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownFieldError(trimmed.to_string()))
    }
}

/// Data type attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Text,
    Date,
    Number,
    Flag,
    NumberList,
    Gender,
    MaritalStatus,
    Nationality,
    ResidenceStatus,
    EmploymentStatus,
    EducationLevel,
    HealthInsurance,
    WorkAbility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Diverse,
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
    Separated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nationality {
    German,
    #[serde(rename = "EU")]
    Eu,
    #[serde(rename = "Non-EU")]
    NonEu,
}

/// Residence title held by non-German citizens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidenceStatus {
    ResidencePermit,
    PermanentResidence,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Unemployed,
    Student,
    Retired,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    NoDegree,
    LowerSecondary,
    Secondary,
    HighSchool,
    VocationalTraining,
    University,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthInsurance {
    Public,
    Private,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkAbility {
    Full,
    Limited,
    None,
}

/// A single typed answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDate),
    Number(f64),
    Flag(bool),
    Numbers(Vec<f64>),
    Gender(Gender),
    MaritalStatus(MaritalStatus),
    Nationality(Nationality),
    ResidenceStatus(ResidenceStatus),
    EmploymentStatus(EmploymentStatus),
    EducationLevel(EducationLevel),
    HealthInsurance(HealthInsurance),
    WorkAbility(WorkAbility),
}

/// Conversion failure for a raw answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldValueError {
    #[error("expected {expected:?} value for '{field}', found {found}")]
    TypeMismatch {
        field: FormField,
        expected: ValueType,
        found: String,
    },
    #[error("invalid date '{value}' for '{field}', expected YYYY-MM-DD")]
    InvalidDate { field: FormField, value: String },
}

impl FieldValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            FieldValue::Text(_) => ValueType::Text,
            FieldValue::Date(_) => ValueType::Date,
            FieldValue::Number(_) => ValueType::Number,
            FieldValue::Flag(_) => ValueType::Flag,
            FieldValue::Numbers(_) => ValueType::NumberList,
            FieldValue::Gender(_) => ValueType::Gender,
            FieldValue::MaritalStatus(_) => ValueType::MaritalStatus,
            FieldValue::Nationality(_) => ValueType::Nationality,
            FieldValue::ResidenceStatus(_) => ValueType::ResidenceStatus,
            FieldValue::EmploymentStatus(_) => ValueType::EmploymentStatus,
            FieldValue::EducationLevel(_) => ValueType::EducationLevel,
            FieldValue::HealthInsurance(_) => ValueType::HealthInsurance,
            FieldValue::WorkAbility(_) => ValueType::WorkAbility,
        }
    }

    /// Interpret a JSON value according to the field's declared type. `null` is absence.
    pub fn from_json(field: FormField, value: Value) -> Result<Option<Self>, FieldValueError> {
        if value.is_null() {
            return Ok(None);
        }

        let mismatch = |value: &Value| FieldValueError::TypeMismatch {
            field,
            expected: field.value_type(),
            found: value.to_string(),
        };

        let parsed = match field.value_type() {
            ValueType::Text => match value {
                Value::String(text) => FieldValue::Text(text),
                other => return Err(mismatch(&other)),
            },
            ValueType::Date => match &value {
                Value::String(raw) => FieldValue::Date(parse_date(field, raw)?),
                other => return Err(mismatch(other)),
            },
            ValueType::Number => value
                .as_f64()
                .map(FieldValue::Number)
                .ok_or_else(|| mismatch(&value))?,
            ValueType::Flag => value
                .as_bool()
                .map(FieldValue::Flag)
                .ok_or_else(|| mismatch(&value))?,
            ValueType::NumberList => match &value {
                Value::Array(items) => items
                    .iter()
                    .map(Value::as_f64)
                    .collect::<Option<Vec<_>>>()
                    .map(FieldValue::Numbers)
                    .ok_or_else(|| mismatch(&value))?,
                other => return Err(mismatch(other)),
            },
            ValueType::Gender => FieldValue::Gender(choice(value, mismatch)?),
            ValueType::MaritalStatus => FieldValue::MaritalStatus(choice(value, mismatch)?),
            ValueType::Nationality => FieldValue::Nationality(choice(value, mismatch)?),
            ValueType::ResidenceStatus => FieldValue::ResidenceStatus(choice(value, mismatch)?),
            ValueType::EmploymentStatus => {
                FieldValue::EmploymentStatus(choice(value, mismatch)?)
            }
            ValueType::EducationLevel => FieldValue::EducationLevel(choice(value, mismatch)?),
            ValueType::HealthInsurance => FieldValue::HealthInsurance(choice(value, mismatch)?),
            ValueType::WorkAbility => FieldValue::WorkAbility(choice(value, mismatch)?),
        };

        Ok(Some(parsed))
    }

    /// Interpret free text (CSV cells, CLI arguments). An empty cell is absence.
    pub fn parse_text(field: FormField, raw: &str) -> Result<Option<Self>, FieldValueError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let mismatch = || FieldValueError::TypeMismatch {
            field,
            expected: field.value_type(),
            found: trimmed.to_string(),
        };

        match field.value_type() {
            ValueType::Text => Ok(Some(FieldValue::Text(trimmed.to_string()))),
            ValueType::Date => Ok(Some(FieldValue::Date(parse_date(field, trimmed)?))),
            ValueType::Number => parse_finite(trimmed)
                .map(|number| Some(FieldValue::Number(number)))
                .ok_or_else(|| mismatch()),
            ValueType::Flag => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "ja" | "1" => Ok(Some(FieldValue::Flag(true))),
                "false" | "no" | "nein" | "0" => Ok(Some(FieldValue::Flag(false))),
                _ => Err(mismatch()),
            },
            ValueType::NumberList => trimmed
                .split(|c: char| c == ',' || c == ';')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| parse_finite(item).ok_or_else(|| mismatch()))
                .collect::<Result<Vec<_>, _>>()
                .map(|numbers| Some(FieldValue::Numbers(numbers))),
            _ => FieldValue::from_json(field, Value::String(trimmed.to_string())),
        }
    }
}

/// `f64::from_str` also accepts `NaN` and `inf`, which no answer can mean.
fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|number| number.is_finite())
}

fn choice<T, F>(value: Value, mismatch: F) -> Result<T, FieldValueError>
where
    T: DeserializeOwned,
    F: Fn(&Value) -> FieldValueError,
{
    serde_json::from_value(value.clone()).map_err(|_| mismatch(&value))
}

fn parse_date(field: FormField, raw: &str) -> Result<NaiveDate, FieldValueError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| FieldValueError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

/// Sparse answer set. A field that is not present is unanswered, which is distinct from any
/// falsy value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    values: BTreeMap<FormField, FieldValue>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: FormField, value: FieldValue) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: FormField, value: FieldValue) -> Option<FieldValue> {
        self.values.insert(field, value)
    }

    pub fn remove(&mut self, field: FormField) -> Option<FieldValue> {
        self.values.remove(&field)
    }

    pub fn get(&self, field: FormField) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.values.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &FieldValue)> + '_ {
        self.values.iter().map(|(field, value)| (*field, value))
    }

    /// Copy of `self` with every value of `other` laid over it.
    pub fn merged(&self, other: &FormData) -> FormData {
        let mut merged = self.clone();
        for (field, value) in other.iter() {
            merged.insert(field, value.clone());
        }
        merged
    }

    pub fn flag(&self, field: FormField) -> Option<bool> {
        match self.get(field) {
            Some(FieldValue::Flag(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn number(&self, field: FormField) -> Option<f64> {
        match self.get(field) {
            Some(FieldValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn numbers(&self, field: FormField) -> Option<&[f64]> {
        match self.get(field) {
            Some(FieldValue::Numbers(values)) => Some(values.as_slice()),
            _ => None,
        }
    }

    pub fn date(&self, field: FormField) -> Option<NaiveDate> {
        match self.get(field) {
            Some(FieldValue::Date(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn text(&self, field: FormField) -> Option<&str> {
        match self.get(field) {
            Some(FieldValue::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn gender(&self) -> Option<Gender> {
        match self.get(FormField::Gender) {
            Some(FieldValue::Gender(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn nationality(&self) -> Option<Nationality> {
        match self.get(FormField::Nationality) {
            Some(FieldValue::Nationality(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn residence_status(&self) -> Option<ResidenceStatus> {
        match self.get(FormField::ResidenceStatus) {
            Some(FieldValue::ResidenceStatus(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn employment_status(&self) -> Option<EmploymentStatus> {
        match self.get(FormField::EmploymentStatus) {
            Some(FieldValue::EmploymentStatus(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn health_insurance(&self) -> Option<HealthInsurance> {
        match self.get(FormField::HealthInsurance) {
            Some(FieldValue::HealthInsurance(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn work_ability(&self) -> Option<WorkAbility> {
        match self.get(FormField::WorkAbility) {
            Some(FieldValue::WorkAbility(value)) => Some(*value),
            _ => None,
        }
    }

    /// Age in whole years on `today`, derived from the date of birth.
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        self.date(FormField::DateOfBirth)
            .map(|birth| calculate_age(birth, today))
    }
}

impl FromIterator<(FormField, FieldValue)> for FormData {
    fn from_iter<I: IntoIterator<Item = (FormField, FieldValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Serialize for FormData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in &self.values {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FormData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<FormField, Value>::deserialize(deserializer)?;
        let mut data = FormData::new();
        for (field, value) in raw {
            if let Some(parsed) = FieldValue::from_json(field, value).map_err(de::Error::custom)? {
                data.insert(field, parsed);
            }
        }
        Ok(data)
    }
}

/// Calendar-exact age: the year difference, minus one when the birthday has not yet come
/// around in `today`'s year.
pub fn calculate_age(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

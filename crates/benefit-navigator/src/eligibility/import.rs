//! CSV answer import (`field,value` rows) used by the CLI and for prefill sources.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{FieldValue, FieldValueError, FormData, FormField};

#[derive(Debug, thiserror::Error)]
pub enum AnswerImportError {
    #[error("failed to read answers: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid answer CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unknown field '{field}'")]
    UnknownField { row: usize, field: String },
    #[error("row {row}: invalid value '{value}' for '{field}': {source}")]
    InvalidValue {
        row: usize,
        field: FormField,
        value: String,
        #[source]
        source: FieldValueError,
    },
}

#[derive(Debug, Deserialize)]
struct AnswerRow {
    field: String,
    #[serde(default)]
    value: String,
}

/// Parse answers from CSV with a `field,value` header. Later rows override earlier ones and
/// empty values leave the field unanswered.
pub fn parse_answers<R: Read>(reader: R) -> Result<FormData, AnswerImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut answers = FormData::new();
    for (index, record) in csv_reader.deserialize::<AnswerRow>().enumerate() {
        // Header is line 1.
        let row = index + 2;
        let AnswerRow { field, value } = record?;

        let field = field
            .parse::<FormField>()
            .map_err(|_| AnswerImportError::UnknownField {
                row,
                field: field.clone(),
            })?;

        match FieldValue::parse_text(field, &value) {
            Ok(Some(parsed)) => {
                answers.insert(field, parsed);
            }
            Ok(None) => {
                answers.remove(field);
            }
            Err(source) => {
                return Err(AnswerImportError::InvalidValue {
                    row,
                    field,
                    value,
                    source,
                })
            }
        }
    }

    Ok(answers)
}

pub fn load_answers(path: impl AsRef<Path>) -> Result<FormData, AnswerImportError> {
    let file = File::open(path)?;
    parse_answers(file)
}

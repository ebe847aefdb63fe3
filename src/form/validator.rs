//! Submission validation pipeline.
//!
//! Rules run in a fixed order and the first failure ends validation. The
//! rejection's `Display` is the exact text returned to the visitor.

use thiserror::Error;

use crate::form::fields::{FormField, SubmissionRequest};
use crate::form::normalize::{normalize_input, normalize_phone};
use crate::form::rules::{
    char_len, contains_link, is_canonical_phone, is_instrument_text, is_message_text,
    is_name_text, word_count, INSTRUMENT_MAX_CHARS, MESSAGE_MAX_CHARS, NAME_MAX_CHARS,
    NAME_MAX_WORDS,
};

/// The first rule a submission broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Заполните обязательные поля: имя и телефон.")]
    MissingRequired,
    #[error("Поле \"Имя\" не должно содержать ссылки.")]
    NameHasLink,
    #[error("Поле \"Имя\" не должно содержать символ \"_\".")]
    NameHasUnderscore,
    #[error("Поле \"Имя\" должно содержать от 1 до 3 слов.")]
    NameWordCount,
    #[error("Поле \"Имя\" слишком длинное.")]
    NameTooLong,
    #[error("Поле \"Имя\" может содержать только буквы и пробелы.")]
    NameCharacters,
    #[error("Поле \"Телефон\" должно содержать 10-15 цифр. Допускаются пробелы, скобки, дефисы и \"+\" в начале.")]
    InvalidPhone,
    #[error("Поле \"Инструмент\" слишком длинное.")]
    InstrumentTooLong,
    #[error("Поле \"Инструмент\" не должно содержать ссылки.")]
    InstrumentHasLink,
    #[error("Поле \"Инструмент\" содержит недопустимые символы.")]
    InstrumentCharacters,
    #[error("Поле \"Сообщение\" слишком длинное. Максимум 400 символов.")]
    MessageTooLong,
    #[error("Поле \"Сообщение\" не должно содержать ссылки.")]
    MessageHasLink,
    #[error("Поле \"Сообщение\" содержит недопустимые символы.")]
    MessageCharacters,
    #[error("Заполните поле \"Сообщение\" или \"Инструмент\".")]
    NothingToSend,
}

impl Rejection {
    /// Stable label for logs and metrics.
    pub fn rule(self) -> &'static str {
        match self {
            Rejection::MissingRequired => "missing_required",
            Rejection::NameHasLink => "name_link",
            Rejection::NameHasUnderscore => "name_underscore",
            Rejection::NameWordCount => "name_word_count",
            Rejection::NameTooLong => "name_length",
            Rejection::NameCharacters => "name_charset",
            Rejection::InvalidPhone => "phone",
            Rejection::InstrumentTooLong => "instrument_length",
            Rejection::InstrumentHasLink => "instrument_link",
            Rejection::InstrumentCharacters => "instrument_charset",
            Rejection::MessageTooLong => "message_length",
            Rejection::MessageHasLink => "message_link",
            Rejection::MessageCharacters => "message_charset",
            Rejection::NothingToSend => "message_or_instrument",
        }
    }
}

/// Submitted fields after whitespace normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFields {
    pub name: String,
    /// Phone as typed, whitespace-normalized.
    pub phone_raw: String,
    /// Canonical phone, empty when `phone_raw` is unusable.
    pub phone: String,
    pub message: String,
    pub instrument: String,
}

impl NormalizedFields {
    pub fn from_request(request: &SubmissionRequest) -> Self {
        let phone_raw = normalize_input(request.get(FormField::Phone));
        let phone = normalize_phone(&phone_raw);
        Self {
            name: normalize_input(request.get(FormField::Name)),
            phone_raw,
            phone,
            message: normalize_input(request.get(FormField::Message)),
            instrument: normalize_input(request.get(FormField::Instrument)),
        }
    }
}

/// A submission that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub name: String,
    pub phone: String,
    pub instrument: Option<String>,
    pub message: Option<String>,
}

/// Run the full pipeline on raw submitted fields.
pub fn validate(request: &SubmissionRequest) -> Result<ValidSubmission, Rejection> {
    validate_fields(NormalizedFields::from_request(request))
}

/// Run the pipeline on already-normalized fields.
pub fn validate_fields(fields: NormalizedFields) -> Result<ValidSubmission, Rejection> {
    if fields.name.is_empty() || fields.phone_raw.is_empty() {
        return Err(Rejection::MissingRequired);
    }

    check_name(&fields.name)?;

    if fields.phone.is_empty() || !is_canonical_phone(&fields.phone) {
        return Err(Rejection::InvalidPhone);
    }

    if !fields.instrument.is_empty() {
        check_instrument(&fields.instrument)?;
    }
    if !fields.message.is_empty() {
        check_message(&fields.message)?;
    }

    if fields.message.is_empty() && fields.instrument.is_empty() {
        return Err(Rejection::NothingToSend);
    }

    Ok(ValidSubmission {
        name: fields.name,
        phone: fields.phone,
        instrument: non_empty(fields.instrument),
        message: non_empty(fields.message),
    })
}

fn check_name(name: &str) -> Result<(), Rejection> {
    if contains_link(name) {
        return Err(Rejection::NameHasLink);
    }
    if name.contains('_') {
        return Err(Rejection::NameHasUnderscore);
    }
    let words = word_count(name);
    if !(1..=NAME_MAX_WORDS).contains(&words) {
        return Err(Rejection::NameWordCount);
    }
    if char_len(name) > NAME_MAX_CHARS {
        return Err(Rejection::NameTooLong);
    }
    if !is_name_text(name) {
        return Err(Rejection::NameCharacters);
    }
    Ok(())
}

fn check_instrument(instrument: &str) -> Result<(), Rejection> {
    if char_len(instrument) > INSTRUMENT_MAX_CHARS {
        return Err(Rejection::InstrumentTooLong);
    }
    if contains_link(instrument) {
        return Err(Rejection::InstrumentHasLink);
    }
    if !is_instrument_text(instrument) {
        return Err(Rejection::InstrumentCharacters);
    }
    Ok(())
}

fn check_message(message: &str) -> Result<(), Rejection> {
    if char_len(message) > MESSAGE_MAX_CHARS {
        return Err(Rejection::MessageTooLong);
    }
    if contains_link(message) {
        return Err(Rejection::MessageHasLink);
    }
    if !is_message_text(message) {
        return Err(Rejection::MessageCharacters);
    }
    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

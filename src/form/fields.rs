//! Form field lookup.
//!
//! Browsers post the form with either Russian or English field names. Each
//! logical field has an ordered list of accepted keys; the first key present
//! in the submission wins even when its value is empty.

use std::collections::HashMap;

/// A logical field of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Phone,
    Message,
    Instrument,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::Phone,
        FormField::Message,
        FormField::Instrument,
    ];

    /// Accepted keys in priority order.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            FormField::Name => &["Имя", "name"],
            FormField::Phone => &["Телефон", "phone"],
            FormField::Message => &["Сообщение", "message"],
            FormField::Instrument => &["Инструмент", "instrument"],
        }
    }
}

/// Raw submitted fields, keyed by the name the client used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionRequest {
    values: HashMap<String, String>,
}

impl SubmissionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted value. A repeated key keeps the last value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Raw value of a logical field, or `""` when none of its keys was sent.
    pub fn get(&self, field: FormField) -> &str {
        field
            .aliases()
            .iter()
            .find_map(|key| self.values.get(*key))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for SubmissionRequest
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut request = Self::new();
        for (key, value) in iter {
            request.insert(key, value);
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_russian_alias_takes_priority() {
        let request: SubmissionRequest =
            [("name", "John"), ("Имя", "Иван")].into_iter().collect();
        assert_eq!(request.get(FormField::Name), "Иван");
    }

    #[test]
    fn test_present_but_empty_alias_still_wins() {
        let request: SubmissionRequest =
            [("Телефон", ""), ("phone", "+79123456789")].into_iter().collect();
        assert_eq!(request.get(FormField::Phone), "");
    }

    #[test]
    fn test_missing_field_is_empty() {
        let request: SubmissionRequest = [("comment", "hi")].into_iter().collect();
        assert_eq!(request.get(FormField::Message), "");
        assert_eq!(request.get(FormField::Instrument), "");
    }

    #[test]
    fn test_repeated_key_keeps_last_value() {
        let request: SubmissionRequest =
            [("message", "first"), ("message", "second")].into_iter().collect();
        assert_eq!(request.get(FormField::Message), "second");
    }
}

//! Field checks for incoming person bodies. Checks run in a fixed order and the
//! first failure is reported, so a body with several bad fields always gets the
//! same message.

use database::{
    consts::consts::{EntityId, ID_LENGTH},
    model::person::{NewPerson, PersonUpdate},
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

// ASCII digits only, `\d` would also accept other scripts
static BIRTH_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+-[0-9]+-[0-9]+$").expect("valid birth date regex"));

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("CPF inválido")]
    InvalidId,

    #[error("Nome inválido")]
    InvalidName,

    #[error("Telefone inválido")]
    InvalidPhone,

    #[error("Data de nascimento inválida")]
    InvalidBirthDate,
}

/// POST body. Fields are kept as raw JSON so a value of the wrong type fails
/// its own field check instead of the whole body
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewPersonBody {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(default)]
    pub birth_date: Option<Value>,
}

/// PUT body. An `id` field, if sent, is ignored
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct PersonUpdateBody {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(default)]
    pub birth_date: Option<Value>,
}

pub fn is_valid_id(id: &str) -> bool {
    id.chars().count() == ID_LENGTH && !id.contains('\0')
}

pub fn is_valid_birth_date(birth_date: &str) -> bool {
    BIRTH_DATE_RE.is_match(birth_date)
}

/// Only a JSON string can be an id or a birth date
fn string_field(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

/// Name and phone accept a non-empty string or a non-zero number, the number
/// is stored in its JSON text form. NUL is rejected since text columns cannot
/// hold it
fn text_field(value: Option<Value>) -> Option<String> {
    let text = match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        _ => return None,
    };

    if text.is_empty() || text.contains('\0') {
        return None;
    }

    Some(text)
}

struct Details {
    name: String,
    phone: String,
    birth_date: String,
}

fn check_details(
    name: Option<Value>,
    phone: Option<Value>,
    birth_date: Option<Value>,
) -> Result<Details, ValidationError> {
    let name = text_field(name).ok_or(ValidationError::InvalidName)?;
    let phone = text_field(phone).ok_or(ValidationError::InvalidPhone)?;
    let birth_date = string_field(birth_date)
        .filter(|date| is_valid_birth_date(date))
        .ok_or(ValidationError::InvalidBirthDate)?;

    Ok(Details {
        name,
        phone,
        birth_date,
    })
}

impl NewPersonBody {
    pub fn validate(self) -> Result<NewPerson, ValidationError> {
        let id = string_field(self.id)
            .filter(|id| is_valid_id(id))
            .ok_or(ValidationError::InvalidId)?;

        let details = check_details(self.name, self.phone, self.birth_date)?;

        Ok(NewPerson {
            id: EntityId::from(id),
            name: details.name,
            phone: details.phone,
            birth_date: details.birth_date,
        })
    }
}

impl PersonUpdateBody {
    /// Validates, then shifts the birth date with [`offset_birth_date`]
    pub fn validate(self) -> Result<PersonUpdate, ValidationError> {
        let details = check_details(self.name, self.phone, self.birth_date)?;

        Ok(PersonUpdate {
            name: details.name,
            phone: details.phone,
            birth_date: offset_birth_date(&details.birth_date)?,
        })
    }
}

/// Adds one to the day of a `YYYY-M-D` date, keeping year and month as written.
/// Clients send dates already shifted back a day by their timezone, this undoes it.
/// There is no calendar rollover: `2020-1-31` becomes `2020-1-32`.
pub fn offset_birth_date(birth_date: &str) -> Result<String, ValidationError> {
    let (year_month, day) = birth_date
        .rsplit_once('-')
        .ok_or(ValidationError::InvalidBirthDate)?;

    let day = day
        .parse::<u64>()
        .ok()
        .and_then(|day| day.checked_add(1))
        .ok_or(ValidationError::InvalidBirthDate)?;

    Ok(format!("{}-{}", year_month, day))
}

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::email::EmailAddress;
use super::name::FullName;

/// Field name -> user-facing message. One entry per invalid field.
pub type FieldErrors = HashMap<String, String>;

/// Industry options offered on the signup form. Closed set; anything else is
/// a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Industry {
    Technology,
    Healthcare,
    Finance,
    Education,
    Manufacturing,
    Retail,
    Consulting,
    Media,
    #[serde(rename = "Non-profit")]
    NonProfit,
    Government,
    Other,
}

impl Industry {
    pub const ALL: [Industry; 11] = [
        Industry::Technology,
        Industry::Healthcare,
        Industry::Finance,
        Industry::Education,
        Industry::Manufacturing,
        Industry::Retail,
        Industry::Consulting,
        Industry::Media,
        Industry::NonProfit,
        Industry::Government,
        Industry::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Technology => "Technology",
            Industry::Healthcare => "Healthcare",
            Industry::Finance => "Finance",
            Industry::Education => "Education",
            Industry::Manufacturing => "Manufacturing",
            Industry::Retail => "Retail",
            Industry::Consulting => "Consulting",
            Industry::Media => "Media",
            Industry::NonProfit => "Non-profit",
            Industry::Government => "Government",
            Industry::Other => "Other",
        }
    }

    pub fn parse(raw: &str) -> Result<Industry, String> {
        Industry::ALL
            .into_iter()
            .find(|i| i.as_str() == raw)
            .ok_or_else(|| "Select an industry from the list".to_string())
    }
}

/// Company size brackets offered on the signup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanySize {
    #[serde(rename = "1-10")]
    Size1To10,
    #[serde(rename = "11-50")]
    Size11To50,
    #[serde(rename = "51-200")]
    Size51To200,
    #[serde(rename = "201-500")]
    Size201To500,
    #[serde(rename = "501-1000")]
    Size501To1000,
    #[serde(rename = "1000+")]
    Size1000Plus,
}

impl CompanySize {
    pub const ALL: [CompanySize; 6] = [
        CompanySize::Size1To10,
        CompanySize::Size11To50,
        CompanySize::Size51To200,
        CompanySize::Size201To500,
        CompanySize::Size501To1000,
        CompanySize::Size1000Plus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompanySize::Size1To10 => "1-10",
            CompanySize::Size11To50 => "11-50",
            CompanySize::Size51To200 => "51-200",
            CompanySize::Size201To500 => "201-500",
            CompanySize::Size501To1000 => "501-1000",
            CompanySize::Size1000Plus => "1000+",
        }
    }

    pub fn parse(raw: &str) -> Result<CompanySize, String> {
        CompanySize::ALL
            .into_iter()
            .find(|s| s.as_str() == raw)
            .ok_or_else(|| "Select a company size from the list".to_string())
    }
}

/// Which waitlist the entry belongs to. Email uniqueness is scoped per
/// audience, not global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Employer,
    Candidate,
}

impl Audience {
    pub const ALL: [Audience; 2] = [Audience::Employer, Audience::Candidate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Employer => "employer",
            Audience::Candidate => "candidate",
        }
    }

    pub fn parse(raw: &str) -> Result<Audience, String> {
        Audience::ALL
            .into_iter()
            .find(|a| a.as_str() == raw)
            .ok_or_else(|| "Audience must be \"employer\" or \"candidate\"".to_string())
    }
}

impl Default for Audience {
    fn default() -> Self {
        Audience::Employer
    }
}

/// Optional early-career hires per year, bounded 0..=10000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HiresPerYear(i32);

impl HiresPerYear {
    pub const MAX: i64 = 10_000;

    pub fn from_i64(value: i64) -> Result<HiresPerYear, String> {
        if (0..=Self::MAX).contains(&value) {
            Ok(HiresPerYear(value as i32))
        } else {
            Err("Must be a whole number between 0 and 10000".to_string())
        }
    }

    /// Parse from raw text input. Non-numeric input is an error, never a
    /// silent coercion.
    pub fn parse(raw: &str) -> Result<HiresPerYear, String> {
        let value: i64 = raw
            .trim()
            .parse()
            .map_err(|_| "Must be a whole number between 0 and 10000".to_string())?;
        Self::from_i64(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// Raw submission payload as received from a form or the HTTP endpoint.
/// Every field is optional here so whole-form validation can report all
/// missing/invalid fields at once instead of failing at deserialization.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WaitlistRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub early_career_hires_per_year: Option<i64>,
    pub audience: Option<String>,
}

/// A fully validated, normalized entry ready for insertion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWaitlistEntry {
    pub name: FullName,
    pub email: EmailAddress,
    pub industry: Industry,
    pub company_size: CompanySize,
    pub early_career_hires_per_year: Option<HiresPerYear>,
    pub audience: Audience,
}

/// Form fields that accept free-text input and get debounced validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Industry,
    CompanySize,
    EarlyCareerHiresPerYear,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Industry => "industry",
            Field::CompanySize => "company_size",
            Field::EarlyCareerHiresPerYear => "early_career_hires_per_year",
        }
    }
}

/// Raw, pre-validation field values as typed into a form. The audience is
/// fixed per form instance rather than typed by the user.
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    pub name: String,
    pub email: String,
    pub industry: String,
    pub company_size: String,
    pub early_career_hires_per_year: String,
    pub audience: Audience,
}

/// Validate a single field's raw value. `None` means no error. The optional
/// hires field is only checked when non-empty.
pub fn validate_field(field: Field, raw: &str) -> Option<String> {
    match field {
        Field::Name => FullName::parse(raw).err(),
        Field::Email => EmailAddress::parse(raw).err(),
        Field::Industry => Industry::parse(raw).err(),
        Field::CompanySize => CompanySize::parse(raw).err(),
        Field::EarlyCareerHiresPerYear => {
            if raw.trim().is_empty() {
                None
            } else {
                HiresPerYear::parse(raw).err()
            }
        }
    }
}

/// Whole-form validation over raw text values. Same aggregation contract as
/// [`validate_request`], plus text parsing of the optional numeric field.
pub fn validate_form(values: &FormValues) -> Result<NewWaitlistEntry, FieldErrors> {
    let mut text_errors = FieldErrors::new();

    let hires = match values.early_career_hires_per_year.trim() {
        "" => None,
        raw => match HiresPerYear::parse(raw) {
            Ok(hires) => Some(i64::from(hires.value())),
            Err(msg) => {
                text_errors.insert(Field::EarlyCareerHiresPerYear.as_str().into(), msg);
                None
            }
        },
    };

    let request = WaitlistRequest {
        name: non_empty(&values.name),
        email: non_empty(&values.email),
        industry: non_empty(&values.industry),
        company_size: non_empty(&values.company_size),
        early_career_hires_per_year: hires,
        audience: Some(values.audience.as_str().to_string()),
    };

    match validate_request(&request) {
        Ok(entry) if text_errors.is_empty() => Ok(entry),
        Ok(_) => Err(text_errors),
        Err(mut errors) => {
            errors.extend(text_errors);
            Err(errors)
        }
    }
}

fn non_empty(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Run every field rule against the request and aggregate the outcome.
/// Does not short-circuit: the error map carries one message per invalid
/// field. Pure function, no side effects.
pub fn validate_request(request: &WaitlistRequest) -> Result<NewWaitlistEntry, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = match request.name.as_deref() {
        Some(raw) => FullName::parse(raw)
            .map_err(|msg| errors.insert("name".into(), msg))
            .ok(),
        None => {
            errors.insert("name".into(), "Name is required".into());
            None
        }
    };

    let email = match request.email.as_deref() {
        Some(raw) => EmailAddress::parse(raw)
            .map_err(|msg| errors.insert("email".into(), msg))
            .ok(),
        None => {
            errors.insert("email".into(), "Email is required".into());
            None
        }
    };

    let industry = match request.industry.as_deref() {
        Some(raw) => Industry::parse(raw)
            .map_err(|msg| errors.insert("industry".into(), msg))
            .ok(),
        None => {
            errors.insert("industry".into(), "Industry is required".into());
            None
        }
    };

    let company_size = match request.company_size.as_deref() {
        Some(raw) => CompanySize::parse(raw)
            .map_err(|msg| errors.insert("company_size".into(), msg))
            .ok(),
        None => {
            errors.insert("company_size".into(), "Company size is required".into());
            None
        }
    };

    let hires = match request.early_career_hires_per_year {
        Some(value) => HiresPerYear::from_i64(value)
            .map_err(|msg| errors.insert("early_career_hires_per_year".into(), msg))
            .ok()
            .map(Some),
        None => Some(None),
    };

    let audience = match request.audience.as_deref() {
        Some(raw) => Audience::parse(raw)
            .map_err(|msg| errors.insert("audience".into(), msg))
            .ok(),
        None => Some(Audience::default()),
    };

    match (name, email, industry, company_size, hires, audience) {
        (Some(name), Some(email), Some(industry), Some(company_size), Some(hires), Some(audience))
            if errors.is_empty() =>
        {
            Ok(NewWaitlistEntry {
                name,
                email,
                industry,
                company_size,
                early_career_hires_per_year: hires,
                audience,
            })
        }
        _ => Err(errors),
    }
}

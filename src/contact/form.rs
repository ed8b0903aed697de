use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// Dialing codes offered next to the phone field
pub const COUNTRY_CODES: [(&str, &str); 9] = [
    ("+234", "Nigeria"),
    ("+1", "USA"),
    ("+44", "UK"),
    ("+33", "France"),
    ("+49", "Germany"),
    ("+971", "UAE"),
    ("+27", "South Africa"),
    ("+254", "Kenya"),
    ("+233", "Ghana"),
];

/// Property types a visitor can ask about
pub const INQUIRY_PROPERTY_TYPES: [(&str, &str); 7] = [
    ("apartment", "Apartment"),
    ("penthouse", "Penthouse"),
    ("villa", "Villa"),
    ("mansion", "Mansion"),
    ("duplex", "Duplex"),
    ("estate", "Estate"),
    ("commercial", "Commercial"),
];

/// Budget brackets offered on the form
pub const BUDGET_RANGES: [(&str, &str); 5] = [
    ("under-200m", "Under ₦200M"),
    ("200m-500m", "₦200M - ₦500M"),
    ("500m-1b", "₦500M - ₦1B"),
    ("1b-2b", "₦1B - ₦2B"),
    ("over-2b", "Over ₦2B"),
];

/// Fields posted by the contact page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country_code: String,
    pub subject: String,
    pub message: String,
    pub property_type: String,
    pub budget: String,
}

impl ContactForm {
    pub fn with_country_code(country_code: &str) -> Self {
        Self {
            country_code: country_code.to_string(),
            ..Default::default()
        }
    }

    /// Relay body for this submission; the phone number carries its dialing code
    pub fn into_inquiry(self) -> ContactInquiry {
        let phone = self.phone.trim();
        let phone = if phone.is_empty() {
            String::new()
        } else {
            format!("{} {}", self.country_code.trim(), phone)
        };

        ContactInquiry {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone,
            country_code: self.country_code,
            subject: self.subject.trim().to_string(),
            message: self.message,
            property_type: non_blank(self.property_type),
            budget: non_blank(self.budget),
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// JSON body accepted by the `send-contact-email` function.
///
/// Exists only for the duration of one request and is never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactInquiry {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country_code: String,
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
}

impl ContactInquiry {
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();

        if !missing.is_empty() {
            return Err(Error::BadRequest {
                message: format!("Missing required fields: {}", missing.join(", ")),
            });
        }

        let email = self.email.trim();
        let valid_email = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.') && !email.contains(' '));
        if !valid_email {
            return Err(Error::BadRequest {
                message: "Please provide a valid email address".to_string(),
            });
        }

        Ok(())
    }

    /// Whether the business email gets a "Property Requirements" block
    pub fn has_requirements(&self) -> bool {
        self.property_type.is_some() || self.budget.is_some()
    }
}

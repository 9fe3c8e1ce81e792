//! Lead capture and account forms with their client-side validation.
//!
//! A form that fails `validate` never reaches the network.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::currency::parse_price_string;
use crate::errors::ValidationError;
use crate::models::{NewAppointment, NewJobApplication};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\- ]{7,20}$").expect("valid phone regex"));

pub const MIN_PROPOSAL_DETAILS: usize = 20;
pub const MIN_PASSWORD_LEN: usize = 8;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

fn required(field: &str, value: &str, label: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, format!("{} is required", label)));
    }
    Ok(())
}

fn email(value: &str) -> Result<(), ValidationError> {
    required("email", value, "Email")?;
    if !is_valid_email(value) {
        return Err(ValidationError::new(
            "email",
            "Please enter a valid email address",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
}

impl ContactMessage {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("name", &self.name, "Name")?;
        email(&self.email)?;
        if let Some(phone) = self.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            if !PHONE_RE.is_match(phone) {
                return Err(ValidationError::new(
                    "phone",
                    "Please enter a valid phone number",
                ));
            }
        }
        required("message", &self.message, "Message")
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProposalRequest {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub service: String,
    pub budget: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    pub details: String,
}

impl ProposalRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("name", &self.name, "Name")?;
        email(&self.email)?;
        required("service", &self.service, "Service")?;
        required("budget", &self.budget, "Budget")?;
        if parse_price_string(&self.budget).is_none() {
            return Err(ValidationError::new(
                "budget",
                "Budget must contain an amount, e.g. R25,000",
            ));
        }
        if self.details.trim().chars().count() < MIN_PROPOSAL_DETAILS {
            return Err(ValidationError::new(
                "details",
                format!(
                    "Please describe your project in at least {} characters",
                    MIN_PROPOSAL_DETAILS
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TestimonialSubmission {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub rating: u8,
    pub message: String,
}

impl TestimonialSubmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("name", &self.name, "Name")?;
        if !(1..=5).contains(&self.rating) {
            return Err(ValidationError::new(
                "rating",
                "Rating must be between 1 and 5",
            ));
        }
        required("message", &self.message, "Message")
    }
}

impl NewJobApplication {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("full_name", &self.full_name, "Full name")?;
        email(&self.email)?;
        if self.job <= 0 {
            return Err(ValidationError::new("job", "Please choose a position"));
        }
        Ok(())
    }
}

impl NewAppointment {
    /// `today` is passed in so the check is deterministic.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        required("name", &self.name, "Name")?;
        email(&self.email)?;
        if self.date < today {
            return Err(ValidationError::new(
                "date",
                "Please choose a date that is not in the past",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

impl PasswordResetRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        email(&self.email)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetConfirm {
    pub uid: String,
    pub token: String,
    pub new_password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl PasswordResetConfirm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required("uid", &self.uid, "Reset link id")?;
        required("token", &self.token, "Reset token")?;
        if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::new(
                "new_password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }
        if self.new_password != self.confirm_password {
            return Err(ValidationError::new(
                "confirm_password",
                "Passwords do not match",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> ContactMessage {
        ContactMessage {
            name: "Thandi".into(),
            email: "thandi@example.co.za".into(),
            message: "We need a new website".into(),
            ..ContactMessage::default()
        }
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email(" a.b+c@d.example.com "));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_contact_requires_name_email_message() {
        assert!(contact().validate().is_ok());

        let err = ContactMessage {
            name: " ".into(),
            ..contact()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "name");

        let err = ContactMessage {
            email: "nope".into(),
            ..contact()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "email");

        let err = ContactMessage {
            message: String::new(),
            ..contact()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.field, "message");
    }

    #[test]
    fn test_contact_phone_is_optional_but_checked() {
        let ok = ContactMessage {
            phone: Some("+27 82 555-0101".into()),
            ..contact()
        };
        assert!(ok.validate().is_ok());

        let blank = ContactMessage {
            phone: Some("  ".into()),
            ..contact()
        };
        assert!(blank.validate().is_ok());

        let bad = ContactMessage {
            phone: Some("call me".into()),
            ..contact()
        };
        assert_eq!(bad.validate().unwrap_err().field, "phone");
    }

    #[test]
    fn test_proposal_budget_and_details() {
        let mut proposal = ProposalRequest {
            name: "Sipho".into(),
            email: "sipho@example.com".into(),
            service: "web-development".into(),
            budget: "R25 000".into(),
            details: "An online store with about forty products".into(),
            ..ProposalRequest::default()
        };
        assert!(proposal.validate().is_ok());

        proposal.budget = "flexible".into();
        assert_eq!(proposal.validate().unwrap_err().field, "budget");

        proposal.budget = "R25,000".into();
        proposal.details = "Too short".into();
        assert_eq!(proposal.validate().unwrap_err().field, "details");
    }

    #[test]
    fn test_testimonial_rating_range() {
        let mut t = TestimonialSubmission {
            name: "Lerato".into(),
            rating: 5,
            message: "Great work".into(),
            ..TestimonialSubmission::default()
        };
        assert!(t.validate().is_ok());
        t.rating = 0;
        assert_eq!(t.validate().unwrap_err().field, "rating");
        t.rating = 6;
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_appointment_date_not_in_past() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let mut appt = NewAppointment {
            name: "Naledi".into(),
            email: "naledi@example.com".into(),
            date: today,
            time: None,
            notes: String::new(),
        };
        assert!(appt.validate(today).is_ok());
        appt.date = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        assert_eq!(appt.validate(today).unwrap_err().field, "date");
    }

    #[test]
    fn test_job_application_needs_job() {
        let app = NewJobApplication {
            job: 0,
            full_name: "Kabelo".into(),
            email: "kabelo@example.com".into(),
            cover_letter: String::new(),
            resume_url: None,
        };
        assert_eq!(app.validate().unwrap_err().field, "job");
    }

    #[test]
    fn test_password_reset_confirm() {
        let mut confirm = PasswordResetConfirm {
            uid: "MQ".into(),
            token: "abc-123".into(),
            new_password: "correct horse".into(),
            confirm_password: "correct horse".into(),
        };
        assert!(confirm.validate().is_ok());

        let body = serde_json::to_value(&confirm).unwrap();
        assert!(body.get("confirm_password").is_none());

        confirm.confirm_password = "correct h0rse".into();
        assert_eq!(confirm.validate().unwrap_err().field, "confirm_password");

        confirm.new_password = "short".into();
        confirm.confirm_password = "short".into();
        assert_eq!(confirm.validate().unwrap_err().field, "new_password");
    }
}

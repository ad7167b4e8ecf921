use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::domain::ports::Latency;
use crate::utils::error::{BookingError, Result};
use crate::utils::validation::{
    validate_email, validate_non_empty_string, validate_required_field, Validate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContactSubject {
    Consultation,
    PersonalTraining,
    GroupTraining,
    Nutrition,
    Hormone,
    Enhancement,
    Ambassador,
    Other,
}

impl ContactSubject {
    pub const ALL: [ContactSubject; 8] = [
        Self::Consultation,
        Self::PersonalTraining,
        Self::GroupTraining,
        Self::Nutrition,
        Self::Hormone,
        Self::Enhancement,
        Self::Ambassador,
        Self::Other,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Consultation => "consultation",
            Self::PersonalTraining => "personal-training",
            Self::GroupTraining => "group-training",
            Self::Nutrition => "nutrition",
            Self::Hormone => "hormone",
            Self::Enhancement => "enhancement",
            Self::Ambassador => "ambassador",
            Self::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Consultation => "Free Consultation",
            Self::PersonalTraining => "Personal Training",
            Self::GroupTraining => "Group Training",
            Self::Nutrition => "Nutrition Coaching",
            Self::Hormone => "Hormone Optimization",
            Self::Enhancement => "Enhancement Coaching",
            Self::Ambassador => "Brand Ambassador",
            Self::Other => "Other",
        }
    }
}

impl FromStr for ContactSubject {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|subject| subject.code() == s.trim())
            .ok_or_else(|| BookingError::validation("subject", format!("'{}' is not a topic", s)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: Option<ContactSubject>,
    pub message: String,
}

impl Validate for ContactForm {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_email("email", &self.email)?;
        validate_required_field("subject", &self.subject)?;
        validate_non_empty_string("message", &self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactReceipt {
    pub name: String,
    pub email: String,
    pub subject: ContactSubject,
}

/// The contact page form: validate, simulate sending, then clear.
pub struct ContactDesk {
    latency: Arc<dyn Latency>,
    delay: Duration,
}

impl ContactDesk {
    pub fn new(latency: Arc<dyn Latency>, delay: Duration) -> Self {
        Self { latency, delay }
    }

    pub fn from_config(config: &AppConfig, latency: Arc<dyn Latency>) -> Self {
        Self::new(latency, config.delays.contact())
    }

    /// On success the form is reset to empty.
    pub async fn submit(&self, form: &mut ContactForm) -> Result<ContactReceipt> {
        form.validate()?;
        let subject = *validate_required_field("subject", &form.subject)?;

        self.latency.wait(self.delay).await;
        tracing::info!(subject = subject.code(), "contact message sent");

        let sent = std::mem::take(form);
        Ok(ContactReceipt {
            name: sent.name,
            email: sent.email,
            subject,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::NoLatency;

    fn form() -> ContactForm {
        ContactForm {
            name: "Mike Wilson".to_string(),
            email: "mike@example.com".to_string(),
            phone: String::new(),
            subject: Some(ContactSubject::GroupTraining),
            message: "Do you run evening classes?".to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_resets_form() {
        let desk = ContactDesk::new(Arc::new(NoLatency), Duration::ZERO);
        let mut form = form();
        let receipt = desk.submit(&mut form).await.unwrap();
        assert_eq!(receipt.subject, ContactSubject::GroupTraining);
        assert_eq!(form, ContactForm::default());
    }

    #[tokio::test]
    async fn test_missing_fields_keep_form() {
        let desk = ContactDesk::new(Arc::new(NoLatency), Duration::ZERO);
        let mut form = ContactForm {
            subject: None,
            ..form()
        };
        assert!(desk.submit(&mut form).await.is_err());
        assert_eq!(form.name, "Mike Wilson");
    }

    #[test]
    fn test_delay_comes_from_config() {
        let mut config = AppConfig::instant();
        config.delays.contact_ms = 1500;
        let desk = ContactDesk::from_config(&config, Arc::new(NoLatency));
        assert_eq!(desk.delay, Duration::from_millis(1500));
    }

    #[test]
    fn test_phone_is_optional() {
        assert!(form().validate().is_ok());
        let no_message = ContactForm {
            message: " ".to_string(),
            ..form()
        };
        assert!(no_message.validate().is_err());
    }

    #[test]
    fn test_subject_codes() {
        assert_eq!(
            "personal-training".parse::<ContactSubject>().unwrap(),
            ContactSubject::PersonalTraining
        );
        assert!("yoga".parse::<ContactSubject>().is_err());
    }
}

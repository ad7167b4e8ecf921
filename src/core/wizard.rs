use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::domain::model::{
    BookingDraft, ContactInfo, Experience, PaymentResult, ServiceId, TimeSlot,
};
use crate::utils::error::{BookingError, Result};
use crate::utils::validation::is_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Step {
    SelectService,
    SelectDateTime,
    ContactInfo,
    Payment,
    Confirmation,
}

impl Step {
    pub fn number(self) -> u8 {
        match self {
            Self::SelectService => 1,
            Self::SelectDateTime => 2,
            Self::ContactInfo => 3,
            Self::Payment => 4,
            Self::Confirmation => 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "snake_case")]
pub enum PaymentPhase {
    #[default]
    Idle,
    Processing,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    ChooseService(ServiceId),
    ChooseDate { date: NaiveDate, today: NaiveDate },
    ChooseTime(TimeSlot),
    UpdateContact(ContactInfo),
    UpdateGoals(String),
    UpdateExperience(Experience),
    SubmitStarted,
    Next,
    Back,
    PaymentStarted,
    PaymentFailed(String),
    PaymentSucceeded(PaymentResult),
    Close,
}

impl WizardEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::ChooseService(_) => "choose service",
            Self::ChooseDate { .. } => "choose date",
            Self::ChooseTime(_) => "choose time",
            Self::UpdateContact(_) => "update contact",
            Self::UpdateGoals(_) => "update goals",
            Self::UpdateExperience(_) => "update experience",
            Self::SubmitStarted => "submit details",
            Self::Next => "next",
            Self::Back => "back",
            Self::PaymentStarted => "start payment",
            Self::PaymentFailed(_) => "fail payment",
            Self::PaymentSucceeded(_) => "complete payment",
            Self::Close => "close",
        }
    }
}

/// Dates before today and Sundays cannot be booked.
pub fn is_bookable_date(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today && date.weekday() != Weekday::Sun
}

/// One snapshot of the booking modal. Transitions never touch `self`;
/// [`WizardState::apply`] always returns a fresh state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardState {
    step: Step,
    draft: BookingDraft,
    payment: PaymentPhase,
    receipt: Option<PaymentResult>,
    submitting: bool,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self {
            step: Step::SelectService,
            draft: BookingDraft::default(),
            payment: PaymentPhase::Idle,
            receipt: None,
            submitting: false,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn payment(&self) -> &PaymentPhase {
        &self.payment
    }

    pub fn payment_error(&self) -> Option<&str> {
        match &self.payment {
            PaymentPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// True while "Confirm Booking" is waiting on the submit delay.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn receipt(&self) -> Option<&PaymentResult> {
        self.receipt.as_ref()
    }

    pub fn title(&self) -> &'static str {
        match self.step {
            Step::Payment | Step::Confirmation => "Booking Confirmed!",
            _ => "Book Your Session",
        }
    }

    /// Progress indicator for steps 1..=4: `(number, reached)`. Hidden on confirmation.
    pub fn progress(&self) -> Option<Vec<(u8, bool)>> {
        if self.step == Step::Confirmation {
            return None;
        }
        let current = self.step.number();
        Some((1..=4).map(|n| (n, current >= n)).collect())
    }

    /// Required fields still empty on the current step.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let draft = &self.draft;
        let mut missing = Vec::new();
        match self.step {
            Step::SelectService => {
                if draft.service.is_none() {
                    missing.push("service");
                }
            }
            Step::SelectDateTime => {
                if draft.date.is_none() {
                    missing.push("date");
                }
                if draft.time.is_none() {
                    missing.push("time");
                }
            }
            Step::ContactInfo => {
                let contact = &draft.contact;
                for (name, value) in [
                    ("first name", &contact.first_name),
                    ("last name", &contact.last_name),
                    ("email", &contact.email),
                    ("phone", &contact.phone),
                ] {
                    if is_blank(value) {
                        missing.push(name);
                    }
                }
            }
            Step::Payment | Step::Confirmation => {}
        }
        missing
    }

    /// Whether the "Next" control is enabled.
    pub fn can_advance(&self) -> bool {
        matches!(
            self.step,
            Step::SelectService | Step::SelectDateTime | Step::ContactInfo
        ) && self.missing_fields().is_empty()
    }

    pub fn apply(&self, event: WizardEvent) -> Result<WizardState> {
        let action = event.name();
        let next = match (self.step, event) {
            (_, WizardEvent::Close) => Self::new(),

            (Step::SelectService, WizardEvent::ChooseService(id)) => {
                self.with_draft(self.draft.with_service(id))
            }

            (Step::SelectDateTime, WizardEvent::ChooseDate { date, today }) => {
                if !is_bookable_date(date, today) {
                    return Err(BookingError::validation(
                        "date",
                        format!("{} is not available for booking", date),
                    ));
                }
                self.with_draft(self.draft.with_date(date))
            }
            (Step::SelectDateTime, WizardEvent::ChooseTime(slot)) => {
                self.with_draft(self.draft.with_time(slot))
            }

            (Step::ContactInfo, WizardEvent::UpdateContact(contact)) => {
                self.with_draft(self.draft.with_contact(contact))
            }
            (Step::ContactInfo, WizardEvent::UpdateGoals(goals)) => {
                self.with_draft(self.draft.with_goals(goals))
            }
            (Step::ContactInfo, WizardEvent::UpdateExperience(experience)) => {
                self.with_draft(self.draft.with_experience(experience))
            }

            (Step::ContactInfo, WizardEvent::SubmitStarted) => WizardState {
                submitting: true,
                ..self.clone()
            },

            (step, WizardEvent::Next) => self.advance(step)?,

            (Step::SelectDateTime, WizardEvent::Back) => self.at(Step::SelectService),
            (Step::ContactInfo, WizardEvent::Back) => self.at(Step::SelectDateTime),
            (Step::Payment, WizardEvent::Back) => WizardState {
                payment: PaymentPhase::Idle,
                ..self.at(Step::ContactInfo)
            },

            (Step::Payment, WizardEvent::PaymentStarted) => WizardState {
                payment: PaymentPhase::Processing,
                ..self.clone()
            },
            (Step::Payment, WizardEvent::PaymentFailed(message)) => WizardState {
                payment: PaymentPhase::Failed(message),
                ..self.clone()
            },
            (Step::Payment, WizardEvent::PaymentSucceeded(result)) => WizardState {
                step: Step::Confirmation,
                payment: PaymentPhase::Idle,
                receipt: Some(result),
                ..self.clone()
            },

            (step, _) => {
                return Err(BookingError::InvalidTransition {
                    step: step.number(),
                    action,
                })
            }
        };

        if next.step != self.step {
            tracing::debug!(
                from = self.step.number(),
                to = next.step.number(),
                "booking wizard step changed"
            );
        }
        Ok(next)
    }

    fn advance(&self, step: Step) -> Result<WizardState> {
        let target = match step {
            Step::SelectService => Step::SelectDateTime,
            Step::SelectDateTime => Step::ContactInfo,
            Step::ContactInfo => {
                let free = self
                    .draft
                    .selected_service()
                    .is_some_and(|service| service.is_free());
                if free {
                    Step::Confirmation
                } else {
                    Step::Payment
                }
            }
            Step::Payment | Step::Confirmation => {
                return Err(BookingError::InvalidTransition {
                    step: step.number(),
                    action: "next",
                })
            }
        };

        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(BookingError::IncompleteStep {
                step: step.number(),
                missing,
            });
        }
        Ok(self.at(target))
    }

    fn with_draft(&self, draft: BookingDraft) -> WizardState {
        WizardState {
            draft,
            ..self.clone()
        }
    }

    fn at(&self, step: Step) -> WizardState {
        WizardState {
            step,
            submitting: false,
            ..self.clone()
        }
    }
}

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::adapters::{CardDetails, MobileMoneyRequest, MockCardGateway, MockMpesaGateway};
use crate::config::AppConfig;
use crate::core::receipt::Receipt;
use crate::core::wizard::{Step, WizardEvent, WizardState};
use crate::domain::model::{
    ContactInfo, Experience, PaymentResult, Service, ServiceId, TimeSlot,
};
use crate::domain::ports::{Latency, OutcomeStrategy, PaymentGateway};
use crate::utils::error::{BookingError, Result};

pub type CardGateway = Arc<dyn PaymentGateway<Request = CardDetails>>;
pub type MobileMoneyGateway = Arc<dyn PaymentGateway<Request = MobileMoneyRequest>>;

/// What the confirmation screen shows once a booking is done.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Confirmation {
    pub service: String,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub client: String,
    pub email: String,
    pub phone: String,
    pub payment: Option<PaymentResult>,
    pub next_steps: Vec<String>,
}

/// Drives the booking wizard and talks to the payment gateways.
pub struct BookingSession {
    state: WizardState,
    card: CardGateway,
    mobile_money: MobileMoneyGateway,
    latency: Arc<dyn Latency>,
    submit_delay: Duration,
    updates: watch::Sender<WizardState>,
}

impl BookingSession {
    pub fn new(
        config: &AppConfig,
        outcome: Arc<dyn OutcomeStrategy>,
        latency: Arc<dyn Latency>,
    ) -> Self {
        let card = MockCardGateway::new(config, outcome.clone(), latency.clone());
        let mobile_money = MockMpesaGateway::new(config, outcome, latency.clone());
        Self::with_gateways(
            Arc::new(card),
            Arc::new(mobile_money),
            latency,
            config.delays.submit(),
        )
    }

    pub fn with_gateways(
        card: CardGateway,
        mobile_money: MobileMoneyGateway,
        latency: Arc<dyn Latency>,
        submit_delay: Duration,
    ) -> Self {
        let (updates, _) = watch::channel(WizardState::new());
        Self {
            state: WizardState::new(),
            card,
            mobile_money,
            latency,
            submit_delay,
            updates,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// Every state change, including the ones made while a submit or payment is in flight.
    pub fn subscribe(&self) -> watch::Receiver<WizardState> {
        self.updates.subscribe()
    }

    pub fn dispatch(&mut self, event: WizardEvent) -> Result<&WizardState> {
        self.state = self.state.apply(event)?;
        self.updates.send_replace(self.state.clone());
        Ok(&self.state)
    }

    pub fn select_service(&mut self, service: ServiceId) -> Result<&WizardState> {
        self.dispatch(WizardEvent::ChooseService(service))
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Result<&WizardState> {
        let today = chrono::Local::now().date_naive();
        self.select_date_on(date, today)
    }

    pub fn select_date_on(&mut self, date: NaiveDate, today: NaiveDate) -> Result<&WizardState> {
        self.dispatch(WizardEvent::ChooseDate { date, today })
    }

    pub fn select_time(&mut self, slot: TimeSlot) -> Result<&WizardState> {
        self.dispatch(WizardEvent::ChooseTime(slot))
    }

    pub fn update_contact(&mut self, contact: ContactInfo) -> Result<&WizardState> {
        self.dispatch(WizardEvent::UpdateContact(contact))
    }

    pub fn update_goals(&mut self, goals: impl Into<String>) -> Result<&WizardState> {
        self.dispatch(WizardEvent::UpdateGoals(goals.into()))
    }

    pub fn update_experience(&mut self, experience: Experience) -> Result<&WizardState> {
        self.dispatch(WizardEvent::UpdateExperience(experience))
    }

    pub fn next(&mut self) -> Result<&WizardState> {
        self.dispatch(WizardEvent::Next)
    }

    pub fn back(&mut self) -> Result<&WizardState> {
        self.dispatch(WizardEvent::Back)
    }

    /// Closing the modal throws the whole draft away.
    pub fn close(&mut self) {
        self.state = WizardState::new();
        self.updates.send_replace(self.state.clone());
    }

    /// "Confirm Booking" on the details step. Free services are booked after
    /// the submit delay; paid ones move on to payment.
    pub async fn submit_details(&mut self) -> Result<&WizardState> {
        if self.state.step() != Step::ContactInfo {
            return Err(BookingError::InvalidTransition {
                step: self.state.step().number(),
                action: "submit details",
            });
        }
        let free = self.selected_service()?.is_free();
        if free && self.state.can_advance() {
            self.dispatch(WizardEvent::SubmitStarted)?;
            self.latency.wait(self.submit_delay).await;
        }
        self.next()?;
        if self.state.step() == Step::Confirmation {
            self.log_confirmed();
        }
        Ok(&self.state)
    }

    pub async fn pay_with_card(&mut self, card: &CardDetails) -> Result<PaymentResult> {
        let service = self.begin_payment()?;
        tracing::debug!(method = self.card.method().label(), "payment submitted");
        let outcome = self.card.charge(service, card).await;
        self.finish_payment(outcome)
    }

    pub async fn pay_with_mobile_money(&mut self, phone: &str) -> Result<PaymentResult> {
        let service = self.begin_payment()?;
        let request = MobileMoneyRequest::new(phone);
        tracing::debug!(method = self.mobile_money.method().label(), "payment submitted");
        let outcome = self.mobile_money.charge(service, &request).await;
        self.finish_payment(outcome)
    }

    pub fn confirmation(&self) -> Option<Confirmation> {
        if self.state.step() != Step::Confirmation {
            return None;
        }
        let draft = self.state.draft();
        let service = draft.selected_service()?;
        let contact = &draft.contact;
        let next_steps = match self.state.receipt() {
            Some(_) => vec![
                format!("Confirmation email sent to {}", contact.email),
                "Calendar invite will be sent within 24 hours".to_string(),
                "Our team will call you to prepare for your session".to_string(),
                "Arrive 15 minutes early for your appointment".to_string(),
            ],
            None => vec![format!(
                "We'll call you at {} to confirm your appointment.",
                contact.phone
            )],
        };
        Some(Confirmation {
            service: service.name.to_string(),
            date: draft.date,
            time: draft.time.map(|t| t.to_string()),
            client: contact.full_name(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            payment: self.state.receipt().cloned(),
            next_steps,
        })
    }

    pub fn receipt(&self) -> Option<Result<Receipt>> {
        self.state
            .receipt()
            .map(|payment| Receipt::new(self.state.draft(), payment))
    }

    fn selected_service(&self) -> Result<&'static Service> {
        self.state
            .draft()
            .selected_service()
            .ok_or_else(|| BookingError::IncompleteStep {
                step: self.state.step().number(),
                missing: vec!["service"],
            })
    }

    fn begin_payment(&mut self) -> Result<&'static Service> {
        let service = self.selected_service()?;
        self.dispatch(WizardEvent::PaymentStarted)?;
        Ok(service)
    }

    fn finish_payment(&mut self, outcome: Result<PaymentResult>) -> Result<PaymentResult> {
        match outcome {
            Ok(payment) => {
                self.dispatch(WizardEvent::PaymentSucceeded(payment.clone()))?;
                self.log_confirmed();
                Ok(payment)
            }
            Err(err) => {
                self.dispatch(WizardEvent::PaymentFailed(err.user_friendly_message()))?;
                Err(err)
            }
        }
    }

    fn log_confirmed(&self) {
        let draft = self.state.draft();
        tracing::info!(
            service = ?draft.service,
            date = ?draft.date,
            payment_id = ?self.state.receipt().map(|p| p.payment_id.as_str()),
            "booking confirmed"
        );
    }
}

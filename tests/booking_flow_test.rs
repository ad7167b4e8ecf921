use chrono::NaiveDate;
use iron_nation::adapters::card::CARD_DECLINED;
use iron_nation::adapters::mpesa::{INVALID_PHONE, MPESA_FAILED};
use iron_nation::core::dashboard::{BookingLedger, BookingStatus, PaymentState};
use iron_nation::core::wizard::PaymentPhase;
use iron_nation::domain::model::{ContactInfo, Experience, PaymentDetails, ServiceId, TimeSlot};
use iron_nation::{
    AppConfig, BookingError, BookingSession, CardDetails, FixedOutcome, NoLatency,
    ScriptedOutcome, Step,
};
use std::sync::Arc;
use tempfile::TempDir;

// Monday
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
}

fn contact() -> ContactInfo {
    ContactInfo {
        first_name: "Grace".to_string(),
        last_name: "Wanjiku".to_string(),
        email: "grace@example.com".to_string(),
        phone: "0722123456".to_string(),
    }
}

fn visa() -> CardDetails {
    CardDetails::from_input("Grace Wanjiku", "4242 4242 4242 4242", "12/28", "123")
}

fn session_with(outcome: impl iron_nation::core::OutcomeStrategy + 'static) -> BookingSession {
    BookingSession::new(&AppConfig::instant(), Arc::new(outcome), Arc::new(NoLatency))
}

/// Fills steps 1 to 3 for `service` and submits the details form.
async fn fill_details(session: &mut BookingSession, service: ServiceId) {
    session.select_service(service).unwrap();
    session.next().unwrap();
    session
        .select_date_on(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(), today())
        .unwrap();
    session.select_time(TimeSlot::at_hour(10).unwrap()).unwrap();
    session.next().unwrap();
    session.update_contact(contact()).unwrap();
    session.update_goals("Build strength").unwrap();
    session.update_experience(Experience::Intermediate).unwrap();
    session.submit_details().await.unwrap();
}

#[tokio::test]
async fn test_free_consultation_skips_payment() {
    let mut session = session_with(FixedOutcome::declining());
    fill_details(&mut session, ServiceId::Consultation).await;

    assert_eq!(session.state().step(), Step::Confirmation);
    assert!(session.state().receipt().is_none());
    assert!(session.receipt().is_none());

    let confirmation = session.confirmation().unwrap();
    assert_eq!(confirmation.service, "Free Consultation");
    assert_eq!(confirmation.time.as_deref(), Some("10:00 AM"));
    assert_eq!(
        confirmation.next_steps,
        vec!["We'll call you at 0722123456 to confirm your appointment.".to_string()]
    );
}

#[tokio::test]
async fn test_declined_card_then_retry_succeeds() {
    let mut session = session_with(ScriptedOutcome::new([false, true]));
    fill_details(&mut session, ServiceId::Personal).await;
    assert_eq!(session.state().step(), Step::Payment);
    assert_eq!(session.state().title(), "Booking Confirmed!");

    let err = session.pay_with_card(&visa()).await.unwrap_err();
    assert!(matches!(err, BookingError::PaymentError { .. }));
    assert_eq!(session.state().step(), Step::Payment);
    assert_eq!(session.state().payment_error(), Some(CARD_DECLINED));

    let payment = session.pay_with_card(&visa()).await.unwrap();
    assert_eq!(session.state().step(), Step::Confirmation);
    assert_eq!(*session.state().payment(), PaymentPhase::Idle);
    assert!(payment.payment_id.starts_with("pi_"));
    assert_eq!(payment.amount, 166.65);
    assert_eq!(payment.method_summary(), "Visa •••• 4242");

    let confirmation = session.confirmation().unwrap();
    assert_eq!(confirmation.payment.as_ref(), Some(&payment));
    assert_eq!(confirmation.next_steps.len(), 4);
    assert_eq!(
        confirmation.next_steps[0],
        "Confirmation email sent to grace@example.com"
    );
}

#[tokio::test]
async fn test_invalid_card_never_reaches_gateway_outcome() {
    let mut session = session_with(FixedOutcome::approving());
    fill_details(&mut session, ServiceId::Group).await;

    let short = CardDetails::from_input("Grace Wanjiku", "4242 4242", "12/28", "123");
    let err = session.pay_with_card(&short).await.unwrap_err();
    assert_eq!(err.user_friendly_message(), "Please enter a valid card number");
    assert_eq!(
        session.state().payment_error(),
        Some("Please enter a valid card number")
    );
    assert_eq!(session.state().step(), Step::Payment);
}

#[tokio::test]
async fn test_mpesa_payment_records_transaction() {
    let mut session = session_with(FixedOutcome::approving());
    fill_details(&mut session, ServiceId::Group).await;

    let payment = session.pay_with_mobile_money("0712 345 678").await.unwrap();
    assert!(payment.payment_id.starts_with("mpesa_"));
    assert_eq!(payment.currency, "KSH");
    assert_eq!(payment.amount, 75.0);
    match &payment.details {
        PaymentDetails::MobileMoney {
            phone,
            transaction_code,
            amount_ksh,
        } => {
            assert_eq!(phone, "+254 712 345 678");
            assert!(transaction_code.starts_with("MP"));
            assert_eq!(transaction_code.len(), 10);
            assert_eq!(*amount_ksh, 11362.5);
        }
        other => panic!("expected M-Pesa details, got {:?}", other),
    }

    let mut ledger = BookingLedger::with_demo_bookings();
    let record = ledger.record_confirmation(session.state()).unwrap();
    assert_eq!(record.status, BookingStatus::Confirmed);
    assert_eq!(record.payment_status, PaymentState::Paid);
    assert_eq!(record.mpesa_phone.as_deref(), Some("+254 712 345 678"));
    assert_eq!(record.price_usd, 75);
}

#[tokio::test]
async fn test_mpesa_failures() {
    let mut session = session_with(FixedOutcome::declining());
    fill_details(&mut session, ServiceId::Nutrition).await;

    let err = session.pay_with_mobile_money("12345").await.unwrap_err();
    assert_eq!(err.user_friendly_message(), INVALID_PHONE);

    let err = session.pay_with_mobile_money("0712345678").await.unwrap_err();
    assert_eq!(err.user_friendly_message(), MPESA_FAILED);
    assert_eq!(session.state().payment_error(), Some(MPESA_FAILED));
    assert_eq!(session.state().step(), Step::Payment);
}

#[tokio::test]
async fn test_back_from_payment_keeps_draft() {
    let mut session = session_with(FixedOutcome::declining());
    fill_details(&mut session, ServiceId::Personal).await;
    let _ = session.pay_with_card(&visa()).await;
    assert!(session.state().payment_error().is_some());

    session.back().unwrap();
    assert_eq!(session.state().step(), Step::ContactInfo);
    assert_eq!(*session.state().payment(), PaymentPhase::Idle);
    assert_eq!(session.state().draft().contact, contact());
    assert_eq!(session.state().draft().service, Some(ServiceId::Personal));
}

#[tokio::test]
async fn test_close_resets_everything() {
    let mut session = session_with(FixedOutcome::approving());
    fill_details(&mut session, ServiceId::Personal).await;
    session.pay_with_card(&visa()).await.unwrap();

    session.close();
    assert_eq!(session.state().step(), Step::SelectService);
    assert!(session.state().draft().service.is_none());
    assert!(session.state().receipt().is_none());
    assert!(session.confirmation().is_none());
}

#[tokio::test]
async fn test_incomplete_contact_blocks_submit() {
    let mut session = session_with(FixedOutcome::approving());
    session.select_service(ServiceId::Consultation).unwrap();
    session.next().unwrap();
    session
        .select_date_on(NaiveDate::from_ymd_opt(2026, 10, 13).unwrap(), today())
        .unwrap();
    session.select_time(TimeSlot::at_hour(6).unwrap()).unwrap();
    session.next().unwrap();
    session
        .update_contact(ContactInfo {
            email: String::new(),
            ..contact()
        })
        .unwrap();

    let err = session.submit_details().await.unwrap_err();
    match err {
        BookingError::IncompleteStep { step, missing } => {
            assert_eq!(step, 3);
            assert_eq!(missing, vec!["email"]);
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(session.state().step(), Step::ContactInfo);
}

#[tokio::test]
async fn test_sunday_and_past_dates_are_rejected() {
    let mut session = session_with(FixedOutcome::approving());
    session.select_service(ServiceId::Group).unwrap();
    session.next().unwrap();

    let sunday = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
    let yesterday = NaiveDate::from_ymd_opt(2026, 10, 11).unwrap();
    assert!(session.select_date_on(sunday, today()).is_err());
    assert!(session.select_date_on(yesterday, today()).is_err());
    assert!(session.select_date_on(today(), today()).is_ok());
}

#[tokio::test]
async fn test_receipt_download() {
    let mut session = session_with(FixedOutcome::approving());
    fill_details(&mut session, ServiceId::Nutrition).await;
    let payment = session.pay_with_card(&visa()).await.unwrap();

    let receipt = session.receipt().unwrap().unwrap();
    assert_eq!(receipt.payment_id, payment.payment_id);
    assert_eq!(receipt.service, "nutrition");
    assert_eq!(receipt.date.as_deref(), Some("10/15/2026"));
    assert_eq!(receipt.client, "Grace Wanjiku");

    let dir = TempDir::new().unwrap();
    let path = receipt.save_to(dir.path()).unwrap();
    assert!(path.ends_with(format!("iron-nation-receipt-{}.json", payment.payment_id)));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["paymentId"], payment.payment_id.as_str());
    assert_eq!(json["amount"], 222.1);
    assert_eq!(json["email"], "grace@example.com");
}

use chrono::NaiveDate;
use clap::Parser;
use iron_nation::config::cli::{BookArgs, CalcArgs, PayWith};
use iron_nation::core::calculator::{ActivityLevel, CalculatorForm};
use iron_nation::core::dashboard::BookingLedger;
use iron_nation::core::pricing::{format_amount, CardQuote, MobileMoneyQuote};
use iron_nation::core::wizard::Step;
use iron_nation::domain::model::{find_service, ContactInfo, ServiceId, TimeSlot, PRODUCTS};
use iron_nation::utils::error::{BookingError, ErrorSeverity, Result};
use iron_nation::utils::{logger, validation::Validate};
use iron_nation::{AppConfig, BookingSession, CardDetails, Cli, Command, RandomOutcome, TokioLatency};
use std::sync::Arc;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 載入 TOML 配置
    let config = match &cli.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path.display(), e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => AppConfig::default(),
    };

    // 初始化日誌
    if config.logging.json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("Configuration: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let outcome = match cli.command {
        Command::Calc(args) => run_calc(&args),
        Command::Quote { service } => run_quote(&config, &service),
        Command::Book(args) => run_book(&config, &args).await,
        Command::Bookings { search, status } => run_bookings(&search, &status),
        Command::Products => {
            run_products();
            Ok(())
        }
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2, // 付款失敗，可重試
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

fn run_calc(args: &CalcArgs) -> Result<()> {
    let form = CalculatorForm {
        age: args.age.clone(),
        gender: args.gender.clone(),
        weight: args.weight.clone(),
        height: args.height.clone(),
        activity_level: args.activity.clone(),
        goal: args.goal.clone(),
        unit: args.unit.parse()?,
    };
    let result = form.calculate()?;
    let activity = ActivityLevel::parse(&form.activity_level)?;

    println!("🔥 Your Results");
    println!("  BMR:            {} cal/day", result.bmr);
    println!("  TDEE:           {} cal/day ({})", result.tdee, activity.label());
    println!("  Goal calories:  {} cal/day", result.goal_calories);
    println!("  Protein:        {} g ({} cal)", result.protein_g, result.protein_kcal());
    println!("  Carbs:          {} g ({} cal)", result.carbs_g, result.carbs_kcal());
    println!("  Fats:           {} g ({} cal)", result.fats_g, result.fats_kcal());
    Ok(())
}

fn run_quote(config: &AppConfig, service: &str) -> Result<()> {
    let service = find_service(service.parse::<ServiceId>()?);
    println!("📋 {} ({})", service.name, service.duration_label());

    if service.is_free() {
        println!("  Free, no payment required");
        return Ok(());
    }

    let card = CardQuote::for_service(service, &config.pricing);
    println!("💳 Card");
    println!("  Subtotal:        ${}", format_amount(card.subtotal));
    println!("  Tax:             ${}", format_amount(card.tax));
    println!("  Processing fee:  ${}", format_amount(card.processing_fee));
    println!("  Total:           ${}", format_amount(card.total));

    let mpesa = MobileMoneyQuote::for_service(service, &config.pricing);
    println!("📱 M-Pesa");
    println!("  Amount:          KSH {}", format_amount(mpesa.ksh_amount));
    println!("  Fee:             KSH {}", format_amount(mpesa.fee_ksh));
    println!("  Total:           KSH {}", format_amount(mpesa.total_ksh));
    Ok(())
}

async fn run_book(config: &AppConfig, args: &BookArgs) -> Result<()> {
    let service: ServiceId = args.service.parse()?;
    let date = NaiveDate::parse_from_str(&args.date, "%Y-%m-%d")
        .map_err(|e| BookingError::validation("date", e.to_string()))?;
    let time: TimeSlot = args.time.parse()?;

    let mut session = BookingSession::new(config, Arc::new(RandomOutcome), Arc::new(TokioLatency));
    session.select_service(service)?;
    session.next()?;
    session.select_date(date)?;
    session.select_time(time)?;
    session.next()?;
    session.update_contact(ContactInfo {
        first_name: args.first_name.clone(),
        last_name: args.last_name.clone(),
        email: args.email.clone(),
        phone: args.phone.clone(),
    })?;
    if let Some(goals) = &args.goals {
        session.update_goals(goals.as_str())?;
    }
    if let Some(experience) = &args.experience {
        session.update_experience(experience.parse()?)?;
    }

    println!("⏳ Submitting booking...");
    session.submit_details().await?;

    if session.state().step() == Step::Payment {
        let payment = match args.pay {
            PayWith::Card => {
                let cardholder = args
                    .cardholder
                    .clone()
                    .unwrap_or_else(|| session.state().draft().contact.full_name());
                let card = CardDetails::from_input(&cardholder, &args.card_number, &args.expiry, &args.cvv);
                println!("💳 Processing card payment...");
                session.pay_with_card(&card).await?
            }
            PayWith::Mpesa => {
                let phone = args.mpesa_phone.as_deref().unwrap_or(&args.phone);
                println!("📱 Check your phone for the M-Pesa prompt...");
                session.pay_with_mobile_money(phone).await?
            }
        };
        println!("✅ Payment {} via {}", payment.payment_id, payment.method_summary());
    }

    let Some(confirmation) = session.confirmation() else {
        return Err(BookingError::InvalidTransition {
            step: session.state().step().number(),
            action: "confirm booking",
        });
    };

    println!("🎉 {}", session.state().title());
    println!("  Service:  {}", confirmation.service);
    if let (Some(date), Some(time)) = (confirmation.date, &confirmation.time) {
        println!("  When:     {} at {}", date.format("%A, %B %-d, %Y"), time);
    }
    println!("  Client:   {} <{}>", confirmation.client, confirmation.email);
    for step in &confirmation.next_steps {
        println!("  • {}", step);
    }

    if let (Some(dir), Some(receipt)) = (&args.receipt_dir, session.receipt()) {
        let path = receipt?.save_to(dir)?;
        println!("📁 Receipt saved to: {}", path.display());
    }

    Ok(())
}

fn run_bookings(search: &str, status: &str) -> Result<()> {
    let ledger = BookingLedger::with_demo_bookings();
    let today = chrono::Local::now().date_naive();
    let stats = ledger.stats(today);

    println!(
        "📊 Total: {}  This week: {}  Revenue: ${}  Pending: {}",
        stats.total, stats.this_week, stats.revenue_usd, stats.pending
    );

    let rows = ledger.filter(search, status.parse()?);
    if rows.is_empty() {
        println!("No bookings found matching your criteria.");
        return Ok(());
    }
    for record in rows {
        println!(
            "  #{} {:<16} {:<20} {} {:<8} {:>5}  {:?}/{:?}  {}",
            record.id,
            record.client_name,
            record.service,
            record.date,
            record.time,
            record.price_label(),
            record.status,
            record.payment_status,
            record.payment_method.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

fn run_products() {
    for product in PRODUCTS.iter() {
        let savings = product
            .savings_kes()
            .map(|s| format!(" (save KES {})", format_amount(f64::from(s))))
            .unwrap_or_default();
        println!(
            "  [{}] {:<30} KES {}{}  ★ {} ({} reviews)",
            product.id,
            product.name,
            format_amount(f64::from(product.price_kes)),
            savings,
            product.rating,
            product.reviews,
        );
    }
}

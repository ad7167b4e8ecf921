use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "iron-nation")]
#[command(about = "Iron Nation booking engine: sessions, payments and the TDEE calculator")]
pub struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calculate BMR, TDEE, goal calories and macros
    Calc(CalcArgs),
    /// Show card and M-Pesa totals for a service
    Quote {
        #[arg(short, long)]
        service: String,
    },
    /// Walk a booking through the wizard and pay for it
    Book(BookArgs),
    /// List dashboard bookings
    Bookings {
        /// Case-insensitive match on client name or email
        #[arg(short, long, default_value = "")]
        search: String,

        /// all, confirmed, pending or cancelled
        #[arg(long, default_value = "all")]
        status: String,
    },
    /// List the apparel catalog
    Products,
}

#[derive(Debug, Args)]
pub struct CalcArgs {
    #[arg(long)]
    pub age: String,

    /// male or female
    #[arg(long)]
    pub gender: String,

    /// kg, or lbs with --unit imperial
    #[arg(long)]
    pub weight: String,

    /// cm, or inches with --unit imperial
    #[arg(long)]
    pub height: String,

    #[arg(long, default_value = "metric")]
    pub unit: String,

    /// Multiplier such as 1.55, or a name such as moderately_active
    #[arg(long)]
    pub activity: String,

    /// lose2, lose1, lose0.5, maintain, gain0.5 or gain1
    #[arg(long, default_value = "maintain")]
    pub goal: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PayWith {
    Card,
    Mpesa,
}

#[derive(Debug, Args)]
pub struct BookArgs {
    /// personal, group, nutrition or consultation
    #[arg(short, long)]
    pub service: String,

    /// YYYY-MM-DD
    #[arg(long)]
    pub date: String,

    /// e.g. "9:00 AM" or 14:00
    #[arg(long)]
    pub time: String,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub phone: String,

    #[arg(long)]
    pub goals: Option<String>,

    /// beginner, intermediate or advanced
    #[arg(long)]
    pub experience: Option<String>,

    #[arg(long, value_enum, default_value_t = PayWith::Card)]
    pub pay: PayWith,

    #[arg(long, default_value = "")]
    pub card_number: String,

    /// MM/YY
    #[arg(long, default_value = "")]
    pub expiry: String,

    #[arg(long, default_value = "")]
    pub cvv: String,

    /// Defaults to the client's full name
    #[arg(long)]
    pub cardholder: Option<String>,

    /// Defaults to --phone
    #[arg(long)]
    pub mpesa_phone: Option<String>,

    /// Write the JSON receipt into this directory
    #[arg(long)]
    pub receipt_dir: Option<PathBuf>,
}

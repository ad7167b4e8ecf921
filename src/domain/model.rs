use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::{BookingError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceId {
    Personal,
    Group,
    Nutrition,
    Consultation,
}

impl ServiceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Group => "group",
            Self::Nutrition => "nutrition",
            Self::Consultation => "consultation",
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceId {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        SERVICES
            .iter()
            .map(|service| service.id)
            .find(|id| id.as_str() == s)
            .ok_or_else(|| BookingError::NotFound {
                kind: "service",
                id: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: &'static str,
    pub duration_minutes: u32,
    pub price_usd: u32,
}

impl Service {
    pub fn is_free(&self) -> bool {
        self.price_usd == 0
    }

    pub fn price_label(&self) -> String {
        format!("${}", self.price_usd)
    }

    pub fn duration_label(&self) -> String {
        format!("{} min", self.duration_minutes)
    }
}

pub static SERVICES: [Service; 4] = [
    Service {
        id: ServiceId::Personal,
        name: "Weight and Fat Loss Expert",
        duration_minutes: 60,
        price_usd: 150,
    },
    Service {
        id: ServiceId::Group,
        name: "Online Personal Trainer",
        duration_minutes: 45,
        price_usd: 75,
    },
    Service {
        id: ServiceId::Nutrition,
        name: "Nutrition Coaching",
        duration_minutes: 90,
        price_usd: 200,
    },
    Service {
        id: ServiceId::Consultation,
        name: "Free Consultation",
        duration_minutes: 30,
        price_usd: 0,
    },
];

pub fn find_service(id: ServiceId) -> &'static Service {
    // every ServiceId has exactly one catalog entry
    match id {
        ServiceId::Personal => &SERVICES[0],
        ServiceId::Group => &SERVICES[1],
        ServiceId::Nutrition => &SERVICES[2],
        ServiceId::Consultation => &SERVICES[3],
    }
}

/// An hourly appointment slot. Bookable slots run from 6:00 AM to 8:00 PM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    pub const FIRST_HOUR: u32 = 6;
    pub const LAST_HOUR: u32 = 20;

    pub fn at_hour(hour: u32) -> Result<Self> {
        if !(Self::FIRST_HOUR..=Self::LAST_HOUR).contains(&hour) {
            return Err(BookingError::validation(
                "time",
                format!("{}:00 is outside opening hours", hour),
            ));
        }
        NaiveTime::from_hms_opt(hour, 0, 0)
            .map(Self)
            .ok_or_else(|| BookingError::validation("time", "invalid hour"))
    }

    pub fn all() -> Vec<TimeSlot> {
        (Self::FIRST_HOUR..=Self::LAST_HOUR)
            .filter_map(|hour| Self::at_hour(hour).ok())
            .collect()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%-I:%M %p"))
    }
}

impl FromStr for TimeSlot {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        let time = NaiveTime::parse_from_str(s.trim(), "%I:%M %p")
            .or_else(|_| NaiveTime::parse_from_str(s.trim(), "%H:%M"))
            .map_err(|_| BookingError::validation("time", format!("'{}' is not a time", s)))?;
        if time.minute() != 0 {
            return Err(BookingError::validation(
                "time",
                "appointments start on the hour",
            ));
        }
        Self::at_hour(time.hour())
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Experience {
    Beginner,
    Intermediate,
    Advanced,
}

impl Experience {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner (0-1 years)",
            Self::Intermediate => "Intermediate (1-3 years)",
            Self::Advanced => "Advanced (3+ years)",
        }
    }
}

impl FromStr for Experience {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(BookingError::validation(
                "experience",
                format!("'{}' is not an experience level", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl ContactInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// The booking being assembled by the wizard. Never mutated in place:
/// every `with_*` call hands back a new draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookingDraft {
    pub service: Option<ServiceId>,
    pub date: Option<NaiveDate>,
    pub time: Option<TimeSlot>,
    pub contact: ContactInfo,
    pub goals: String,
    pub experience: Option<Experience>,
}

impl BookingDraft {
    pub fn with_service(&self, service: ServiceId) -> Self {
        Self {
            service: Some(service),
            ..self.clone()
        }
    }

    pub fn with_date(&self, date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..self.clone()
        }
    }

    pub fn with_time(&self, time: TimeSlot) -> Self {
        Self {
            time: Some(time),
            ..self.clone()
        }
    }

    pub fn with_contact(&self, contact: ContactInfo) -> Self {
        Self {
            contact,
            ..self.clone()
        }
    }

    pub fn with_goals(&self, goals: impl Into<String>) -> Self {
        Self {
            goals: goals.into(),
            ..self.clone()
        }
    }

    pub fn with_experience(&self, experience: Experience) -> Self {
        Self {
            experience: Some(experience),
            ..self.clone()
        }
    }

    pub fn selected_service(&self) -> Option<&'static Service> {
        self.service.map(find_service)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    MobileMoney,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Card => "Card",
            Self::MobileMoney => "M-Pesa",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Succeeded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentDetails {
    Card {
        last4: String,
        brand: String,
    },
    MobileMoney {
        phone: String,
        transaction_code: String,
        amount_ksh: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentResult {
    pub payment_id: String,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub method: PaymentMethod,
    pub details: PaymentDetails,
}

impl PaymentResult {
    /// "Visa •••• 4242" or "M-Pesa +254 712 345 678"
    pub fn method_summary(&self) -> String {
        match &self.details {
            PaymentDetails::Card { last4, brand } => format!("{} •••• {}", brand, last4),
            PaymentDetails::MobileMoney { phone, .. } => format!("M-Pesa {}", phone),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
    pub price_kes: u32,
    pub original_price_kes: Option<u32>,
    pub category: &'static str,
    pub rating: f32,
    pub reviews: u32,
    pub colors: &'static [&'static str],
    pub sizes: &'static [&'static str],
    pub is_new: bool,
    pub is_bestseller: bool,
}

impl Product {
    pub fn savings_kes(&self) -> Option<u32> {
        self.original_price_kes
            .filter(|original| *original > self.price_kes)
            .map(|original| original - self.price_kes)
    }
}

const APPAREL_SIZES: &[&str] = &["S", "M", "L", "XL", "XXL"];

pub static PRODUCTS: [Product; 6] = [
    Product {
        id: "1",
        name: "Iron Nation Performance Tank",
        price_kes: 4499,
        original_price_kes: Some(5999),
        category: "Tank Tops",
        rating: 4.8,
        reviews: 124,
        colors: &[
            "Black",
            "Red",
            "Gray",
            "White",
            "Navy",
            "Charcoal",
            "Forest Green",
            "Yellow",
            "Mustard",
        ],
        sizes: APPAREL_SIZES,
        is_new: false,
        is_bestseller: true,
    },
    Product {
        id: "2",
        name: "Elite Training Hoodie",
        price_kes: 11999,
        original_price_kes: None,
        category: "Hoodies",
        rating: 4.9,
        reviews: 89,
        colors: &[
            "Black",
            "Charcoal",
            "Navy",
            "Burgundy",
            "Olive",
            "Steel Gray",
            "Maroon",
            "Mustard",
        ],
        sizes: APPAREL_SIZES,
        is_new: true,
        is_bestseller: false,
    },
    Product {
        id: "3",
        name: "Iron Nation Compression Tee",
        price_kes: 5249,
        original_price_kes: None,
        category: "T-Shirts",
        rating: 4.7,
        reviews: 156,
        colors: &[
            "Black",
            "White",
            "Red",
            "Navy",
            "Gray",
            "Royal Blue",
            "Maroon",
            "Forest Green",
            "Yellow",
            "Mustard",
        ],
        sizes: APPAREL_SIZES,
        is_new: false,
        is_bestseller: false,
    },
    Product {
        id: "4",
        name: "Beast Mode Joggers",
        price_kes: 8999,
        original_price_kes: Some(10499),
        category: "Bottoms",
        rating: 4.6,
        reviews: 203,
        colors: &[
            "Black",
            "Gray",
            "Navy",
            "Charcoal",
            "Olive",
            "Steel Blue",
            "Maroon",
        ],
        sizes: APPAREL_SIZES,
        is_new: false,
        is_bestseller: true,
    },
    Product {
        id: "5",
        name: "Iron Nation Snapback",
        price_kes: 3749,
        original_price_kes: None,
        category: "Accessories",
        rating: 4.5,
        reviews: 78,
        colors: &[
            "Black/Red",
            "All Black",
            "Gray/Black",
            "Navy/White",
            "Red/Black",
            "White/Black",
            "Camo/Black",
            "Yellow/Black",
            "Mustard/Black",
        ],
        sizes: &["One Size"],
        is_new: false,
        is_bestseller: false,
    },
    Product {
        id: "6",
        name: "Performance Shorts",
        price_kes: 5999,
        original_price_kes: None,
        category: "Shorts",
        rating: 4.8,
        reviews: 167,
        colors: &[
            "Black",
            "Navy",
            "Gray",
            "Red",
            "Royal Blue",
            "Charcoal",
            "Olive",
            "Yellow",
            "Mustard",
            "Maroon",
        ],
        sizes: APPAREL_SIZES,
        is_new: true,
        is_bestseller: false,
    },
];

pub fn find_product(id: &str) -> Result<&'static Product> {
    PRODUCTS
        .iter()
        .find(|product| product.id == id)
        .ok_or_else(|| BookingError::NotFound {
            kind: "product",
            id: id.to_string(),
        })
}

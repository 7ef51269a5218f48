use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[serde(alias = "usd")]
    Usd,
    #[serde(alias = "inr")]
    Inr,
    #[serde(alias = "eur")]
    Eur,
    #[serde(alias = "gbp")]
    Gbp,
    #[serde(alias = "jpy")]
    Jpy,
    #[serde(alias = "aud")]
    Aud,
    #[serde(alias = "cad")]
    Cad,
    #[serde(alias = "chf")]
    Chf,
    #[serde(alias = "cny")]
    Cny,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Inr => "INR",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Aud => "AUD",
            Currency::Cad => "CAD",
            Currency::Chf => "CHF",
            Currency::Cny => "CNY",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Inr => "₹",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy | Currency::Cny => "¥",
            Currency::Aud => "A$",
            Currency::Cad => "C$",
            Currency::Chf => "CHF",
        }
    }

    /// Indian rupees count in lakhs and crores; everything else in powers of
    /// a thousand.
    pub fn number_systems(self) -> &'static [NumberSystem] {
        match self {
            Currency::Inr => &[
                NumberSystem::Thousand,
                NumberSystem::Lakhs,
                NumberSystem::Crores,
            ],
            _ => &[
                NumberSystem::Thousand,
                NumberSystem::Millions,
                NumberSystem::Billions,
                NumberSystem::Trillions,
            ],
        }
    }

    pub fn supports(self, system: NumberSystem) -> bool {
        self.number_systems().contains(&system)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumberSystem {
    #[serde(alias = "Thousand", alias = "thousands")]
    Thousand,
    #[serde(alias = "Lakhs", alias = "lakh")]
    Lakhs,
    #[serde(alias = "Crores", alias = "crore")]
    Crores,
    #[serde(alias = "Millions", alias = "million")]
    Millions,
    #[serde(alias = "Billions", alias = "billion")]
    Billions,
    #[serde(alias = "Trillions", alias = "trillion")]
    Trillions,
}

impl NumberSystem {
    pub fn multiplier(self) -> f64 {
        match self {
            NumberSystem::Thousand => 1_000.0,
            NumberSystem::Lakhs => 100_000.0,
            NumberSystem::Crores => 10_000_000.0,
            NumberSystem::Millions => 1_000_000.0,
            NumberSystem::Billions => 1_000_000_000.0,
            NumberSystem::Trillions => 1_000_000_000_000.0,
        }
    }
}

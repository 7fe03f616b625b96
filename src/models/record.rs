use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One day of observations from the station.
///
/// Either measurement may be missing; the day is still kept so that
/// the other value contributes to aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateRecord {
    pub date: NaiveDate,
    /// Mean daily temperature in °C.
    pub temperature: Option<f64>,
    /// Daily precipitation in mm.
    pub precipitation: Option<f64>,
}

impl ClimateRecord {
    pub fn new(date: NaiveDate, temperature: Option<f64>, precipitation: Option<f64>) -> Self {
        Self {
            date,
            temperature,
            precipitation,
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Calendar month, 1 through 12.
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn season(&self) -> Season {
        Season::from_month(self.month())
    }

    /// Start year of the decade, e.g. 1990 for 1997.
    pub fn decade(&self) -> i32 {
        decade_of(self.year())
    }

    pub fn period(&self) -> Period {
        Period::of_year(self.year())
    }
}

/// Start year of the decade containing `year`.
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Meteorological season derived from the calendar month.
///
/// December is attached to the winter of its own calendar year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Self::Winter, Self::Spring, Self::Summer, Self::Fall];

    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Fall,
            _ => Self::Winter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Winter => "winter",
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall => "fall",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Winter => "Winter",
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall => "Fall",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "winter" => Some(Self::Winter),
            "spring" => Some(Self::Spring),
            "summer" => Some(Self::Summer),
            "fall" | "autumn" => Some(Self::Fall),
            _ => None,
        }
    }
}

/// The two fixed spans compared in the temperature distribution chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Early,
    Recent,
}

/// Last year included in [`Period::Early`].
pub const PERIOD_SPLIT_YEAR: i32 = 2004;

impl Period {
    pub const ALL: [Period; 2] = [Self::Early, Self::Recent];

    pub fn of_year(year: i32) -> Self {
        if year <= PERIOD_SPLIT_YEAR {
            Self::Early
        } else {
            Self::Recent
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Early => "1989-2004",
            Self::Recent => "2005-2024",
        }
    }
}

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Three-letter English abbreviation for a 1-based month.
pub fn month_abbreviation(month: u32) -> &'static str {
    MONTH_ABBREVIATIONS
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("?")
}

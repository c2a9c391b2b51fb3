//! Birth input record and its builder.

use bazi_time::{DEFAULT_STD_MERIDIAN, UtcOffset};
use serde::{Deserialize, Serialize};

use crate::error::ChartError;

/// Sex of the chart owner; it fixes the luck-cycle direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Chinese name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Male => "男",
            Self::Female => "女",
        }
    }
}

/// Calendar in which the birth date is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarKind {
    Solar,
    Lunar { is_leap_month: bool },
}

/// Where the day pillar turns over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayBoundary {
    /// 23:00 starts the next day's pillar (早晚子 not split).
    #[default]
    LateZiNextDay,
    /// The day pillar changes at civil midnight.
    Midnight,
}

/// True-solar-time correction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrueSolarTime {
    /// Birth place longitude, degrees east.
    pub longitude_deg: f64,
    /// Meridian of the civil time zone, degrees east.
    pub std_meridian_deg: f64,
}

impl TrueSolarTime {
    /// Both angles must be finite and within ±180°.
    pub fn validate(&self) -> Result<(), ChartError> {
        for (what, deg) in [
            ("longitude", self.longitude_deg),
            ("standard meridian", self.std_meridian_deg),
        ] {
            if !deg.is_finite() || deg.abs() > 180.0 {
                return Err(ChartError::InvalidBirthDate(format!(
                    "{what} {deg} outside -180..=180"
                )));
            }
        }
        Ok(())
    }
}

/// Immutable birth input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthInfo {
    pub sex: Sex,
    pub calendar: CalendarKind,
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    #[serde(default)]
    pub offset: UtcOffset,
    #[serde(default)]
    pub true_solar_time: Option<TrueSolarTime>,
    #[serde(default)]
    pub day_boundary: DayBoundary,
}

impl BirthInfo {
    /// Start a builder.
    pub fn builder() -> BirthInfoBuilder {
        BirthInfoBuilder::default()
    }
}

/// Builder for [`BirthInfo`]; `build()` reports the first missing field.
#[derive(Debug, Clone, Default)]
pub struct BirthInfoBuilder {
    sex: Option<Sex>,
    calendar: Option<CalendarKind>,
    date: Option<(i32, u8, u8)>,
    time: Option<(u8, u8)>,
    offset: Option<UtcOffset>,
    use_true_solar_time: bool,
    longitude_deg: Option<f64>,
    std_meridian_deg: Option<f64>,
    day_boundary: DayBoundary,
}

impl BirthInfoBuilder {
    pub fn sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    /// Gregorian birth date.
    pub fn solar_date(mut self, year: i32, month: u8, day: u8) -> Self {
        self.calendar = Some(CalendarKind::Solar);
        self.date = Some((year, month, day));
        self
    }

    /// Lunar birth date; `is_leap_month` marks a 闰 month.
    pub fn lunar_date(mut self, year: i32, month: u8, day: u8, is_leap_month: bool) -> Self {
        self.calendar = Some(CalendarKind::Lunar { is_leap_month });
        self.date = Some((year, month, day));
        self
    }

    /// Civil clock time of birth.
    pub fn time(mut self, hour: u8, minute: u8) -> Self {
        self.time = Some((hour, minute));
        self
    }

    pub fn offset(mut self, offset: UtcOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Request the true-solar-time correction; needs [`Self::longitude`].
    pub fn true_solar_time(mut self, enabled: bool) -> Self {
        self.use_true_solar_time = enabled;
        self
    }

    /// Birth place longitude in degrees east.
    pub fn longitude(mut self, longitude_deg: f64) -> Self {
        self.longitude_deg = Some(longitude_deg);
        self
    }

    /// Standard meridian of the civil zone, default 120°E.
    pub fn std_meridian(mut self, std_meridian_deg: f64) -> Self {
        self.std_meridian_deg = Some(std_meridian_deg);
        self
    }

    pub fn day_boundary(mut self, day_boundary: DayBoundary) -> Self {
        self.day_boundary = day_boundary;
        self
    }

    pub fn build(self) -> Result<BirthInfo, ChartError> {
        let sex = self.sex.ok_or(ChartError::MissingRequiredField("sex"))?;
        let (year, month, day) = self.date.ok_or(ChartError::MissingRequiredField("date"))?;
        let calendar = self.calendar.unwrap_or(CalendarKind::Solar);
        let (hour, minute) = self.time.ok_or(ChartError::MissingRequiredField("time"))?;
        let true_solar_time = if self.use_true_solar_time {
            let longitude_deg = self
                .longitude_deg
                .ok_or(ChartError::MissingRequiredField("longitude"))?;
            let tst = TrueSolarTime {
                longitude_deg,
                std_meridian_deg: self.std_meridian_deg.unwrap_or(DEFAULT_STD_MERIDIAN),
            };
            tst.validate()?;
            Some(tst)
        } else {
            None
        };
        Ok(BirthInfo {
            sex,
            calendar,
            year,
            month,
            day,
            hour,
            minute,
            offset: self.offset.unwrap_or_default(),
            true_solar_time,
            day_boundary: self.day_boundary,
        })
    }
}

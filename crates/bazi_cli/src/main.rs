use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use bazi_rs::{
    BirthInfo, ChartQuery, DayBoundary, EngineConfig, LunarDate, ReferenceYear, ScenarioKind,
    Sex, UtcOffset,
};
use chrono::{NaiveDate, NaiveTime, Timelike};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bazi", about = "Four-pillars chart CLI")]
struct Cli {
    /// Engine configuration (TOML); built-in tables when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log chart stages to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full static chart as JSON
    Chart {
        #[command(flatten)]
        birth: BirthArgs,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// The four pillars only
    Pillars {
        #[command(flatten)]
        birth: BirthArgs,
    },
    /// Reference-year evaluation: floating markers, luck, windows
    Query {
        #[command(flatten)]
        birth: BirthArgs,
        /// Reference year: 2026, 午 or 丙午
        #[arg(long)]
        reference: String,
        /// Current age; defaults to reference year minus birth year
        #[arg(long)]
        age: Option<u32>,
        /// Scenario for windows: marriage, career, exam, invest (repeatable)
        #[arg(long = "scenario")]
        scenarios: Vec<String>,
        /// First window year
        #[arg(long, requires = "to")]
        from: Option<i32>,
        /// Last window year
        #[arg(long, requires = "from")]
        to: Option<i32>,
        /// Include the twelve flowing months
        #[arg(long)]
        months: bool,
        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Lunar date of a Gregorian date
    Lunar {
        /// Gregorian date (YYYY-MM-DD)
        date: String,
    },
    /// Gregorian date of a lunar date
    Solar {
        year: i32,
        month: u8,
        day: u8,
        /// The month is a leap (闰) month
        #[arg(long)]
        leap: bool,
    },
    /// The 24 solar terms of a year
    SolarTerms {
        year: i32,
        /// UTC offset of the printed instants
        #[arg(long, default_value = "+08:00")]
        offset: String,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum SexArg {
    #[value(alias = "m")]
    Male,
    #[value(alias = "f")]
    Female,
}

impl From<SexArg> for Sex {
    fn from(s: SexArg) -> Self {
        match s {
            SexArg::Male => Sex::Male,
            SexArg::Female => Sex::Female,
        }
    }
}

#[derive(Args)]
struct BirthArgs {
    #[arg(long, value_enum)]
    sex: SexArg,
    /// Birth date (YYYY-MM-DD); lunar with --lunar
    #[arg(long)]
    date: String,
    /// Civil birth time (HH:MM)
    #[arg(long)]
    time: String,
    /// The date is a lunar date
    #[arg(long)]
    lunar: bool,
    /// The lunar month is a leap month
    #[arg(long, requires = "lunar")]
    leap: bool,
    /// UTC offset of the birth time
    #[arg(long, default_value = "+08:00")]
    offset: String,
    /// Birth place longitude (degrees east); enables true solar time
    #[arg(long)]
    longitude: Option<f64>,
    /// Standard meridian of the civil zone (degrees east)
    #[arg(long, requires = "longitude")]
    meridian: Option<f64>,
    /// Change the day pillar at midnight instead of 23:00
    #[arg(long)]
    midnight: bool,
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}' (expected YYYY-MM-DD)"))
}

fn parse_time(s: &str) -> Result<(u8, u8)> {
    let t = NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .with_context(|| format!("invalid time '{s}' (expected HH:MM)"))?;
    Ok((u8::try_from(t.hour())?, u8::try_from(t.minute())?))
}

fn parse_offset(s: &str) -> Result<UtcOffset> {
    s.parse::<UtcOffset>()
        .with_context(|| format!("invalid UTC offset '{s}'"))
}

/// Split `YYYY-MM-DD` without calendar validation; lunar days run to 30.
fn parse_ymd(s: &str) -> Result<(i32, u8, u8)> {
    let parts: Vec<&str> = s.trim().split('-').collect();
    let [y, m, d] = parts.as_slice() else {
        bail!("invalid date '{s}' (expected YYYY-MM-DD)");
    };
    Ok((
        y.parse().with_context(|| format!("invalid year in '{s}'"))?,
        m.parse().with_context(|| format!("invalid month in '{s}'"))?,
        d.parse().with_context(|| format!("invalid day in '{s}'"))?,
    ))
}

fn parse_scenarios(names: &[String]) -> Result<Vec<ScenarioKind>> {
    names
        .iter()
        .map(|n| n.parse::<ScenarioKind>().map_err(|e| anyhow!(e)))
        .collect()
}

impl BirthArgs {
    fn to_birth(&self) -> Result<BirthInfo> {
        let (hour, minute) = parse_time(&self.time)?;
        let mut builder = BirthInfo::builder()
            .sex(self.sex.into())
            .time(hour, minute)
            .offset(parse_offset(&self.offset)?);
        let (y, m, d) = parse_ymd(&self.date)?;
        builder = if self.lunar {
            builder.lunar_date(y, m, d, self.leap)
        } else {
            builder.solar_date(y, m, d)
        };
        if let Some(lon) = self.longitude {
            builder = builder.true_solar_time(true).longitude(lon);
            if let Some(meridian) = self.meridian {
                builder = builder.std_meridian(meridian);
            }
        }
        if self.midnight {
            builder = builder.day_boundary(DayBoundary::Midnight);
        }
        Ok(builder.build()?)
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::from_path(p)
            .with_context(|| format!("failed to load config {}", p.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let text = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{text}");
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Chart { birth, compact } => {
            bazi_rs::init(config)?;
            let chart = bazi_rs::chart(&birth.to_birth()?)?;
            print_json(chart.as_ref(), compact)?;
        }

        Commands::Pillars { birth } => {
            let p = bazi_rs::pillars(&birth.to_birth()?)?;
            println!("{} {} {} {}", p.year, p.month, p.day, p.hour);
        }

        Commands::Query {
            birth,
            reference,
            age,
            scenarios,
            from,
            to,
            months,
            compact,
        } => {
            bazi_rs::init(config)?;
            let reference: ReferenceYear = reference.parse()?;
            let mut q = ChartQuery::new(reference).flow_months(months);
            for kind in parse_scenarios(&scenarios)? {
                q = q.scenario(kind);
            }
            if let Some(age) = age {
                q = q.age(age);
            }
            if let (Some(from), Some(to)) = (from, to) {
                q = q.years(from, to);
            }
            let result = bazi_rs::query(&birth.to_birth()?, &q)?;
            print_json(&result, compact)?;
        }

        Commands::Lunar { date } => {
            let lunar = bazi_rs::lunar(parse_date(&date)?)?;
            println!("{lunar}");
        }

        Commands::Solar {
            year,
            month,
            day,
            leap,
        } => {
            let lunar = LunarDate::new(year, month, day, leap)?;
            println!("{}", bazi_rs::solar(&lunar)?);
        }

        Commands::SolarTerms { year, offset } => {
            let offset = parse_offset(&offset)?;
            for (term, local) in bazi_rs::solar_terms(year, offset)? {
                println!("{}  {}  {}", term.term.name(), local.format("%Y-%m-%d %H:%M"), offset);
            }
        }

        Commands::Config => {
            print!("{}", config.to_toml_string()?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn birth_args_build_a_solar_birth() {
        let cli = Cli::try_parse_from([
            "bazi", "pillars", "--sex", "f", "--date", "2025-06-20", "--time", "08:00",
        ])
        .unwrap();
        let Commands::Pillars { birth } = cli.command else {
            panic!("expected pillars");
        };
        let b = birth.to_birth().unwrap();
        assert_eq!((b.year, b.month, b.day, b.hour, b.minute), (2025, 6, 20, 8, 0));
        assert_eq!(b.sex, Sex::Female);
        assert!(b.true_solar_time.is_none());
    }

    #[test]
    fn longitude_enables_true_solar_time() {
        let cli = Cli::try_parse_from([
            "bazi", "chart", "--sex", "male", "--date", "1990-03-15", "--time", "10:30",
            "--longitude", "116.4",
        ])
        .unwrap();
        let Commands::Chart { birth, .. } = cli.command else {
            panic!("expected chart");
        };
        let tst = birth.to_birth().unwrap().true_solar_time.unwrap();
        assert_eq!(tst.longitude_deg, 116.4);
    }

    #[test]
    fn leap_requires_lunar() {
        let r = Cli::try_parse_from([
            "bazi", "pillars", "--sex", "m", "--date", "2025-06-01", "--time", "08:00", "--leap",
        ]);
        assert!(r.is_err());
    }

    #[test]
    fn helpers_reject_garbage() {
        assert!(parse_time("25:00").is_err());
        assert!(parse_ymd("2025/06/20").is_err());
        assert_eq!(parse_ymd("2025-02-30").unwrap(), (2025, 2, 30));
        assert!(parse_scenarios(&["travel".to_string()]).is_err());
        assert_eq!(
            parse_scenarios(&["marriage".to_string(), "考试".to_string()]).unwrap().len(),
            2
        );
    }
}

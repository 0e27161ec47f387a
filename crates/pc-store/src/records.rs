// records.rs — Logical record shapes shared by every store backend.
//
// Three persisted records exist:
//   BusinessProfile — one per owner
//   MonthlyGoal     — one per (owner, calendar month)
//   DailyPlan       — one per (owner, date), targets frozen at creation
//
// Derived values (daily requirements) are never persisted and live in pc-goal.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of the salesperson whose records are in scope.
///
/// Injected by the host application and threaded through every store call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A calendar month, the key for monthly goals.
///
/// Serializes as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Build a key, rejecting months outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Day number of the last day of this month (28..=31).
    pub fn last_day(&self) -> u32 {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first_of_next| first_of_next.pred_opt())
            .map(|last| last.day())
            // Only reachable at the edge of chrono's supported range.
            .unwrap_or(28)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid month '{}': expected YYYY-MM", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in month '{}'", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month number in '{}'", s))?;
        MonthKey::new(year, month).ok_or_else(|| format!("month out of range: '{}'", s))
    }
}

impl TryFrom<String> for MonthKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

/// Industry the salesperson sells in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    RealEstate,
    Insurance,
    Automotive,
    Solar,
    FinancialServices,
    DirectSales,
    Software,
    Other,
}

impl Industry {
    pub const ALL: [Industry; 8] = [
        Industry::RealEstate,
        Industry::Insurance,
        Industry::Automotive,
        Industry::Solar,
        Industry::FinancialServices,
        Industry::DirectSales,
        Industry::Software,
        Industry::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::RealEstate => "real_estate",
            Industry::Insurance => "insurance",
            Industry::Automotive => "automotive",
            Industry::Solar => "solar",
            Industry::FinancialServices => "financial_services",
            Industry::DirectSales => "direct_sales",
            Industry::Software => "software",
            Industry::Other => "other",
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Industry::ALL
            .into_iter()
            .find(|i| i.as_str() == normalized)
            .ok_or_else(|| format!("unknown industry '{}'", s))
    }
}

/// The owner's business parameters. One per owner, replaced by re-running setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub owner: OwnerId,
    pub industry: Industry,
    pub product_name: String,

    /// Commission earned per closed deal. Always > 0.
    pub commission_per_deal: f64,

    /// Typical days from first contact to close. Always > 0.
    pub sales_cycle_days: u32,

    /// Probability a contacted lead turns into a meeting (0..=1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_lead_to_meeting: Option<f64>,

    /// Probability a meeting turns into a closed deal (0..=1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_meeting_to_deal: Option<f64>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Revenue and deal targets for one calendar month.
///
/// `current_revenue` / `current_deals` are advanced by deal-closing processes
/// outside the goal engine; setup always resets them to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyGoal {
    pub owner: OwnerId,
    pub month: MonthKey,
    pub target_revenue: f64,
    pub target_deals: u32,
    #[serde(default)]
    pub current_revenue: f64,
    #[serde(default)]
    pub current_deals: u32,
    pub updated_at: DateTime<Utc>,
}

/// The three activity types a daily plan tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    NewContacts,
    Followups,
    Meetings,
}

impl ActivityType {
    pub const ALL: [ActivityType; 3] = [
        ActivityType::NewContacts,
        ActivityType::Followups,
        ActivityType::Meetings,
    ];

    /// Name of the persisted counter this activity increments.
    pub fn completed_field(&self) -> &'static str {
        match self {
            ActivityType::NewContacts => "completed_new_contacts",
            ActivityType::Followups => "completed_followups",
            ActivityType::Meetings => "completed_meetings",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityType::NewContacts => write!(f, "new_contacts"),
            ActivityType::Followups => write!(f, "followups"),
            ActivityType::Meetings => write!(f, "meetings"),
        }
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "new_contacts" | "contacts" => Ok(ActivityType::NewContacts),
            "followups" | "follow_ups" => Ok(ActivityType::Followups),
            "meetings" => Ok(ActivityType::Meetings),
            other => Err(format!("unknown activity type '{}'", other)),
        }
    }
}

/// One day's activity targets and completion counters for one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub plan_id: Uuid,
    pub owner: OwnerId,
    pub date: NaiveDate,

    pub target_new_contacts: u32,
    pub target_followups: u32,
    pub target_meetings: u32,

    #[serde(default)]
    pub completed_new_contacts: u32,
    #[serde(default)]
    pub completed_followups: u32,
    #[serde(default)]
    pub completed_meetings: u32,

    pub created_at: DateTime<Utc>,
}

impl DailyPlan {
    /// A fresh plan with the given targets and nothing completed.
    pub fn new(
        owner: OwnerId,
        date: NaiveDate,
        target_new_contacts: u32,
        target_followups: u32,
        target_meetings: u32,
    ) -> Self {
        Self {
            plan_id: Uuid::new_v4(),
            owner,
            date,
            target_new_contacts,
            target_followups,
            target_meetings,
            completed_new_contacts: 0,
            completed_followups: 0,
            completed_meetings: 0,
            created_at: Utc::now(),
        }
    }

    pub fn target(&self, activity: ActivityType) -> u32 {
        match activity {
            ActivityType::NewContacts => self.target_new_contacts,
            ActivityType::Followups => self.target_followups,
            ActivityType::Meetings => self.target_meetings,
        }
    }

    pub fn completed(&self, activity: ActivityType) -> u32 {
        match activity {
            ActivityType::NewContacts => self.completed_new_contacts,
            ActivityType::Followups => self.completed_followups,
            ActivityType::Meetings => self.completed_meetings,
        }
    }

    pub fn completed_mut(&mut self, activity: ActivityType) -> &mut u32 {
        match activity {
            ActivityType::NewContacts => &mut self.completed_new_contacts,
            ActivityType::Followups => &mut self.completed_followups,
            ActivityType::Meetings => &mut self.completed_meetings,
        }
    }

    /// Fraction of the target completed. A zero target counts as done.
    pub fn completion_ratio(&self, activity: ActivityType) -> f64 {
        let target = self.target(activity);
        if target == 0 {
            return 1.0;
        }
        f64::from(self.completed(activity)) / f64::from(target)
    }

    /// True once every activity has met its target.
    pub fn is_complete(&self) -> bool {
        ActivityType::ALL
            .into_iter()
            .all(|a| self.completed(a) >= self.target(a))
    }
}

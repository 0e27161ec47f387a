// calculator.rs — Backward planning from a monthly goal to a daily contact target.
//
// Pure and deterministic: (profile, goal, today) → DailyRequirements.
//
//   missing_revenue  = max(0, target_revenue - current_revenue)
//   needed_deals     = ceil(missing_revenue / commission_per_deal)
//   conversion_rate  = lead_to_meeting * meeting_to_deal   (defaults when unset)
//   needed_contacts  = ceil(needed_deals / max(0.01, conversion_rate))
//   days_remaining   = last_day_of_month - day_of_month(today) + 1, at least 1
//   daily_target     = ceil(needed_contacts / days_remaining)
//   progress_percent = round(current_revenue / target_revenue * 100), 0 if no target
//
// Every count rounds up so the plan never under-states the effort needed.

use chrono::{Datelike, NaiveDate};
use pc_store::{BusinessProfile, MonthKey, MonthlyGoal};
use serde::{Deserialize, Serialize};

/// Floor applied to the combined conversion rate before dividing by it.
pub const MIN_CONVERSION_RATE: f64 = 0.01;

/// Conversion rates used when a profile doesn't carry its own.
///
/// The same pair seeds new profiles at setup and backs the calculator, so a
/// profile saved without rates plans exactly like one saved with the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionDefaults {
    #[serde(default = "default_lead_to_meeting")]
    pub lead_to_meeting: f64,
    #[serde(default = "default_meeting_to_deal")]
    pub meeting_to_deal: f64,
}

impl Default for ConversionDefaults {
    fn default() -> Self {
        Self {
            lead_to_meeting: default_lead_to_meeting(),
            meeting_to_deal: default_meeting_to_deal(),
        }
    }
}

fn default_lead_to_meeting() -> f64 {
    0.2
}

fn default_meeting_to_deal() -> f64 {
    0.5
}

/// What the owner has to do, derived fresh on every load. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRequirements {
    pub missing_revenue: f64,
    pub needed_deals: u32,
    pub needed_contacts: u32,
    pub daily_target: u32,
    pub days_remaining: u32,
    pub progress_percent: u32,
}

/// Compute today's requirements for a goal.
pub fn compute_requirements(
    profile: &BusinessProfile,
    goal: &MonthlyGoal,
    today: NaiveDate,
    defaults: &ConversionDefaults,
) -> DailyRequirements {
    let missing_revenue = (goal.target_revenue - goal.current_revenue).max(0.0);
    let needed_deals = ceil_count(missing_revenue / profile.commission_per_deal);

    let conversion_rate = profile
        .conversion_lead_to_meeting
        .unwrap_or(defaults.lead_to_meeting)
        * profile
            .conversion_meeting_to_deal
            .unwrap_or(defaults.meeting_to_deal);
    let needed_contacts = ceil_count(f64::from(needed_deals) / conversion_rate.max(MIN_CONVERSION_RATE));

    let days_remaining = days_remaining_in_month(today);
    let daily_target = needed_contacts.div_ceil(days_remaining);

    DailyRequirements {
        missing_revenue,
        needed_deals,
        needed_contacts,
        daily_target,
        days_remaining,
        progress_percent: progress_percent(goal.current_revenue, goal.target_revenue),
    }
}

/// Days left in the month of `today`, counting today. Never below 1.
pub fn days_remaining_in_month(today: NaiveDate) -> u32 {
    let last_day = MonthKey::of(today).last_day();
    last_day.saturating_sub(today.day()).saturating_add(1).max(1)
}

/// Percent of target revenue already earned, rounded to the nearest integer.
pub fn progress_percent(current_revenue: f64, target_revenue: f64) -> u32 {
    if target_revenue > 0.0 {
        (current_revenue / target_revenue * 100.0).round().max(0.0) as u32
    } else {
        0
    }
}

// NaN and negatives collapse to 0; `as` saturates at u32::MAX.
fn ceil_count(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value.ceil() as u32
    }
}

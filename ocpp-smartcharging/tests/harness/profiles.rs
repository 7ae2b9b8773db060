use chrono::{DateTime, Utc};
use evcp_core::v16::types::{
    ChargingProfile, ChargingProfileKindType, ChargingProfilePurposeType, ChargingRateUnitType,
    ChargingSchedule, ChargingSchedulePeriod, RecurrencyKindType,
};

pub fn period(start_period: i32, limit: f32) -> ChargingSchedulePeriod {
    ChargingSchedulePeriod {
        start_period,
        limit,
        number_phases: None,
    }
}

pub fn period_with_phases(start_period: i32, limit: f32, phases: i32) -> ChargingSchedulePeriod {
    ChargingSchedulePeriod {
        start_period,
        limit,
        number_phases: Some(phases),
    }
}

/// Absolute profile in amps starting at `start`, periods supplied by the
/// test.
pub fn absolute_profile(
    id: i32,
    purpose: ChargingProfilePurposeType,
    stack_level: u32,
    start: DateTime<Utc>,
    duration: Option<i32>,
    periods: Vec<ChargingSchedulePeriod>,
) -> ChargingProfile {
    ChargingProfile {
        charging_profile_id: id,
        transaction_id: None,
        stack_level,
        charging_profile_purpose: purpose,
        charging_profile_kind: ChargingProfileKindType::Absolute,
        recurrency_kind: None,
        valid_from: None,
        valid_to: None,
        charging_schedule: ChargingSchedule {
            duration,
            start_schedule: Some(start),
            charging_rate_unit: ChargingRateUnitType::A,
            charging_schedule_period: periods,
            min_charging_rate: None,
        },
    }
}

pub fn relative_profile(
    id: i32,
    purpose: ChargingProfilePurposeType,
    stack_level: u32,
    duration: Option<i32>,
    periods: Vec<ChargingSchedulePeriod>,
) -> ChargingProfile {
    ChargingProfile {
        charging_profile_id: id,
        transaction_id: None,
        stack_level,
        charging_profile_purpose: purpose,
        charging_profile_kind: ChargingProfileKindType::Relative,
        recurrency_kind: None,
        valid_from: None,
        valid_to: None,
        charging_schedule: ChargingSchedule {
            duration,
            start_schedule: None,
            charging_rate_unit: ChargingRateUnitType::A,
            charging_schedule_period: periods,
            min_charging_rate: None,
        },
    }
}

pub fn recurring_profile(
    id: i32,
    purpose: ChargingProfilePurposeType,
    stack_level: u32,
    recurrency: RecurrencyKindType,
    start: DateTime<Utc>,
    duration: i32,
    periods: Vec<ChargingSchedulePeriod>,
) -> ChargingProfile {
    ChargingProfile {
        charging_profile_id: id,
        transaction_id: None,
        stack_level,
        charging_profile_purpose: purpose,
        charging_profile_kind: ChargingProfileKindType::Recurring,
        recurrency_kind: Some(recurrency),
        valid_from: None,
        valid_to: None,
        charging_schedule: ChargingSchedule {
            duration: Some(duration),
            start_schedule: Some(start),
            charging_rate_unit: ChargingRateUnitType::A,
            charging_schedule_period: periods,
            min_charging_rate: None,
        },
    }
}

mod charging_profile;
mod charging_profile_kind;
mod charging_profile_purpose;
mod charging_profile_status;
mod charging_rate_unit;
mod charging_schedule;
mod charging_schedule_period;
mod clear_charging_profile_status;
mod get_composite_schedule_status;
mod recurrency_kind;

pub use charging_profile::ChargingProfile;
pub use charging_profile_kind::ChargingProfileKindType;
pub use charging_profile_purpose::ChargingProfilePurposeType;
pub use charging_profile_status::ChargingProfileStatus;
pub use charging_rate_unit::ChargingRateUnitType;
pub use charging_schedule::ChargingSchedule;
pub use charging_schedule_period::ChargingSchedulePeriod;
pub use clear_charging_profile_status::ClearChargingProfileStatus;
pub use get_composite_schedule_status::GetCompositeScheduleStatus;
pub use recurrency_kind::RecurrencyKindType;

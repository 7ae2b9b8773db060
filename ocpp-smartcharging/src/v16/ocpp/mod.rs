mod clear_charging_profile;
mod get_composite_schedule;
mod set_charging_profile;

#![allow(dead_code)]

pub mod context;
pub mod profiles;
pub mod storage;

use std::sync::Once;

use chrono::{DateTime, TimeZone, Utc};
use evcp_smartcharging::v16::SmartChargingManager;
use log::LevelFilter;

use self::storage::MockDatabase;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Trace)
            .try_init()
            .ok();
    });
}

pub fn default_configs() -> Vec<(String, String)> {
    let configs = vec![
        ("NumberOfConnectors", "2"),
        ("ChargeProfileMaxStackLevel", "10"),
        ("ChargingScheduleMaxPeriods", "10"),
        ("MaxChargingProfilesInstalled", "10"),
        ("ChargingScheduleAllowedChargingRateUnit", "Current,Power"),
        ("OperatingVoltage", "230"),
    ];
    configs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn new_manager() -> SmartChargingManager<MockDatabase> {
    new_manager_with(MockDatabase::new(), vec![])
}

pub fn new_manager_with(
    db: MockDatabase,
    override_default_configs: Vec<(&str, &str)>,
) -> SmartChargingManager<MockDatabase> {
    init_logger();
    let mut configs = default_configs();
    for (key, value) in override_default_configs {
        configs.retain(|(k, _)| k != key);
        configs.push((key.to_string(), value.to_string()));
    }
    SmartChargingManager::new(db, configs)
}

/// Monday 2024-06-03 12:00:00 UTC; fixed so recurrence tests never depend on
/// the real clock.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap()
}

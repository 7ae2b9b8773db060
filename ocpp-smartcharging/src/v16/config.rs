use alloc::{string::String, vec, vec::Vec};

use evcp_core::v16::types::ChargingRateUnitType;

/// Smart-charging related OCPP configuration keys, built once from the
/// stored key/value pairs. Runtime reconfiguration goes through the
/// configuration subsystem and takes effect on the next restart.
pub struct SmartChargingConfigs {
    pub number_of_connectors: usize,
    pub charge_profile_max_stack_level: u32,
    pub charging_schedule_max_periods: usize,
    pub max_charging_profiles_installed: usize,
    pub allowed_rate_units: Vec<ChargingRateUnitType>,
    /// Nominal per-phase voltage used for A <-> W conversions.
    pub operating_voltage: f32,
}

impl Default for SmartChargingConfigs {
    fn default() -> Self {
        Self {
            number_of_connectors: 1,
            charge_profile_max_stack_level: 8,
            charging_schedule_max_periods: 24,
            max_charging_profiles_installed: 16,
            allowed_rate_units: vec![ChargingRateUnitType::A, ChargingRateUnitType::W],
            operating_voltage: 230.0,
        }
    }
}

impl SmartChargingConfigs {
    pub fn build(db_configs: Vec<(String, String)>) -> Self {
        let mut configs = Self::default();
        for (key, value) in db_configs {
            match key.as_str() {
                "NumberOfConnectors" => Self::set(&mut configs.number_of_connectors, &value),
                "ChargeProfileMaxStackLevel" => {
                    Self::set(&mut configs.charge_profile_max_stack_level, &value)
                }
                "ChargingScheduleMaxPeriods" => {
                    Self::set(&mut configs.charging_schedule_max_periods, &value)
                }
                "MaxChargingProfilesInstalled" => {
                    Self::set(&mut configs.max_charging_profiles_installed, &value)
                }
                "ChargingScheduleAllowedChargingRateUnit" => {
                    if let Some(units) = Self::parse_rate_units(&value) {
                        configs.allowed_rate_units = units;
                    }
                }
                "OperatingVoltage" => Self::set(&mut configs.operating_voltage, &value),
                _ => {}
            }
        }
        configs
    }

    pub fn unit_allowed(&self, unit: ChargingRateUnitType) -> bool {
        self.allowed_rate_units.contains(&unit)
    }

    fn set<T: core::str::FromStr>(slot: &mut T, raw: &str) {
        if let Ok(value) = raw.parse() {
            *slot = value;
        }
    }

    // The key holds "Current", "Power" or "Current,Power" on the wire.
    fn parse_rate_units(raw: &str) -> Option<Vec<ChargingRateUnitType>> {
        let mut units = Vec::new();
        for token in raw.split(',') {
            match token.trim() {
                "Current" => units.push(ChargingRateUnitType::A),
                "Power" => units.push(ChargingRateUnitType::W),
                "" => {}
                _ => return None,
            }
        }
        if units.is_empty() {
            None
        } else {
            Some(units)
        }
    }
}

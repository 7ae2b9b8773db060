use evcp_core::v16::types::ChargingRateUnitType;

/// Phase count assumed when a schedule period does not declare one and no
/// connector context is available.
pub const DEFAULT_NUMBER_PHASES: u32 = 3;

/// Converts `value`, expressed in the opposite rate unit, into `unit`,
/// assuming `number_phases` conductors at the nominal per-phase `voltage`.
pub fn convert_to_unit(
    value: f32,
    unit: ChargingRateUnitType,
    number_phases: u32,
    voltage: f32,
) -> f32 {
    match unit {
        ChargingRateUnitType::A => value / (number_phases as f32 * voltage),
        ChargingRateUnitType::W => value * number_phases as f32 * voltage,
    }
}

pub(crate) fn to_watts(
    value: f32,
    unit: ChargingRateUnitType,
    number_phases: u32,
    voltage: f32,
) -> f32 {
    match unit {
        ChargingRateUnitType::W => value,
        ChargingRateUnitType::A => value * number_phases as f32 * voltage,
    }
}

pub(crate) fn from_watts(
    watts: f32,
    unit: ChargingRateUnitType,
    number_phases: u32,
    voltage: f32,
) -> f32 {
    match unit {
        ChargingRateUnitType::W => watts,
        ChargingRateUnitType::A => watts / (number_phases as f32 * voltage),
    }
}

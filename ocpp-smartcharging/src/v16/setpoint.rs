use alloc::vec::Vec;
use chrono::{DateTime, Utc};
use evcp_core::v16::types::{ChargingProfile, ChargingProfilePurposeType, ChargingRateUnitType};

use super::{
    error::ProfileError,
    interface::{ChargePointContext, ConnectorContext, Database},
    manager::SmartChargingManager,
    resolver,
    store::ClearProfileFilter,
    units,
};

/// Instantaneous permitted charging rate for a connector or the whole charge
/// point.
#[derive(Clone, Debug, PartialEq)]
pub struct Setpoint {
    pub value: f32,
    pub unit: ChargingRateUnitType,
    pub number_phases: u32,
    /// Advisory floor from the governing profile.
    pub min_charging_rate: Option<f32>,
}

// watts, phases, advisory min rate in watts
type Demand = (f32, u32, Option<f32>);

impl<D: Database> SmartChargingManager<D> {
    /// Setpoints at the instant `now`. Both are absent only when no profile
    /// of any purpose applies, telling the caller to fall back to its static
    /// configuration. When the charging connectors together demand more than
    /// the charge-point setpoint allows, the excess is subtracted equally
    /// from each of them, recomputed on every call.
    pub fn get_setpoint(
        &self,
        ctx: &ChargePointContext,
        connector_id: usize,
        unit: ChargingRateUnitType,
        now: DateTime<Utc>,
    ) -> (Option<Setpoint>, Option<Setpoint>) {
        if ctx.connector(connector_id).is_none() {
            return (None, None);
        }
        let at = now.timestamp();
        let window = (at, at + 1);
        let voltage = self.configs.operating_voltage;

        let cp_connector = Self::charge_point_connector(ctx);
        let cp_candidates = self.store.query(
            0,
            &[ChargingProfilePurposeType::ChargePointMaxProfile],
            None,
            now,
        );
        let cp_set = resolver::materialize_set(
            &cp_candidates,
            ChargingProfilePurposeType::ChargePointMaxProfile,
            &cp_connector,
            window,
            voltage,
        );
        let cp_limit = resolver::instant_limit(&cp_set, at)
            .map(|span| (span.watts, span.number_phases, span.min_rate_w));
        let cp_watts = cp_limit.map(|(watts, _, _)| watts);

        // Per-connector demands; a connector in transaction without any
        // connector-level profile inherits the charge-point ceiling.
        let demands: Vec<Option<Demand>> = ctx
            .connectors
            .iter()
            .map(|connector| {
                self.connector_demand(connector, window, voltage, now)
                    .or_else(|| {
                        connector.transaction.as_ref()?;
                        cp_limit.map(|(watts, phases, _)| (watts, phases, None))
                    })
            })
            .collect();

        let charging: Vec<usize> = ctx
            .connectors
            .iter()
            .enumerate()
            .filter(|(idx, connector)| connector.charging && demands[*idx].is_some())
            .map(|(idx, _)| idx)
            .collect();
        let mut share = 0.0;
        if let Some(cp_watts) = cp_watts {
            let total: f32 = charging
                .iter()
                .map(|idx| demands[*idx].map(|(watts, _, _)| watts).unwrap_or(0.0))
                .sum();
            if total > cp_watts && !charging.is_empty() {
                share = (total - cp_watts) / charging.len() as f32;
            }
        }

        let idx = connector_id - 1;
        let connector_setpoint = demands[idx].map(|(watts, phases, min_rate)| {
            let mut watts = if charging.contains(&idx) {
                (watts - share).max(0.0)
            } else {
                watts
            };
            // the connector can never exceed the charge point as a whole
            if let Some(cp_watts) = cp_watts {
                watts = watts.min(cp_watts);
            }
            Setpoint {
                value: units::from_watts(watts, unit, phases, voltage),
                unit,
                number_phases: phases,
                min_charging_rate: min_rate.map(|w| units::from_watts(w, unit, phases, voltage)),
            }
        });
        let charge_point_setpoint = cp_limit.map(|(watts, phases, min_rate)| Setpoint {
            value: units::from_watts(watts, unit, phases, voltage),
            unit,
            number_phases: phases,
            min_charging_rate: min_rate.map(|w| units::from_watts(w, unit, phases, voltage)),
        });
        (charge_point_setpoint, connector_setpoint)
    }

    /// Installs a TxProfile ahead of its transaction; it stays pending and
    /// invisible to the resolver until a transaction id is assigned.
    pub fn install_tx_profile(
        &mut self,
        connector_id: usize,
        profile: ChargingProfile,
    ) -> Result<(), ProfileError> {
        log::debug!("install TxProfile on connector {}", connector_id);
        if profile.charging_profile_purpose != ChargingProfilePurposeType::TxProfile {
            return Err(ProfileError::PurposeMismatch);
        }
        if profile.transaction_id.is_some() {
            return Err(ProfileError::TransactionAlreadyBound);
        }
        if connector_id > self.configs.number_of_connectors {
            return Err(ProfileError::InvalidConnector);
        }
        self.store.add(connector_id, profile, &self.configs)
    }

    pub fn assign_pending_tx_profiles(&mut self, connector_id: usize, transaction_id: i32) {
        log::debug!(
            "assign pending TxProfiles on connector {} to transaction {}",
            connector_id,
            transaction_id
        );
        self.store
            .assign_pending_tx_profiles(connector_id, transaction_id);
    }

    /// Called at transaction end.
    pub fn clear_tx_profiles(&mut self, connector_id: usize) -> usize {
        log::debug!("clear TxProfiles on connector {}", connector_id);
        self.store
            .remove(&ClearProfileFilter::tx_profiles(connector_id))
    }

    fn connector_demand(
        &self,
        connector: &ConnectorContext,
        window: (i64, i64),
        voltage: f32,
        now: DateTime<Utc>,
    ) -> Option<Demand> {
        let transaction = connector.transaction.as_ref()?;
        let candidates = self.store.query(
            connector.connector_id,
            &[
                ChargingProfilePurposeType::TxProfile,
                ChargingProfilePurposeType::TxDefaultProfile,
            ],
            Some(transaction.transaction_id),
            now,
        );
        let tx_set = resolver::materialize_set(
            &candidates,
            ChargingProfilePurposeType::TxProfile,
            connector,
            window,
            voltage,
        );
        let tx_default_set = resolver::materialize_set(
            &candidates,
            ChargingProfilePurposeType::TxDefaultProfile,
            connector,
            window,
            voltage,
        );
        let span = resolver::instant_limit(&tx_set, window.0)
            .or_else(|| resolver::instant_limit(&tx_default_set, window.0))?;
        Some((span.watts, span.number_phases, span.min_rate_w))
    }
}

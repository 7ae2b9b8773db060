use alloc::{string::String, vec::Vec};
use chrono::{DateTime, Utc};
use evcp_core::v16::types::{ChargingProfile, ChargingProfilePurposeType, ChargingRateUnitType};

use super::{
    config::SmartChargingConfigs,
    error::ProfileError,
    interface::{ChargePointContext, ConnectorContext, Database},
    resolver::{self, ResolvedPeriod},
    store::{ClearProfileFilter, ProfileStore},
    units,
};

const ALL_PURPOSES: [ChargingProfilePurposeType; 3] = [
    ChargingProfilePurposeType::ChargePointMaxProfile,
    ChargingProfilePurposeType::TxDefaultProfile,
    ChargingProfilePurposeType::TxProfile,
];

/// Facade over the profile store and the schedule resolver. Owned by the
/// charge-point task, which serializes protocol requests and the periodic
/// cleanup tick through `&mut self`.
pub struct SmartChargingManager<D: Database> {
    pub(crate) store: ProfileStore<D>,
    pub(crate) configs: SmartChargingConfigs,
}

impl<D: Database> SmartChargingManager<D> {
    pub fn new(db: D, db_configs: Vec<(String, String)>) -> Self {
        let configs = SmartChargingConfigs::build(db_configs);
        let store = ProfileStore::new(db);
        log::debug!(
            "smart charging ready, {} stored profiles restored",
            store.installed_count()
        );
        Self { store, configs }
    }

    pub fn configs(&self) -> &SmartChargingConfigs {
        &self.configs
    }

    /// Read access to the installed profiles, e.g. for diagnostics queries.
    pub fn store(&self) -> &ProfileStore<D> {
        &self.store
    }

    pub fn install(
        &mut self,
        connector_id: usize,
        profile: ChargingProfile,
    ) -> Result<(), ProfileError> {
        if connector_id > self.configs.number_of_connectors {
            return Err(ProfileError::InvalidConnector);
        }
        self.store.add(connector_id, profile, &self.configs)
    }

    pub fn clear(&mut self, filter: &ClearProfileFilter) -> usize {
        self.store.remove(filter)
    }

    /// Periodic tick: expire stale profiles. The interval is owned by the
    /// external timer facility.
    pub fn cleanup(&mut self, ctx: &ChargePointContext, now: DateTime<Utc>) -> usize {
        let removed = self.store.cleanup(ctx, now);
        if !removed.is_empty() {
            log::debug!("expired {} charging profiles: {:?}", removed.len(), removed);
        }
        removed.len()
    }

    /// Composite schedule of a connector over [now, now + duration). None
    /// when no installed profile is active anywhere in the window.
    pub fn composite_schedule(
        &self,
        ctx: &ChargePointContext,
        connector_id: usize,
        unit: ChargingRateUnitType,
        now: DateTime<Utc>,
        duration: i64,
    ) -> Option<Vec<ResolvedPeriod>> {
        if !ctx.is_valid(connector_id) {
            return None;
        }
        let charge_point;
        let connector = match ctx.connector(connector_id) {
            Some(connector) => connector,
            // connector 0 addresses the charge point as a whole
            None => {
                charge_point = Self::charge_point_connector(ctx);
                &charge_point
            }
        };
        let candidates = self.candidates(ctx, connector_id, now);
        let (periods, active) = resolver::resolve_window(
            connector,
            unit,
            now,
            duration,
            &candidates,
            self.configs.operating_voltage,
        );
        if active {
            Some(periods)
        } else {
            None
        }
    }

    pub(crate) fn candidates(
        &self,
        ctx: &ChargePointContext,
        connector_id: usize,
        at: DateTime<Utc>,
    ) -> Vec<&ChargingProfile> {
        let active_transaction = ctx
            .connector(connector_id)
            .and_then(|c| c.transaction.as_ref())
            .map(|t| t.transaction_id);
        self.store
            .query(connector_id, &ALL_PURPOSES, active_transaction, at)
    }

    pub(crate) fn charge_point_connector(ctx: &ChargePointContext) -> ConnectorContext {
        ConnectorContext {
            connector_id: 0,
            number_phases: units::DEFAULT_NUMBER_PHASES,
            max_current: ctx.max_current,
            charging: false,
            transaction: None,
        }
    }
}

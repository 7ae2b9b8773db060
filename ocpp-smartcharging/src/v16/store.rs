use alloc::{string::ToString, vec, vec::Vec};
use chrono::{DateTime, TimeDelta, Utc};
use evcp_core::v16::types::{
    ChargingProfile, ChargingProfileKindType, ChargingProfilePurposeType,
};

use super::{
    config::SmartChargingConfigs,
    error::ProfileError,
    interface::{ChargePointContext, Database, TableOperation},
};

const PROFILES_TABLE: &str = "charging_profiles";

const PURPOSES: [ChargingProfilePurposeType; 3] = [
    ChargingProfilePurposeType::ChargePointMaxProfile,
    ChargingProfilePurposeType::TxDefaultProfile,
    ChargingProfilePurposeType::TxProfile,
];

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
pub(crate) struct InstalledProfile {
    pub connector_id: usize,
    pub profile: ChargingProfile,
}

/// Match criteria for `ProfileStore::remove`. Unset fields match everything,
/// so the default filter clears the whole store.
#[derive(Clone, Debug, Default)]
pub struct ClearProfileFilter {
    pub id: Option<i32>,
    pub connector_id: Option<usize>,
    pub purpose: Option<ChargingProfilePurposeType>,
    pub stack_level: Option<u32>,
}

impl ClearProfileFilter {
    pub fn by_id(id: i32) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }
    pub fn tx_profiles(connector_id: usize) -> Self {
        Self {
            connector_id: Some(connector_id),
            purpose: Some(ChargingProfilePurposeType::TxProfile),
            ..Self::default()
        }
    }
}

/// In-memory repository of installed charging profiles, one list per purpose,
/// each ordered by descending stack level. Every mutation is mirrored to the
/// persistence seam as a JSON row keyed by profile id.
pub struct ProfileStore<D: Database> {
    db: D,
    charge_point_max: Vec<InstalledProfile>,
    tx_default: Vec<InstalledProfile>,
    tx: Vec<InstalledProfile>,
}

impl<D: Database> ProfileStore<D> {
    pub fn new(mut db: D) -> Self {
        db.init();
        let mut store = Self {
            db,
            charge_point_max: Vec::new(),
            tx_default: Vec::new(),
            tx: Vec::new(),
        };
        store.load();
        store
    }

    /// Validates and installs a profile, replacing any existing profile with
    /// the same (connector, purpose, stack level).
    pub fn add(
        &mut self,
        connector_id: usize,
        profile: ChargingProfile,
        configs: &SmartChargingConfigs,
    ) -> Result<(), ProfileError> {
        Self::validate(&profile, configs)?;
        let replacing = self
            .list(profile.charging_profile_purpose)
            .iter()
            .any(|p| p.connector_id == connector_id && p.profile.stack_level == profile.stack_level);
        if !replacing && self.installed_count() >= configs.max_charging_profiles_installed {
            return Err(ProfileError::CapacityExceeded);
        }
        self.insert_entry(InstalledProfile {
            connector_id,
            profile,
        });
        Ok(())
    }

    /// Removes every profile matching the filter. Matching nothing is not an
    /// error, the count is simply 0.
    pub fn remove(&mut self, filter: &ClearProfileFilter) -> usize {
        let mut removed = 0;
        for purpose in PURPOSES {
            if filter.purpose.map_or(false, |p| p != purpose) {
                continue;
            }
            let (list, db) = self.parts(purpose);
            list.retain(|entry| {
                if Self::matches(filter, entry) {
                    Self::db_delete(db, entry.profile.charging_profile_id);
                    removed += 1;
                    false
                } else {
                    true
                }
            });
        }
        removed
    }

    /// Candidate profiles for one connector, ordered by evaluation
    /// precedence: TxProfile, then TxDefaultProfile, then
    /// ChargePointMaxProfile, descending stack level within a purpose.
    /// TxProfiles are only visible once bound to the ongoing transaction.
    pub fn query(
        &self,
        connector_id: usize,
        purposes: &[ChargingProfilePurposeType],
        active_transaction: Option<i32>,
        at: DateTime<Utc>,
    ) -> Vec<&ChargingProfile> {
        let mut out = Vec::new();
        for purpose in [
            ChargingProfilePurposeType::TxProfile,
            ChargingProfilePurposeType::TxDefaultProfile,
            ChargingProfilePurposeType::ChargePointMaxProfile,
        ] {
            if !purposes.contains(&purpose) {
                continue;
            }
            for entry in self.list(purpose) {
                if !Self::applies_to_connector(purpose, connector_id, entry) {
                    continue;
                }
                if entry.profile.valid_to.map_or(false, |t| t < at) {
                    continue;
                }
                if purpose == ChargingProfilePurposeType::TxProfile {
                    let bound = entry.profile.transaction_id;
                    if bound.is_none() || bound != active_transaction {
                        continue;
                    }
                }
                out.push(&entry.profile);
            }
        }
        out
    }

    /// Binds the pending TxProfiles of a connector to the now-known
    /// transaction. A pending profile installed on connector 0 is moved to
    /// the transaction's connector so that it is not reused.
    pub fn assign_pending_tx_profiles(&mut self, connector_id: usize, transaction_id: i32) {
        let mut rebound = Vec::new();
        let mut idx = 0;
        while idx < self.tx.len() {
            let entry = &self.tx[idx];
            if (entry.connector_id == 0 || entry.connector_id == connector_id)
                && entry.profile.transaction_id.is_none()
            {
                let mut entry = self.tx.remove(idx);
                Self::db_delete(&mut self.db, entry.profile.charging_profile_id);
                entry.connector_id = connector_id;
                entry.profile.transaction_id = Some(transaction_id);
                rebound.push(entry);
            } else {
                idx += 1;
            }
        }
        for entry in rebound {
            self.insert_entry(entry);
        }
    }

    /// Drops profiles whose validity has elapsed, Absolute schedules entirely
    /// in the past, and TxProfiles no longer bound to the connector's ongoing
    /// transaction. Returns the removed profile ids.
    pub fn cleanup(&mut self, ctx: &ChargePointContext, now: DateTime<Utc>) -> Vec<i32> {
        let mut removed_ids = Vec::new();
        for purpose in PURPOSES {
            let (list, db) = self.parts(purpose);
            list.retain(|entry| {
                let schedule = &entry.profile.charging_schedule;
                let mut expired = entry.profile.valid_to.map_or(false, |t| t < now);
                if !expired
                    && entry.profile.charging_profile_kind == ChargingProfileKindType::Absolute
                {
                    if let (Some(start), Some(duration)) =
                        (schedule.start_schedule, schedule.duration)
                    {
                        expired = start + TimeDelta::seconds(duration as i64) < now;
                    }
                }
                if !expired && purpose == ChargingProfilePurposeType::TxProfile {
                    if let Some(bound) = entry.profile.transaction_id {
                        let active = ctx
                            .connector(entry.connector_id)
                            .and_then(|c| c.transaction.as_ref())
                            .map(|t| t.transaction_id);
                        expired = active != Some(bound);
                    }
                }
                if expired {
                    let id = entry.profile.charging_profile_id;
                    Self::db_delete(db, id);
                    removed_ids.push(id);
                    false
                } else {
                    true
                }
            });
        }
        removed_ids
    }

    pub fn installed_count(&self) -> usize {
        self.charge_point_max.len() + self.tx_default.len() + self.tx.len()
    }

    pub(crate) fn validate(
        profile: &ChargingProfile,
        configs: &SmartChargingConfigs,
    ) -> Result<(), ProfileError> {
        let schedule = &profile.charging_schedule;
        let periods = &schedule.charging_schedule_period;
        if periods.is_empty() {
            return Err(ProfileError::EmptySchedule);
        }
        if periods[0].start_period != 0 {
            return Err(ProfileError::MissingInitialPeriod);
        }
        if !periods
            .windows(2)
            .all(|w| w[0].start_period < w[1].start_period)
        {
            return Err(ProfileError::UnsortedPeriods);
        }
        if schedule.duration.map_or(false, |d| d <= 0) {
            return Err(ProfileError::NonPositiveDuration);
        }
        if periods.len() > configs.charging_schedule_max_periods {
            return Err(ProfileError::TooManyPeriods);
        }
        if profile.stack_level > configs.charge_profile_max_stack_level {
            return Err(ProfileError::StackLevelExceeded);
        }
        if !configs.unit_allowed(schedule.charging_rate_unit) {
            return Err(ProfileError::UnsupportedRateUnit);
        }
        if profile.charging_profile_kind == ChargingProfileKindType::Recurring
            && (schedule.start_schedule.is_none() || schedule.duration.is_none())
        {
            return Err(ProfileError::MissingRecurrenceSchedule);
        }
        Ok(())
    }

    fn insert_entry(&mut self, entry: InstalledProfile) {
        let purpose = entry.profile.charging_profile_purpose;
        let (list, db) = self.parts(purpose);
        if let Some(pos) = list.iter().position(|p| {
            p.connector_id == entry.connector_id
                && p.profile.stack_level == entry.profile.stack_level
        }) {
            let old = list.remove(pos);
            if old.profile.charging_profile_id != entry.profile.charging_profile_id {
                Self::db_delete(db, old.profile.charging_profile_id);
            }
        }
        Self::db_store(db, &entry);
        let pos = list
            .iter()
            .position(|p| p.profile.stack_level < entry.profile.stack_level)
            .unwrap_or(list.len());
        list.insert(pos, entry);
    }

    fn matches(filter: &ClearProfileFilter, entry: &InstalledProfile) -> bool {
        filter
            .id
            .map_or(true, |id| entry.profile.charging_profile_id == id)
            && filter.connector_id.map_or(true, |c| entry.connector_id == c)
            && filter
                .stack_level
                .map_or(true, |l| entry.profile.stack_level == l)
    }

    fn applies_to_connector(
        purpose: ChargingProfilePurposeType,
        connector_id: usize,
        entry: &InstalledProfile,
    ) -> bool {
        match purpose {
            ChargingProfilePurposeType::ChargePointMaxProfile => entry.connector_id == 0,
            _ => entry.connector_id == connector_id || entry.connector_id == 0,
        }
    }

    fn list(&self, purpose: ChargingProfilePurposeType) -> &Vec<InstalledProfile> {
        match purpose {
            ChargingProfilePurposeType::ChargePointMaxProfile => &self.charge_point_max,
            ChargingProfilePurposeType::TxDefaultProfile => &self.tx_default,
            ChargingProfilePurposeType::TxProfile => &self.tx,
        }
    }

    fn parts(
        &mut self,
        purpose: ChargingProfilePurposeType,
    ) -> (&mut Vec<InstalledProfile>, &mut D) {
        match purpose {
            ChargingProfilePurposeType::ChargePointMaxProfile => {
                (&mut self.charge_point_max, &mut self.db)
            }
            ChargingProfilePurposeType::TxDefaultProfile => (&mut self.tx_default, &mut self.db),
            ChargingProfilePurposeType::TxProfile => (&mut self.tx, &mut self.db),
        }
    }

    fn db_store(db: &mut D, entry: &InstalledProfile) {
        let key = entry.profile.charging_profile_id.to_string();
        let value = serde_json::to_string(entry).unwrap();
        db.transaction(PROFILES_TABLE, vec![TableOperation::insert(key, value)]);
    }

    fn db_delete(db: &mut D, profile_id: i32) {
        db.transaction(
            PROFILES_TABLE,
            vec![TableOperation::delete(profile_id.to_string())],
        );
    }

    fn load(&mut self) {
        let rows = self.db.get_all(PROFILES_TABLE);
        for (key, value) in rows {
            match serde_json::from_str::<InstalledProfile>(&value) {
                Ok(entry) => match entry.profile.charging_profile_purpose {
                    ChargingProfilePurposeType::ChargePointMaxProfile => {
                        self.charge_point_max.push(entry)
                    }
                    ChargingProfilePurposeType::TxDefaultProfile => self.tx_default.push(entry),
                    ChargingProfilePurposeType::TxProfile => self.tx.push(entry),
                },
                Err(_) => {
                    log::warn!("dropping unreadable profile row {}", key);
                }
            }
        }
        for list in [
            &mut self.charge_point_max,
            &mut self.tx_default,
            &mut self.tx,
        ] {
            list.sort_by(|a, b| b.profile.stack_level.cmp(&a.profile.stack_level));
        }
    }
}

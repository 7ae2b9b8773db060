use evcp_core::v16::{
    messages::clear_charging_profile::{
        ClearChargingProfileRequest, ClearChargingProfileResponse,
    },
    types::ClearChargingProfileStatus,
};

use super::super::{
    interface::Database, manager::SmartChargingManager, store::ClearProfileFilter,
};

impl<D: Database> SmartChargingManager<D> {
    pub fn clear_charging_profile_ocpp(
        &mut self,
        req: ClearChargingProfileRequest,
    ) -> ClearChargingProfileResponse {
        log::info!(
            "ClearChargingProfile requested: id = {:?} - connectorId = {:?} - chargingProfilePurpose = {:?} - stackLevel = {:?}",
            req.id,
            req.connector_id,
            req.charging_profile_purpose,
            req.stack_level
        );
        let filter = ClearProfileFilter {
            id: req.id,
            connector_id: req.connector_id,
            purpose: req.charging_profile_purpose,
            stack_level: req.stack_level,
        };
        let removed = self.clear(&filter);
        let status = if removed > 0 {
            ClearChargingProfileStatus::Accepted
        } else {
            ClearChargingProfileStatus::Unknown
        };
        log::info!("ClearChargingProfile removed {} profiles", removed);
        ClearChargingProfileResponse { status }
    }
}

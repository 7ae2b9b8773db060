use evcp_core::v16::{
    messages::set_charging_profile::{SetChargingProfileRequest, SetChargingProfileResponse},
    types::{ChargingProfilePurposeType, ChargingProfileStatus},
};

use super::super::{
    error::ProfileError,
    interface::{ChargePointContext, Database},
    manager::SmartChargingManager,
};

impl<D: Database> SmartChargingManager<D> {
    pub fn set_charging_profile_ocpp(
        &mut self,
        req: SetChargingProfileRequest,
        ctx: &ChargePointContext,
    ) -> SetChargingProfileResponse {
        log::info!(
            "SetChargingProfile requested: chargingProfileId = {} - connectorId = {} - chargingProfilePurpose = {:?} - stackLevel = {}",
            req.cs_charging_profiles.charging_profile_id,
            req.connector_id,
            req.cs_charging_profiles.charging_profile_purpose,
            req.cs_charging_profiles.stack_level
        );
        let status = match self.handle_set_charging_profile(req, ctx) {
            Ok(()) => ChargingProfileStatus::Accepted,
            Err(reason) => {
                log::warn!("SetChargingProfile rejected: {}", reason);
                ChargingProfileStatus::Rejected
            }
        };
        SetChargingProfileResponse { status }
    }

    fn handle_set_charging_profile(
        &mut self,
        req: SetChargingProfileRequest,
        ctx: &ChargePointContext,
    ) -> Result<(), ProfileError> {
        if !ctx.is_valid(req.connector_id) {
            return Err(ProfileError::InvalidConnector);
        }
        let mut profile = req.cs_charging_profiles;
        match profile.charging_profile_purpose {
            ChargingProfilePurposeType::ChargePointMaxProfile => {
                // charge point profiles must always target connector 0
                if req.connector_id != 0 {
                    return Err(ProfileError::InvalidConnector);
                }
            }
            ChargingProfilePurposeType::TxDefaultProfile => {}
            ChargingProfilePurposeType::TxProfile => {
                let active = ctx
                    .connector(req.connector_id)
                    .and_then(|c| c.transaction.as_ref())
                    .ok_or(ProfileError::NoActiveTransaction)?;
                match profile.transaction_id {
                    None => profile.transaction_id = Some(active.transaction_id),
                    Some(id) if id != active.transaction_id => {
                        return Err(ProfileError::TransactionMismatch)
                    }
                    Some(_) => {}
                }
            }
        }
        self.install(req.connector_id, profile)
    }
}

use alloc::vec::Vec;
use chrono::{DateTime, Utc};
use evcp_core::v16::{
    messages::get_composite_schedule::{
        GetCompositeScheduleRequest, GetCompositeScheduleResponse,
    },
    types::{
        ChargingRateUnitType, ChargingSchedule, ChargingSchedulePeriod,
        GetCompositeScheduleStatus,
    },
};

use super::super::{
    interface::{ChargePointContext, Database},
    manager::SmartChargingManager,
};

impl<D: Database> SmartChargingManager<D> {
    pub fn get_composite_schedule_ocpp(
        &self,
        req: GetCompositeScheduleRequest,
        ctx: &ChargePointContext,
        now: DateTime<Utc>,
    ) -> GetCompositeScheduleResponse {
        log::info!(
            "GetCompositeSchedule requested: connectorId = {} - duration = {} - chargingRateUnit = {:?}",
            req.connector_id,
            req.duration,
            req.charging_rate_unit
        );
        let unit = req.charging_rate_unit.unwrap_or(ChargingRateUnitType::A);
        let periods = self.composite_schedule(
            ctx,
            req.connector_id,
            unit,
            now,
            req.duration.max(0) as i64,
        );
        match periods {
            Some(periods) => {
                let charging_schedule_period: Vec<ChargingSchedulePeriod> = periods
                    .iter()
                    .map(|p| ChargingSchedulePeriod {
                        start_period: (p.start - now).num_seconds() as i32,
                        limit: p.limit,
                        number_phases: Some(p.number_phases as i32),
                    })
                    .collect();
                GetCompositeScheduleResponse {
                    status: GetCompositeScheduleStatus::Accepted,
                    connector_id: Some(req.connector_id),
                    schedule_start: Some(now),
                    charging_schedule: Some(ChargingSchedule {
                        duration: Some(req.duration),
                        start_schedule: Some(now),
                        charging_rate_unit: unit,
                        charging_schedule_period,
                        min_charging_rate: None,
                    }),
                }
            }
            None => {
                // no active profile anywhere in the window
                GetCompositeScheduleResponse {
                    status: GetCompositeScheduleStatus::Rejected,
                    connector_id: None,
                    schedule_start: None,
                    charging_schedule: None,
                }
            }
        }
    }
}

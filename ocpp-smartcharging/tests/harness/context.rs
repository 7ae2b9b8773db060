use chrono::{DateTime, Utc};
use evcp_smartcharging::v16::{ChargePointContext, ConnectorContext, TransactionContext};

pub const CP_MAX_CURRENT: f32 = 63.0;
pub const CONNECTOR_MAX_CURRENT: f32 = 32.0;

pub fn idle_connector(connector_id: usize) -> ConnectorContext {
    ConnectorContext {
        connector_id,
        number_phases: 3,
        max_current: CONNECTOR_MAX_CURRENT,
        charging: false,
        transaction: None,
    }
}

pub fn charging_connector(
    connector_id: usize,
    transaction_id: i32,
    started_at: DateTime<Utc>,
) -> ConnectorContext {
    ConnectorContext {
        connector_id,
        number_phases: 3,
        max_current: CONNECTOR_MAX_CURRENT,
        charging: true,
        transaction: Some(TransactionContext {
            transaction_id,
            started_at,
        }),
    }
}

pub fn charge_point(connectors: Vec<ConnectorContext>) -> ChargePointContext {
    ChargePointContext {
        max_current: CP_MAX_CURRENT,
        connectors,
    }
}

/// Two idle connectors, nobody charging.
pub fn idle_charge_point() -> ChargePointContext {
    charge_point(vec![idle_connector(1), idle_connector(2)])
}

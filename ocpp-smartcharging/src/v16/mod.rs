mod config;
mod error;
mod interface;
mod manager;
mod ocpp;
mod resolver;
mod setpoint;
mod store;
mod units;

pub use config::SmartChargingConfigs;
pub use error::ProfileError;
pub use interface::{
    ChargePointContext, ConnectorContext, Database, TableOperation, TransactionContext,
};
pub use manager::SmartChargingManager;
pub use resolver::{resolve, ResolvedPeriod};
pub use setpoint::Setpoint;
pub use store::{ClearProfileFilter, ProfileStore};
pub use units::{convert_to_unit, DEFAULT_NUMBER_PHASES};

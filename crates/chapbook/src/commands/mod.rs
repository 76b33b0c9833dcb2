//! CLI command implementations.

pub(crate) mod convert;
pub(crate) mod migrate;

pub(crate) use convert::ConvertArgs;
pub(crate) use migrate::MigrateArgs;

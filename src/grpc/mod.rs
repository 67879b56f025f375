//! Generated gRPC types plus conversions between them and the crate's own types.
mod conversions;

include!("../../generated/ha_invoker.rs");

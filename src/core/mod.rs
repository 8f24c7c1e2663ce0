//! Bridge core: configuration, construction and subscription entry points.
//!
//! The public API from this module is [`Bridge`] (with [`BridgeBuilder`] and
//! [`BridgeConfig`]). Internally, [`RouteScope`] carries per-subscription
//! routing state shared by the producer runner and the consumer invoker.

mod bridge;
mod builder;
mod config;
mod scope;

pub use bridge::Bridge;
pub use builder::BridgeBuilder;
pub use config::BridgeConfig;
pub(crate) use scope::RouteScope;

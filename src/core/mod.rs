pub mod cascade;
pub mod engine;
pub mod namespace;
pub mod pipeline;
pub mod reachability;
pub mod siblings;

pub use crate::domain::model::{Diagnostics, LinkDecision, LinkOutcome, PartnerLinkDecl, SweepReport};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;

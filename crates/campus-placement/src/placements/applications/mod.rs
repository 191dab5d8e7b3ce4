//! Application lifecycle: the apply gate and the review state machine.

pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use repository::{
    ApplicationStatusView, NoticeError, NoticePublisher, PlacementNotice, PlacementRepository,
    RepositoryError,
};
pub use router::placement_router;
pub use service::{Decision, PlacementService, PlacementServiceError};

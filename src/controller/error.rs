//! Request rejections.

use crate::core::{Identity, Phase};
use thiserror::Error;

/// Why the controller rejected a request.
///
/// A rejected request leaves the controller exactly as it was.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CrossingError {
    #[error("'{caller}' is not the infrastructure operator")]
    NotOperator { caller: Identity },

    #[error("'{caller}' is not an authorized train")]
    NotAuthorizedTrain { caller: Identity },

    /// Carries the phase the request observed after the lazy timer check.
    #[error("crossing is not free to cross (observed phase: {observed})")]
    NotFreeToCross { observed: Phase },

    #[error("crossing is full ({max_cars} cars hold permission)")]
    CrossingFull { max_cars: usize },
}

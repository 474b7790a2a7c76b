//! Client-side interaction core: location acquisition, the pending-creation
//! state machine, and the event loop that ties them to a facility repository.

pub mod controller;
pub mod error;
pub mod location;
pub mod session;

pub use controller::{
    MapInteractionController, Mode, PendingCreation, SubmissionState, SubmitTicket,
};
pub use error::{AppError, LocationError};
pub use location::{
    ConfiguredPosition, LocationProvider, LocationState, PositionSource, Resolution,
};
pub use session::{Session, UiEvent, View, Viewport};

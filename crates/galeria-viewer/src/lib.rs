//! Bindings for the external zoomable-image viewer widget.
//!
//! The viewer itself is a third-party component; this crate describes its
//! documented object boundary (camera control, observable state stores,
//! markers and tours) and provides the two primitives the site's glue code
//! is built on: the observable [`Store`] and the lifecycle-bound
//! [`CountdownTimer`].

pub mod camera;
pub mod model;
pub mod state;
pub mod store;
pub mod timer;

pub use camera::{completion, Camera, Completion, CompletionHandle, FlightOptions, View};
pub use state::{ImageState, MainState, StateSnapshot};
pub use store::{Store, Subscription};
pub use timer::CountdownTimer;

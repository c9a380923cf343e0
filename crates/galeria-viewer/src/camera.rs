//! Camera boundary of the external viewer.
//!
//! The widget owns the actual camera; embedders drive it through this trait.
//! Every animated operation hands back a [`Completion`] that resolves once,
//! when the animation finishes, with no intermediate progress reporting.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

/// A viewport rectangle `[x0, y0, x1, y1]` in relative image coordinates.
pub type View = [f64; 4];

/// Options shared by the animated camera operations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlightOptions {
    /// Forced animation duration in milliseconds; the camera picks one
    /// from its speed setting when absent.
    pub duration_ms: Option<f64>,
    /// Non-default camera speed factor.
    pub speed: Option<f64>,
    /// Zoom out and back in during the animation.
    pub is_jump: bool,
}

/// Completion signal of a camera animation.
///
/// Resolves when the animation finishes. An animation whose driving side
/// goes away (interrupted, viewer torn down) also counts as finished, so
/// awaiting can never hang on an abandoned flight.
pub struct Completion {
    receiver: oneshot::Receiver<()>,
}

impl Future for Completion {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(_) => Poll::Ready(()),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Sending side of a [`Completion`], held by the camera implementation.
pub struct CompletionHandle {
    sender: oneshot::Sender<()>,
}

impl CompletionHandle {
    /// Mark the animation as finished.
    pub fn finish(self) {
        let _ = self.sender.send(());
    }
}

/// Create a linked completion pair.
pub fn completion() -> (CompletionHandle, Completion) {
    let (sender, receiver) = oneshot::channel();
    (CompletionHandle { sender }, Completion { receiver })
}

/// Control surface of the viewer's virtual camera.
///
/// Read operations reflect the camera's current state; the `fly_*`, `zoom`
/// and `jump_to_view` operations animate and report through [`Completion`].
pub trait Camera: Send + Sync {
    /// Current viewport, if the camera has one yet.
    fn get_view(&self) -> Option<View>;

    /// Jump the viewport without animating. `no_limit` allows leaving the
    /// image boundaries.
    fn set_view(&self, view: View, no_limit: bool);

    /// Image coordinates under a screen pixel.
    fn coo_at(&self, x: f64, y: f64) -> (f64, f64);

    /// Screen pixel of an image coordinate.
    fn xy_at(&self, x: f64, y: f64) -> (f64, f64);

    /// Current zoom scale.
    fn scale(&self) -> f64;

    /// Whether the camera is zoomed in to its limit.
    fn is_zoomed_in(&self) -> bool;

    /// Whether the camera shows the full image.
    fn is_zoomed_out(&self) -> bool;

    /// Animate to a viewport.
    fn fly_to_view(&self, view: View, options: FlightOptions) -> Completion;

    /// Animate to the full image view.
    fn fly_to_full_view(&self, options: FlightOptions) -> Completion;

    /// Animate to a screen-covering view.
    fn fly_to_cover_view(&self, options: FlightOptions) -> Completion;

    /// Animate to center a coordinate, optionally at a target scale.
    fn fly_to_coo(&self, x: f64, y: f64, scale: Option<f64>, options: FlightOptions)
        -> Completion;

    /// Animated zoom by `delta`, focused on an optional screen point.
    fn zoom(&self, delta: f64, focus: Option<(f64, f64)>, options: FlightOptions) -> Completion;

    /// Pan by a relative number of screen pixels.
    fn pan(&self, dx: f64, dy: f64, duration_ms: Option<f64>);

    /// Stop any running animation.
    fn stop(&self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Camera double that records flights and finishes them on demand.
    struct RecordingCamera {
        view: Mutex<Option<View>>,
        flights: Mutex<Vec<CompletionHandle>>,
    }

    impl RecordingCamera {
        fn new() -> Self {
            Self {
                view: Mutex::new(None),
                flights: Mutex::new(Vec::new()),
            }
        }

        fn begin_flight(&self) -> Completion {
            let (handle, done) = completion();
            self.flights.lock().unwrap().push(handle);
            done
        }

        fn finish_all(&self) {
            for handle in self.flights.lock().unwrap().drain(..) {
                handle.finish();
            }
        }
    }

    impl Camera for RecordingCamera {
        fn get_view(&self) -> Option<View> {
            *self.view.lock().unwrap()
        }

        fn set_view(&self, view: View, _no_limit: bool) {
            *self.view.lock().unwrap() = Some(view);
        }

        fn coo_at(&self, x: f64, y: f64) -> (f64, f64) {
            (x, y)
        }

        fn xy_at(&self, x: f64, y: f64) -> (f64, f64) {
            (x, y)
        }

        fn scale(&self) -> f64 {
            1.0
        }

        fn is_zoomed_in(&self) -> bool {
            false
        }

        fn is_zoomed_out(&self) -> bool {
            true
        }

        fn fly_to_view(&self, view: View, _options: FlightOptions) -> Completion {
            self.set_view(view, false);
            self.begin_flight()
        }

        fn fly_to_full_view(&self, _options: FlightOptions) -> Completion {
            self.begin_flight()
        }

        fn fly_to_cover_view(&self, _options: FlightOptions) -> Completion {
            self.begin_flight()
        }

        fn fly_to_coo(
            &self,
            _x: f64,
            _y: f64,
            _scale: Option<f64>,
            _options: FlightOptions,
        ) -> Completion {
            self.begin_flight()
        }

        fn zoom(
            &self,
            _delta: f64,
            _focus: Option<(f64, f64)>,
            _options: FlightOptions,
        ) -> Completion {
            self.begin_flight()
        }

        fn pan(&self, _dx: f64, _dy: f64, _duration_ms: Option<f64>) {}

        fn stop(&self) {
            self.finish_all();
        }
    }

    #[tokio::test]
    async fn completion_resolves_when_animation_finishes() {
        let camera = RecordingCamera::new();
        let done = camera.fly_to_view([0.0, 0.0, 1.0, 1.0], FlightOptions::default());

        assert_eq!(camera.get_view(), Some([0.0, 0.0, 1.0, 1.0]));

        camera.finish_all();
        done.await;
    }

    #[tokio::test]
    async fn completion_resolves_when_the_flight_is_abandoned() {
        let (handle, done) = completion();
        drop(handle);
        // Must not hang: a torn-down animation counts as finished.
        done.await;
    }

    #[tokio::test]
    async fn stop_finishes_outstanding_flights() {
        let camera = RecordingCamera::new();
        let first = camera.zoom(1.0, None, FlightOptions::default());
        let second = camera.fly_to_full_view(FlightOptions {
            duration_ms: Some(250.0),
            ..Default::default()
        });

        camera.stop();

        first.await;
        second.await;
    }
}

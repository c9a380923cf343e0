//! Kiosk channel for museum floor displays.
//!
//! Each display keeps a WebSocket open while it is showing the site. The
//! server mirrors that display's viewer state and owns its inactivity
//! countdown: visitor input resets the countdown, expiry sends the display
//! back to the attract screen, and disconnecting cancels everything.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use galeria_viewer::model::{ActiveTour, Marker};
use galeria_viewer::{CountdownTimer, MainState};

/// Messages sent to a kiosk display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KioskMessage {
    /// Connection established.
    Connected,

    /// The inactivity window elapsed; return to the attract screen.
    Attract,
}

/// Events reported by a kiosk display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Any visitor input (pointer, touch, key).
    Activity,

    /// The viewer opened a marker.
    MarkerOpened { marker: Marker },

    /// The opened marker was closed.
    MarkerClosed,

    /// A tour started playing.
    TourStarted { tour: ActiveTour },

    /// The running tour ended or was closed.
    TourEnded,
}

/// Server-side session for one connected display.
///
/// Opening the session arms the inactivity countdown; dropping it cancels
/// any pending countdown, so a disconnect can never fire a late attract.
pub struct KioskSession {
    state: MainState,
    timer: CountdownTimer,
}

impl KioskSession {
    /// Open a session. When the countdown expires, [`KioskMessage::Attract`]
    /// is queued on `outbox`; the connection task delivers it and calls
    /// [`KioskSession::to_attract`].
    pub fn open(idle_timeout: Duration, outbox: mpsc::Sender<KioskMessage>) -> Self {
        let timer = CountdownTimer::start(idle_timeout, move || {
            // Expiry only queues the message; the session task delivers it.
            let _ = outbox.try_send(KioskMessage::Attract);
        });
        Self {
            state: MainState::new(),
            timer,
        }
    }

    /// The mirrored viewer state of this display.
    pub fn state(&self) -> &MainState {
        &self.state
    }

    /// Whether the inactivity countdown is currently armed.
    pub fn is_armed(&self) -> bool {
        self.timer.is_pending()
    }

    /// Apply a display event. Every event counts as visitor activity and
    /// restarts the inactivity window.
    pub fn apply(&mut self, event: ClientEvent) {
        self.timer.reset();
        match event {
            ClientEvent::Activity => {}
            ClientEvent::MarkerOpened { marker } => self.state.marker.set(Some(marker)),
            ClientEvent::MarkerClosed => self.state.marker.set(None),
            ClientEvent::TourStarted { tour } => self.state.tour.set(Some(tour)),
            ClientEvent::TourEnded => self.state.tour.set(None),
        }
    }

    /// Return the display to its attract state: close tour and marker and
    /// park the countdown until the next visitor event re-arms it.
    pub fn to_attract(&mut self) {
        self.timer.cancel();
        self.state.clear();
    }
}

/// Generate the client-side kiosk script.
///
/// Wires visitor input to activity events and handles the attract message
/// by returning to the home screen.
pub fn kiosk_client_script(ws_url: &str) -> String {
    format!(
        r#"
(function() {{
  'use strict';

  var ws = new WebSocket('{}');
  var lastActivity = 0;

  function reportActivity() {{
    var now = Date.now();
    if (now - lastActivity < 1000 || ws.readyState !== WebSocket.OPEN) return;
    lastActivity = now;
    ws.send(JSON.stringify({{ type: 'activity' }}));
  }}

  ['pointerdown', 'pointermove', 'keydown', 'touchstart', 'wheel'].forEach(function(name) {{
    window.addEventListener(name, reportActivity, {{ passive: true }});
  }});

  ws.onmessage = function(event) {{
    var msg = JSON.parse(event.data);

    switch (msg.type) {{
      case 'attract':
        if (location.pathname !== '/') {{
          location.href = '/';
        }}
        break;

      case 'connected':
        console.log('[kiosk] Connected');
        break;
    }}
  }};

  ws.onclose = function() {{
    // The display keeps working without the kiosk channel; reconnect by
    // reloading after a grace period.
    setTimeout(function() {{ location.reload(); }}, 10000);
  }};
}})();
"#,
        ws_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn open_session(idle_ms: u64) -> (KioskSession, mpsc::Receiver<KioskMessage>) {
        let (tx, rx) = mpsc::channel(8);
        (KioskSession::open(Duration::from_millis(idle_ms), tx), rx)
    }

    async fn advance(ms: u64) {
        tokio::time::advance(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    fn marker(id: &str) -> Marker {
        serde_json::from_value(json!({ "id": id, "x": 0.5, "y": 0.5 })).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn idle_expiry_queues_an_attract_message() {
        let (_session, mut rx) = open_session(5000);
        tokio::task::yield_now().await;

        advance(4999).await;
        assert!(rx.try_recv().is_err());

        advance(1).await;
        assert!(matches!(rx.try_recv(), Ok(KioskMessage::Attract)));
    }

    #[tokio::test(start_paused = true)]
    async fn visitor_activity_defers_the_attract() {
        let (mut session, mut rx) = open_session(5000);
        tokio::task::yield_now().await;

        advance(3000).await;
        session.apply(ClientEvent::Activity);
        tokio::task::yield_now().await;

        advance(4999).await;
        assert!(rx.try_recv().is_err(), "attract fired before t=8000");

        advance(1).await;
        assert!(matches!(rx.try_recv(), Ok(KioskMessage::Attract)));
    }

    #[tokio::test(start_paused = true)]
    async fn events_mirror_the_viewer_state() {
        let (mut session, _rx) = open_session(5000);
        tokio::task::yield_now().await;

        session.apply(ClientEvent::MarkerOpened { marker: marker("m-1") });
        assert_eq!(session.state().snapshot().marker.as_deref(), Some("m-1"));

        session.apply(ClientEvent::MarkerClosed);
        assert_eq!(session.state().snapshot().marker, None);
    }

    #[tokio::test(start_paused = true)]
    async fn attract_clears_state_and_parks_the_countdown() {
        let (mut session, mut rx) = open_session(1000);
        tokio::task::yield_now().await;

        session.apply(ClientEvent::MarkerOpened { marker: marker("m-1") });
        tokio::task::yield_now().await;
        advance(1000).await;
        assert!(matches!(rx.try_recv(), Ok(KioskMessage::Attract)));

        session.to_attract();
        assert_eq!(session.state().snapshot().marker, None);
        assert!(!session.is_armed());

        // Parked: no further attract without new activity.
        advance(5000).await;
        assert!(rx.try_recv().is_err());

        // The next visitor event re-arms the countdown.
        session.apply(ClientEvent::Activity);
        tokio::task::yield_now().await;
        advance(1000).await;
        assert!(matches!(rx.try_recv(), Ok(KioskMessage::Attract)));
    }

    #[tokio::test(start_paused = true)]
    async fn disconnect_cancels_the_countdown() {
        let (session, mut rx) = open_session(1000);
        tokio::task::yield_now().await;

        drop(session);
        advance(5000).await;

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn client_script_embeds_the_socket_url() {
        let script = kiosk_client_script("ws://127.0.0.1:3000/kiosk");

        assert!(script.contains("ws://127.0.0.1:3000/kiosk"));
        assert!(script.contains("'attract'"));
    }
}

//! Application state and interaction logic.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::warn;

use sensorwatch_core::{AcquisitionSession, CommandClient};
use sensorwatch_types::Quantity;

use crate::settings::Settings;
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Gauges with the latest reading per quantity.
    Dashboard,
    /// Rolling history charts per quantity.
    History,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Dashboard => View::History,
            View::History => View::Dashboard,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::History => "History",
        }
    }
}

/// Result of an actuator command round trip, reported back to the UI thread.
#[derive(Debug)]
enum CommandOutcome {
    /// The relay acknowledged the requested state.
    Acknowledged(bool),
    /// The command did not take effect.
    Failed(String),
}

/// Main application state.
///
/// Owns one acquisition session per quantity. Sessions are pumped from
/// [`App::tick`] on the UI thread; nothing else mutates reading state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    /// A blocking alert; input is captured until it is dismissed.
    pub alert: Option<String>,
    pub settings: Settings,
    pub theme: Theme,

    sessions: Vec<AcquisitionSession>,
    command: CommandClient,
    actuator_on: bool,
    command_in_flight: bool,
    command_tx: mpsc::UnboundedSender<CommandOutcome>,
    command_rx: mpsc::UnboundedReceiver<CommandOutcome>,

    // Status message (temporary feedback)
    status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App from loaded settings. Sessions start idle.
    pub fn new(settings: Settings) -> Self {
        let sessions = Quantity::ALL
            .iter()
            .map(|&quantity| {
                let mut session = AcquisitionSession::with_history_capacity(
                    quantity,
                    settings.history_capacity,
                );
                session.configure(settings.session_config(quantity));
                session
            })
            .collect();
        let command = CommandClient::new(settings.command_endpoint());
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        Self {
            running: true,
            current_view: View::Dashboard,
            show_help: false,
            alert: None,
            settings,
            theme: Theme::auto_detect(),
            sessions,
            command,
            actuator_on: false,
            command_in_flight: false,
            command_tx,
            command_rx,
            status_message: None,
        }
    }

    /// The session tracking `quantity`.
    pub fn session(&self, quantity: Quantity) -> &AcquisitionSession {
        // Sessions are created from Quantity::ALL, so the lookup always hits.
        self.sessions
            .iter()
            .find(|s| s.quantity() == quantity)
            .unwrap_or(&self.sessions[0])
    }

    /// True if any session currently has a live transport.
    pub fn is_connected_mode(&self) -> bool {
        self.sessions.iter().any(|s| s.is_active())
    }

    /// Last commanded actuator state.
    pub fn actuator_on(&self) -> bool {
        self.actuator_on
    }

    /// True while an actuator command is awaiting its acknowledgment.
    pub fn command_in_flight(&self) -> bool {
        self.command_in_flight
    }

    /// Start every session.
    pub fn connect(&mut self) {
        for session in &mut self.sessions {
            session.start();
        }
        self.set_status_message(format!("connecting ({})", self.settings.mode.label()));
    }

    /// Stop every session.
    pub fn disconnect(&mut self) {
        for session in &mut self.sessions {
            session.stop();
        }
        self.set_status_message("disconnected".to_string());
    }

    /// Toggle between connected and disconnected.
    pub fn toggle_connection(&mut self) {
        if self.is_connected_mode() {
            self.disconnect();
        } else {
            self.connect();
        }
    }

    /// Switch to the next connection mode and restart active sessions.
    pub fn cycle_mode(&mut self) {
        self.settings.mode = self.settings.mode.next();
        self.reconfigure_sessions();
        self.set_status_message(format!("mode: {}", self.settings.mode.label()));
    }

    /// Step the polling interval and restart active sessions.
    pub fn adjust_interval(&mut self, delta_ms: i64) {
        self.settings.step_interval(delta_ms);
        self.reconfigure_sessions();
        self.set_status_message(format!("interval: {}ms", self.settings.poll_interval_ms));
    }

    /// Hand every session a fresh configuration snapshot. Active sessions
    /// restart under it; idle sessions just hold it.
    fn reconfigure_sessions(&mut self) {
        for session in &mut self.sessions {
            let config = self.settings.session_config(session.quantity());
            session.configure(config);
        }
    }

    /// Fire an actuator toggle. The POST runs on a background task; the
    /// outcome is applied in [`App::tick`].
    pub fn toggle_actuator(&mut self) {
        if self.command_in_flight {
            return;
        }
        self.command_in_flight = true;

        let requested = !self.actuator_on;
        let client = self.command.clone();
        let tx = self.command_tx.clone();
        tokio::spawn(async move {
            let outcome = match client.send(requested).await {
                Ok(_) => CommandOutcome::Acknowledged(requested),
                Err(e) => CommandOutcome::Failed(e.to_string()),
            };
            let _ = tx.send(outcome);
        });
    }

    /// Pump sessions and apply pending command outcomes.
    ///
    /// Called once per UI frame. Returns the number of transport events
    /// applied, which callers can use to skip redraws.
    pub fn tick(&mut self) -> usize {
        let mut applied = 0;
        for session in &mut self.sessions {
            applied += session.pump();
        }

        while let Ok(outcome) = self.command_rx.try_recv() {
            self.command_in_flight = false;
            match outcome {
                CommandOutcome::Acknowledged(state) => {
                    self.actuator_on = state;
                    self.set_status_message(format!(
                        "actuator {}",
                        if state { "on" } else { "off" }
                    ));
                }
                CommandOutcome::Failed(reason) => {
                    warn!(reason = %reason, "actuator command failed");
                    self.alert = Some(format!("Actuator command failed: {reason}"));
                }
            }
        }

        applied
    }

    /// Dismiss the blocking alert.
    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensorwatch_types::ConnectionMode;

    fn test_app() -> App {
        App::new(Settings::default())
    }

    #[tokio::test]
    async fn test_new_app_is_idle() {
        let app = test_app();
        assert!(!app.is_connected_mode());
        for quantity in Quantity::ALL {
            let session = app.session(quantity);
            assert_eq!(session.quantity(), quantity);
            assert!(!session.is_active());
            assert!(session.state().latest().is_none());
        }
    }

    #[tokio::test]
    async fn test_connect_and_disconnect() {
        let mut app = test_app();
        app.connect();
        assert!(app.is_connected_mode());
        for quantity in Quantity::ALL {
            assert!(app.session(quantity).is_active());
        }

        app.disconnect();
        assert!(!app.is_connected_mode());
    }

    #[tokio::test]
    async fn test_cycle_mode_restarts_active_sessions() {
        let mut app = test_app();
        app.connect();
        let before = app.settings.mode;

        app.cycle_mode();
        assert_ne!(app.settings.mode, before);
        // Sessions stayed active, now on the new mode's transport.
        for quantity in Quantity::ALL {
            assert!(app.session(quantity).is_active());
            assert_eq!(
                app.session(quantity).config().unwrap().mode,
                app.settings.mode
            );
        }
        app.disconnect();
    }

    #[tokio::test]
    async fn test_cycle_mode_while_idle_stays_idle() {
        let mut app = test_app();
        app.cycle_mode();
        assert!(!app.is_connected_mode());
    }

    #[tokio::test]
    async fn test_adjust_interval_clamps_and_updates_config() {
        let mut app = test_app();
        app.adjust_interval(-10_000);
        assert_eq!(app.settings.poll_interval_ms, 500);
        assert_eq!(
            app.session(Quantity::Temperature)
                .config()
                .unwrap()
                .poll_interval,
            Duration::from_millis(500)
        );
    }

    #[tokio::test]
    async fn test_command_failure_raises_alert() {
        let mut settings = Settings::default();
        // Nothing listens on port 1, so the POST fails fast.
        settings.command_url = Some("http://127.0.0.1:1/actuator/".to_string());
        let mut app = App::new(settings);

        app.toggle_actuator();
        assert!(app.command_in_flight());

        let start = Instant::now();
        while app.alert.is_none() && start.elapsed() < Duration::from_secs(3) {
            app.tick();
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(app.alert.is_some());
        assert!(!app.actuator_on());
        assert!(!app.command_in_flight());

        app.dismiss_alert();
        assert!(app.alert.is_none());
    }

    #[tokio::test]
    async fn test_view_cycle() {
        let mut app = test_app();
        assert_eq!(app.current_view, View::Dashboard);
        app.next_view();
        assert_eq!(app.current_view, View::History);
        app.next_view();
        assert_eq!(app.current_view, View::Dashboard);
    }

    #[tokio::test]
    async fn test_default_mode_is_polling() {
        let app = test_app();
        assert_eq!(app.settings.mode, ConnectionMode::Polling);
    }
}

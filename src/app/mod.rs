//! Application module
//!
//! The App owns every screen, runs the event loop and routes background
//! results back into the screens. Updates and rendering run inside the
//! error boundary; a panic swaps the whole UI for the fallback screen.

mod boundary;
mod effects;
mod events;
mod messages;

use anyhow::Result;
use crossterm::event;
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Clear},
    Frame, Terminal,
};
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};

use crate::classes::ClassesClient;
use crate::config::{Config, ConfigLoader, ConfigValidator};
use crate::keybindings::{KeyAction, KeybindingResolver};
use crate::location::{ConsentPrompter, ConsentRequest, LocationService};
use crate::navigation::{ScreenKind, TabNavigator};
use crate::screens::{ClassesScreen, MapScreen, PlaceholderScreen, TimetableScreen};
use crate::ui::components::{Dialog, DialogAction, DialogButton, ErrorScreen, Header, TabBar};
use crate::ui::{AppLayout, Styles};

pub use boundary::{ErrorBoundary, Faults};
pub use messages::AppMessage;

const CONSENT_TITLE: &str = "位置情報の利用";
const CONSENT_MESSAGE: &str = "「Kamo」に位置情報の使用を許可しますか？";

/// Main application
pub struct App {
    styles: Styles,

    // Navigation
    navigator: TabNavigator,
    header: Header,
    tab_bar: TabBar,

    // Screens
    timetable: TimetableScreen,
    classes: ClassesScreen,
    bus: PlaceholderScreen,
    map: MapScreen,
    posts: PlaceholderScreen,
    error_screen: ErrorScreen,

    // Modal state
    dialog: Option<Dialog>,
    pending_consent: Option<oneshot::Sender<bool>>,

    // Services
    classes_client: ClassesClient,
    location: Option<Arc<dyn LocationService>>,

    faults: Faults,
    keybinding_resolver: KeybindingResolver,

    // Current layout for mouse click detection
    current_layout: Option<AppLayout>,
    drag_origin: Option<u16>,
    should_quit: bool,

    // Async channels
    message_tx: mpsc::Sender<AppMessage>,
    message_rx: mpsc::Receiver<AppMessage>,
    consent_rx: mpsc::Receiver<ConsentRequest>,
}

impl App {
    /// Load configuration, start logging and build the app
    pub fn new(config_path: Option<&str>) -> Result<Self> {
        let loaded = ConfigLoader::new(config_path).load()?;

        if let Err(e) = crate::logging::init_logging(&loaded.config.logging) {
            eprintln!("Warning: file logging disabled: {:#}", e);
        }
        match &loaded.source {
            Some(path) => tracing::info!(config = %path.display(), "Configuration loaded"),
            None => tracing::info!("No configuration file found, using defaults"),
        }
        for warning in ConfigValidator::new(&loaded.config).validate() {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(Self::with_config(loaded.config, loaded.source))
    }

    /// Build the app from an already loaded configuration
    pub fn with_config(config: Config, source: Option<PathBuf>) -> Self {
        let theme = config.theme;
        let (message_tx, message_rx) = mpsc::channel(32);
        let (consent_tx, consent_rx) = mpsc::channel(1);

        let settings_target = config
            .location
            .settings_url
            .clone()
            .or_else(|| source.map(|path| path.display().to_string()));
        let location = crate::location::detect(
            &config.location,
            ConsentPrompter::new(consent_tx),
            settings_target,
        );

        let keybinding_resolver = KeybindingResolver::from_config(config.keybindings.as_ref());
        let mut map = MapScreen::new(&config.map, location.is_some(), theme);
        if let Some(key) = keybinding_resolver.get_binding_display(&KeyAction::OpenDeviceSettings) {
            map.set_settings_key(key);
        }

        let navigator = TabNavigator::new();
        let tab_bar = TabBar::with_theme(theme, navigator.tabs(), navigator.subscribe());

        Self {
            styles: Styles::from_theme(theme),
            header: Header::with_theme(theme),
            tab_bar,
            navigator,
            timetable: TimetableScreen::with_theme(theme),
            classes: ClassesScreen::with_theme(theme),
            bus: PlaceholderScreen::bus(theme),
            map,
            posts: PlaceholderScreen::posts(theme),
            error_screen: ErrorScreen::with_theme(theme),
            dialog: None,
            pending_consent: None,
            classes_client: ClassesClient::new(config.classes.endpoint.clone()),
            location,
            faults: Faults::default(),
            keybinding_resolver,
            current_layout: None,
            drag_origin: None,
            should_quit: false,
            message_tx,
            message_rx,
            consent_rx,
        }
    }

    /// Run the application event loop
    pub async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let _boundary = ErrorBoundary::install(self.faults.clone());

        // Work that screens start on mount
        self.spawn_classes_fetch();
        self.spawn_permission_check();

        loop {
            terminal.draw(|frame| self.render(frame))?;

            // Handle events with timeout for async messages
            if event::poll(Duration::from_millis(100))? {
                let event = event::read()?;
                self.dispatch(|app| app.handle_event(event));
            }

            // Process async messages
            while let Ok(msg) = self.message_rx.try_recv() {
                self.dispatch(|app| app.handle_message(msg));
            }
            while let Ok(request) = self.consent_rx.try_recv() {
                self.show_consent(request);
            }

            self.dispatch(|app| app.tick(Instant::now()));

            if self.should_quit {
                break;
            }
        }

        tracing::info!("Shutting down");
        Ok(())
    }

    /// Run one update inside the error boundary
    fn dispatch(&mut self, f: impl FnOnce(&mut Self)) {
        let faults = self.faults.clone();
        faults.guard(|| f(self));
    }

    fn tick(&mut self, now: Instant) {
        self.classes.tick();
        self.map.tick(now);
    }

    /// Draw the app, or the fallback screen after a panic
    pub(crate) fn render(&mut self, frame: &mut Frame) {
        if !self.faults.is_faulted() {
            let faults = self.faults.clone();
            faults.guard(|| self.render_app(frame));
        }

        if let Some(message) = self.faults.current() {
            let area = frame.area();
            frame.render_widget(Clear, area);
            self.error_screen.render(frame, area, &message);
        }
    }

    fn render_app(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let layout = AppLayout::calculate(area);
        frame.render_widget(Block::default().style(self.styles.screen), area);

        self.header.render(frame, layout.header);

        match self.navigator.active().screen {
            ScreenKind::Timetable => self.timetable.render(frame, layout.content),
            ScreenKind::Classes => self.classes.render(frame, layout.content),
            ScreenKind::Bus => self.bus.render(frame, layout.content),
            ScreenKind::Map => self.map.render(frame, layout.content),
            ScreenKind::Posts => self.posts.render(frame, layout.content),
        }

        self.tab_bar.render(frame, layout.tab_bar);

        if let Some(dialog) = &self.dialog {
            dialog.render(frame, area, &self.styles);
        }

        self.current_layout = Some(layout);
    }

    /// Show a blocking dialog. A pending consent prompt is answered with no.
    fn show_dialog(&mut self, dialog: Dialog) {
        if let Some(reply) = self.pending_consent.take() {
            let _ = reply.send(false);
        }
        tracing::debug!(title = %dialog.title(), "Dialog shown");
        self.dialog = Some(dialog);
    }

    fn show_consent(&mut self, request: ConsentRequest) {
        self.show_dialog(Dialog::new(
            CONSENT_TITLE,
            CONSENT_MESSAGE,
            vec![
                DialogButton::new("許可しない", DialogAction::DenyLocation),
                DialogButton::new("許可", DialogAction::AllowLocation),
            ],
        ));
        self.pending_consent = Some(request.reply);
    }

    fn apply_dialog_action(&mut self, action: DialogAction) {
        self.dialog = None;
        match action {
            DialogAction::Dismiss => {}
            DialogAction::OpenSettings => self.open_device_settings(),
            DialogAction::AllowLocation | DialogAction::DenyLocation => {
                let allowed = action == DialogAction::AllowLocation;
                tracing::info!(allowed, "Location consent answered");
                if let Some(reply) = self.pending_consent.take() {
                    let _ = reply.send(allowed);
                }
            }
        }
    }
}

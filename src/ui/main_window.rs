//! Main window view-model and composition root.
//!
//! The `MainWindowViewModel` loads the settings document, configures the
//! shared engine, builds the child view-models in dependency order, owns
//! the equalizer panel's open/close lifecycle, and routes key presses.

use std::sync::Arc;

use {
    async_channel::Receiver,
    tracing::{debug, info, warn},
};

use crate::{
    audio::PlayerEngine,
    config::{SettingsError, SettingsStore, SharedSettings},
    error::{AppError, ErrorReporter, ResultExt},
    state::{Command, CommandId, CommandTable, Dispatcher, ObservableSlot, Property},
    ui::{
        equalizer::EqualizerViewModel,
        keys::Key,
        links::{LinkOpener, PROJECT_URL, SystemLinkOpener},
        main_view::MainViewModel,
        medialib::MedialibViewModel,
        play_control::PlayControlViewModel,
        play_info::PlayInfoViewModel,
        playlists::PlaylistsViewModel,
        window_placement::WindowPlacementSettings,
    },
};

/// Key that opens the equalizer when the transport does not claim it.
pub const EQUALIZER_TOGGLE_KEY: char = 'e';

/// Top-level view-model of the main window.
///
/// All methods expect to be called from the thread that drains the
/// dispatch queue handed to `new`.
pub struct MainWindowViewModel {
    /// Where the settings document is loaded from and saved to.
    settings_store: SettingsStore,
    /// The settings document, shared with every child.
    settings: SharedSettings,
    /// Dispatch context handed to children.
    dispatcher: Dispatcher,
    /// The process's engine handle.
    engine: Arc<PlayerEngine>,
    window_placement: ObservableSlot<WindowPlacementSettings>,
    medialib: ObservableSlot<MedialibViewModel>,
    playlists: ObservableSlot<PlaylistsViewModel>,
    main: ObservableSlot<MainViewModel>,
    /// Present only while the equalizer panel is open.
    equalizer: ObservableSlot<EqualizerViewModel>,
    /// Commands exposed to the view, built once.
    commands: CommandTable<Self>,
    /// Launcher for the project page.
    link_opener: Box<dyn LinkOpener>,
}

impl MainWindowViewModel {
    /// Builds the main window's object graph.
    ///
    /// Configures `engine`; an engine may only be handed to one view-model.
    ///
    /// # Arguments
    ///
    /// * `dispatcher` - Dispatch context of the owner thread.
    /// * `engine` - Engine handle shared with the children.
    /// * `settings_store` - Location of the settings document.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if an existing settings file is unreadable or
    /// malformed, or if the engine was already configured.
    pub fn new(
        dispatcher: Dispatcher,
        engine: Arc<PlayerEngine>,
        settings_store: SettingsStore,
    ) -> Result<Self, AppError> {
        let settings = settings_store.load()?.into_shared();

        let mut view_model = Self {
            settings_store,
            settings: Arc::clone(&settings),
            dispatcher: dispatcher.clone(),
            engine: Arc::clone(&engine),
            window_placement: ObservableSlot::new(Property::WindowPlacement),
            medialib: ObservableSlot::new(Property::Medialib),
            playlists: ObservableSlot::new(Property::Playlists),
            main: ObservableSlot::new(Property::Main),
            equalizer: ObservableSlot::new(Property::Equalizer),
            commands: Self::command_table(),
            link_opener: Box::new(SystemLinkOpener),
        };

        view_model.set_window_placement_settings(Some(Arc::new(WindowPlacementSettings::new(
            Arc::clone(&settings),
        ))));

        engine.configure(dispatcher.clone(), Arc::clone(&settings))?;

        let medialib = Arc::new(MedialibViewModel::new(dispatcher, Arc::clone(&settings)));
        view_model.set_medialib_view_model(Some(Arc::clone(&medialib)));

        let playlists = Arc::new(PlaylistsViewModel::new(Arc::clone(&settings)));
        view_model.set_playlists_view_model(Some(Arc::clone(&playlists)));

        let play_info = PlayInfoViewModel::new(&engine);
        let play_control = PlayControlViewModel::new(engine, settings, playlists, medialib);
        let main = Arc::new(MainViewModel::new(play_control, play_info));
        view_model.set_main_view_model(Some(main));

        info!(
            "Main window ready, settings at {:?}",
            view_model.settings_store.path()
        );
        Ok(view_model)
    }

    /// Replaces the launcher used by the "show on GitHub" command.
    #[must_use]
    pub fn with_link_opener(mut self, link_opener: Box<dyn LinkOpener>) -> Self {
        self.link_opener = link_opener;
        self
    }

    fn command_table() -> CommandTable<Self> {
        CommandTable::new([
            Command::new(
                CommandId::ShowOnGitHub,
                |_: &Self| true,
                |vm: &mut Self| vm.show_on_github(),
            ),
            Command::new(
                CommandId::ShowEqualizer,
                Self::can_show_equalizer,
                Self::show_equalizer,
            ),
            Command::new(
                CommandId::CloseEqualizer,
                Self::can_close_equalizer,
                Self::close_equalizer,
            ),
        ])
    }

    /// The settings document shared with the children.
    #[must_use]
    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    /// The engine handle.
    #[must_use]
    pub fn engine(&self) -> &Arc<PlayerEngine> {
        &self.engine
    }

    /// Dispatch context of the owner thread.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Writes the current settings document to disk.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the document cannot be written.
    pub fn save_settings(&self) -> Result<(), SettingsError> {
        self.settings_store.save(&self.settings.read())
    }

    /// Closes the equalizer panel, persisting its state, and saves settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the document cannot be written.
    pub fn shutdown(&mut self) -> Result<(), SettingsError> {
        self.close_equalizer();
        self.save_settings()
    }

    // Observable slots

    /// Main window placement settings.
    #[must_use]
    pub fn window_placement_settings(&self) -> Option<&Arc<WindowPlacementSettings>> {
        self.window_placement.get()
    }

    pub fn set_window_placement_settings(
        &mut self,
        value: Option<Arc<WindowPlacementSettings>>,
    ) -> bool {
        self.window_placement.set(value)
    }

    /// Media library view-model.
    #[must_use]
    pub fn medialib_view_model(&self) -> Option<&Arc<MedialibViewModel>> {
        self.medialib.get()
    }

    pub fn set_medialib_view_model(&mut self, value: Option<Arc<MedialibViewModel>>) -> bool {
        self.medialib.set(value)
    }

    /// Playlist view-model.
    #[must_use]
    pub fn playlists_view_model(&self) -> Option<&Arc<PlaylistsViewModel>> {
        self.playlists.get()
    }

    pub fn set_playlists_view_model(&mut self, value: Option<Arc<PlaylistsViewModel>>) -> bool {
        self.playlists.set(value)
    }

    /// Transport and now-playing view-model.
    #[must_use]
    pub fn main_view_model(&self) -> Option<&Arc<MainViewModel>> {
        self.main.get()
    }

    pub fn set_main_view_model(&mut self, value: Option<Arc<MainViewModel>>) -> bool {
        self.main.set(value)
    }

    /// Equalizer panel view-model, present only while open.
    #[must_use]
    pub fn equalizer_view_model(&self) -> Option<&Arc<EqualizerViewModel>> {
        self.equalizer.get()
    }

    pub fn set_equalizer_view_model(&mut self, value: Option<Arc<EqualizerViewModel>>) -> bool {
        self.equalizer.set(value)
    }

    /// Subscribes to changes of one property.
    pub fn subscribe(&self, property: Property) -> Receiver<Property> {
        match property {
            Property::WindowPlacement => self.window_placement.subscribe(),
            Property::Medialib => self.medialib.subscribe(),
            Property::Playlists => self.playlists.subscribe(),
            Property::Main => self.main.subscribe(),
            Property::Equalizer => self.equalizer.subscribe(),
        }
    }

    // Commands

    /// Looks up a command.
    #[must_use]
    pub fn command(&self, id: CommandId) -> &Command<Self> {
        self.commands.get(id)
    }

    #[must_use]
    pub fn show_on_github_cmd(&self) -> &Command<Self> {
        self.command(CommandId::ShowOnGitHub)
    }

    #[must_use]
    pub fn show_equalizer_command(&self) -> &Command<Self> {
        self.command(CommandId::ShowEqualizer)
    }

    #[must_use]
    pub fn close_equalizer_command(&self) -> &Command<Self> {
        self.command(CommandId::CloseEqualizer)
    }

    /// Runs a command if its predicate allows.
    ///
    /// # Returns
    ///
    /// `true` if the command ran.
    pub fn execute(&mut self, id: CommandId) -> bool {
        let command = *self.commands.get(id);
        command.execute(self)
    }

    /// Opens the project page. Failure is logged, never propagated.
    pub fn show_on_github(&self) {
        if let Err(e) = self
            .link_opener
            .open(PROJECT_URL)
            .add_contextf(format!("Failed to open {PROJECT_URL}"))
        {
            ErrorReporter::warn(&e, "show on GitHub");
        }
    }

    // Equalizer lifecycle

    /// Whether the equalizer panel may be opened.
    #[must_use]
    pub fn can_show_equalizer(&self) -> bool {
        self.engine.is_initialized()
    }

    /// Opens the equalizer panel over the engine's equalizer.
    ///
    /// Keeps the existing panel if one is already open. Without an
    /// initialized engine there is nothing to show and the call is ignored.
    pub fn show_equalizer(&mut self) {
        if self.equalizer.is_set() {
            debug!("Equalizer panel already open");
            return;
        }
        let Some(equalizer) = self.engine.equalizer() else {
            warn!("Equalizer requested before the engine was initialized");
            return;
        };

        self.set_equalizer_view_model(Some(Arc::new(EqualizerViewModel::new(equalizer))));
        info!("Equalizer panel opened");
    }

    /// Whether the equalizer panel may be closed; always true.
    #[must_use]
    pub fn can_close_equalizer(&self) -> bool {
        true
    }

    /// Closes the equalizer panel.
    ///
    /// An enabled equalizer saves its settings before the panel lets go of
    /// it. Closing an already closed panel does nothing.
    pub fn close_equalizer(&mut self) {
        let Some(view_model) = self.equalizer.get().cloned() else {
            debug!("Equalizer panel already closed");
            return;
        };

        if let Some(equalizer) = view_model.equalizer()
            && equalizer.is_enabled()
        {
            equalizer.save_equalizer_settings();
        }
        view_model.detach();
        self.set_equalizer_view_model(None);
        info!("Equalizer panel closed");
    }

    // Keyboard

    /// Routes a key press.
    ///
    /// The transport controls get the first chance; otherwise the equalizer
    /// key opens the equalizer when allowed. Each key reaches at most one
    /// handler.
    ///
    /// # Returns
    ///
    /// `true` if the key was handled.
    pub fn handle_key_down(&mut self, key: Key) -> bool {
        if let Some(main) = self.main.get()
            && main.play_control.handle_key_down(key)
        {
            debug!("Key {:?} handled by transport controls", key);
            return true;
        }

        if key.is_char(EQUALIZER_TOGGLE_KEY) && self.show_equalizer_command().can_execute(self) {
            return self.execute(CommandId::ShowEqualizer);
        }

        false
    }
}

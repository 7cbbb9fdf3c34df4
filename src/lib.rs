pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod highlights;
pub mod music;
pub mod settings;
pub mod theme;
pub mod timer;

use std::{
    io::{self, Write},
    sync::Arc,
};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{info, warn};
use tokio::sync::Mutex;

use config::AppConfig;
use content::{
    FsResourceLoader, Language, LanguageService, NovenaCatalog, Psalm, PsalmCatalog,
    PrayerCatalog, RosaryGuide,
};
use db::{Database, FavoriteKind, NoteCategory, NoteInput, NovenaProgress};
use error::OratioError;
use highlights::{HighlightRange, HighlightStore};
use music::{MusicPlayer, SilentOutput};
use settings::SettingsStore;
use theme::{ThemeMode, ThemeService};
use timer::{PrayerSession, SessionTicker, SharedSession};

/// Every long-lived service, constructed once at startup and handed to
/// whoever needs it.
pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
    pub settings: SettingsStore,
    pub resources: FsResourceLoader,
    pub language: LanguageService,
    pub theme: ThemeService,
    pub prayers: PrayerCatalog,
    pub psalms: PsalmCatalog,
    pub rosary: RosaryGuide,
    pub novenas: NovenaCatalog,
    pub highlights: HighlightStore,
    pub music: MusicPlayer,
    pub session: SharedSession,
}

impl AppState {
    pub async fn bootstrap(config: &AppConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!("failed to create data directory {}", config.data_dir.display())
        })?;

        let db = Database::new(config.database_path())?;
        let seeded = db.seed_default_notes().await?;
        if seeded > 0 {
            info!("Seeded {seeded} welcome notes into an empty journal");
        }

        let settings = SettingsStore::new(config.settings_path())?;
        let saved = settings.snapshot();

        let resources = FsResourceLoader::new(config.resources_dir.clone());
        let mut language = LanguageService::load(&resources);
        language.set_language(saved.language);

        let highlights = HighlightStore::open(config.highlights_path());

        Ok(Self {
            config: config.clone(),
            db,
            settings,
            resources,
            language,
            theme: ThemeService::new(saved.dark_mode),
            prayers: PrayerCatalog::new(),
            psalms: PsalmCatalog::new(),
            rosary: RosaryGuide::new(),
            novenas: NovenaCatalog::new(),
            highlights,
            music: MusicPlayer::new(Box::new(SilentOutput)),
            session: Arc::new(Mutex::new(PrayerSession::new())),
        })
    }

    /// Switches the display language and remembers the choice.
    pub fn set_language(&mut self, language: Language) -> Result<()> {
        self.language.set_language(language);
        self.settings.set_language(language)
    }

    pub fn toggle_theme(&mut self) -> Result<ThemeMode> {
        let mode = self.theme.toggle();
        self.settings.set_dark_mode(self.theme.is_dark())?;
        Ok(mode)
    }

    /// Stars or unstars an item, returning whether it is now a favorite.
    pub async fn toggle_favorite(&self, kind: FavoriteKind, item_id: &str) -> Result<bool> {
        if self.db.is_favorite(kind, item_id).await? {
            self.db.remove_favorite(kind, item_id).await?;
            Ok(false)
        } else {
            self.db.add_favorite(kind, item_id).await?;
            Ok(true)
        }
    }

    pub async fn favorite_psalms(&self) -> Result<Vec<&Psalm>> {
        let favorites = self.db.list_favorites(FavoriteKind::Psalm).await?;
        Ok(favorites
            .iter()
            .filter_map(|favorite| favorite.item_id.parse::<u32>().ok())
            .filter_map(|number| self.psalms.get(number))
            .collect())
    }

    /// Starts tracking a novena and opens its first journal entry.
    pub async fn start_novena(&self, novena_id: &str, today: NaiveDate) -> Result<NovenaProgress> {
        let novena = self.novenas.get(novena_id).ok_or_else(|| OratioError::NotFound {
            kind: "novena",
            id: novena_id.to_string(),
        })?;

        let opening_note = NoteInput::new(
            format!("{} - Day 1", novena.name),
            format!("Started novena: {}\n\n{}", novena.name, novena.description),
            NoteCategory::Novena,
        );
        let (progress, _) = self
            .db
            .start_novena_with_note(novena.id, today, opening_note)
            .await?;

        info!("Started novena {} on {today}", novena.id);
        Ok(progress)
    }

    /// Highlights of a psalm that still fit its text in `language`.
    pub fn psalm_highlights(&self, number: u32, language: Language) -> Vec<HighlightRange> {
        let text_len = self
            .psalms
            .get(number)
            .and_then(|psalm| self.psalms.text(psalm, language, &self.language))
            .map(|text| text.chars().count())
            .unwrap_or(0);
        self.highlights.highlights_within(number, text_len)
    }
}

fn init_logging(config: &AppConfig) {
    let default_level = if config.debug { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init();
}

/// Terminal entry point: times one prayer session until Ctrl-C.
pub async fn run() -> Result<()> {
    let config = AppConfig::from_env();
    init_logging(&config);
    for warning in &config.warnings {
        warn!("{warning}");
    }

    info!("Oratio starting up...");

    let state = AppState::bootstrap(&config).await?;
    let language = state.language.current_language();

    let mystery = state.rosary.todays_mystery();
    println!(
        "Today's mystery: {}",
        state.rosary.mystery_title(mystery, language, &state.language)
    );
    println!("Press Ctrl-C to end your prayer session.");

    {
        let mut session = state.session.lock().await;
        session.add_observer(|duration: &str| println!("\nPrayer time: {duration}"));
        session.begin();
    }

    let mut ticker = SessionTicker::spawn(state.session.clone(), config.tick_interval, |display| {
        print!("\r{display}");
        if let Err(err) = io::stdout().flush() {
            warn!("Failed to flush stdout: {err}");
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    state.session.lock().await.end();
    ticker.stop().await?;

    info!("Oratio shutting down");
    Ok(())
}

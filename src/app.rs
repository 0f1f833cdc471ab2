use crate::api::{ApiError, RecipeApi};
use crate::config::AppConfig;
use crate::error::{AppError, validate_query};
use crate::model::Recipe;
use crate::render::{self, Card, RecipeModal};
use futures_util::future::try_join_all;
use rand::seq::SliceRandom;
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{error, info, warn};

pub const NOT_FOUND_MSG: &str = "No recipes found. Try another query.";
pub const POPULAR_FAILED_MSG: &str = "Could not load popular recipes";
pub const DETAILS_FAILED_MSG: &str = "Could not load recipe details";

/// What the results area is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    ShowingResults,
    ShowingMessage,
}

/// Input mode for the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// A transient info/error line. Dropped by [`App::expire_messages`] once
/// older than the configured display window.
#[derive(Debug, Clone)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
    pub created: Instant,
}

impl Message {
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            created: Instant::now(),
        }
    }
}

/// Work queued by key/mouse handlers and run by the event loop after the
/// next frame is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Search(String),
    Details(String),
    Popular,
}

#[derive(Debug, Default)]
pub struct LoadingIndicator {
    visible: bool,
}

impl LoadingIndicator {
    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Messages first, then cards, in the order they were added.
#[derive(Debug, Default)]
pub struct ResultsArea {
    pub messages: Vec<Message>,
    pub cards: Vec<Card>,
}

impl ResultsArea {
    pub fn clear(&mut self) {
        self.messages.clear();
        self.cards.clear();
    }
}

/// Main application state. Owns the API client and configuration; built
/// once in `main` and passed to the event loop.
pub struct App<A> {
    pub api: A,
    pub config: AppConfig,
    pub should_quit: bool,
    pub show_help: bool,

    // Search bar
    pub input: String,
    pub input_mode: InputMode,
    pub input_error: Option<Message>,

    pub results: ResultsArea,
    pub loading: LoadingIndicator,
    pub selected: usize,

    // Modal state
    pub modal: Option<RecipeModal>,
    pub modal_scroll: u16,

    pub pending: VecDeque<PendingAction>,
    pub last_popular_category: Option<String>,

    // Status message
    pub status_msg: String,
}

impl<A> App<A> {
    pub fn new(api: A, config: AppConfig) -> Self {
        Self {
            api,
            config,
            should_quit: false,
            show_help: false,

            input: String::new(),
            input_mode: InputMode::Normal,
            input_error: None,

            results: ResultsArea::default(),
            loading: LoadingIndicator::default(),
            selected: 0,

            modal: None,
            modal_scroll: 0,

            pending: VecDeque::new(),
            last_popular_category: None,

            status_msg: "Press / to search".to_string(),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.loading.is_visible() || !self.pending.is_empty() {
            Phase::Loading
        } else if !self.results.cards.is_empty() {
            Phase::ShowingResults
        } else if !self.results.messages.is_empty() {
            Phase::ShowingMessage
        } else {
            Phase::Idle
        }
    }

    pub fn selected_card(&self) -> Option<&Card> {
        self.results.cards.get(self.selected)
    }

    // ── Event entry points (synchronous, queue work) ──

    /// Validate the search bar and queue a search. A blank query shows an
    /// inline error and keeps the input focused; nothing is queued.
    pub fn submit(&mut self) {
        match validate_query(&self.input) {
            Ok(query) => {
                let query = query.to_string();
                self.input_error = None;
                self.input_mode = InputMode::Normal;
                self.pending.push_back(PendingAction::Search(query));
            }
            Err(e) => {
                self.input_error = Some(Message::new(MessageKind::Error, e.user_message()));
                self.input_mode = InputMode::Editing;
            }
        }
    }

    /// Queue a details lookup for the selected card.
    pub fn request_details(&mut self) {
        if let Some(card) = self.selected_card() {
            let id = card.id.clone();
            self.pending.push_back(PendingAction::Details(id));
        }
    }

    pub fn request_popular(&mut self) {
        self.pending.push_back(PendingAction::Popular);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn show_message(&mut self, kind: MessageKind, text: impl Into<String>) {
        self.results.messages.push(Message::new(kind, text));
    }

    /// Drop messages (and the inline input error) older than the display
    /// window.
    pub fn expire_messages(&mut self, now: Instant) {
        let ttl = self.config.message_ttl();
        self.results
            .messages
            .retain(|m| now.saturating_duration_since(m.created) < ttl);
        if self
            .input_error
            .as_ref()
            .is_some_and(|m| now.saturating_duration_since(m.created) >= ttl)
        {
            self.input_error = None;
        }
    }

    // ── Navigation ──

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.results.cards.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.results.cards.len().saturating_sub(1);
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.modal_scroll = 0;
    }

    pub fn scroll_down(&mut self) {
        self.modal_scroll = self.modal_scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.modal_scroll = self.modal_scroll.saturating_sub(1);
    }

    /// Open the selected card's video in the platform browser.
    pub fn open_video(&mut self) {
        let Some(card) = self.selected_card() else {
            return;
        };
        if !card.has_video() {
            self.status_msg = format!("No video for {}", card.name);
            return;
        }
        let url = card.video_url.clone();
        match open_in_browser(&url) {
            Ok(()) => self.status_msg = format!("Opening: {url}"),
            Err(e) => {
                warn!(%url, error = %e, "failed to launch browser");
                self.status_msg = format!("Video: {url} (no browser available)");
            }
        }
    }

    fn clear_results(&mut self) {
        self.results.clear();
        self.selected = 0;
    }

    fn random_category(&self) -> Option<String> {
        self.config
            .popular_categories
            .choose(&mut rand::thread_rng())
            .cloned()
    }
}

impl<A: RecipeApi> App<A> {
    /// Run queued actions in the order they were queued.
    pub async fn run_pending(&mut self) {
        while let Some(action) = self.pending.pop_front() {
            match action {
                PendingAction::Search(query) => self.search(&query).await,
                PendingAction::Details(id) => self.show_details(&id).await,
                PendingAction::Popular => self.load_popular().await,
            }
        }
    }

    // ── Flows ──

    /// Name search with the first-letter and popular-recipes fallbacks.
    pub async fn search(&mut self, query: &str) {
        self.loading.show();
        self.clear_results();
        info!(query, "searching recipes");

        tokio::time::sleep(self.config.search_delay()).await;

        match self.api.search_by_name(query).await {
            Ok(records) if !records.is_empty() => {
                self.display(&records);
                self.status_msg = format!("{} recipes for \"{}\"", records.len(), query);
            }
            Ok(_) => {
                self.show_message(MessageKind::Info, NOT_FOUND_MSG);
                self.try_first_letter(query).await;
            }
            Err(e) => {
                error!(query, error = %e, "recipe search failed");
                self.show_message(MessageKind::Error, AppError::from(e).user_message());
                let category = self.random_category();
                if let Some(category) = category {
                    self.fill_popular(&category).await;
                }
            }
        }

        self.loading.hide();
    }

    async fn try_first_letter(&mut self, query: &str) {
        let Some(first) = query.trim().chars().next() else {
            return;
        };
        // Some initials lowercase to more than one char ('İ'); keep them all.
        let letter: String = first.to_lowercase().collect();

        match self.api.search_by_first_letter(&letter).await {
            Ok(records) if !records.is_empty() => {
                info!(query, %letter, count = records.len(), "showing first-letter fallback");
                self.show_message(
                    MessageKind::Info,
                    format!(
                        "Nothing matched \"{query}\", but here are recipes starting with \"{letter}\":"
                    ),
                );
                self.display(&records);
            }
            Ok(_) => info!(query, %letter, "first-letter fallback found nothing"),
            Err(e) => error!(query, error = %e, "first-letter fallback failed"),
        }
    }

    /// Popular recipes from a random configured category.
    pub async fn load_popular(&mut self) {
        match self.random_category() {
            Some(category) => self.load_popular_from(&category).await,
            None => warn!("no popular categories configured"),
        }
    }

    /// Popular recipes from `category`, replacing whatever is shown.
    pub async fn load_popular_from(&mut self, category: &str) {
        self.loading.show();
        self.clear_results();
        self.fill_popular(category).await;
        self.loading.hide();
    }

    async fn fill_popular(&mut self, category: &str) {
        self.last_popular_category = Some(category.to_string());
        match self.fetch_popular(category).await {
            Ok(records) => {
                info!(category, count = records.len(), "loaded popular recipes");
                self.display(&records);
                self.status_msg = format!("Popular: {category}");
            }
            Err(e) => {
                error!(category, error = %e, "failed to load popular recipes");
                self.show_message(MessageKind::Error, POPULAR_FAILED_MSG);
            }
        }
    }

    /// Filter by category, then look up the first few ids concurrently.
    /// Results keep the order of the candidate list.
    async fn fetch_popular(&self, category: &str) -> Result<Vec<Recipe>, ApiError> {
        let candidates = self.api.filter_by_category(category).await?;
        let ids: Vec<String> = candidates
            .into_iter()
            .filter_map(|r| r.id)
            .take(self.config.popular_limit)
            .collect();

        let detailed = try_join_all(ids.iter().map(|id| self.api.lookup_by_id(id))).await?;
        Ok(detailed.into_iter().flatten().collect())
    }

    /// Look up one recipe and open its modal. The results area is untouched.
    pub async fn show_details(&mut self, id: &str) {
        self.loading.show();
        match self.api.lookup_by_id(id).await {
            Ok(Some(recipe)) => {
                self.modal = Some(render::render_modal(&recipe));
                self.modal_scroll = 0;
            }
            Ok(None) => {
                warn!(id, "recipe lookup returned nothing");
                self.status_msg = format!("Recipe {id} not found");
            }
            Err(e) => {
                error!(id, error = %e, "failed to load recipe details");
                self.show_message(MessageKind::Error, DETAILS_FAILED_MSG);
            }
        }
        self.loading.hide();
    }

    fn display(&mut self, records: &[Recipe]) {
        self.results.cards.extend(render::render_cards(records));
        if self.selected >= self.results.cards.len() {
            self.selected = 0;
        }
    }
}

fn open_in_browser(url: &str) -> std::io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        std::process::Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        std::process::Command::new("xdg-open")
    };
    command
        .arg(url)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map(|_| ())
}

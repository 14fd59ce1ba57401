use crate::config::DashboardConfig;
use crate::feeds::{FeedData, FeedMessage, NewsFetcher};
use crate::refresh::{Completion, DashboardState, RefreshTimer};
use crate::ui;
use crate::ui::widgets::articles::ArticleList;
use crate::ui::widgets::filters::QuickFilters;
use crate::ui::widgets::search::SearchBar;
use crate::ui::widgets::threat_meter::ThreatMeter;
use crate::ui::widgets::Panel;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Articles,
    Filters,
}

pub struct App {
    fetcher: Arc<dyn NewsFetcher>,
    tx: UnboundedSender<FeedMessage>,
    rx: UnboundedReceiver<FeedMessage>,
    pub(crate) state: DashboardState,
    pub(crate) timer: RefreshTimer,
    pub(crate) search: SearchBar,
    pub(crate) articles: ArticleList,
    pub(crate) threat_meter: ThreatMeter,
    pub(crate) filters: QuickFilters,
    pub(crate) focus: Focus,
    pub(crate) status_message: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(fetcher: Arc<dyn NewsFetcher>, config: &DashboardConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            fetcher,
            tx,
            rx,
            state: DashboardState::new(),
            timer: RefreshTimer::new(config.refresh_interval(), Instant::now()),
            search: SearchBar::new(),
            articles: ArticleList::new(),
            threat_meter: ThreatMeter::new(),
            filters: QuickFilters::new(config.quick_filters.clone()),
            focus: Focus::Articles,
            status_message: None,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Issue a query in the background. `None` means the default topic.
    /// Must be called from within a tokio runtime.
    pub fn request(&mut self, query: Option<String>) -> u64 {
        let ticket = self.state.begin(query);
        self.status_message = None;
        info!(
            seq = ticket.seq,
            query = ticket.query.as_deref().unwrap_or("<default>"),
            "refresh requested"
        );

        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let data = match fetcher.fetch(ticket.query.as_deref()).await {
                Ok(batch) => FeedData::Batch(batch),
                Err(e) => {
                    warn!(seq = ticket.seq, error = %e, "news query failed");
                    FeedData::Error(e.to_string())
                }
            };
            let _ = tx.send(FeedMessage {
                seq: ticket.seq,
                data,
            });
        });

        ticket.seq
    }

    pub fn handle_message(&mut self, message: FeedMessage) -> Completion {
        let is_batch = matches!(message.data, FeedData::Batch(_));
        let completion = self.state.complete(message.seq, message.data);
        match completion {
            Completion::Applied if is_batch => self.articles.reset(),
            Completion::Applied => {}
            Completion::Stale => {
                debug!(seq = message.seq, "discarding stale result");
            }
        }
        completion
    }

    /// Wait for the next query result.
    pub async fn next_message(&mut self) -> Option<FeedMessage> {
        self.rx.recv().await
    }

    fn drain_messages(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            self.handle_message(message);
        }
    }

    /// Scheduled refresh of the default topic. Skipped while a query is in flight so it never
    /// supersedes one the user started.
    pub fn on_tick(&mut self, now: Instant) {
        if !self.timer.poll(now) {
            return;
        }
        if self.state.is_loading() {
            debug!("scheduled refresh skipped, query in flight");
            return;
        }
        self.request(None);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.search.is_editing() {
            match key.code {
                KeyCode::Esc => self.search.close(),
                KeyCode::Enter => {
                    if let Some(query) = self.search.submit() {
                        self.request(Some(query));
                    }
                }
                KeyCode::Backspace => self.search.delete_char(),
                KeyCode::Char(c) => self.search.add_char(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') | KeyCode::Char('s') => self.search.open(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if let Some(query) = self.filters.get(index).map(str::to_string) {
                    self.request(Some(query));
                }
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Articles => Focus::Filters,
                    Focus::Filters => Focus::Articles,
                };
            }
            KeyCode::Up | KeyCode::Char('k') => match self.focus {
                Focus::Articles => self.articles.scroll_up(),
                Focus::Filters => self.filters.scroll_up(),
            },
            KeyCode::Down | KeyCode::Char('j') => match self.focus {
                Focus::Articles => self.articles.scroll_down(&self.state),
                Focus::Filters => self.filters.scroll_down(&self.state),
            },
            KeyCode::Enter => match self.focus {
                Focus::Filters => {
                    if let Some(query) = self.filters.selected_query().map(str::to_string) {
                        self.request(Some(query));
                    }
                }
                Focus::Articles => self.open_selected(),
            },
            KeyCode::Char('o') => self.open_selected(),
            KeyCode::Char('r') => {
                let query = self.state.retry_query();
                self.request(query);
            }
            KeyCode::Char('d') => {
                self.request(None);
            }
            KeyCode::Char('x') => self.state.dismiss_error(),
            _ => {}
        }
    }

    fn open_selected(&mut self) {
        let Some(url) = self
            .articles
            .selected_item(&self.state)
            .map(|item| item.url.clone())
        else {
            return;
        };

        match open::that(&url) {
            Ok(()) => self.status_message = Some(format!("Opened {}", url)),
            Err(e) => {
                warn!(%url, error = %e, "failed to open article");
                self.status_message = Some(format!("Could not open {}: {}", url, e));
            }
        }
    }

    pub async fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        initial_query: Option<String>,
    ) -> Result<()> {
        self.request(initial_query);

        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, &*self))?;

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            self.drain_messages();
            self.on_tick(Instant::now());
            tokio::task::yield_now().await;
        }

        Ok(())
    }
}

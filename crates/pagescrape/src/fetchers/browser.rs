//! Headless browser fetcher
//!
//! Renders pages that build their content client-side. A single Chrome
//! session is launched on the first matching URL and shared by every later
//! one until [`Fetcher::shutdown`] is called. A failed launch is remembered,
//! so the remaining dynamic URLs of the batch fail fast with the same reason.

use crate::client::ScrapeOptions;
use crate::error::ScrapeError;
use crate::fetchers::Fetcher;
use crate::types::{FetchedPage, PageSource};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

/// Script run once per scroll step to trigger lazy loading
const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight)";

struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

enum SessionState {
    Idle,
    Running(BrowserSession),
    Failed(String),
    Closed,
}

/// Headless browser fetcher
///
/// Matches URLs whose hostname contains one of the configured dynamic hosts.
pub struct BrowserFetcher {
    dynamic_hosts: Vec<String>,
    user_agent: String,
    chrome_executable: Option<PathBuf>,
    navigation_timeout: Duration,
    scroll_steps: u32,
    scroll_delay: Duration,
    state: Mutex<SessionState>,
}

impl BrowserFetcher {
    /// Create a new browser fetcher; no browser is started until first use
    pub fn new(options: &ScrapeOptions) -> Self {
        Self {
            dynamic_hosts: options.dynamic_hosts.clone(),
            user_agent: options.user_agent().to_string(),
            chrome_executable: options.chrome_executable.clone(),
            navigation_timeout: options.navigation_timeout,
            scroll_steps: options.scroll_steps,
            scroll_delay: options.scroll_delay,
            state: Mutex::new(SessionState::Idle),
        }
    }

    async fn launch(&self) -> Result<BrowserSession, String> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(self.navigation_timeout)
            .arg(format!("--user-agent={}", self.user_agent));
        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build()?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| e.to_string())?;
        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });

        info!("Launched headless browser");
        Ok(BrowserSession { browser, handler })
    }

    async fn render(&self, page: &Page, url: &Url) -> Result<String, ScrapeError> {
        tokio::time::timeout(self.navigation_timeout, page.goto(url.as_str()))
            .await
            .map_err(|_| {
                ScrapeError::Navigation(format!(
                    "timed out after {}s",
                    self.navigation_timeout.as_secs()
                ))
            })?
            .map_err(|e| ScrapeError::Navigation(e.to_string()))?;

        info!(url = %url, steps = self.scroll_steps, "Scrolling page to load lazy content");
        for step in 1..=self.scroll_steps {
            if let Err(e) = page.evaluate(SCROLL_SCRIPT).await {
                warn!(url = %url, step, error = %e, "Scroll step failed");
            }
            debug!(step, total = self.scroll_steps, "Waiting after scroll");
            tokio::time::sleep(self.scroll_delay).await;
        }

        page.content()
            .await
            .map_err(|e| ScrapeError::Navigation(e.to_string()))
    }
}

impl Default for BrowserFetcher {
    fn default() -> Self {
        Self::new(&ScrapeOptions::default())
    }
}

#[async_trait]
impl Fetcher for BrowserFetcher {
    fn name(&self) -> &'static str {
        "browser"
    }

    fn source(&self) -> PageSource {
        PageSource::Dynamic
    }

    fn matches(&self, url: &Url) -> bool {
        url.host_str().is_some_and(|host| {
            self.dynamic_hosts
                .iter()
                .any(|pattern| host.contains(pattern.as_str()))
        })
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, ScrapeError> {
        let mut state = self.state.lock().await;

        if matches!(*state, SessionState::Idle) {
            *state = match self.launch().await {
                Ok(session) => SessionState::Running(session),
                Err(reason) => {
                    warn!(error = %reason, "Headless browser launch failed");
                    SessionState::Failed(reason)
                }
            };
        }

        let session = match &*state {
            SessionState::Running(session) => session,
            SessionState::Failed(reason) => return Err(ScrapeError::BrowserLaunch(reason.clone())),
            SessionState::Idle | SessionState::Closed => {
                return Err(ScrapeError::BrowserLaunch(
                    "browser session already closed".to_string(),
                ))
            }
        };

        let page = session
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScrapeError::Navigation(e.to_string()))?;

        let result = self.render(&page, url).await;
        if let Err(e) = page.close().await {
            warn!(url = %url, error = %e, "Failed to close page");
        }

        let html = result?;
        if html.trim().is_empty() {
            return Err(ScrapeError::EmptyContent);
        }

        Ok(FetchedPage {
            url: url.to_string(),
            source: PageSource::Dynamic,
            status_code: None,
            html,
        })
    }

    async fn shutdown(&self) -> Result<(), ScrapeError> {
        let mut state = self.state.lock().await;
        let previous = std::mem::replace(&mut *state, SessionState::Closed);
        let SessionState::Running(mut session) = previous else {
            return Ok(());
        };

        let result = session.browser.close().await;
        if let Err(e) = session.browser.wait().await {
            debug!(error = %e, "Browser process wait failed");
        }
        session.handler.abort();
        info!("Closed headless browser");

        result
            .map(|_| ())
            .map_err(|e| ScrapeError::BrowserClose(e.to_string()))
    }
}

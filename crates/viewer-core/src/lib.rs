use std::fmt;

use common::{ContentResponse, FileKey, TabGroupKind};

pub const TRANSPORT_FAILURE_MESSAGE: &str = "Failed to load configuration";

/// How a fetch for one tab ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Content(String),
    ServerError(String),
    TransportFailure,
}

impl FetchOutcome {
    pub fn panel_text(&self) -> String {
        match self {
            Self::Content(text) => text.clone(),
            Self::ServerError(message) => format!("Error: {message}"),
            Self::TransportFailure => TRANSPORT_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl From<ContentResponse> for FetchOutcome {
    fn from(response: ContentResponse) -> Self {
        match response {
            ContentResponse::Content { content } => Self::Content(content),
            ContentResponse::Error { error } => Self::ServerError(error),
        }
    }
}

/// Handle for one in-flight fetch. Only the most recently issued ticket of a
/// group may write to that group's panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub group: TabGroupKind,
    pub key: FileKey,
    pub token: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerError {
    NotInGroup { group: TabGroupKind, key: FileKey },
    ForeignTicket { group: TabGroupKind, ticket: FetchTicket },
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInGroup { group, key } => {
                write!(f, "key {key} is not part of the {group} tab group")
            }
            Self::ForeignTicket { group, ticket } => write!(
                f,
                "ticket for {} group (key {}) settled against {group} group",
                ticket.group, ticket.key
            ),
        }
    }
}

impl std::error::Error for ViewerError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabGroup {
    kind: TabGroupKind,
    tabs: Vec<FileKey>,
    active: Option<FileKey>,
    latest_token: u64,
    pending_token: Option<u64>,
    panel: String,
}

impl TabGroup {
    pub fn new(kind: TabGroupKind) -> Self {
        Self {
            kind,
            tabs: FileKey::group_members(kind),
            active: None,
            latest_token: 0,
            pending_token: None,
            panel: String::new(),
        }
    }

    pub fn active(&self) -> Option<FileKey> {
        self.active
    }

    pub fn panel(&self) -> &str {
        &self.panel
    }

    pub fn is_loading(&self) -> bool {
        self.pending_token.is_some()
    }

    /// Makes `key` the active tab and issues a ticket for its fetch. Any
    /// earlier ticket of this group becomes stale.
    pub fn activate(&mut self, key: FileKey) -> Result<FetchTicket, ViewerError> {
        if !self.tabs.contains(&key) {
            return Err(ViewerError::NotInGroup {
                group: self.kind,
                key,
            });
        }

        self.active = Some(key);
        self.latest_token += 1;
        self.pending_token = Some(self.latest_token);

        Ok(FetchTicket {
            group: self.kind,
            key,
            token: self.latest_token,
        })
    }

    /// Writes the outcome to the panel if `ticket` is still current. Returns
    /// whether the outcome was applied.
    pub fn settle(
        &mut self,
        ticket: FetchTicket,
        outcome: &FetchOutcome,
    ) -> Result<bool, ViewerError> {
        if ticket.group != self.kind {
            return Err(ViewerError::ForeignTicket {
                group: self.kind,
                ticket,
            });
        }

        if ticket.token != self.latest_token {
            return Ok(false);
        }

        self.panel = outcome.panel_text();
        self.pending_token = None;
        Ok(true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    PageLoaded,
    TabClicked(FileKey),
    FetchSettled(FetchTicket, FetchOutcome),
}

/// Both tab groups of the page. Each group's selection is independent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    config: TabGroup,
    scripts: TabGroup,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewer {
    pub fn new() -> Self {
        Self {
            config: TabGroup::new(TabGroupKind::Config),
            scripts: TabGroup::new(TabGroupKind::Scripts),
        }
    }

    pub fn group(&self, kind: TabGroupKind) -> &TabGroup {
        match kind {
            TabGroupKind::Config => &self.config,
            TabGroupKind::Scripts => &self.scripts,
        }
    }

    fn group_mut(&mut self, kind: TabGroupKind) -> &mut TabGroup {
        match kind {
            TabGroupKind::Config => &mut self.config,
            TabGroupKind::Scripts => &mut self.scripts,
        }
    }

    /// Activates each group's default tab and returns the fetches to issue.
    pub fn start(&mut self) -> Vec<FetchTicket> {
        let mut tickets = Vec::new();
        for kind in TabGroupKind::ALL {
            if let Some(key) = kind.default_key()
                && let Ok(ticket) = self.group_mut(kind).activate(key)
            {
                tickets.push(ticket);
            }
        }
        tickets
    }

    /// Returns the fetches the event starts, if any.
    pub fn handle(&mut self, event: ViewerEvent) -> Result<Vec<FetchTicket>, ViewerError> {
        match event {
            ViewerEvent::PageLoaded => Ok(self.start()),
            ViewerEvent::TabClicked(key) => {
                let ticket = self.group_mut(key.group()).activate(key)?;
                Ok(vec![ticket])
            }
            ViewerEvent::FetchSettled(ticket, outcome) => {
                self.group_mut(ticket.group).settle(ticket, &outcome)?;
                Ok(Vec::new())
            }
        }
    }
}

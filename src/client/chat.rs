use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use super::protocol::NutritionQuery;
use super::transport::NutritionTransport;

pub const GREETING: &str = "Hi! Ask food (chicken 150g)";
pub const NETWORK_ERROR_TEXT: &str = "Network/server error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub role: Role,
    pub text: String,
}

/// Where appended entries are displayed.
pub trait ChatSurface: Send + Sync {
    fn show(&self, entry: &ChatEntry);
}

/// Append-only conversation log, shared by every in-flight lookup.
#[derive(Clone, Default)]
pub struct ChatLog {
    entries: Arc<Mutex<Vec<ChatEntry>>>,
    surface: Option<Arc<dyn ChatSurface>>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_surface(surface: Arc<dyn ChatSurface>) -> Self {
        Self {
            entries: Arc::default(),
            surface: Some(surface),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ChatEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append(&self, role: Role, text: impl Into<String>) -> ChatEntry {
        let entry = ChatEntry {
            role,
            text: text.into(),
        };
        let mut entries = self.lock();
        entries.push(entry.clone());
        if let Some(surface) = &self.surface {
            surface.show(&entry);
        }
        entry
    }

    pub fn entries(&self) -> Vec<ChatEntry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// The two inputs of the chat form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatForm {
    pub query: String,
    pub weight: String,
}

impl ChatForm {
    pub fn new(query: impl Into<String>, weight: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            weight: weight.into(),
        }
    }

    /// Terminal input: `<food>` or `<food> | <grams>`.
    pub fn from_line(line: &str) -> Self {
        match line.split_once('|') {
            Some((query, weight)) => Self::new(query, weight),
            None => Self::new(line, ""),
        }
    }

    fn clear(&mut self) {
        self.query.clear();
        self.weight.clear();
    }
}

/// Chat front-end for the nutrition service. Each accepted submission
/// becomes an independent [`Lookup`]; lookups are never cancelled or
/// deduplicated, so replies land in the log in the order they resolve.
pub struct NutritionChatClient {
    transport: Arc<dyn NutritionTransport>,
    log: ChatLog,
    next_seq: AtomicU64,
}

impl NutritionChatClient {
    /// Starts a session; the log opens with the greeting.
    pub fn new(transport: Arc<dyn NutritionTransport>, log: ChatLog) -> Self {
        log.append(Role::Bot, GREETING);
        Self {
            transport,
            log,
            next_seq: AtomicU64::new(1),
        }
    }

    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    /// Accepts the form: echoes the user line, clears both inputs and
    /// returns the pending lookup. An empty query is ignored and leaves the
    /// form as it was.
    pub fn begin(&self, form: &mut ChatForm) -> Option<Lookup> {
        let query = form.query.trim();
        let weight = form.weight.trim();
        if query.is_empty() {
            return None;
        }

        let echo = if weight.is_empty() {
            query.to_string()
        } else {
            format!("{} {}g", query, weight)
        };
        let request = NutritionQuery::new(query, weight);
        self.log.append(Role::User, echo);
        form.clear();

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        debug!(seq, query = %request.query, "lookup pending");
        Some(Lookup {
            seq,
            request,
            transport: Arc::clone(&self.transport),
            log: self.log.clone(),
        })
    }

    /// `begin` followed by `run`. Returns whether the form was accepted.
    pub async fn submit(&self, form: &mut ChatForm) -> bool {
        match self.begin(form) {
            Some(lookup) => {
                lookup.run().await;
                true
            }
            None => false,
        }
    }
}

/// One submitted query awaiting its reply.
pub struct Lookup {
    seq: u64,
    request: NutritionQuery,
    transport: Arc<dyn NutritionTransport>,
    log: ChatLog,
}

impl Lookup {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn request(&self) -> &NutritionQuery {
        &self.request
    }

    /// Resolves the lookup into exactly one bot entry. Failures end here.
    pub async fn run(self) -> ChatEntry {
        let text = match self.transport.lookup(&self.request).await {
            Ok(reply) => reply.render(),
            Err(e) => {
                warn!(seq = self.seq, error = %e, "lookup failed");
                NETWORK_ERROR_TEXT.to_string()
            }
        };
        debug!(seq = self.seq, "lookup resolved");
        self.log.append(Role::Bot, text)
    }
}

use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};
use tracing::debug;

use crate::error::Error;
use crate::schema::Message;
use crate::traits::{ChatModel, Runnable};
use crate::Result;

/// Conversation histories keyed by session id.
///
/// Construct one store and hand it (usually as `Arc<SessionStore>`) to
/// whatever needs it; there is no process-global registry.
#[derive(Debug, Default)]
pub struct SessionStore {
    histories: RwLock<HashMap<String, Vec<Message>>>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the session's history; unknown sessions have an empty history
    pub fn history(&self, session_id: &str) -> Result<Vec<Message>> {
        let histories = self
            .histories
            .read()
            .map_err(|_| Error::State("Failed to acquire read lock on session store".to_string()))?;
        Ok(histories.get(session_id).cloned().unwrap_or_default())
    }

    /// Append messages to a session, creating it if needed
    pub fn append(&self, session_id: &str, messages: Vec<Message>) -> Result<()> {
        let mut histories = self.histories.write().map_err(|_| {
            Error::State("Failed to acquire write lock on session store".to_string())
        })?;
        histories
            .entry(session_id.to_string())
            .or_default()
            .extend(messages);
        Ok(())
    }

    /// Forget a session. Returns whether it existed.
    pub fn clear(&self, session_id: &str) -> Result<bool> {
        let mut histories = self.histories.write().map_err(|_| {
            Error::State("Failed to acquire write lock on session store".to_string())
        })?;
        Ok(histories.remove(session_id).is_some())
    }

    /// Ids of all sessions with history
    pub fn session_ids(&self) -> Result<Vec<String>> {
        let histories = self
            .histories
            .read()
            .map_err(|_| Error::State("Failed to acquire read lock on session store".to_string()))?;
        let mut ids: Vec<String> = histories.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    /// Number of sessions
    pub fn len(&self) -> Result<usize> {
        Ok(self.session_ids()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// A chat model with per-session memory
pub struct ConversationChain<M: ChatModel> {
    model: M,
    store: Arc<SessionStore>,
    system_prompt: Option<String>,
}

impl<M: ChatModel> ConversationChain<M> {
    pub fn new(model: M, store: Arc<SessionStore>) -> Self {
        Self {
            model,
            store,
            system_prompt: None,
        }
    }

    /// Prepend a system message to every request (not stored in history)
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Send a user message in the given session and return the reply.
    ///
    /// The exchange is recorded only if the model call succeeds.
    pub async fn chat(&self, session_id: &str, input: &str) -> Result<String> {
        let history = self.store.history(session_id)?;
        let user = Message::user(input);

        let mut request = Vec::with_capacity(history.len() + 2);
        if let Some(prompt) = &self.system_prompt {
            request.push(Message::system(prompt.clone()));
        }
        request.extend(history);
        request.push(user.clone());

        debug!(session = session_id, turns = request.len(), "sending conversation");
        let reply = self.model.invoke(request).await?;
        let content = reply.content.clone();

        self.store.append(session_id, vec![user, reply])?;
        Ok(content)
    }
}

/// Insert a newline before every match that does not already start a line.
fn break_before(re: &Regex, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in re.find_iter(text) {
        out.push_str(&text[last..m.start()]);
        if m.start() > 0 && !text[..m.start()].ends_with('\n') {
            out.push('\n');
        }
        last = m.start();
    }
    out.push_str(&text[last..]);
    out
}

struct ReplyPatterns {
    blank_lines: Regex,
    bullet: Regex,
    titled_year: Regex,
    label: Regex,
}

fn reply_patterns() -> &'static ReplyPatterns {
    static PATTERNS: OnceLock<ReplyPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| ReplyPatterns {
        blank_lines: Regex::new(r"\n{2,}").expect("valid regex"),
        bullet: Regex::new(r"\*\s").expect("valid regex"),
        titled_year: Regex::new(r"[A-Za-z0-9 ,\-]+\(\d{4}\)").expect("valid regex"),
        label: Regex::new(r"[A-Za-z0-9 ,\-]+:").expect("valid regex"),
    })
}

/// Tidy a model's chat reply for display.
///
/// Collapses blank lines and puts bullets, `Title (YYYY)` entries and
/// `Label:` entries on lines of their own.
pub fn format_reply(text: &str) -> String {
    let patterns = reply_patterns();
    let text = patterns.blank_lines.replace_all(text, "\n");
    let text = break_before(&patterns.bullet, &text);
    let text = break_before(&patterns.titled_year, &text);
    break_before(&patterns.label, &text)
}

//! Chat history sources.
//!
//! A source hands out one conversation's messages page by page. The holder
//! extractor stops at the first message older than its window, which is only
//! correct when pages arrive newest-first; every source therefore declares its
//! delivery order and the extractor refuses anything else.

use crate::{LoaderError, LoaderResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;

/// Order in which `fetch_page` delivers messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOrder {
  NewestFirst,
  OldestFirst,
  Unordered,
}

impl fmt::Display for HistoryOrder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      HistoryOrder::NewestFirst => write!(f, "newest-first"),
      HistoryOrder::OldestFirst => write!(f, "oldest-first"),
      HistoryOrder::Unordered => write!(f, "in no guaranteed order"),
    }
  }
}

/// One message as delivered by a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
  pub id: i64,
  pub date: DateTime<Utc>,

  /// Display name of the sender ("first last"); `None` when the source has no
  /// sender information, e.g. anonymous channel posts
  pub sender_name: Option<String>,

  pub text: Option<String>,
}

/// Description of a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatInfo {
  /// Identifier in API form (`-100…` for supergroups and channels)
  pub id: i64,
  pub title: Option<String>,
  pub kind: String,
  pub message_count: Option<usize>,
}

#[async_trait]
pub trait HistorySource: Send {
  /// Delivery order of `fetch_page`
  fn order(&self) -> HistoryOrder;

  /// Resolve a chat, failing when it does not exist or cannot be read
  async fn chat_info(&mut self, chat_id: i64) -> LoaderResult<ChatInfo>;

  /// Messages `offset..offset + limit` in delivery order. An empty page means
  /// the history is exhausted.
  async fn fetch_page(
    &mut self,
    chat_id: i64,
    offset: usize,
    limit: usize,
  ) -> LoaderResult<Vec<ChatMessage>>;

  /// Release the session
  async fn close(&mut self) -> LoaderResult<()> {
    Ok(())
  }

  fn name(&self) -> &'static str;
}

/// Source backed by a vector, used for replays and tests
#[derive(Debug, Clone)]
pub struct MemorySource {
  chat: ChatInfo,
  messages: Vec<ChatMessage>,
  order: HistoryOrder,
  pages_served: usize,
  closed: bool,
}

impl MemorySource {
  /// `messages` must already be newest-first
  pub fn newest_first(chat: ChatInfo, messages: Vec<ChatMessage>) -> Self {
    Self::with_order(chat, messages, HistoryOrder::NewestFirst)
  }

  pub fn with_order(chat: ChatInfo, messages: Vec<ChatMessage>, order: HistoryOrder) -> Self {
    Self { chat, messages, order, pages_served: 0, closed: false }
  }

  pub fn pages_served(&self) -> usize {
    self.pages_served
  }

  pub fn is_closed(&self) -> bool {
    self.closed
  }

  fn check_chat(&self, chat_id: i64) -> LoaderResult<()> {
    if self.closed {
      return Err(LoaderError::SourceUnavailable("session already closed".to_string()));
    }
    if chat_id != self.chat.id {
      return Err(LoaderError::ChatNotAccessible {
        chat_id,
        reason: "chat not present in this history".to_string(),
      });
    }
    Ok(())
  }
}

#[async_trait]
impl HistorySource for MemorySource {
  fn order(&self) -> HistoryOrder {
    self.order
  }

  async fn chat_info(&mut self, chat_id: i64) -> LoaderResult<ChatInfo> {
    self.check_chat(chat_id)?;
    Ok(ChatInfo { message_count: Some(self.messages.len()), ..self.chat.clone() })
  }

  async fn fetch_page(
    &mut self,
    chat_id: i64,
    offset: usize,
    limit: usize,
  ) -> LoaderResult<Vec<ChatMessage>> {
    self.check_chat(chat_id)?;
    self.pages_served += 1;
    Ok(self.messages.iter().skip(offset).take(limit).cloned().collect())
  }

  async fn close(&mut self) -> LoaderResult<()> {
    self.closed = true;
    Ok(())
  }

  fn name(&self) -> &'static str {
    "memory"
  }
}

/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-dot-]browne[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! History source reading a Telegram Desktop JSON export.
//!
//! Two layouts are accepted: a single-chat export (`result.json` with `id`,
//! `type`, `messages` at the top level) and a full account export where chats
//! live under `chats.list`. Exports are written oldest-first; the source
//! reverses each chat so pages come out newest-first.

use crate::history_source::{ChatInfo, ChatMessage, HistoryOrder, HistorySource};
use crate::{LoaderError, LoaderResult};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Bot API ids of supergroups and channels are the export id offset by -10^12
const CHANNEL_ID_OFFSET: i64 = 1_000_000_000_000;

#[derive(Debug, Deserialize)]
struct AccountExport {
  chats: ChatList,
}

#[derive(Debug, Deserialize)]
struct ChatList {
  #[serde(default)]
  list: Vec<ExportedChat>,
}

#[derive(Debug, Deserialize)]
struct ExportedChat {
  #[serde(default)]
  name: Option<String>,
  #[serde(rename = "type")]
  kind: String,
  id: i64,
  #[serde(default)]
  messages: Vec<ExportedMessage>,
}

#[derive(Debug, Deserialize)]
struct ExportedMessage {
  id: i64,
  date: String,
  #[serde(default)]
  date_unixtime: Option<String>,
  #[serde(default)]
  from: Option<String>,
  #[serde(default)]
  actor: Option<String>,
  #[serde(default)]
  text: MessageText,
}

/// Plain string, or a list mixing strings and formatted entities
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageText {
  Plain(String),
  Rich(Vec<TextPart>),
}

impl Default for MessageText {
  fn default() -> Self {
    MessageText::Plain(String::new())
  }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextPart {
  Plain(String),
  Entity { text: String },
}

impl MessageText {
  fn flatten(&self) -> String {
    match self {
      MessageText::Plain(text) => text.clone(),
      MessageText::Rich(parts) => parts
        .iter()
        .map(|part| match part {
          TextPart::Plain(text) | TextPart::Entity { text } => text.as_str(),
        })
        .collect(),
    }
  }
}

/// Convert an export chat id to the id the chat API uses
pub fn api_chat_id(export_id: i64, kind: &str) -> i64 {
  match kind {
    "private_supergroup" | "public_supergroup" | "private_channel" | "public_channel" => {
      -(CHANNEL_ID_OFFSET + export_id)
    }
    "private_group" => -export_id,
    _ => export_id,
  }
}

fn convert_message(chat_id: i64, raw: &ExportedMessage) -> Option<ChatMessage> {
  let date = match raw.date_unixtime.as_deref().and_then(|secs| secs.parse::<i64>().ok()) {
    Some(secs) => DateTime::from_timestamp(secs, 0),
    None => NaiveDateTime::parse_from_str(&raw.date, "%Y-%m-%dT%H:%M:%S%.f")
      .ok()
      .map(|naive| naive.and_utc()),
  };
  let Some(date) = date else {
    warn!("Chat {}: message {} has unreadable date '{}', skipping", chat_id, raw.id, raw.date);
    return None;
  };

  let text = raw.text.flatten();
  Some(ChatMessage {
    id: raw.id,
    date,
    sender_name: raw.from.clone().or_else(|| raw.actor.clone()),
    text: if text.is_empty() { None } else { Some(text) },
  })
}

pub struct ExportFileSource {
  path: PathBuf,
  chats: Vec<ExportedChat>,
  /// API id and newest-first messages of the chat being read
  active: Option<(i64, Vec<ChatMessage>)>,
  closed: bool,
}

impl ExportFileSource {
  /// Read and parse an export file.
  ///
  /// A missing or unreadable file is a `SourceUnavailable` error.
  pub async fn open<P: AsRef<Path>>(path: P) -> LoaderResult<Self> {
    let path = path.as_ref().to_path_buf();
    let raw = tokio::fs::read_to_string(&path).await.map_err(|e| match e.kind() {
      ErrorKind::NotFound => {
        LoaderError::SourceUnavailable(format!("export file {} not found", path.display()))
      }
      ErrorKind::PermissionDenied => {
        LoaderError::SourceUnavailable(format!("permission denied reading {}", path.display()))
      }
      _ => LoaderError::IoError(e.to_string()),
    })?;

    let source = Self::from_json(&raw)?;
    debug!("Loaded {} chats from {}", source.chats.len(), path.display());
    Ok(Self { path, ..source })
  }

  /// Parse export JSON already in memory
  pub fn from_json(raw: &str) -> LoaderResult<Self> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let chats = if value.get("chats").is_some() {
      serde_json::from_value::<AccountExport>(value)?.chats.list
    } else if value.get("messages").is_some() {
      vec![serde_json::from_value::<ExportedChat>(value)?]
    } else {
      return Err(LoaderError::InvalidData(
        "file is neither a chat export nor an account export".to_string(),
      ));
    };

    Ok(Self { path: PathBuf::new(), chats, active: None, closed: false })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Every chat in the export, ids in API form
  pub fn list_chats(&self) -> Vec<ChatInfo> {
    self.chats.iter().map(Self::describe).collect()
  }

  fn describe(chat: &ExportedChat) -> ChatInfo {
    ChatInfo {
      id: api_chat_id(chat.id, &chat.kind),
      title: chat.name.clone(),
      kind: chat.kind.clone(),
      message_count: Some(chat.messages.len()),
    }
  }

  fn find_chat(&self, chat_id: i64) -> Option<usize> {
    self
      .chats
      .iter()
      .position(|chat| chat.id == chat_id || api_chat_id(chat.id, &chat.kind) == chat_id)
  }

  fn ensure_open(&self) -> LoaderResult<()> {
    if self.closed {
      return Err(LoaderError::SourceUnavailable("export source already closed".to_string()));
    }
    Ok(())
  }

  /// Decode one chat's messages newest-first and keep them for paging
  fn activate(&mut self, chat_id: i64) -> LoaderResult<()> {
    if matches!(&self.active, Some((active_id, _)) if *active_id == chat_id) {
      return Ok(());
    }
    let index = self.find_chat(chat_id).ok_or_else(|| LoaderError::ChatNotAccessible {
      chat_id,
      reason: "chat is not part of this export".to_string(),
    })?;

    let mut messages: Vec<ChatMessage> = self.chats[index]
      .messages
      .iter()
      .filter_map(|raw| convert_message(chat_id, raw))
      .collect();
    messages.reverse();

    self.active = Some((chat_id, messages));
    Ok(())
  }
}

#[async_trait]
impl HistorySource for ExportFileSource {
  fn order(&self) -> HistoryOrder {
    HistoryOrder::NewestFirst
  }

  async fn chat_info(&mut self, chat_id: i64) -> LoaderResult<ChatInfo> {
    self.ensure_open()?;
    let index = self.find_chat(chat_id).ok_or_else(|| LoaderError::ChatNotAccessible {
      chat_id,
      reason: "chat is not part of this export".to_string(),
    })?;
    Ok(Self::describe(&self.chats[index]))
  }

  async fn fetch_page(
    &mut self,
    chat_id: i64,
    offset: usize,
    limit: usize,
  ) -> LoaderResult<Vec<ChatMessage>> {
    self.ensure_open()?;
    self.activate(chat_id)?;
    let messages = self.active.as_ref().map(|(_, messages)| messages.as_slice()).unwrap_or(&[]);
    Ok(messages.iter().skip(offset).take(limit).cloned().collect())
  }

  async fn close(&mut self) -> LoaderResult<()> {
    self.active = None;
    self.chats.clear();
    self.closed = true;
    Ok(())
  }

  fn name(&self) -> &'static str {
    "telegram-export"
  }
}

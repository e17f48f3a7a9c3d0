//! Chat state of the assistant: bounded per-chat history and tool-call detection.

use std::{
    collections::{HashMap, VecDeque},
    fmt::{Display, Formatter},
};

use bon::Builder;
use chrono::{Local, NaiveDateTime};

use crate::core::DailySummary;

/// Marker the language model replies with to request the daily summary.
pub const DAILY_SUMMARY_TOOL_CALL: &str = "TOOL_CALL: generate_daily_summary";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Role {
    User,
    Assistant,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => f.write_str("👤 User"),
            Self::Assistant => f.write_str("🤖 Assistant"),
        }
    }
}

#[must_use]
#[derive(Clone, Debug)]
pub struct Message {
    pub timestamp: NaiveDateTime,
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn now(role: Role, text: impl Into<String>) -> Self {
        Self { timestamp: Local::now().naive_local(), role, text: text.into() }
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.role, self.timestamp.format("%Y-%m-%d %H:%M:%S"), self.text)
    }
}

/// Ring buffer of the most recent messages of a single chat.
#[must_use]
#[derive(Clone, Debug)]
pub struct History {
    capacity: usize,
    messages: VecDeque<Message>,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl History {
    pub const DEFAULT_CAPACITY: usize = 20;

    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity, messages: VecDeque::with_capacity(capacity) }
    }

    /// Append the message, evicting the oldest ones over capacity.
    pub fn push(&mut self, message: Message) {
        self.messages.push_back(message);
        while self.messages.len() > self.capacity {
            self.messages.pop_front();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }
}

impl Display for History {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.messages.is_empty() {
            return f.write_str("No previous conversation history.");
        }
        for (i, message) in self.messages.iter().enumerate() {
            if i != 0 {
                writeln!(f)?;
            }
            write!(f, "{message}")?;
        }
        Ok(())
    }
}

/// Histories of all chats, keyed by chat ID.
#[must_use]
pub struct Conversations {
    capacity: usize,
    histories: HashMap<i64, History>,
}

impl Default for Conversations {
    fn default() -> Self {
        Self::new(History::DEFAULT_CAPACITY)
    }
}

impl Conversations {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, histories: HashMap::new() }
    }

    pub fn push(&mut self, chat_id: i64, message: Message) {
        let capacity = self.capacity;
        self.histories
            .entry(chat_id)
            .or_insert_with(|| History::with_capacity(capacity))
            .push(message);
    }

    /// Record a completed exchange.
    pub fn push_exchange(&mut self, chat_id: i64, user_text: &str, assistant_text: &str) {
        self.push(chat_id, Message::now(Role::User, user_text));
        self.push(chat_id, Message::now(Role::Assistant, assistant_text));
    }

    pub fn clear(&mut self, chat_id: i64) {
        self.histories.remove(&chat_id);
    }

    pub fn get(&self, chat_id: i64) -> Option<&History> {
        self.histories.get(&chat_id)
    }

    /// Render the chat history, or the placeholder for an unknown chat.
    #[must_use]
    pub fn render(&self, chat_id: i64) -> String {
        self.get(chat_id).map_or_else(|| History::default().to_string(), History::to_string)
    }
}

/// Agentic prompt which lets the model either answer or request the daily summary.
#[must_use]
#[derive(Builder)]
pub struct ChatPrompt<'a> {
    history: &'a History,

    #[builder(into)]
    user_message: String,

    summary: &'a DailySummary,
}

impl Display for ChatPrompt<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let summary_json = serde_json::to_string(self.summary).map_err(|_| std::fmt::Error)?;
        writeln!(
            f,
            "You are a helpful battery assistant with access to tools. You can answer questions \
             about the user's solar battery system and take actions based on their requests."
        )?;
        writeln!(f)?;
        writeln!(f, "CONVERSATION HISTORY:")?;
        writeln!(f, "{}", self.history)?;
        writeln!(f)?;
        writeln!(f, "CURRENT USER MESSAGE: {}", self.user_message)?;
        writeln!(f)?;
        writeln!(f, "AVAILABLE TOOLS:")?;
        writeln!(
            f,
            "- generate_daily_summary: Use this when the user asks for a daily summary, daily report, \
             today's performance, or wants to know what happened today."
        )?;
        writeln!(f)?;
        writeln!(f, "DAILY BATTERY DATA (for answering other questions):")?;
        writeln!(f, "{summary_json}")?;
        writeln!(f)?;
        writeln!(f, "INSTRUCTIONS:")?;
        writeln!(
            f,
            "1. If the user is asking for a daily summary/report/today's performance, \
             respond with: \"{DAILY_SUMMARY_TOOL_CALL}\""
        )?;
        writeln!(
            f,
            "2. Otherwise, answer their question using the battery data in 1-3 friendly sentences with emojis"
        )?;
        writeln!(f, "3. Use conversation history for continuity and context")?;
        writeln!(f)?;
        write!(f, "Respond now:")
    }
}

/// Interpreted response of the language model.
#[derive(Debug, Eq, PartialEq)]
pub enum Reply {
    /// The model requested the daily summary tool.
    GenerateDailySummary,

    /// Plain answer to pass on to the user.
    Text(String),
}

impl Reply {
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.contains(DAILY_SUMMARY_TOOL_CALL) { Self::GenerateDailySummary } else { Self::Text(text) }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn message(role: Role, text: &str) -> Message {
        Message {
            timestamp: NaiveDate::from_ymd_opt(2025, 9, 27).unwrap().and_hms_opt(9, 30, 0).unwrap(),
            role,
            text: text.to_owned(),
        }
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = History::with_capacity(2);
        history.push(message(Role::User, "one"));
        history.push(message(Role::Assistant, "two"));
        history.push(message(Role::User, "three"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.iter().map(|message| message.text.as_str()).collect::<Vec<_>>(), ["two", "three"]);
    }

    #[test]
    fn test_history_display() {
        let mut history = History::default();
        history.push(message(Role::User, "/daily"));
        history.push(message(Role::Assistant, "Sunny day!"));
        assert_eq!(
            history.to_string(),
            "👤 User (2025-09-27 09:30:00): /daily\n🤖 Assistant (2025-09-27 09:30:00): Sunny day!",
        );
    }

    #[test]
    fn test_empty_history_display() {
        assert_eq!(History::default().to_string(), "No previous conversation history.");
    }

    #[test]
    fn test_conversations_are_separate() {
        let mut conversations = Conversations::default();
        conversations.push_exchange(1, "hello", "hi");
        conversations.push(2, message(Role::User, "other"));
        assert_eq!(conversations.get(1).map(History::len), Some(2));
        assert_eq!(conversations.get(2).map(History::len), Some(1));

        conversations.clear(1);
        assert!(conversations.get(1).is_none());
        assert_eq!(conversations.render(1), "No previous conversation history.");
        assert!(conversations.render(2).ends_with(": other"));
    }

    #[test]
    fn test_reply_parse() {
        assert_eq!(
            Reply::parse("Sure! TOOL_CALL: generate_daily_summary"),
            Reply::GenerateDailySummary,
        );
        assert_eq!(Reply::parse("All good ☀️"), Reply::Text("All good ☀️".to_owned()));
    }

    #[test]
    fn test_chat_prompt() -> Result<(), crate::core::InvalidInput> {
        let summary =
            DailySummary::builder().records(&crate::core::fixtures::reference_day()).build()?;
        let mut history = History::default();
        history.push(message(Role::User, "How was today?"));
        let prompt = ChatPrompt::builder()
            .history(&history)
            .user_message("And the battery?")
            .summary(&summary)
            .build()
            .to_string();
        assert!(prompt.contains("👤 User (2025-09-27 09:30:00): How was today?\n"));
        assert!(prompt.contains("CURRENT USER MESSAGE: And the battery?\n"));
        assert!(prompt.contains(r#"respond with: "TOOL_CALL: generate_daily_summary""#));
        assert!(prompt.ends_with("Respond now:"));
        Ok(())
    }
}

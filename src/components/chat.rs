// ============================================================================
// CHAT — streaming strategy assistant with in-memory session archive
// ============================================================================

use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use eframe::egui;
use uuid::Uuid;

use crate::ops::ai::{spawn_chat_job, ChatEvent, ChatRole, ChatTurn, DesignService};
use crate::{log_info, log_warn};

/// Streamed chunks repaint the transcript at most this often; the terminal
/// event always flushes whatever is buffered.
const STREAM_FLUSH_INTERVAL: Duration = Duration::from_millis(75);
/// Session titles longer than this are truncated with an ellipsis.
const TITLE_MAX_CHARS: usize = 30;

pub const ERROR_FALLBACK: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: u64,
}

/// Title for an archived session: the first user message, truncated.
pub fn derive_title(messages: &[ChatMessage]) -> String {
    let first_user = messages
        .iter()
        .find(|m| m.role == ChatRole::User)
        .map(|m| m.content.trim());
    match first_user {
        Some(text) if !text.is_empty() => {
            if text.chars().count() > TITLE_MAX_CHARS {
                let truncated: String = text.chars().take(TITLE_MAX_CHARS).collect();
                format!("{}…", truncated)
            } else {
                text.to_string()
            }
        }
        _ => t!("chat.untitled"),
    }
}

/// An in-flight streaming response.
struct StreamState {
    rx: Receiver<ChatEvent>,
    /// Full text received so far; the visible message trails it by at most
    /// one flush interval.
    accumulated: String,
    last_flush: Instant,
    /// Index of the model message being filled in.
    message_index: usize,
}

pub struct ChatScreen {
    pub messages: Vec<ChatMessage>,
    pub sessions: Vec<ChatSession>,
    input: String,
    search: String,
    stream: Option<StreamState>,
}

impl ChatScreen {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage {
                role: ChatRole::Model,
                content: t!("chat.welcome"),
            }],
            sessions: Vec::new(),
            input: String::new(),
            search: String::new(),
            stream: None,
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    /// Archive the current conversation (if the user said anything) and
    /// start fresh.
    pub fn start_new_chat(&mut self) {
        if self.messages.iter().any(|m| m.role == ChatRole::User) {
            let messages = std::mem::take(&mut self.messages);
            self.sessions.insert(
                0,
                ChatSession {
                    id: Uuid::new_v4().to_string(),
                    title: derive_title(&messages),
                    messages,
                    created_at: SystemTime::now()
                        .duration_since(UNIX_EPOCH)
                        .map(|d| d.as_secs())
                        .unwrap_or(0),
                },
            );
        }
        self.messages = vec![ChatMessage {
            role: ChatRole::Model,
            content: t!("chat.welcome"),
        }];
        self.stream = None;
    }

    /// Restore an archived session into the live transcript. The archive
    /// record stays listed; only a copy of its messages is loaded.
    pub fn open_session(&mut self, id: &str) {
        let Some(messages) = self
            .sessions
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.messages.clone())
        else {
            return;
        };
        // Archive whatever was open first.
        self.start_new_chat();
        self.messages = messages;
    }

    /// Case-insensitive title search over archived sessions.
    pub fn matching_sessions(&self) -> Vec<(String, String)> {
        let needle = self.search.to_lowercase();
        self.sessions
            .iter()
            .filter(|s| needle.is_empty() || s.title.to_lowercase().contains(&needle))
            .map(|s| (s.id.clone(), s.title.clone()))
            .collect()
    }

    fn send(&mut self, service: &Arc<dyn DesignService>) {
        let text = self.input.trim().to_string();
        if text.is_empty() || self.stream.is_some() {
            return;
        }
        self.input.clear();
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            content: text,
        });
        let turns: Vec<ChatTurn> = self
            .messages
            .iter()
            .map(|m| ChatTurn {
                role: m.role,
                text: m.content.clone(),
            })
            .collect();
        self.messages.push(ChatMessage {
            role: ChatRole::Model,
            content: String::new(),
        });
        self.stream = Some(StreamState {
            rx: spawn_chat_job(service.clone(), turns),
            accumulated: String::new(),
            last_flush: Instant::now(),
            message_index: self.messages.len() - 1,
        });
        log_info!("chat: request sent ({} turns)", self.messages.len() - 1);
    }

    /// Drain pending stream events. Returns true while a response is still
    /// arriving (callers keep repainting).
    pub fn poll_stream(&mut self) -> bool {
        let Some(stream) = &mut self.stream else {
            return false;
        };
        let mut finished = false;
        let mut failed = false;
        loop {
            match stream.rx.try_recv() {
                Ok(ChatEvent::Chunk(text)) => stream.accumulated.push_str(&text),
                Ok(ChatEvent::Done) => {
                    finished = true;
                    break;
                }
                Ok(ChatEvent::Failed(reason)) => {
                    log_warn!("chat: stream failed: {}", reason);
                    failed = true;
                    break;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    failed = true;
                    break;
                }
            }
        }

        let index = stream.message_index;
        if failed {
            self.messages[index].content = ERROR_FALLBACK.to_string();
            self.stream = None;
            return false;
        }
        if finished || stream.last_flush.elapsed() >= STREAM_FLUSH_INTERVAL {
            stream.last_flush = Instant::now();
            self.messages[index].content = stream.accumulated.clone();
        }
        if finished {
            self.stream = None;
            return false;
        }
        true
    }

    pub fn show(&mut self, ui: &mut egui::Ui, service: &Arc<dyn DesignService>) {
        if self.poll_stream() {
            ui.ctx().request_repaint_after(STREAM_FLUSH_INTERVAL);
        }

        egui::SidePanel::left("chat_sessions")
            .resizable(false)
            .default_width(200.0)
            .show_inside(ui, |ui| {
                if ui.button(t!("chat.new_chat")).clicked() {
                    self.start_new_chat();
                }
                ui.add(
                    egui::TextEdit::singleline(&mut self.search)
                        .hint_text(t!("chat.search_hint")),
                );
                ui.separator();
                let mut open = None;
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (id, title) in self.matching_sessions() {
                        if ui.selectable_label(false, title).clicked() {
                            open = Some(id);
                        }
                    }
                });
                if let Some(id) = open {
                    self.open_session(&id);
                }
            });

        egui::TopBottomPanel::bottom("chat_input").show_inside(ui, |ui| {
            ui.horizontal(|ui| {
                let response = ui.add_sized(
                    [ui.available_width() - 70.0, 24.0],
                    egui::TextEdit::singleline(&mut self.input)
                        .hint_text(t!("chat.input_hint")),
                );
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let send_clicked = ui
                    .add_enabled(!self.is_streaming(), egui::Button::new(t!("chat.send")))
                    .clicked();
                if submitted || send_clicked {
                    self.send(service);
                    response.request_focus();
                }
            });
        });

        egui::CentralPanel::default().show_inside(ui, |ui| {
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for message in &self.messages {
                        let align = match message.role {
                            ChatRole::User => egui::Align::Max,
                            ChatRole::Model => egui::Align::Min,
                        };
                        ui.with_layout(egui::Layout::top_down(align), |ui| {
                            let fill = match message.role {
                                ChatRole::User => ui.visuals().selection.bg_fill.linear_multiply(0.4),
                                ChatRole::Model => ui.visuals().faint_bg_color,
                            };
                            egui::Frame::none()
                                .fill(fill)
                                .rounding(egui::Rounding::same(8.0))
                                .inner_margin(egui::Margin::same(8.0))
                                .show(ui, |ui| {
                                    if message.content.is_empty() {
                                        ui.spinner();
                                    } else {
                                        ui.label(&message.content);
                                    }
                                });
                        });
                        ui.add_space(4.0);
                    }
                });
        });
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn user(text: &str) -> ChatMessage {
        ChatMessage {
            role: ChatRole::User,
            content: text.to_string(),
        }
    }

    #[test]
    fn title_is_first_user_message() {
        let messages = vec![
            ChatMessage {
                role: ChatRole::Model,
                content: "Welcome!".to_string(),
            },
            user("Caption ideas for a bakery"),
        ];
        assert_eq!(derive_title(&messages), "Caption ideas for a bakery");
    }

    #[test]
    fn long_titles_truncate_with_ellipsis() {
        let messages = vec![user(
            "Please write me a complete twelve week content calendar",
        )];
        let title = derive_title(&messages);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 1);
        assert!(title.ends_with('…'));
    }

    #[test]
    fn no_user_message_gets_fallback_title() {
        crate::i18n::init();
        assert_eq!(derive_title(&[]), "New Strategy");
    }

    #[test]
    fn session_search_is_case_insensitive() {
        let mut screen = ChatScreen::new();
        screen.messages.push(user("TikTok growth plan"));
        screen.start_new_chat();
        screen.messages.push(user("Bakery captions"));
        screen.start_new_chat();

        screen.search = "tiktok".to_string();
        let hits = screen.matching_sessions();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].1, "TikTok growth plan");
    }

    #[test]
    fn opening_a_session_keeps_it_archived() {
        let mut screen = ChatScreen::new();
        screen.messages.push(user("TikTok growth plan"));
        screen.start_new_chat();
        let id = screen.sessions[0].id.clone();

        screen.open_session(&id);
        assert_eq!(screen.sessions.len(), 1, "record stays listed");
        assert_eq!(screen.sessions[0].id, id);
        assert!(screen
            .messages
            .iter()
            .any(|m| m.content == "TikTok growth plan"));
    }

    #[test]
    fn new_chat_without_user_input_archives_nothing() {
        let mut screen = ChatScreen::new();
        screen.start_new_chat();
        assert!(screen.sessions.is_empty());
        assert_eq!(screen.messages.len(), 1, "welcome message only");
    }

    #[test]
    fn failed_stream_replaces_message_with_fallback() {
        let mut screen = ChatScreen::new();
        screen.messages.push(user("hi"));
        screen.messages.push(ChatMessage {
            role: ChatRole::Model,
            content: String::new(),
        });
        let (tx, rx) = mpsc::channel();
        screen.stream = Some(StreamState {
            rx,
            accumulated: String::new(),
            last_flush: Instant::now(),
            message_index: screen.messages.len() - 1,
        });
        tx.send(ChatEvent::Chunk("partial".to_string())).unwrap();
        tx.send(ChatEvent::Failed("boom".to_string())).unwrap();
        assert!(!screen.poll_stream());
        assert_eq!(screen.messages.last().unwrap().content, ERROR_FALLBACK);
        assert!(!screen.is_streaming());
    }

    #[test]
    fn done_flushes_all_buffered_chunks() {
        let mut screen = ChatScreen::new();
        screen.messages.push(user("hi"));
        screen.messages.push(ChatMessage {
            role: ChatRole::Model,
            content: String::new(),
        });
        let (tx, rx) = mpsc::channel();
        screen.stream = Some(StreamState {
            rx,
            accumulated: String::new(),
            // Throttle window still open; Done must flush anyway.
            last_flush: Instant::now(),
            message_index: screen.messages.len() - 1,
        });
        tx.send(ChatEvent::Chunk("Hello ".to_string())).unwrap();
        tx.send(ChatEvent::Chunk("world".to_string())).unwrap();
        tx.send(ChatEvent::Done).unwrap();
        assert!(!screen.poll_stream());
        assert_eq!(screen.messages.last().unwrap().content, "Hello world");
    }
}

use crate::conversation::{Conversation, Resolution};

/// Fallback height used before the first frame has been drawn
const DEFAULT_CHAT_HEIGHT: u16 = 20;

pub struct App {
    pub should_quit: bool,
    pub conversation: Conversation,
    /// Base address shown in the footer
    pub endpoint: String,

    // Transcript viewport
    pub scroll: u16,
    pub follow: bool, // keep the newest message in view
    pub chat_height: u16,
    /// Wrapped row count of the transcript, measured on the last draw
    pub transcript_rows: u16,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation
}

impl App {
    pub fn new(conversation: Conversation, endpoint: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            conversation,
            endpoint: endpoint.into(),
            scroll: 0,
            follow: true,
            chat_height: 0,
            transcript_rows: 0,
            animation_frame: 0,
        }
    }

    /// Submit the input buffer and jump back to the newest message
    pub fn submit(&mut self) {
        if self.conversation.submit().is_some() {
            self.follow = true;
        }
    }

    /// Apply a finished request delivered by the event loop
    pub fn apply_resolution(&mut self, resolution: Resolution) {
        self.conversation.resolve(resolution);
    }

    pub fn is_waiting(&self) -> bool {
        self.conversation.in_flight() > 0
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_waiting() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    fn visible_height(&self) -> u16 {
        if self.chat_height > 0 {
            self.chat_height
        } else {
            DEFAULT_CHAT_HEIGHT
        }
    }

    pub fn max_scroll(&self) -> u16 {
        self.transcript_rows.saturating_sub(self.visible_height())
    }

    /// Pin to the bottom when following, otherwise keep the offset in range
    pub fn sync_scroll(&mut self) {
        let max = self.max_scroll();
        if self.follow {
            self.scroll = max;
        } else {
            self.scroll = self.scroll.min(max);
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.follow = false;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.max_scroll();
        self.scroll = self.scroll.saturating_add(lines).min(max);
        if self.scroll == max {
            self.follow = true;
        }
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.visible_height().saturating_sub(1).max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.visible_height().saturating_sub(1).max(1));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::client::{ClientError, Responder};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    /// Replies with a copy of the question
    pub(crate) struct EchoResponder;

    #[async_trait]
    impl Responder for EchoResponder {
        async fn ask(&self, question: &str) -> Result<String, ClientError> {
            Ok(question.to_string())
        }
    }

    pub(crate) fn create_test_app() -> (App, mpsc::UnboundedReceiver<Resolution>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let conversation = Conversation::new(Arc::new(EchoResponder), tx);
        (App::new(conversation, "http://127.0.0.1:5000"), rx)
    }

    #[tokio::test]
    async fn test_submit_and_resolve_through_app() {
        let (mut app, mut rx) = create_test_app();
        app.conversation.update_input("ping");
        app.submit();
        assert!(app.is_waiting());

        app.apply_resolution(rx.recv().await.unwrap());
        assert!(!app.is_waiting());
        assert_eq!(app.conversation.len(), 2);
    }

    #[tokio::test]
    async fn test_animation_only_runs_while_waiting() {
        let (mut app, _rx) = create_test_app();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);

        app.conversation.update_input("ping");
        app.submit();
        app.tick_animation();
        app.tick_animation();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);
        app.tick_animation();
        assert_eq!(app.animation_frame, 1);
    }

    #[tokio::test]
    async fn test_scrolling_stops_and_resumes_following() {
        let (mut app, _rx) = create_test_app();
        app.chat_height = 4;
        app.transcript_rows = 30;
        app.sync_scroll();
        assert_eq!(app.scroll, 26);

        app.scroll_up(5);
        assert!(!app.follow);
        assert_eq!(app.scroll, 21);
        app.sync_scroll();
        assert_eq!(app.scroll, 21);

        app.scroll_down(100);
        assert!(app.follow);
        assert_eq!(app.scroll, 26);
    }
}

use chrono::NaiveDateTime;

use super::conversation::{self, Conversation};
use super::message::Message;
use super::quote::{Outcome, Quote};
use super::workspace::{Workspace, WorkspaceStore};
use crate::api::{ApiError, CancelFlag, LoadState, Resource};

/// Inbox, chat and lead-card state for one agent session.
pub struct CrmSession {
    conversations: Vec<Conversation>,
    selected_conversation_id: Option<String>,
    selected_quote_id: Option<String>,
    messages: Resource<Vec<Message>>,
    pub composer: String,
    store: Box<dyn WorkspaceStore>,
}

impl CrmSession {
    pub fn new(conversations: Vec<Conversation>, store: Box<dyn WorkspaceStore>) -> Self {
        let mut session = Self {
            conversations,
            selected_conversation_id: None,
            selected_quote_id: None,
            messages: Resource::new(),
            composer: String::new(),
            store,
        };
        if let Some(first) = session.conversations.first().map(|c| c.id.clone()) {
            // The caller starts the first thread load with `reload_messages`.
            session.select_conversation(&first);
        }
        session
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Replace the list after a reload; the selection survives if the
    /// conversation still exists.
    pub fn set_conversations(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
        let still_there = self
            .selected_conversation_id
            .as_deref()
            .is_some_and(|id| self.conversations.iter().any(|c| c.id == id));
        if !still_there {
            self.selected_conversation_id = None;
            self.selected_quote_id = None;
            self.messages.reset();
        }
    }

    pub fn inbox(&self) -> Vec<&Conversation> {
        conversation::in_workspace(&self.conversations, Workspace::Inbox)
    }

    pub fn holding(&self) -> Vec<&Conversation> {
        conversation::in_workspace(&self.conversations, Workspace::Holding)
    }

    pub fn selected_conversation_id(&self) -> Option<&str> {
        self.selected_conversation_id.as_deref()
    }

    /// The selected conversation, or the first one when nothing matches.
    pub fn selected_conversation(&self) -> Option<&Conversation> {
        self.selected_conversation_id
            .as_deref()
            .and_then(|id| self.conversations.iter().find(|c| c.id == id))
            .or_else(|| self.conversations.first())
    }

    fn selected_conversation_mut(&mut self) -> Option<&mut Conversation> {
        let id = self.selected_conversation_id.as_deref()?;
        self.conversations.iter_mut().find(|c| c.id == id)
    }

    /// Select a conversation and its first quote, and start loading its
    /// thread. Any load still in flight for the previous selection is
    /// superseded; pass the returned flag to [`Self::finish_messages`].
    pub fn select_conversation(&mut self, conversation_id: &str) -> CancelFlag {
        self.selected_conversation_id = Some(conversation_id.to_string());
        self.selected_quote_id = self
            .conversations
            .iter()
            .find(|c| c.id == conversation_id)
            .and_then(|c| c.quotes.first())
            .map(|q| q.id.clone());
        self.messages.begin()
    }

    /// Re-issue the thread load for the current selection (first load after
    /// `new`, or a manual retry). `None` when nothing is selected.
    pub fn reload_messages(&mut self) -> Option<(String, CancelFlag)> {
        let conversation_id = self.selected_conversation_id.clone()?;
        Some((conversation_id, self.messages.begin()))
    }

    pub fn current_quotes(&self) -> &[Quote] {
        self.selected_conversation()
            .map(|c| c.quotes.as_slice())
            .unwrap_or(&[])
    }

    pub fn selected_quote_id(&self) -> Option<&str> {
        self.selected_quote_id.as_deref()
    }

    pub fn select_quote(&mut self, quote_id: &str) {
        self.selected_quote_id = Some(quote_id.to_string());
    }

    pub fn selected_quote(&self) -> Option<&Quote> {
        let id = self.selected_quote_id.as_deref()?;
        self.current_quotes().iter().find(|q| q.id == id)
    }

    pub fn messages(&self) -> &[Message] {
        self.messages
            .state()
            .ready()
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn messages_state(&self) -> &LoadState<Vec<Message>> {
        self.messages.state()
    }

    /// Commit a thread load. Responses for a conversation that is no longer
    /// selected, or for a superseded load, are dropped. Returns whether the
    /// thread changed.
    pub fn finish_messages(
        &mut self,
        flag: &CancelFlag,
        conversation_id: &str,
        result: Result<Vec<Message>, ApiError>,
    ) -> bool {
        if self.selected_conversation_id.as_deref() != Some(conversation_id) {
            log::debug!("Dropping messages for unselected conversation {}", conversation_id);
            return false;
        }
        self.messages.finish(flag, result)
    }

    /// Append an agency message to the open thread. Blank input is ignored.
    pub fn send_message(&mut self, body: &str, now: NaiveDateTime) -> Option<&Message> {
        let text = body.trim();
        if text.is_empty() {
            return None;
        }
        let conversation_id = self.selected_conversation_id.clone()?;
        let message = Message::outgoing(conversation_id, text, now);
        self.messages.update(|thread| thread.push(message));
        self.composer.clear();
        self.messages().last()
    }

    pub fn move_conversation_workspace(&mut self, conversation_id: &str, target: Workspace) -> bool {
        conversation::move_conversation_workspace(
            &mut self.conversations,
            conversation_id,
            target,
            self.store.as_mut(),
        )
    }

    /// Edit the selected quote in place.
    pub fn update_current_quote(&mut self, edit: impl FnOnce(&mut Quote)) -> bool {
        let Some(quote_id) = self.selected_quote_id.clone() else {
            return false;
        };
        let quote = self
            .selected_conversation_mut()
            .and_then(|c| c.quotes.iter_mut().find(|q| q.id == quote_id));
        match quote {
            Some(quote) => {
                edit(quote);
                true
            }
            None => false,
        }
    }

    pub fn create_new_quote(&mut self) -> Option<&Quote> {
        let quote = Quote::blank();
        let quote_id = quote.id.clone();
        let conversation = self.selected_conversation_mut()?;
        conversation.quotes.push(quote);
        self.selected_quote_id = Some(quote_id);
        self.selected_quote()
    }

    /// Close the negotiation: the conversation always moves to the holding
    /// area and the selected quote is retitled with the outcome.
    pub fn finalize_current_quote(&mut self, outcome: Outcome) {
        let Some(conversation_id) = self.selected_conversation_id.clone() else {
            return;
        };
        self.move_conversation_workspace(&conversation_id, Workspace::Holding);
        self.update_current_quote(|q| q.title = outcome.label().to_string());
    }

    /// Bring a conversation back to the inbox, opening a fresh quote when it
    /// is the one on screen.
    pub fn revive_conversation(&mut self, conversation_id: &str) {
        self.move_conversation_workspace(conversation_id, Workspace::Inbox);
        if self.selected_conversation_id.as_deref() == Some(conversation_id) {
            self.create_new_quote();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Author;
    use crate::core::workspace::MemoryWorkspaceStore;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 19)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    fn session() -> CrmSession {
        let mut joao = Conversation::new("conv_1", "João Silva");
        joao.quotes = vec![
            Quote {
                id: "q1-1".into(),
                title: "Orlando 2025".into(),
                value_cents: Some(128900),
                ..Quote::default()
            },
            Quote {
                id: "q1-2".into(),
                title: "Nova York 2026".into(),
                ..Quote::default()
            },
        ];
        let mut ghost = Conversation::new("4", "Cliente 4");
        ghost.workspace = Workspace::Holding;
        CrmSession::new(vec![joao, ghost], Box::new(MemoryWorkspaceStore::new()))
    }

    #[test]
    fn starts_on_first_conversation_and_quote() {
        let s = session();
        assert_eq!(s.selected_conversation_id(), Some("conv_1"));
        assert_eq!(s.selected_quote_id(), Some("q1-1"));
        assert_eq!(s.current_quotes().len(), 2);
        assert_eq!(s.inbox().len(), 1);
        assert_eq!(s.holding().len(), 1);
    }

    #[test]
    fn selecting_conversation_without_quotes() {
        let mut s = session();
        s.select_conversation("4");
        assert_eq!(s.selected_quote_id(), None);
        assert!(s.current_quotes().is_empty());
    }

    #[test]
    fn unknown_selection_falls_back_to_first() {
        let mut s = session();
        s.select_conversation("nope");
        assert_eq!(s.selected_conversation().map(|c| c.id.as_str()), Some("conv_1"));
    }

    #[test]
    fn send_message_trims_and_ignores_blank() {
        let mut s = session();
        s.composer = "rascunho".into();
        assert!(s.send_message("   ", now()).is_none());
        let msg = s.send_message("  Bom dia!  ", now()).unwrap().clone();
        assert_eq!(msg.body, "Bom dia!");
        assert_eq!(msg.from, Author::Agency);
        assert_eq!(msg.conversation_id, "conv_1");
        assert_eq!(msg.time.as_deref(), Some("14:30"));
        assert!(s.composer.is_empty());
        assert_eq!(s.messages().len(), 1);
    }

    fn thread(conversation_id: &str, body: &str) -> Vec<Message> {
        vec![Message {
            id: format!("m-{body}"),
            conversation_id: conversation_id.to_string(),
            from: Author::Client,
            body: body.to_string(),
            time: None,
        }]
    }

    #[test]
    fn late_thread_for_previous_selection_is_dropped() {
        let mut s = session();
        let first = s.select_conversation("conv_1");
        let second = s.select_conversation("4");

        assert!(!s.finish_messages(&first, "conv_1", Ok(thread("conv_1", "antiga"))));
        assert!(s.messages().is_empty());
        assert!(s.messages_state().is_loading());

        assert!(s.finish_messages(&second, "4", Ok(thread("4", "nova"))));
        assert_eq!(s.messages()[0].conversation_id, "4");
    }

    #[test]
    fn thread_for_other_conversation_is_rejected() {
        let mut s = session();
        let (id, flag) = s.reload_messages().unwrap();
        assert_eq!(id, "conv_1");
        assert!(!s.finish_messages(&flag, "4", Ok(thread("4", "x"))));
        assert!(s.finish_messages(&flag, "conv_1", Ok(thread("conv_1", "oi"))));
        assert_eq!(s.messages().len(), 1);
    }

    #[test]
    fn failed_thread_can_be_retried() {
        let mut s = session();
        let (_, flag) = s.reload_messages().unwrap();
        let err = ApiError::Url("http://bad host".to_string());
        assert!(s.finish_messages(&flag, "conv_1", Err(err)));
        assert!(s.messages_state().error().is_some());

        let (_, retry) = s.reload_messages().unwrap();
        assert!(s.finish_messages(&retry, "conv_1", Ok(thread("conv_1", "oi"))));
        assert_eq!(s.messages().len(), 1);
    }

    #[test]
    fn finalize_moves_to_holding_and_retitles() {
        let mut s = session();
        s.finalize_current_quote(Outcome::Won);
        assert_eq!(s.selected_conversation().unwrap().workspace, Workspace::Holding);
        assert_eq!(s.selected_quote().unwrap().title, "Ganho");
        assert!(s.inbox().is_empty());
    }

    #[test]
    fn revive_selected_opens_new_quote() {
        let mut s = session();
        s.finalize_current_quote(Outcome::Lost);
        s.revive_conversation("conv_1");
        assert_eq!(s.selected_conversation().unwrap().workspace, Workspace::Inbox);
        assert_eq!(s.current_quotes().len(), 3);
        assert_eq!(s.selected_quote().unwrap().title, "Nova cotação");
    }

    #[test]
    fn revive_other_leaves_quotes_alone() {
        let mut s = session();
        s.revive_conversation("4");
        assert_eq!(s.inbox().len(), 2);
        assert_eq!(s.current_quotes().len(), 2);
    }

    #[test]
    fn update_quote_field() {
        let mut s = session();
        assert!(s.update_current_quote(|q| q.destination = Some("Orlando, EUA".into())));
        assert_eq!(
            s.selected_quote().unwrap().destination.as_deref(),
            Some("Orlando, EUA")
        );
    }

    #[test]
    fn reload_keeps_or_drops_selection() {
        let mut s = session();
        s.set_conversations(vec![Conversation::new("conv_1", "João")]);
        assert_eq!(s.selected_conversation_id(), Some("conv_1"));
        s.set_conversations(vec![Conversation::new("x", "Outro")]);
        assert_eq!(s.selected_conversation_id(), None);
    }
}

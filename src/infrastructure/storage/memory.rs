//! In-memory storage implementation

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{
    DomainError, DomainResult, Message, MessageDetail, MessageRepository, NewAccount, NewMessage,
    PublicProfile, ReadReceipt, ReceivedMessage, RepositoryProvider, SentMessage, UserProfile,
    UserRepository,
};

#[derive(Debug, Clone)]
struct AccountRow {
    password_hash: String,
    profile: UserProfile,
}

/// In-memory storage with the same semantics as the SeaORM provider.
pub struct InMemoryStorage {
    accounts: DashMap<String, AccountRow>,
    messages: DashMap<i32, Message>,
    message_counter: AtomicI32,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            messages: DashMap::new(),
            message_counter: AtomicI32::new(1),
        }
    }

    fn public_profile(&self, username: &str) -> DomainResult<PublicProfile> {
        self.accounts
            .get(username)
            .map(|row| PublicProfile::from(row.profile.clone()))
            .ok_or_else(|| {
                DomainError::Storage(format!("message references missing user '{}'", username))
            })
    }

    /// Messages matching `filter`, oldest first.
    fn select_messages(&self, filter: impl Fn(&Message) -> bool) -> Vec<Message> {
        let mut selected: Vec<Message> = self
            .messages
            .iter()
            .filter(|e| filter(e.value()))
            .map(|e| e.value().clone())
            .collect();
        selected.sort_by_key(|m| m.id);
        selected
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryStorage {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn messages(&self) -> &dyn MessageRepository {
        self
    }
}

#[async_trait]
impl UserRepository for InMemoryStorage {
    async fn get_credential(&self, username: &str) -> DomainResult<Option<String>> {
        Ok(self
            .accounts
            .get(username)
            .map(|row| row.password_hash.clone()))
    }

    async fn insert_account(&self, account: NewAccount) -> DomainResult<UserProfile> {
        match self.accounts.entry(account.username.clone()) {
            Entry::Occupied(_) => Err(DomainError::Validation(format!(
                "Username '{}' is already taken",
                account.username
            ))),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let profile = UserProfile {
                    username: account.username,
                    first_name: account.first_name,
                    last_name: account.last_name,
                    phone: account.phone,
                    join_at: now,
                    last_login_at: now,
                };
                slot.insert(AccountRow {
                    password_hash: account.password_hash,
                    profile: profile.clone(),
                });
                Ok(profile)
            }
        }
    }

    async fn update_last_login(&self, username: &str) -> DomainResult<Option<DateTime<Utc>>> {
        Ok(self.accounts.get_mut(username).map(|mut row| {
            let now = Utc::now();
            row.profile.last_login_at = now;
            now
        }))
    }

    async fn list_profiles(&self) -> DomainResult<Vec<PublicProfile>> {
        let mut profiles: Vec<PublicProfile> = self
            .accounts
            .iter()
            .map(|e| PublicProfile::from(e.value().profile.clone()))
            .collect();
        profiles.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(profiles)
    }

    async fn get_profile(&self, username: &str) -> DomainResult<Option<UserProfile>> {
        Ok(self.accounts.get(username).map(|row| row.profile.clone()))
    }
}

#[async_trait]
impl MessageRepository for InMemoryStorage {
    async fn get_message(&self, id: i32) -> DomainResult<Option<MessageDetail>> {
        let Some(message) = self.messages.get(&id).map(|m| m.clone()) else {
            return Ok(None);
        };

        Ok(Some(MessageDetail {
            id: message.id,
            from_user: self.public_profile(&message.from_username)?,
            to_user: self.public_profile(&message.to_username)?,
            body: message.body,
            sent_at: message.sent_at,
            read_at: message.read_at,
        }))
    }

    async fn insert_message(&self, new: NewMessage) -> DomainResult<Message> {
        // Mirror the foreign keys of the relational schema.
        self.public_profile(&new.from_username)?;
        self.public_profile(&new.to_username)?;

        let id = self.message_counter.fetch_add(1, Ordering::SeqCst);
        let message = Message {
            id,
            from_username: new.from_username,
            to_username: new.to_username,
            body: new.body,
            sent_at: Utc::now(),
            read_at: None,
        };
        self.messages.insert(id, message.clone());
        Ok(message)
    }

    async fn mark_read(&self, id: i32) -> DomainResult<Option<ReadReceipt>> {
        Ok(self.messages.get_mut(&id).map(|mut message| {
            let now = Utc::now();
            message.read_at = Some(now);
            ReadReceipt { id, read_at: now }
        }))
    }

    async fn messages_from(&self, username: &str) -> DomainResult<Vec<SentMessage>> {
        self.select_messages(|m| m.from_username == username)
            .into_iter()
            .map(|m| {
                Ok(SentMessage {
                    id: m.id,
                    to_user: self.public_profile(&m.to_username)?,
                    body: m.body,
                    sent_at: m.sent_at,
                    read_at: m.read_at,
                })
            })
            .collect()
    }

    async fn messages_to(&self, username: &str) -> DomainResult<Vec<ReceivedMessage>> {
        self.select_messages(|m| m.to_username == username)
            .into_iter()
            .map(|m| {
                Ok(ReceivedMessage {
                    id: m.id,
                    from_user: self.public_profile(&m.from_username)?,
                    body: m.body,
                    sent_at: m.sent_at,
                    read_at: m.read_at,
                })
            })
            .collect()
    }
}

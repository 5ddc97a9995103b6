//! Delivery seam for local notifications

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::settings::ReminderConfig;

pub type NotificationId = String;

/// Callback invoked with the content of a delivered or tapped notification
pub type Listener = Box<dyn Fn(&NotificationContent) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl NotificationContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data: Map::new(),
        }
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    Immediate,
    Daily { hour: u8, minute: u8 },
}

impl Trigger {
    /// Daily trigger for an enabled reminder with a valid time of day
    pub fn from_reminder(config: &ReminderConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        config.time_of_day()?;
        Some(Trigger::Daily {
            hour: config.hour?,
            minute: config.minute?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledNotification {
    pub identifier: NotificationId,
    pub content: NotificationContent,
    pub trigger: Trigger,
}

/// Handle returned when registering a listener
pub struct Subscription {
    on_remove: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(on_remove: impl FnOnce() + Send + 'static) -> Self {
        Self {
            on_remove: Some(Box::new(on_remove)),
        }
    }

    /// A subscription with nothing to undo
    pub fn inert() -> Self {
        Self { on_remove: None }
    }

    pub fn remove(mut self) {
        if let Some(on_remove) = self.on_remove.take() {
            on_remove();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.on_remove.is_some())
            .finish()
    }
}

#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    /// Ask the platform for permission to show notifications
    async fn request_permissions(&self) -> bool;

    async fn schedule(
        &self,
        content: &NotificationContent,
        trigger: Trigger,
    ) -> Option<NotificationId>;

    async fn send_now(&self, content: &NotificationContent) -> Option<NotificationId>;

    async fn cancel(&self, identifier: &str);

    async fn cancel_all(&self);

    async fn scheduled(&self) -> Vec<ScheduledNotification>;

    fn on_response(&self, listener: Listener) -> Subscription;

    fn on_received(&self, listener: Listener) -> Subscription;
}

/// Scheduler for builds without notification delivery: nothing is ever scheduled or shown.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledScheduler;

#[async_trait]
impl NotificationScheduler for DisabledScheduler {
    async fn request_permissions(&self) -> bool {
        false
    }

    async fn schedule(
        &self,
        _content: &NotificationContent,
        _trigger: Trigger,
    ) -> Option<NotificationId> {
        None
    }

    async fn send_now(&self, _content: &NotificationContent) -> Option<NotificationId> {
        None
    }

    async fn cancel(&self, _identifier: &str) {}

    async fn cancel_all(&self) {}

    async fn scheduled(&self) -> Vec<ScheduledNotification> {
        Vec::new()
    }

    fn on_response(&self, _listener: Listener) -> Subscription {
        Subscription::inert()
    }

    fn on_received(&self, _listener: Listener) -> Subscription {
        Subscription::inert()
    }
}

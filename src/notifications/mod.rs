//! Reminder notifications: persisted preferences plus a delivery scheduler

pub mod scheduler;

use serde_json::{Map, Value};

pub use scheduler::{
    DisabledScheduler, Listener, NotificationContent, NotificationId, NotificationScheduler,
    ScheduledNotification, Subscription, Trigger,
};

use crate::settings::{
    LocalSettingsStore, NotificationSettings, ReminderOptions, DAILY_CHECKIN, EVENING_REFLECTION,
};
use crate::storage::KeyValueStore;

pub struct NotificationService<K, N = DisabledScheduler> {
    settings: LocalSettingsStore<K>,
    scheduler: N,
}

impl<K: KeyValueStore> NotificationService<K, DisabledScheduler> {
    pub fn disabled(settings: LocalSettingsStore<K>) -> Self {
        Self::new(settings, DisabledScheduler)
    }
}

impl<K: KeyValueStore, N: NotificationScheduler> NotificationService<K, N> {
    pub fn new(settings: LocalSettingsStore<K>, scheduler: N) -> Self {
        Self {
            settings,
            scheduler,
        }
    }

    pub fn settings_store(&self) -> &LocalSettingsStore<K> {
        &self.settings
    }

    pub fn scheduler(&self) -> &N {
        &self.scheduler
    }

    pub async fn request_permissions(&self) -> bool {
        self.scheduler.request_permissions().await
    }

    /// Save the daily check-in preference and schedule it if it is enabled and timed
    pub async fn schedule_daily_checkin(&self, options: ReminderOptions) -> Option<NotificationId> {
        let content = NotificationContent::new("Daily check-in", "How are you feeling today?");
        self.schedule_named(DAILY_CHECKIN, options, content).await
    }

    pub async fn schedule_evening_reflection(
        &self,
        options: ReminderOptions,
    ) -> Option<NotificationId> {
        let content =
            NotificationContent::new("Evening reflection", "Take a moment to look back on your day.");
        self.schedule_named(EVENING_REFLECTION, options, content).await
    }

    async fn schedule_named(
        &self,
        name: &str,
        options: ReminderOptions,
        content: NotificationContent,
    ) -> Option<NotificationId> {
        self.settings.set_reminder(name, options.clone()).await;
        let trigger = Trigger::from_reminder(&options.into_config())?;
        self.scheduler.schedule(&content, trigger).await
    }

    /// Schedule a one-off or repeating notification that has no stored preference
    pub async fn schedule_custom_reminder(
        &self,
        content: NotificationContent,
        trigger: Trigger,
    ) -> Option<NotificationId> {
        self.scheduler.schedule(&content, trigger).await
    }

    pub async fn send_immediate(
        &self,
        title: &str,
        body: &str,
        data: Map<String, Value>,
    ) -> Option<NotificationId> {
        let content = NotificationContent::new(title, body).with_data(data);
        self.scheduler.send_now(&content).await
    }

    pub async fn cancel_by_identifier(&self, identifier: &str) {
        self.scheduler.cancel(identifier).await;
    }

    /// Cancel everything scheduled and delete all stored reminder preferences
    pub async fn cancel_all(&self) {
        self.scheduler.cancel_all().await;
        self.settings.clear_all().await;
    }

    pub async fn scheduled(&self) -> Vec<ScheduledNotification> {
        self.scheduler.scheduled().await
    }

    pub async fn settings(&self) -> NotificationSettings {
        self.settings.get_settings().await
    }

    pub async fn setup_defaults(&self) -> bool {
        self.settings.setup_defaults().await
    }

    pub fn add_response_listener(&self, listener: Listener) -> Subscription {
        self.scheduler.on_response(listener)
    }

    pub fn add_received_listener(&self, listener: Listener) -> Subscription {
        self.scheduler.on_received(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    fn disabled() -> NotificationService<MemoryKeyValueStore> {
        NotificationService::disabled(LocalSettingsStore::new(MemoryKeyValueStore::new()))
    }

    #[tokio::test]
    async fn test_disabled_service_still_persists_preferences() {
        let service = disabled();

        assert_eq!(service.schedule_daily_checkin(ReminderOptions::at(8, 15)).await, None);
        assert_eq!(
            service
                .schedule_evening_reflection(ReminderOptions::default())
                .await,
            None
        );

        let settings = service.settings().await;
        assert_eq!(settings.get(DAILY_CHECKIN).unwrap().hour, Some(8));
        assert!(settings.get(EVENING_REFLECTION).unwrap().enabled);
        assert!(!service.request_permissions().await);
        assert!(service.scheduled().await.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_all_clears_preferences() {
        let service = disabled();
        assert!(service.setup_defaults().await);

        service.cancel_all().await;
        assert!(service.settings().await.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_one_offs_return_nothing() {
        let service = disabled();
        let content = NotificationContent::new("Breathe", "Two minutes of calm");

        assert_eq!(
            service
                .schedule_custom_reminder(content, Trigger::Daily { hour: 12, minute: 0 })
                .await,
            None
        );
        assert_eq!(service.send_immediate("Hi", "There", Map::new()).await, None);
        service.cancel_by_identifier("nothing").await;
        service.add_response_listener(Box::new(|_: &NotificationContent| {})).remove();
    }

    #[derive(Default)]
    struct RecordingScheduler {
        scheduled: Mutex<Vec<ScheduledNotification>>,
    }

    #[async_trait]
    impl NotificationScheduler for RecordingScheduler {
        async fn request_permissions(&self) -> bool {
            true
        }

        async fn schedule(
            &self,
            content: &NotificationContent,
            trigger: Trigger,
        ) -> Option<NotificationId> {
            let mut scheduled = self.scheduled.lock().await;
            let identifier = format!("n{}", scheduled.len());
            scheduled.push(ScheduledNotification {
                identifier: identifier.clone(),
                content: content.clone(),
                trigger,
            });
            Some(identifier)
        }

        async fn send_now(&self, content: &NotificationContent) -> Option<NotificationId> {
            self.schedule(content, Trigger::Immediate).await
        }

        async fn cancel(&self, identifier: &str) {
            self.scheduled
                .lock()
                .await
                .retain(|n| n.identifier != identifier);
        }

        async fn cancel_all(&self) {
            self.scheduled.lock().await.clear();
        }

        async fn scheduled(&self) -> Vec<ScheduledNotification> {
            self.scheduled.lock().await.clone()
        }

        fn on_response(&self, _listener: Listener) -> Subscription {
            Subscription::inert()
        }

        fn on_received(&self, _listener: Listener) -> Subscription {
            Subscription::inert()
        }
    }

    #[tokio::test]
    async fn test_enabled_reminder_reaches_scheduler() {
        let service = NotificationService::new(
            LocalSettingsStore::new(MemoryKeyValueStore::new()),
            RecordingScheduler::default(),
        );

        let id = service
            .schedule_daily_checkin(ReminderOptions::at(9, 0))
            .await
            .unwrap();
        assert_eq!(
            service
                .schedule_evening_reflection(ReminderOptions::at(20, 0).enabled(false))
                .await,
            None
        );

        let scheduled = service.scheduled().await;
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].identifier, id);
        assert_eq!(scheduled[0].trigger, Trigger::Daily { hour: 9, minute: 0 });

        service.cancel_by_identifier(&id).await;
        assert!(service.scheduled().await.is_empty());
    }
}

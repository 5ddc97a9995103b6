use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_enabled() -> bool {
    true
}

/// Stored schedule preference for one named reminder.
///
/// Fields the store does not know about are kept in `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<u8>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReminderConfig {
    /// Time of day the reminder fires, if both fields are present and in range
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(u32::from(self.hour?), u32::from(self.minute?), 0)
    }
}

/// Caller-supplied reminder fields. Anything left unset is absent from the stored record,
/// except `enabled`, which defaults to `true`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReminderOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<u8>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReminderOptions {
    pub fn at(hour: u8, minute: u8) -> Self {
        Self {
            hour: Some(hour),
            minute: Some(minute),
            ..Self::default()
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: Some(false),
            ..Self::default()
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn into_config(self) -> ReminderConfig {
        ReminderConfig {
            enabled: self.enabled.unwrap_or(true),
            hour: self.hour,
            minute: self.minute,
            extra: self.extra,
        }
    }
}

impl From<ReminderOptions> for ReminderConfig {
    fn from(options: ReminderOptions) -> Self {
        options.into_config()
    }
}

/// JavaScript truthiness, for stored flags written by clients that did not use `bool`
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn small_int(value: Option<&Value>) -> Option<u8> {
    value?.as_u64().and_then(|n| u8::try_from(n).ok())
}

impl ReminderConfig {
    /// Lenient view of a stored entry.
    ///
    /// `None` if the entry is not an object. A missing `enabled` reads as `true`; an `hour` or
    /// `minute` that is not a small non-negative integer reads as unset.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut extra = object.clone();
        let enabled = extra.remove("enabled").map_or(true, |v| truthy(&v));
        let hour = small_int(extra.remove("hour").as_ref());
        let minute = small_int(extra.remove("minute").as_ref());
        Some(Self {
            enabled,
            hour,
            minute,
            extra,
        })
    }
}

impl From<ReminderConfig> for Value {
    fn from(config: ReminderConfig) -> Self {
        let mut object = config.extra;
        object.insert("enabled".to_string(), Value::Bool(config.enabled));
        if let Some(hour) = config.hour {
            object.insert("hour".to_string(), hour.into());
        }
        if let Some(minute) = config.minute {
            object.insert("minute".to_string(), minute.into());
        }
        Value::Object(object)
    }
}

/// The whole persisted settings document: reminder name to its stored entry.
///
/// Entries are kept as raw JSON so records this crate cannot interpret are written back
/// exactly as they were read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationSettings(Map<String, Value>);

impl NotificationSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<ReminderConfig> {
        ReminderConfig::from_value(self.0.get(name)?)
    }

    /// The entry exactly as stored
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, config: ReminderConfig) -> Option<Value> {
        self.0.insert(name.into(), config.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<ReminderConfig> {
        ReminderConfig::from_value(&self.0.remove(name)?)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Entries that decode as reminders; others are skipped
    pub fn iter(&self) -> impl Iterator<Item = (&str, ReminderConfig)> + '_ {
        self.0
            .iter()
            .filter_map(|(name, value)| Some((name.as_str(), ReminderConfig::from_value(value)?)))
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl FromIterator<(String, ReminderConfig)> for NotificationSettings {
    fn from_iter<I: IntoIterator<Item = (String, ReminderConfig)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, config)| (name, Value::from(config)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enabled_defaults_to_true() {
        let config = ReminderOptions::at(9, 0).into_config();
        assert!(config.enabled);
        assert_eq!((config.hour, config.minute), (Some(9), Some(0)));
    }

    #[test]
    fn test_caller_enabled_wins() {
        assert!(!ReminderOptions::disabled().into_config().enabled);
        assert!(!ReminderOptions::at(7, 30).enabled(false).into_config().enabled);
    }

    #[test]
    fn test_extra_fields_survive_serialization() {
        let stored = json!({
            "enabled": true,
            "hour": 20,
            "minute": 15,
            "sound": "chime",
            "weekdays": [1, 2, 3]
        });
        let config: ReminderConfig = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(config.extra.get("sound"), Some(&json!("chime")));
        assert_eq!(serde_json::to_value(&config).unwrap(), stored);
    }

    #[test]
    fn test_absent_fields_are_not_written() {
        let config = ReminderOptions::disabled().into_config();
        assert_eq!(serde_json::to_value(&config).unwrap(), json!({ "enabled": false }));
    }

    #[test]
    fn test_time_of_day() {
        let config = ReminderOptions::at(20, 0).into_config();
        assert_eq!(config.time_of_day(), NaiveTime::from_hms_opt(20, 0, 0));

        assert_eq!(ReminderOptions::at(24, 0).into_config().time_of_day(), None);
        assert_eq!(ReminderOptions::default().into_config().time_of_day(), None);
    }

    #[test]
    fn test_lenient_view_of_oddly_typed_entry() {
        let config = ReminderConfig::from_value(&json!({
            "enabled": null,
            "hour": 9.5,
            "minute": "30",
            "label": "legacy"
        }))
        .unwrap();

        assert!(!config.enabled);
        assert_eq!((config.hour, config.minute), (None, None));
        assert_eq!(config.extra.get("label"), Some(&json!("legacy")));
        assert_eq!(ReminderConfig::from_value(&json!({ "hour": 300 })).unwrap().hour, None);
        assert!(ReminderConfig::from_value(&json!({})).unwrap().enabled);
        assert_eq!(ReminderConfig::from_value(&json!(true)), None);
    }

    #[test]
    fn test_value_conversion_matches_serialization() {
        let config = ReminderOptions::at(7, 5).with_field("sound", "chime").into_config();
        assert_eq!(Value::from(config.clone()), serde_json::to_value(&config).unwrap());
    }

    #[test]
    fn test_foreign_entries_round_trip() {
        let stored = r#"{"legacy":{"enabled":null,"hour":9.5},"odd":5}"#;
        let settings: NotificationSettings = serde_json::from_str(stored).unwrap();

        assert_eq!(settings.len(), 2);
        assert_eq!(settings.get("odd"), None);
        assert_eq!(settings.iter().count(), 1);
        assert_eq!(serde_json::to_string(&settings).unwrap(), stored);
    }

    #[test]
    fn test_non_object_document_is_rejected() {
        assert!(serde_json::from_str::<NotificationSettings>("[1, 2]").is_err());
        assert!(serde_json::from_str::<NotificationSettings>("null").is_err());
    }

    #[test]
    fn test_document_is_a_plain_mapping() {
        let mut settings = NotificationSettings::new();
        settings.insert("dailyCheckin", ReminderOptions::at(9, 0).into_config());

        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({ "dailyCheckin": { "enabled": true, "hour": 9, "minute": 0 } })
        );
    }
}

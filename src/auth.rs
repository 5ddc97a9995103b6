use async_trait::async_trait;

/// Token persistence an authentication provider needs to keep a session across restarts.
///
/// Implementations must never fail: a token that cannot be read is simply absent, and a
/// token that cannot be written is dropped.
#[async_trait]
pub trait TokenCache: Send + Sync {
    /// Returns the token stored under `key`, if any
    async fn get_token(&self, key: &str) -> Option<String>;

    /// Persists `token` under `key`. Callers get no confirmation of durability.
    async fn save_token(&self, key: &str, token: &str);
}

use crate::services::gallery::GalleryView;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

pub const SESSION_COOKIE: &str = "gallery_session";

struct Entry {
    view: GalleryView,
    last_seen: Instant,
}

/// One gallery view per browser. Handlers take a copy, work on it without
/// holding the lock and put it back; the last write wins.
pub struct SessionStore {
    views: RwLock<HashMap<String, Entry>>,
    max_idle: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(30 * 60))
    }
}

impl SessionStore {
    pub fn new(max_idle: Duration) -> Self {
        Self {
            views: RwLock::new(HashMap::new()),
            max_idle,
        }
    }

    pub fn generate_id() -> String {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let mut bytes = [0u8; 24];
        rand::thread_rng().fill(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Reads the session id from the cookie, issuing a new one when absent.
    pub fn resolve(jar: CookieJar) -> (CookieJar, String) {
        if let Some(id) = jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) {
            if !id.is_empty() {
                return (jar, id);
            }
        }
        let id = Self::generate_id();
        let cookie = Cookie::build((SESSION_COOKIE, id.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();
        (jar.add(cookie), id)
    }

    pub fn get(&self, id: &str) -> Option<GalleryView> {
        let views = self.views.read().ok()?;
        let entry = views.get(id)?;
        if entry.last_seen.elapsed() >= self.max_idle {
            return None;
        }
        Some(entry.view.clone())
    }

    pub fn put(&self, id: &str, view: GalleryView) {
        if let Ok(mut views) = self.views.write() {
            views.insert(
                id.to_string(),
                Entry {
                    view,
                    last_seen: Instant::now(),
                },
            );
        }
    }

    /// Drops idle sessions and returns how many were removed.
    pub fn cleanup(&self) -> usize {
        let Ok(mut views) = self.views.write() else {
            return 0;
        };
        let before = views.len();
        views.retain(|_, entry| entry.last_seen.elapsed() < self.max_idle);
        before - views.len()
    }

    pub fn len(&self) -> usize {
        self.views.read().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_issues_cookie_once() {
        let (jar, id) = SessionStore::resolve(CookieJar::new());
        assert!(!id.is_empty());
        assert_eq!(jar.get(SESSION_COOKIE).unwrap().value(), id);

        let (_, again) = SessionStore::resolve(jar);
        assert_eq!(again, id);
    }

    #[test]
    fn test_put_then_get_returns_copy() {
        let store = SessionStore::default();
        let mut view = GalleryView::new();
        view.set_title("draft");
        store.put("abc", view);

        let mut copy = store.get("abc").unwrap();
        assert_eq!(copy.title, "draft");
        copy.set_title("changed");
        assert_eq!(store.get("abc").unwrap().title, "draft");
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_idle_sessions_expire() {
        let store = SessionStore::new(Duration::ZERO);
        store.put("abc", GalleryView::new());
        assert!(store.get("abc").is_none());
        assert_eq!(store.cleanup(), 1);
        assert!(store.is_empty());
    }
}

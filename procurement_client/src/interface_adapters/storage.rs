use cookie::Cookie;
use cookie::time::OffsetDateTime;
use reqwest::Url;
use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::ports::KeyValueStore;

// Volatile store for embedding and tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        let entries = self.entries.lock().map_err(|err| err.to_string())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut entries = self.entries.lock().map_err(|err| err.to_string())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, String> {
        let mut entries = self.entries.lock().map_err(|err| err.to_string())?;
        Ok(entries.remove(key).is_some())
    }
}

/// Durable store backed by a TOML file, rewritten on every change.
///
/// Survives restarts the way browser local storage does, which is what the
/// bearer token needs. Memory only changes once the file write succeeded.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, String> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => toml::from_str::<BTreeMap<String, String>>(&raw)
                .map_err(|err| format!("invalid store file {}: {err}", path.display()))?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(format!("failed to read {}: {err}", path.display())),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), String> {
        let raw = toml::to_string(entries).map_err(|err| err.to_string())?;
        fs::write(&self.path, raw)
            .map_err(|err| format!("failed to write {}: {err}", self.path.display()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        let entries = self.entries.lock().map_err(|err| err.to_string())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut entries = self.entries.lock().map_err(|err| err.to_string())?;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, String> {
        let mut entries = self.entries.lock().map_err(|err| err.to_string())?;
        if !entries.contains_key(key) {
            return Ok(false);
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(true)
    }
}

struct StoredCookie {
    value: String,
    // Sent only to the exact host that set it (no `Domain` attribute).
    host_only: bool,
    expires_at: Option<OffsetDateTime>,
}

impl StoredCookie {
    fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Cookie jar shared by the transport and the CSRF reader.
///
/// Cookies are scoped by host and honour `Max-Age` and `Expires`; paths are
/// not tracked. Values are kept exactly as the server sent them (still
/// URL-encoded). The [`KeyValueStore`] view reads and writes the cookies of
/// the API host the jar was created for.
pub struct CookieJar {
    home_host: String,
    // Keyed by (domain, name).
    cookies: Mutex<BTreeMap<(String, String), StoredCookie>>,
}

impl CookieJar {
    pub fn for_host(host: impl Into<String>) -> Self {
        Self {
            home_host: host.into().to_ascii_lowercase(),
            cookies: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn home_host(&self) -> &str {
        &self.home_host
    }

    fn home_key(&self, name: &str) -> (String, String) {
        (self.home_host.clone(), name.to_string())
    }
}

impl KeyValueStore for CookieJar {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        let mut cookies = self.cookies.lock().map_err(|err| err.to_string())?;
        let home = self.home_key(key);
        match cookies.get(&home) {
            Some(cookie) if cookie.is_expired(OffsetDateTime::now_utc()) => {
                cookies.remove(&home);
                Ok(None)
            }
            Some(cookie) => Ok(Some(cookie.value.clone())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut cookies = self.cookies.lock().map_err(|err| err.to_string())?;
        cookies.insert(
            self.home_key(key),
            StoredCookie {
                value: value.to_string(),
                host_only: true,
                expires_at: None,
            },
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, String> {
        let mut cookies = self.cookies.lock().map_err(|err| err.to_string())?;
        Ok(cookies.remove(&self.home_key(key)).is_some())
    }
}

impl CookieStore for CookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let Some(host) = url.host_str().map(str::to_ascii_lowercase) else {
            return;
        };
        let Ok(mut cookies) = self.cookies.lock() else {
            return;
        };
        let now = OffsetDateTime::now_utc();

        for header in cookie_headers {
            let Some(cookie) = header.to_str().ok().and_then(|raw| Cookie::parse(raw).ok())
            else {
                debug!("ignoring malformed set-cookie header");
                continue;
            };

            // A `Domain` attribute may only widen the scope to a parent of the host.
            let (domain, host_only) = match cookie.domain() {
                Some(domain) => {
                    let domain = domain.trim_start_matches('.').to_ascii_lowercase();
                    if !domain_matches(&domain, &host) {
                        warn!(cookie = cookie.name(), %domain, %host, "rejecting cookie for foreign domain");
                        continue;
                    }
                    (domain, false)
                }
                None => (host.clone(), true),
            };

            // Max-Age wins over Expires; a non-positive age or a past date deletes.
            let expires_at = match cookie.max_age() {
                Some(max_age) => Some(now + max_age),
                None => cookie.expires_datetime(),
            };

            let key = (domain, cookie.name().to_string());
            if expires_at.is_some_and(|at| at <= now) {
                cookies.remove(&key);
                continue;
            }
            cookies.insert(
                key,
                StoredCookie {
                    value: cookie.value().to_string(),
                    host_only,
                    expires_at,
                },
            );
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let host = url.host_str()?.to_ascii_lowercase();
        let mut cookies = self.cookies.lock().ok()?;
        let now = OffsetDateTime::now_utc();
        cookies.retain(|_, cookie| !cookie.is_expired(now));

        let header = cookies
            .iter()
            .filter(|((domain, _), cookie)| {
                if cookie.host_only {
                    *domain == host
                } else {
                    domain_matches(domain, &host)
                }
            })
            .map(|((_, name), cookie)| format!("{name}={}", cookie.value))
            .collect::<Vec<_>>();
        if header.is_empty() {
            return None;
        }
        HeaderValue::from_str(&header.join("; ")).ok()
    }
}

fn domain_matches(domain: &str, host: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

//! The signed-in user, cached locally for display only.

use oasis_api::{decode_credential, User};

use crate::error::OasisError;
use crate::storage::Storage;

const USER_KEY: &str = "user";

#[derive(Debug, Clone, Default)]
pub struct UserSession {
    user: Option<User>,
}

impl UserSession {
    /// Restore the cached user. A corrupt cache entry is dropped.
    pub fn restore(store: &Storage) -> Result<Self, OasisError> {
        let Some(raw) = store.get_pref(USER_KEY)? else {
            return Ok(Self::default());
        };
        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Ok(Self { user: Some(user) }),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable cached user");
                store.delete_pref(USER_KEY)?;
                Ok(Self::default())
            }
        }
    }

    pub fn current(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Accept the identity provider's credential and cache the user it names.
    pub fn sign_in(&mut self, store: &Storage, credential: &str) -> Result<&User, OasisError> {
        let user = decode_credential(credential)?;
        store.set_pref(USER_KEY, &serde_json::to_string(&user)?)?;
        tracing::info!(name = %user.name, "signed in");
        Ok(self.user.insert(user))
    }

    pub fn sign_out(&mut self, store: &Storage) -> Result<(), OasisError> {
        store.delete_pref(USER_KEY)?;
        if self.user.take().is_some() {
            tracing::info!("signed out");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // header {"alg":"none"}, payload {"name":"Mika Tanaka","picture":"https://example.test/mika.png"}
    const CREDENTIAL: &str = "eyJhbGciOiJub25lIn0.\
        eyJuYW1lIjoiTWlrYSBUYW5ha2EiLCJwaWN0dXJlIjoiaHR0cHM6Ly9leGFtcGxlLnRlc3QvbWlrYS5wbmcifQ.\
        sig";

    #[test]
    fn test_sign_in_caches_user() {
        let db = Storage::open_memory().unwrap();
        let mut session = UserSession::restore(&db).unwrap();
        assert!(session.current().is_none());

        let user = session.sign_in(&db, CREDENTIAL).unwrap();
        assert_eq!(user.name, "Mika Tanaka");

        let restored = UserSession::restore(&db).unwrap();
        assert_eq!(
            restored.current().map(|u| u.avatar_url.as_str()),
            Some("https://example.test/mika.png")
        );
    }

    #[test]
    fn test_sign_out_clears_cache() {
        let db = Storage::open_memory().unwrap();
        let mut session = UserSession::default();
        session.sign_in(&db, CREDENTIAL).unwrap();
        session.sign_out(&db).unwrap();
        assert!(session.current().is_none());
        assert!(UserSession::restore(&db).unwrap().current().is_none());
    }

    #[test]
    fn test_bad_credential_leaves_session_untouched() {
        let db = Storage::open_memory().unwrap();
        let mut session = UserSession::default();
        assert!(matches!(
            session.sign_in(&db, "not-a-token"),
            Err(OasisError::Identity(_))
        ));
        assert!(session.current().is_none());
        assert!(db.get_pref(USER_KEY).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_cache_is_discarded() {
        let db = Storage::open_memory().unwrap();
        db.set_pref(USER_KEY, "{not json").unwrap();
        let session = UserSession::restore(&db).unwrap();
        assert!(session.current().is_none());
        assert!(db.get_pref(USER_KEY).unwrap().is_none());
    }
}

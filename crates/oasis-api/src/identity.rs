//! Display claims from an identity-provider credential.
//!
//! The sign-in button hands back a JWT. Only the `name` and `picture` claims
//! are read, to show who is signed in. The signature is not checked; nothing
//! is authorized with this token.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use thiserror::Error;

use crate::media::User;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("credential is not a JWT (expected 3 segments, found {0})")]
    Malformed(usize),

    #[error("credential payload is not base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("credential payload is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("credential has no name claim")]
    MissingName,
}

#[derive(Debug, Deserialize)]
struct DisplayClaims {
    name: Option<String>,
    picture: Option<String>,
}

/// Decode the display user out of an identity credential.
pub fn decode_credential(credential: &str) -> Result<User, IdentityError> {
    let segments: Vec<&str> = credential.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(IdentityError::Malformed(segments.len()));
    }

    let payload = URL_SAFE_NO_PAD.decode(segments[1].trim_end_matches('='))?;
    let claims: DisplayClaims = serde_json::from_slice(&payload)?;

    let name = claims
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or(IdentityError::MissingName)?;

    Ok(User {
        name,
        avatar_url: claims.picture.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE;

    use super::*;

    fn credential(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload);
        format!("{header}.{body}.c2lnbmF0dXJl")
    }

    #[test]
    fn test_decode_name_and_picture() {
        let token = credential(
            r#"{"iss":"https://accounts.google.com","name":"Mika Tanaka","picture":"https://lh3.googleusercontent.com/a/photo.jpg","email":"mika@example.com"}"#,
        );
        let user = decode_credential(&token).unwrap();
        assert_eq!(user.name, "Mika Tanaka");
        assert_eq!(user.avatar_url, "https://lh3.googleusercontent.com/a/photo.jpg");
    }

    #[test]
    fn test_padded_payload_is_accepted() {
        let header = URL_SAFE_NO_PAD.encode("{}");
        let body = URL_SAFE.encode(r#"{"name":"Ren"}"#);
        let token = format!("{header}.{body}.sig");
        let user = decode_credential(&token).unwrap();
        assert_eq!(user.name, "Ren");
        assert_eq!(user.avatar_url, "");
    }

    #[test]
    fn test_not_a_jwt() {
        assert!(matches!(
            decode_credential("just-a-string"),
            Err(IdentityError::Malformed(1))
        ));
    }

    #[test]
    fn test_missing_name() {
        let token = credential(r#"{"picture":"https://example.test/p.png"}"#);
        assert!(matches!(
            decode_credential(&token),
            Err(IdentityError::MissingName)
        ));
    }

    #[test]
    fn test_garbage_payload() {
        assert!(matches!(
            decode_credential("a.!!!.c"),
            Err(IdentityError::Encoding(_))
        ));
        let token = format!("a.{}.c", URL_SAFE_NO_PAD.encode("not json"));
        assert!(matches!(
            decode_credential(&token),
            Err(IdentityError::Payload(_))
        ));
    }
}

use cloudcode_types::protocol::{Content, Role};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Hex characters kept from the digest.
const SESSION_ID_LEN: usize = 32;

/// Stable id for a conversation: the truncated SHA-256 of the first user turn
/// that has text, its text parts joined by `\n`. Random when no such turn exists.
pub fn derive_session_id(contents: &[Content]) -> String {
    let first_user_text = contents
        .iter()
        .filter(|c| c.role == Role::User)
        .map(|c| c.texts().collect::<Vec<_>>())
        .find(|texts| !texts.is_empty());

    match first_user_text {
        Some(texts) => {
            let digest = Sha256::digest(texts.join("\n").as_bytes());
            let mut hex = format!("{:x}", digest);
            hex.truncate(SESSION_ID_LEN);
            hex
        },
        None => Uuid::new_v4().to_string(),
    }
}

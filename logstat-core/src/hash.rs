use fnv::FnvHasher;
use std::hash::Hasher;

/// Stable 64-bit FNV-1a digest of `parts`, rendered as 16 lowercase hex digits.
///
/// The digest is written into cache and stats files, so it must not depend on
/// the process (no random seeding) or on the platform.
pub fn digest(parts: &[&str]) -> String {
    let mut hasher = FnvHasher::default();
    for part in parts {
        hasher.write(part.as_bytes());
    }
    format!("{:016x}", hasher.finish())
}

/// Key of the client cache: hash of the raw user-agent string.
pub fn user_agent_hash(ua: &str) -> String {
    digest(&[ua])
}

/// Unit of unique-visitor counting: hash of client IP followed by raw user-agent.
pub fn visitor_key(ip: &str, ua: &str) -> String {
    digest(&[ip, ua])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_fnv1a_of_concatenation() {
        // FNV-1a 64 offset basis for empty input
        assert_eq!(digest(&[]), "cbf29ce484222325");
        assert_eq!(digest(&["a"]), "af63dc4c8601ec8c");
        assert_eq!(visitor_key("1.2.3.4", "X"), digest(&["1.2.3.4X"]));
    }

    #[test]
    fn user_agent_hash_differs_from_visitor_key() {
        assert_ne!(user_agent_hash("X"), visitor_key("1.2.3.4", "X"));
        assert_eq!(user_agent_hash("X").len(), 16);
    }
}

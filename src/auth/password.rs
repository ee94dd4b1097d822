use sha2::{Digest, Sha256};
use uuid::Uuid;

/// パスワードをソルト付きでハッシュ化する
///
/// 保存形式：`<salt_hex>$<digest_hex>`
pub fn hash(raw: &str) -> String {
    let salt = hex::encode(Uuid::new_v4().as_bytes());
    let digest = digest_with_salt(&salt, raw);
    format!("{salt}${digest}")
}

/// 保存済みハッシュとパスワードを照合する
///
/// 形式が不正な保存値は常に不一致として扱う。
pub fn verify(raw: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, digest)) => digest_with_salt(salt, raw) == digest,
        None => false,
    }
}

fn digest_with_salt(salt: &str, raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let stored = hash("s3cret");
        assert!(verify("s3cret", &stored));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let stored = hash("s3cret");
        assert!(!verify("wrong", &stored));
    }

    #[test]
    fn test_hash_is_salted() {
        // 同じパスワードでも保存値は毎回異なる
        assert_ne!(hash("s3cret"), hash("s3cret"));
    }

    #[test]
    fn test_verify_rejects_malformed_stored_value() {
        assert!(!verify("s3cret", "not-a-valid-hash"));
    }
}

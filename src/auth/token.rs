use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::MemberId;

/// アクセストークンのクレーム
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// 会員ID
    pub sub: Uuid,
    /// 有効期限（UNIX秒）
    pub exp: i64,
}

/// トークンの署名・検証キー（HS256）
///
/// ログイン時に発行し、保護されたエンドポイントで
/// Bearerトークンとして検証する。
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry_minutes: i64,
}

impl AuthKeys {
    pub fn new(secret: &str, expiry_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry_minutes,
        }
    }

    /// 会員向けのアクセストークンを発行する
    pub fn issue(
        &self,
        member_id: MemberId,
        now: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: member_id.value(),
            exp: (now + Duration::minutes(self.expiry_minutes)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// トークンを検証し、会員IDを取り出す
    ///
    /// 署名不正・期限切れはいずれもエラー。
    pub fn verify(&self, token: &str) -> Result<MemberId, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(MemberId::from_uuid(data.claims.sub))
    }
}

/// サーバー設定
///
/// すべて環境変数から読み込む。未設定の場合は開発用の既定値を使う。
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL接続URL（DATABASE_URL）
    pub database_url: String,
    /// 待ち受けポート（PORT）
    pub port: u16,
    /// トークン署名用シークレット（JWT_SECRET）
    pub jwt_secret: String,
    /// アクセストークンの有効期間（TOKEN_EXPIRY_MINUTES）
    pub token_expiry_minutes: i64,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/lending_library".into());

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let jwt_secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());

        let token_expiry_minutes = std::env::var("TOKEN_EXPIRY_MINUTES")
            .ok()
            .and_then(|m| m.parse().ok())
            .unwrap_or(30);

        Self {
            database_url,
            port,
            jwt_secret,
            token_expiry_minutes,
        }
    }
}

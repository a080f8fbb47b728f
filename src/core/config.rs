use crate::auth::JwtConfig;
use crate::notify::email::SmtpConfig;
use crate::notify::pusher::PusherConfig;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/luxurystay | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | CLIENT_URL | http://localhost:5173 | 前端地址 (CORS、邮件链接) |
/// | STRIPE_SECRET_KEY | - | Stripe 密钥 |
/// | PUSHER_APP_ID / PUSHER_KEY / PUSHER_SECRET / PUSHER_CLUSTER | - | Pusher 配置 |
/// | SMTP_SERVER / SMTP_PORT / SMTP_USERNAME / SMTP_PASSWORD | - | SMTP 配置 |
/// | SMTP_FROM_EMAIL / SMTP_FROM_NAME | noreply@luxurystay.local / LuxuryStay | 发件人 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/luxurystay HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库文件和日志
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 前端地址 (密码重置链接指向这里)
    pub client_url: String,
    /// Stripe 密钥
    pub stripe_secret_key: String,
    /// Pusher 配置
    pub pusher: PusherConfig,
    /// SMTP 配置
    pub smtp: SmtpConfig,
}

impl Config {
    /// 从环境变量加载配置，未设置时使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/luxurystay".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            client_url: std::env::var("CLIENT_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
            stripe_secret_key: std::env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
            pusher: PusherConfig {
                app_id: std::env::var("PUSHER_APP_ID").unwrap_or_default(),
                key: std::env::var("PUSHER_KEY").unwrap_or_default(),
                secret: std::env::var("PUSHER_SECRET").unwrap_or_default(),
                cluster: std::env::var("PUSHER_CLUSTER").unwrap_or_else(|_| "eu".into()),
            },
            smtp: SmtpConfig {
                server: std::env::var("SMTP_SERVER").unwrap_or_else(|_| "localhost".into()),
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(587),
                username: std::env::var("SMTP_USERNAME").unwrap_or_default(),
                password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
                from_email: std::env::var("SMTP_FROM_EMAIL")
                    .unwrap_or_else(|_| "noreply@luxurystay.local".into()),
                from_name: std::env::var("SMTP_FROM_NAME")
                    .unwrap_or_else(|_| "LuxuryStay".into()),
            },
        }
    }

    /// 数据库目录 (WORK_DIR/data)
    pub fn database_path(&self) -> String {
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| format!("{}/data", self.work_dir))
    }

    /// 日志目录 (WORK_DIR/logs)
    pub fn log_dir(&self) -> String {
        format!("{}/logs", self.work_dir)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

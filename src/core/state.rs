use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::booking::BookingManager;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{
    BillingRepository, BookingRepository, EventRepository, InquiryRepository, MessageRepository,
    NotificationRepository, ReviewRepository, RoomRepository, TaskRepository, UserRepository,
};
use crate::notify::{EventPublisher, Mailer, Notifier, PusherPublisher, SmtpMailer};
use crate::payments::{PaymentGateway, StripeGateway};
use crate::utils::AppResult;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 外部服务 (支付网关、推送、邮件) 以 trait 对象注入，测试替换为 mock。
/// 使用 Arc 实现浅拷贝。
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务
    pub jwt_service: Arc<JwtService>,
    /// 支付网关
    pub gateway: Arc<dyn PaymentGateway>,
    /// 实时推送
    pub publisher: Arc<dyn EventPublisher>,
    /// 邮件发送
    pub mailer: Arc<dyn Mailer>,
    /// 推送 + 通知持久化
    pub notifier: Notifier,
    /// 预订流程管理器
    pub bookings: Arc<BookingManager>,
}

impl ServerState {
    /// 初始化全部服务 (生产适配器)
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db_service = DbService::new(&config.database_path()).await?;
        let gateway: Arc<dyn PaymentGateway> =
            Arc::new(StripeGateway::new(config.stripe_secret_key.clone()));
        let publisher: Arc<dyn EventPublisher> =
            Arc::new(PusherPublisher::new(config.pusher.clone()));
        let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(config.smtp.clone())?);
        Ok(Self::with_adapters(
            config.clone(),
            db_service.db,
            gateway,
            publisher,
            mailer,
        ))
    }

    /// 组装状态，外部服务由调用方注入 (测试用 mock)
    pub fn with_adapters(
        config: Config,
        db: Surreal<Db>,
        gateway: Arc<dyn PaymentGateway>,
        publisher: Arc<dyn EventPublisher>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let notifier = Notifier::new(publisher.clone(), NotificationRepository::new(db.clone()));
        let bookings = Arc::new(BookingManager::new(
            gateway.clone(),
            notifier.clone(),
            BookingRepository::new(db.clone()),
            BillingRepository::new(db.clone()),
            RoomRepository::new(db.clone()),
        ));

        Self {
            config,
            db,
            jwt_service,
            gateway,
            publisher,
            mailer,
            notifier,
            bookings,
        }
    }

    // Repository accessors — repositories are cheap clones over the db handle

    pub fn rooms(&self) -> RoomRepository {
        RoomRepository::new(self.db.clone())
    }

    pub fn bookings_repo(&self) -> BookingRepository {
        BookingRepository::new(self.db.clone())
    }

    pub fn billings(&self) -> BillingRepository {
        BillingRepository::new(self.db.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }

    pub fn events(&self) -> EventRepository {
        EventRepository::new(self.db.clone())
    }

    pub fn tasks(&self) -> TaskRepository {
        TaskRepository::new(self.db.clone())
    }

    pub fn inquiries(&self) -> InquiryRepository {
        InquiryRepository::new(self.db.clone())
    }

    pub fn notifications(&self) -> NotificationRepository {
        NotificationRepository::new(self.db.clone())
    }

    pub fn reviews(&self) -> ReviewRepository {
        ReviewRepository::new(self.db.clone())
    }

    pub fn messages(&self) -> MessageRepository {
        MessageRepository::new(self.db.clone())
    }
}

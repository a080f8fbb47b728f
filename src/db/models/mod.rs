//! Database Models
//!
//! One module per collection. Entities carry `Option<RecordId>` ids populated
//! by the database; record links serialize as `"table:key"` strings on the
//! wire via [`serde_helpers`].

pub mod serde_helpers;

pub mod billing;
pub mod booking;
pub mod event;
pub mod inquiry;
pub mod message;
pub mod notification;
pub mod review;
pub mod room;
pub mod task;
pub mod user;

pub use billing::{
    Billing, BillingCreate, BillingItem, BillingItemAdd, BillingStatus, PaymentApply,
};
pub use booking::{
    BookedRange, Booking, BookingCreate, BookingExtra, BookingStatus, QuoteRequest,
};
pub use event::{ContactInfo, Event, EventCreate, EventInvoice, EventStatus, EventType};
pub use inquiry::{Inquiry, InquiryCreate, InquiryReply, InquiryStatus};
pub use message::{Message, MessageSend};
pub use notification::{MarkRead, Notification, NotificationKind};
pub use review::{Review, ReviewCreate, ReviewUpdate};
pub use room::{Room, RoomCreate, RoomStatus, RoomType, RoomUpdate};
pub use task::{Task, TaskCreate, TaskPriority, TaskStatus, TaskType, TaskUpdate};
pub use user::{Role, User, UserCreate, UserPublic, UserUpdate};

pub mod detail;
pub mod list;
pub mod page;

pub use detail::{DetailContent, DetailModel, NotificationDetail, CHECK_OPERATORS};
pub use list::{NotificationList, NotificationRow};
pub use page::{group_by_day, paginate, Page, Section};

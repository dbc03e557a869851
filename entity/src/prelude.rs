pub use super::bot_setting::Entity as BotSetting;
pub use super::leader_snapshot::Entity as LeaderSnapshot;
pub use super::metric_history::Entity as MetricHistory;
pub use super::metric_snapshot::Entity as MetricSnapshot;
pub use super::tracked_entity::Entity as TrackedEntity;
pub use super::user_link::Entity as UserLink;

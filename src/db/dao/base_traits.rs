use sea_orm::entity::prelude::DateTimeWithTimeZone;

pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone);
    /// Currently held `updated_at`, if the active model carries one.
    fn updated_at(&self) -> Option<DateTimeWithTimeZone>;
}

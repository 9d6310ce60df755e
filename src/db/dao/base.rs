use chrono::{TimeDelta, Utc};
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    IntoActiveModel, Order, PrimaryKeyTrait, QueryOrder, QuerySelect, Select,
};

use super::base_traits::TimestampedActiveModel;
use super::error::{DaoLayerError, DaoResult};

/// Timestamp for the next write of a row whose current `updated_at` is
/// `previous`. The result is always strictly later than `previous`, even when
/// the wall clock has not advanced (or went backwards) since that write.
pub fn next_updated_at(previous: Option<DateTimeWithTimeZone>) -> DateTimeWithTimeZone {
    let now = Utc::now();
    let next = match previous {
        Some(previous) => {
            let floor = previous.with_timezone(&Utc) + TimeDelta::microseconds(1);
            now.max(floor)
        }
        None => now,
    };
    next.fixed_offset()
}

pub(crate) fn stamp_created<A: TimestampedActiveModel>(active: &mut A) {
    let now = Utc::now().fixed_offset();
    active.set_created_at(now);
    active.set_updated_at(now);
}

#[async_trait::async_trait]
pub trait DaoBase: Clone + Send + Sync + Sized
where
    <Self::Entity as EntityTrait>::Model:
        FromQueryResult + IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send + Sync,
    <Self::Entity as EntityTrait>::ActiveModel: ActiveModelTrait<Entity = Self::Entity>
        + ActiveModelBehavior
        + TimestampedActiveModel
        + Send,
    <<Self::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType:
        From<i32> + Send + Sync,
{
    type Entity: EntityTrait + Send + Sync;
    const MAX_PAGE_SIZE: u64 = 100;

    fn from_db(db: DatabaseConnection) -> Self;

    fn new(db: &DatabaseConnection) -> Self {
        Self::from_db(db.clone())
    }

    fn db(&self) -> &DatabaseConnection;

    async fn create(
        &self,
        data: impl IntoActiveModel<<Self::Entity as EntityTrait>::ActiveModel> + Send,
    ) -> DaoResult<<Self::Entity as EntityTrait>::Model> {
        let mut active = data.into_active_model();
        stamp_created(&mut active);
        Ok(active.insert(self.db()).await?)
    }

    async fn find_by_id(&self, id: i32) -> DaoResult<<Self::Entity as EntityTrait>::Model> {
        Self::Entity::find_by_id(id)
            .one(self.db())
            .await?
            .ok_or_else(|| DaoLayerError::not_found::<Self::Entity>(id))
    }

    /// Offset/limit window over the entity, ordered by `order`.
    async fn find(
        &self,
        offset: u64,
        limit: u64,
        order: (<Self::Entity as EntityTrait>::Column, Order),
        apply: impl FnOnce(Select<Self::Entity>) -> Select<Self::Entity> + Send,
    ) -> DaoResult<Vec<<Self::Entity as EntityTrait>::Model>> {
        if limit == 0 || limit > Self::MAX_PAGE_SIZE {
            return Err(DaoLayerError::InvalidPagination { offset, limit });
        }

        let (column, order) = order;
        Ok(apply(Self::Entity::find())
            .order_by(column, order)
            .offset(offset)
            .limit(limit)
            .all(self.db())
            .await?)
    }

    async fn update<F>(&self, id: i32, apply: F) -> DaoResult<<Self::Entity as EntityTrait>::Model>
    where
        F: for<'a> FnOnce(&'a mut <Self::Entity as EntityTrait>::ActiveModel) + Send,
    {
        let model = Self::Entity::find_by_id(id)
            .one(self.db())
            .await?
            .ok_or_else(|| DaoLayerError::not_found::<Self::Entity>(id))?;

        let mut active = model.into_active_model();
        let previous = active.updated_at();
        apply(&mut active);
        active.set_updated_at(next_updated_at(previous));

        Ok(active.update(self.db()).await?)
    }
}

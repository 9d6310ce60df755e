use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use task_manager_api::{
    db::{
        entities::{prelude::TaskPriority, prelude::User, task_priority, user},
        seed,
    },
    test_helpers::{TEST_ADMIN_USERNAME, test_config, test_state},
};

#[tokio::test]
async fn seeding_twice_keeps_one_row_per_level_and_one_superuser() {
    let state = test_state().await.expect("test state");
    let cfg = test_config();

    seed::run(&state.db, &cfg.auth).await.expect("second seed");

    let levels = TaskPriority::find()
        .order_by_asc(task_priority::Column::Id)
        .all(&state.db)
        .await
        .expect("priorities");
    let labels: Vec<_> = levels.iter().map(|row| (row.id, row.desc.as_str())).collect();
    assert_eq!(labels, vec![(0, "Low"), (1, "Medium"), (2, "High")]);

    let admins = User::find()
        .filter(user::Column::Username.eq(TEST_ADMIN_USERNAME))
        .count(&state.db)
        .await
        .expect("count");
    assert_eq!(admins, 1);

    let admin = User::find()
        .filter(user::Column::Username.eq(TEST_ADMIN_USERNAME))
        .one(&state.db)
        .await
        .expect("query")
        .expect("superuser");
    assert!(admin.isadmin);
    assert!(admin.enabled);
}

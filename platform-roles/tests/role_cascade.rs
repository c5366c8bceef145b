//! End-to-end role update propagation through the event bus.

use platform_events::{
    BusDispatcher, DispatcherConfig, EventBus, MemoryEventBus, RoleUpdatedPayload,
    Subscription, ROLE_UPDATED_EVENT,
};
use platform_rbac::{PermissionSet, Role, RolePatch};
use platform_roles::{MemoryRoleStore, RoleService, RoleServiceConfig, RoleStore, Scheme};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    store: Arc<MemoryRoleStore>,
    dispatcher: Arc<BusDispatcher>,
    service: RoleService,
    subscription: Subscription,
}

fn perms(p: &[&str]) -> PermissionSet {
    PermissionSet::from_strings(p)
}

async fn harness() -> Harness {
    let store = Arc::new(MemoryRoleStore::new());
    let bus = Arc::new(MemoryEventBus::new());
    let subscription = bus.subscribe(ROLE_UPDATED_EVENT).await.unwrap();
    let dispatcher = Arc::new(BusDispatcher::new(bus, DispatcherConfig::default()));
    let service = RoleService::new(
        store.clone(),
        dispatcher.clone(),
        RoleServiceConfig::default(),
    );

    for slot_name in ["channel_guest", "channel_user", "channel_admin"] {
        store
            .save(
                Role::new(slot_name, perms(&["read_channel", "create_post"]))
                    .built_in()
                    .scheme_managed(),
            )
            .await
            .unwrap();
    }

    let schemes = [
        Scheme::team("engineering"),
        Scheme::channel("eng_general", Some("engineering".to_string())),
        Scheme::channel("eng_random", Some("engineering".to_string())),
        Scheme::team("sales"),
        Scheme::channel("sales_general", Some("sales".to_string())),
    ];
    for scheme in schemes {
        for name in scheme.role_names() {
            store
                .save(
                    Role::new(name, perms(&["read_channel", "create_post", "add_reaction"]))
                        .scheme_managed(),
                )
                .await
                .unwrap();
        }
        store.insert_scheme(scheme).await.unwrap();
    }

    Harness {
        store,
        dispatcher,
        service,
        subscription,
    }
}

async fn collect(subscription: &mut Subscription, count: usize) -> BTreeMap<String, Role> {
    let mut received = BTreeMap::new();
    for _ in 0..count {
        let event = tokio::time::timeout(Duration::from_secs(5), subscription.recv())
            .await
            .expect("timed out waiting for role.updated")
            .unwrap();
        assert_eq!(event.event_type, ROLE_UPDATED_EVENT);
        let payload: RoleUpdatedPayload = event.parse_payload().unwrap();
        received.insert(payload.role.name.clone(), payload.role);
    }
    received
}

#[tokio::test]
async fn team_scheme_update_notifies_its_channel_schemes() {
    let mut h = harness().await;

    let team_user = h
        .service
        .get_role_by_name("engineering_channel_user")
        .await
        .unwrap();
    let patch = RolePatch::permissions(perms(&["read_channel", "add_reaction"]));
    h.service.patch_role(team_user, &patch).await.unwrap();

    let received = collect(&mut h.subscription, 6).await;
    let names: Vec<&str> = received.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec![
            "eng_general_channel_admin",
            "eng_general_channel_guest",
            "eng_general_channel_user",
            "eng_random_channel_admin",
            "eng_random_channel_guest",
            "eng_random_channel_user",
        ]
    );

    // Posting is moderated and the team scheme switched it off for members
    let member = &received["eng_general_channel_user"];
    assert!(!member.permissions.has("create_post"));
    assert!(member.permissions.has("add_reaction"));
    assert!(member.permissions.has("read_channel"));
    // Other slots inherit from their own team slot, which was untouched
    assert!(received["eng_general_channel_admin"].permissions.has("create_post"));

    // Stored child roles are not rewritten by the cascade
    let stored = h.store.get_by_name("eng_general_channel_user").await.unwrap();
    assert!(stored.permissions.has("create_post"));

    tokio::time::sleep(Duration::from_millis(50)).await;
    let stats = h.dispatcher.stats();
    assert_eq!(stats.submitted, 6);
    assert_eq!(stats.delivered, 6);
}

#[tokio::test]
async fn built_in_channel_role_update_notifies_every_channel_scheme() {
    let mut h = harness().await;

    let mut built_in = h.service.get_role_by_name("channel_guest").await.unwrap();
    built_in.permissions = perms(&["read_channel"]);
    h.service.update_role(built_in).await.unwrap();

    let received = collect(&mut h.subscription, 9).await;
    assert!(received.contains_key("sales_general_channel_guest"));
    assert!(received.contains_key("eng_random_channel_admin"));
    assert!(received.keys().all(|name| !name.starts_with("engineering_")));
}

#[tokio::test]
async fn team_admin_update_notifies_nobody() {
    let mut h = harness().await;
    h.store
        .save(Role::new("team_admin", perms(&["manage_team"])).built_in().scheme_managed())
        .await
        .unwrap();

    let mut role = h.service.get_role_by_name("team_admin").await.unwrap();
    role.permissions = perms(&["manage_team", "add_team_members"]);
    h.service.update_role(role).await.unwrap();

    let waited = tokio::time::timeout(Duration::from_millis(100), h.subscription.recv()).await;
    assert!(waited.is_err());
    assert_eq!(h.dispatcher.stats().submitted, 0);
}

#[tokio::test]
async fn reads_merge_against_the_parent_scheme() {
    let h = harness().await;

    let mut team_guest = h.store.get_by_name("sales_channel_guest").await.unwrap();
    team_guest.permissions = perms(&["read_channel"]);
    h.store.save(team_guest).await.unwrap();

    let roles = h
        .service
        .get_roles_by_names(&[
            "sales_general_channel_guest".to_string(),
            "eng_general_channel_guest".to_string(),
            "no_such_role".to_string(),
        ])
        .await
        .unwrap();

    assert_eq!(roles.len(), 2);
    assert_eq!(roles[0].permissions, perms(&["read_channel"]));
    assert_eq!(
        roles[1].permissions,
        perms(&["read_channel", "create_post", "add_reaction"])
    );

    let err = h
        .service
        .check_roles_exist(&["channel_user".to_string(), "no_such_role".to_string()])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Role not found: no_such_role");
}

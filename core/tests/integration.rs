//! Sync controller driven end-to-end against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then runs user commands through
//! `SyncController` over real HTTP using the reqwest transport. Validates
//! that request building, response parsing, and the controller's refresh and
//! delete policies hold against the actual server.

use pretty_assertions::assert_eq;
use todo_sync::{
    ApiError, ClientConfig, FormBuffer, FormField, HttpGateway, Mode, ModeKind, RemoteGateway,
    ReqwestTransport, SyncController, SyncError, TodoId,
};
use tokio::net::TcpListener;

async fn spawn_server(router: axum::Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener, router));
    format!("http://{addr}")
}

fn gateway(config: &ClientConfig) -> HttpGateway<ReqwestTransport> {
    HttpGateway::from_config(config).unwrap()
}

#[tokio::test]
async fn sync_lifecycle() {
    let endpoint = spawn_server(mock_server::app()).await;
    let config = ClientConfig::new(&endpoint);
    let gw = gateway(&config);
    gw.health_check().await.unwrap();

    // Step 1: mount. Empty list, idle, blank form.
    let controller = SyncController::mount(gw).await;
    let store = controller.snapshot().await;
    assert!(store.todos().is_empty());
    assert_eq!(store.mode(), &Mode::Idle);
    assert_eq!(store.form(), &FormBuffer::default());

    // Step 2: create through the form.
    controller.set_field(FormField::Name, "Buy milk").await;
    controller.set_field(FormField::Description, "2%").await;
    let created = controller.submit_create().await.unwrap();
    let store = controller.snapshot().await;
    assert_eq!(store.todos(), &[created.clone()]);
    assert_eq!(store.form(), &FormBuffer::new("", ""));

    // Step 3: a second todo keeps server order.
    controller
        .create(FormBuffer::new("Walk dog", ""))
        .await
        .unwrap();
    let names: Vec<String> = controller
        .snapshot()
        .await
        .todos()
        .iter()
        .map(|t| t.name.clone())
        .collect();
    assert_eq!(names, vec!["Buy milk", "Walk dog"]);

    // Step 4: edit the first and save.
    controller.select_for_edit(&created).await;
    assert_eq!(
        controller.set_field(FormField::Name, "Buy oat milk").await,
        ModeKind::Edit
    );
    let updated = controller.submit_update().await.unwrap();
    assert_eq!(updated.id, created.id);
    let store = controller.snapshot().await;
    assert_eq!(store.mode(), &Mode::Idle);
    assert_eq!(store.todos()[0].name, "Buy oat milk");
    assert_eq!(store.todos()[0].description, "2%");

    // Step 5: delete the first.
    controller.delete(&created.id).await.unwrap();
    let remaining = controller.gateway().list().await.unwrap();
    assert_eq!(controller.snapshot().await.todos(), remaining.as_slice());
    assert_eq!(remaining.len(), 1);

    // Step 6: deleting again fails remotely but stays removed locally.
    let err = controller.delete(&created.id).await.unwrap_err();
    assert!(matches!(err, SyncError::Remote(ApiError::NotFound)));
    assert_eq!(controller.snapshot().await.todos().len(), 1);
}

#[tokio::test]
async fn update_of_vanished_todo_keeps_edit_mode() {
    let endpoint = spawn_server(mock_server::app()).await;
    let controller = SyncController::mount(gateway(&ClientConfig::new(&endpoint))).await;

    let created = controller
        .create(FormBuffer::new("Call mom", "Sunday"))
        .await
        .unwrap();
    controller.select_for_edit(&created).await;
    controller.set_field(FormField::Description, "Saturday").await;

    // Someone else deletes it behind our back.
    controller.gateway().delete(created.id.clone()).await.unwrap();

    let err = controller.submit_update().await.unwrap_err();
    assert!(matches!(err, SyncError::Remote(ApiError::NotFound)));
    let store = controller.snapshot().await;
    let target = store.edit_target().unwrap();
    assert_eq!(target.id(), &created.id);
    assert_eq!(target.form.description, "Saturday");
}

#[tokio::test]
async fn api_key_from_config_is_sent() {
    let endpoint = spawn_server(mock_server::app_with_api_key("da2-secret")).await;

    let anonymous = gateway(&ClientConfig::new(&endpoint));
    let err = anonymous.list().await.unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 401, .. }));

    let config = ClientConfig::from_toml(&format!(
        "endpoint = \"{endpoint}/\"\napi_key = \"da2-secret\"\n"
    ))
    .unwrap();
    let controller = SyncController::mount(gateway(&config)).await;
    controller
        .create(FormBuffer::new("Authorized", ""))
        .await
        .unwrap();
    assert_eq!(controller.snapshot().await.todos().len(), 1);
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let controller =
        SyncController::mount(gateway(&ClientConfig::new(&format!("http://{addr}")))).await;
    controller.set_field(FormField::Name, "Lost").await;

    let err = controller.submit_create().await.unwrap_err();
    assert!(matches!(err, SyncError::Remote(ApiError::TransportError(_))));
    assert_eq!(controller.snapshot().await.form().name, "Lost");
    assert!(controller.delete(&TodoId::from("1")).await.is_err());
}

#[tokio::test]
async fn https_endpoint_attempts_a_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gw = gateway(&ClientConfig::new(&format!("https://{addr}")));
    let err = gw.list().await.unwrap_err();
    let message = match err {
        ApiError::TransportError(message) => message,
        other => panic!("expected a transport error, got {other:?}"),
    };
    // The request got as far as connecting; the scheme itself was accepted.
    assert!(!message.contains("scheme is not http"), "{message}");
    assert!(!message.contains("builder error"), "{message}");
}

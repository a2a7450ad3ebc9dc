use std::{net::SocketAddr, sync::Arc, time::Duration};

use parley_client::{
    api::{self, ThreadId},
    Error, HttpSync, ThreadConfig, ThreadStore,
};
use parley_mock_server::{router, MockServer, SharedServer};
use tokio::sync::Mutex;

async fn spawn_server() -> (String, SharedServer) {
    let server = Arc::new(Mutex::new(MockServer::new()));
    let app = router(server.clone());
    let srv = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
        .serve(app.into_make_service());
    let addr = srv.local_addr();
    tokio::spawn(srv);
    (format!("http://{addr}"), server)
}

#[tokio::test]
async fn remote_backed_thread() {
    let (host, server) = spawn_server().await;
    let t = ThreadId::new("q1");
    let sync = HttpSync::new(&host).unwrap();
    let mut store = ThreadStore::new(t.clone(), sync, ThreadConfig::remote());
    store.load(t.clone()).await.unwrap();
    assert!(store.is_empty());

    let r = store.post_root("a", "Ana").await.unwrap();
    store.post_root("b", "Ana").await.unwrap();
    store.post_root("c", "Ana").await.unwrap();
    assert!(matches!(
        store.post_root("d", "Ana").await,
        Err(Error::QuotaExceeded { max: 3 })
    ));
    assert_eq!(server.lock().await.test_num_comments(&t), 3);

    let a = store.post_reply(&r.id, "A", "Bo").await.unwrap();
    let b = store.post_reply(&a.id, "B", "Cy").await.unwrap();
    assert!(matches!(
        store.post_reply(&b.id, "C", "Di").await,
        Err(Error::DepthExceeded { .. })
    ));
    assert_eq!(server.lock().await.test_num_comments(&t), 5);

    // a fresh session rebuilds the same tree from the flat listing
    let sync = HttpSync::new(&host).unwrap();
    let mut other = ThreadStore::new(t.clone(), sync, ThreadConfig::remote());
    other.load(t).await.unwrap();
    assert_eq!(other.snapshot(), store.snapshot());
    assert_eq!(other.remaining_quota(), 3);
    assert_eq!(other.get(&b.id).unwrap().depth, 2);
}

#[tokio::test]
async fn service_errors_are_sync_errors() {
    let (host, server) = spawn_server().await;
    let t = ThreadId::new("q1");
    let sync = HttpSync::new(&host).unwrap();
    let mut store = ThreadStore::new(t.clone(), sync, ThreadConfig::remote());
    store.post_root("kept", "Ana").await.unwrap();
    let before = store.snapshot();

    server.lock().await.set_offline(true);
    let err = store.load(t.clone()).await.unwrap_err();
    match err {
        Error::Sync(err) => assert!(matches!(
            err.downcast_ref::<api::Error>(),
            Some(api::Error::Unknown(_))
        )),
        err => panic!("unexpected error {err:?}"),
    }
    assert!(matches!(
        store.post_root("lost", "Ana").await,
        Err(Error::Sync(_))
    ));
    assert_eq!(store.snapshot(), before);
    assert_eq!(store.remaining_quota(), 2);
}

#[tokio::test]
async fn unreachable_service() {
    let t = ThreadId::new("q1");
    let sync = HttpSync::with_timeout("http://127.0.0.1:1", Duration::from_secs(5)).unwrap();
    let mut store = ThreadStore::new(t.clone(), sync, ThreadConfig::remote());
    assert!(matches!(store.load(t).await, Err(Error::Sync(_))));
    assert!(store.is_empty());
}

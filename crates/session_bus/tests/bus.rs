use session_bus::{BusClient, BusHandle, BusMessage, BusServer, HandlerRegistry, SessionId};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

async fn wait_attached(handle: &BusHandle) {
    for _ in 0..100 {
        if handle.is_attached().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("bus peer never attached");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_messages_flow_both_ways() {
    let cancel = CancellationToken::new();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    // Portal side records what the game sends back.
    let (portal_tx, mut portal_rx) = mpsc::unbounded_channel();
    let mut portal_handlers = HandlerRegistry::new();
    portal_handlers.on_fn("write", move |message| {
        let portal_tx = portal_tx.clone();
        async move {
            let _ = portal_tx.send(message);
            Ok(())
        }
    });
    let portal = BusHandle::new();
    tokio::spawn(BusServer::new(portal.clone(), portal_handlers).serve(listener, cancel.clone()));

    // Game side echoes every input line as a write.
    let game = BusHandle::new();
    let mut game_handlers = HandlerRegistry::new();
    let echo = game.clone();
    game_handlers.on_fn("input", move |message| {
        let echo = echo.clone();
        async move {
            let session_id = message.session_id()?;
            let line = String::from_utf8_lossy(message.bytes("command")?).into_owned();
            echo.send(BusMessage::write(session_id, line)).await
        }
    });
    tokio::spawn(BusClient::new(game.clone(), game_handlers).run(address, cancel.clone()));

    wait_attached(&portal).await;
    wait_attached(&game).await;

    let session_id = SessionId::new();
    for line in ["north", "look", "say hi"] {
        portal
            .send(BusMessage::input(session_id, line.as_bytes().to_vec()))
            .await
            .unwrap();
    }

    for expected in ["north", "look", "say hi"] {
        let reply = timeout(Duration::from_secs(5), portal_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply.session_id().unwrap(), session_id);
        assert_eq!(reply.text("message").unwrap(), expected);
    }

    cancel.cancel();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_portal_detaches_when_game_leaves() {
    let cancel = CancellationToken::new();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    let portal = BusHandle::new();
    tokio::spawn(BusServer::new(portal.clone(), HandlerRegistry::new()).serve(listener, cancel.clone()));

    let game_cancel = CancellationToken::new();
    let game = BusHandle::new();
    let client = tokio::spawn(
        BusClient::new(game.clone(), HandlerRegistry::new()).run(address, game_cancel.clone()),
    );
    wait_attached(&portal).await;

    game_cancel.cancel();
    timeout(Duration::from_secs(5), client).await.unwrap().unwrap().unwrap();

    for _ in 0..100 {
        if !portal.is_attached().await {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(!portal.is_attached().await);

    // Transport-side notifications degrade to a no-op.
    portal.notify(BusMessage::disconnect_session(SessionId::new())).await;
    cancel.cancel();
}

//! End-to-end client tests against a local in-process WebSocket server.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Map, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

use armrpc_client::{ClientConfig, ClientError, RpcClient};

type ServerWs = WebSocketStream<TcpStream>;

async fn bind() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("local addr");
    (listener, addr)
}

fn client_for(addr: SocketAddr) -> RpcClient {
    RpcClient::new(ClientConfig::new(addr.ip().to_string(), addr.port()))
}

async fn accept(listener: &TcpListener) -> ServerWs {
    let (stream, _) = listener.accept().await.expect("accept should succeed");
    accept_async(stream).await.expect("ws handshake")
}

async fn read_request(ws: &mut ServerWs) -> Value {
    loop {
        let message = ws
            .next()
            .await
            .expect("connection should stay open")
            .expect("read should succeed");
        match message {
            Message::Text(text) => return serde_json::from_str(&text).expect("request json"),
            Message::Close(_) => panic!("unexpected close"),
            _ => {}
        }
    }
}

async fn send_json(ws: &mut ServerWs, value: Value) {
    ws.send(Message::Text(value.to_string()))
        .await
        .expect("send should succeed");
}

#[tokio::test]
async fn set_speed_happy_path() {
    let (listener, addr) = bind().await;
    let client = client_for(addr);

    let server = async {
        let mut ws = accept(&listener).await;
        let request = read_request(&mut ws).await;
        assert_eq!(
            request,
            json!({"jsonrpc": "2.0", "method": "set_speed", "params": {"percent": 50}, "id": 1})
        );
        send_json(&mut ws, json!({"id": 1, "result": null})).await;
        ws
    };

    let (result, _ws) = tokio::join!(client.set_speed(50), server);
    result.expect("set_speed should succeed");
    assert_eq!(client.pending_calls(), 0);
}

#[tokio::test]
async fn rpc_error_carries_code_message_and_method() {
    let (listener, addr) = bind().await;
    let client = client_for(addr);

    let server = async {
        let mut ws = accept(&listener).await;
        let request = read_request(&mut ws).await;
        assert_eq!(request["method"], "get_joint_angles");
        send_json(
            &mut ws,
            json!({"id": request["id"], "error": {"code": -32000, "message": "arm not calibrated"}}),
        )
        .await;
        ws
    };

    let (result, _ws) = tokio::join!(client.get_joint_angles(), server);
    match result.expect_err("call should fail") {
        ClientError::Rpc {
            code,
            message,
            method,
            ..
        } => {
            assert_eq!(code, -32000);
            assert_eq!(message, "arm not calibrated");
            assert_eq!(method, "get_joint_angles");
        }
        other => panic!("expected Rpc error, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_calls_resolve_out_of_order() {
    let (listener, addr) = bind().await;
    let client = client_for(addr);
    client.connect().await.expect("connect should succeed");

    let server = async {
        let mut ws = accept(&listener).await;
        let mut requests = Vec::new();
        for _ in 0..3 {
            let request = read_request(&mut ws).await;
            requests.push(request);
        }
        // Answer in reverse arrival order; correlation is by id, not order.
        for request in requests.iter().rev() {
            send_json(
                &mut ws,
                json!({"id": request["id"], "result": request["method"]}),
            )
            .await;
        }
        ws
    };

    let (a, b, c, _ws) = tokio::join!(
        client.invoke("call_a", Map::new()),
        client.invoke("call_b", Map::new()),
        client.invoke("call_c", Map::new()),
        server,
    );
    assert_eq!(a.expect("call_a"), json!("call_a"));
    assert_eq!(b.expect("call_b"), json!("call_b"));
    assert_eq!(c.expect("call_c"), json!("call_c"));
    assert_eq!(client.pending_calls(), 0);
}

#[tokio::test]
async fn disconnect_mid_flight_fails_all_pending() {
    let (listener, addr) = bind().await;
    let client = client_for(addr);
    client.connect().await.expect("connect should succeed");

    let server = async {
        let mut ws = accept(&listener).await;
        for _ in 0..3 {
            read_request(&mut ws).await;
        }
        // Drop without answering anything.
        drop(ws);
    };

    let (a, b, c, ()) = tokio::join!(
        client.invoke("one", Map::new()),
        client.invoke("two", Map::new()),
        client.invoke("three", Map::new()),
        server,
    );
    for result in [a, b, c] {
        assert!(matches!(
            result.expect_err("pending call should fail"),
            ClientError::Disconnected
        ));
    }
    assert_eq!(client.pending_calls(), 0);
    assert!(!client.is_connected().await);
}

#[tokio::test]
async fn stray_and_malformed_frames_do_not_disturb_pending_calls() {
    let (listener, addr) = bind().await;
    let client = client_for(addr);
    client.connect().await.expect("connect should succeed");

    let server = async {
        let mut ws = accept(&listener).await;
        let request = read_request(&mut ws).await;
        // Unknown id, undecodable frame, then a duplicate of the unknown id.
        send_json(&mut ws, json!({"id": 999, "result": "stray"})).await;
        ws.send(Message::Text("{not json".into()))
            .await
            .expect("send should succeed");
        send_json(&mut ws, json!({"id": 999, "result": "stray again"})).await;
        send_json(&mut ws, json!({"id": request["id"], "result": "mine"})).await;
        ws
    };

    let (result, _ws) = tokio::join!(client.invoke("probe", Map::new()), server);
    assert_eq!(result.expect("probe should succeed"), json!("mine"));
    assert_eq!(client.pending_calls(), 0);
}

#[tokio::test]
async fn reconnects_once_after_connection_drop() {
    let (listener, addr) = bind().await;
    let client = client_for(addr);

    let server = async {
        // First connection: swallow the request and drop mid-flight.
        let mut ws = accept(&listener).await;
        read_request(&mut ws).await;
        drop(ws);
        // Second connection: behave.
        let mut ws = accept(&listener).await;
        let request = read_request(&mut ws).await;
        send_json(&mut ws, json!({"id": request["id"], "result": "recovered"})).await;
        ws
    };

    let calls = async {
        let first = client.invoke("doomed", Map::new()).await;
        assert!(matches!(
            first.expect_err("first call should fail"),
            ClientError::Disconnected
        ));
        client.invoke("retry", Map::new()).await
    };

    let (second, _ws) = tokio::join!(calls, server);
    assert_eq!(second.expect("second call should succeed"), json!("recovered"));
    assert!(client.is_connected().await);
}

#[tokio::test]
async fn timeout_abandons_call_and_discards_late_response() {
    let (listener, addr) = bind().await;
    let config = ClientConfig::new(addr.ip().to_string(), addr.port())
        .with_call_timeout(Duration::from_millis(150));
    let client = RpcClient::new(config);

    let server = async {
        let mut ws = accept(&listener).await;
        let first = read_request(&mut ws).await;
        tokio::time::sleep(Duration::from_millis(250)).await;
        // Too late: the slot is gone by now.
        send_json(&mut ws, json!({"id": first["id"], "result": "late"})).await;
        let second = read_request(&mut ws).await;
        send_json(&mut ws, json!({"id": second["id"], "result": "fresh"})).await;
        ws
    };

    let calls = async {
        let overdue = client.invoke("slow", Map::new()).await;
        assert!(matches!(
            overdue.expect_err("overdue call should fail"),
            ClientError::Timeout(_)
        ));
        assert_eq!(client.pending_calls(), 0);
        client.invoke("follow_up", Map::new()).await
    };

    let (second, _ws) = tokio::join!(calls, server);
    assert_eq!(second.expect("follow-up should succeed"), json!("fresh"));
    assert_eq!(client.pending_calls(), 0);
}

#[tokio::test]
async fn connect_is_idempotent_and_disconnect_when_closed_is_noop() {
    let (listener, addr) = bind().await;
    let client = client_for(addr);

    // Disconnect before any connection exists: no-op.
    client.disconnect().await;
    assert!(!client.is_connected().await);

    let server = async {
        accept(&listener).await
    };
    let calls = async {
        client.connect().await.expect("first connect");
        client.connect().await.expect("second connect is a no-op");
        assert!(client.is_connected().await);
    };
    let (_ws, ()) = tokio::join!(server, calls);

    client.disconnect().await;
    assert!(!client.is_connected().await);
    client.disconnect().await;
}

#[tokio::test]
async fn unreachable_endpoint_is_connection_error() {
    // Bind then drop to obtain a port nobody listens on.
    let (listener, addr) = bind().await;
    drop(listener);

    let client = client_for(addr);
    let err = client
        .invoke("anything", Map::new())
        .await
        .expect_err("call should fail");
    assert!(matches!(err, ClientError::Connection(_)));
    assert_eq!(client.pending_calls(), 0);
}

#[tokio::test]
async fn typed_catalogue_marshals_params_and_results() {
    use armrpc_client::{AiModel, Joints, Mode, Pose};

    let (listener, addr) = bind().await;
    let client = client_for(addr);

    let server = async {
        let mut ws = accept(&listener).await;

        let request = read_request(&mut ws).await;
        assert_eq!(request["method"], "set_mode");
        assert_eq!(request["params"], json!({"mode": "teleoperation"}));
        send_json(&mut ws, json!({"id": request["id"], "result": null})).await;

        let request = read_request(&mut ws).await;
        assert_eq!(request["method"], "set_tool_pose");
        assert_eq!(
            request["params"],
            json!({"pose": [10.0, 20.0, 30.0, 0.0, 0.0, 90.0], "is_offset": true})
        );
        send_json(&mut ws, json!({"id": request["id"], "result": null})).await;

        let request = read_request(&mut ws).await;
        assert_eq!(request["method"], "align_with_apriltag");
        assert_eq!(request["params"], json!({"id": 7, "pose_offset": null}));
        send_json(&mut ws, json!({"id": request["id"], "result": null})).await;

        let request = read_request(&mut ws).await;
        assert_eq!(request["method"], "train");
        assert_eq!(
            request["params"],
            json!({"task_name": "stack", "training_name": "run-a", "model": "PI0_FAST"})
        );
        send_json(&mut ws, json!({"id": request["id"], "result": null})).await;

        let request = read_request(&mut ws).await;
        assert_eq!(request["method"], "get_joint_angles");
        send_json(
            &mut ws,
            json!({"id": request["id"], "result": {
                "j1": 0.0, "j2": -45.0, "j3": 90.0, "j4": 0.0, "j5": 45.0, "j6": 0.0
            }}),
        )
        .await;

        ws
    };

    let calls = async {
        client.set_mode(Mode::Teleoperation).await?;
        client
            .set_tool_pose(&Pose::new(10.0, 20.0, 30.0, 0.0, 0.0, 90.0), true)
            .await?;
        client.align_with_apriltag(7, None).await?;
        client.train_task("stack", "run-a", AiModel::Pi0Fast).await?;
        client.get_joint_angles().await
    };

    let (joints, _ws) = tokio::join!(calls, server);
    let joints: Joints = joints.expect("catalogue calls should succeed");
    assert_eq!(joints.j3, 90.0);
}

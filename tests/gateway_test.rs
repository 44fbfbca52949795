use axum::{Json, Router, http::StatusCode, routing::get};
use open_classrooms::config::AppConfig;
use open_classrooms::error::GatewayError;
use open_classrooms::gateway::{AvailabilityGateway, HttpGateway};
use open_classrooms::models::{Position, Status};
use serde_json::{Value, json};

async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind upstream");
    let addr = listener.local_addr().expect("No local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}", addr)
}

fn sample_building(distance: f64) -> Value {
    json!({
        "building": "Valders Hall of Science",
        "building_code": "VAL",
        "building_status": "available",
        "rooms": {
            "206": {
                "slots": [{"StartTime": "09:00:00", "EndTime": "10:00:00", "Status": "available"}],
                "room_status": "available"
            }
        },
        "coords": [43.3125, -91.803],
        "distance": distance
    })
}

fn availability_upstream() -> Router {
    Router::new().route(
        "/api/open-classrooms",
        get(|| async { Json(json!([sample_building(0.0)])) }).post(|Json(body): Json<Value>| async move {
            let lat = body["lat"].as_f64().unwrap_or_default();
            Json(json!([sample_building(lat)]))
        }),
    )
}

#[tokio::test]
async fn get_returns_buildings() {
    let base = spawn_upstream(availability_upstream()).await;
    let gateway = HttpGateway::new(&AppConfig::new(&format!("{}/", base))).expect("client");

    let buildings = gateway.fetch_availability(None).await.expect("fetch");
    assert_eq!(buildings.len(), 1);
    assert_eq!(buildings[0].code, "VAL");
    assert_eq!(buildings[0].status, Status::Available);
    assert_eq!(buildings[0].rooms["206"].slots.len(), 1);
}

#[tokio::test]
async fn post_forwards_position() {
    let base = spawn_upstream(availability_upstream()).await;
    let gateway = HttpGateway::new(&AppConfig::new(&base)).expect("client");

    let buildings = gateway
        .fetch_availability(Some(Position { lat: 43.5, lng: -91.8 }))
        .await
        .expect("fetch");
    assert_eq!(buildings[0].distance, Some(43.5));
}

#[tokio::test]
async fn upstream_503_is_mirrored() {
    let upstream = Router::new().route(
        "/api/open-classrooms",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "sleeping") }),
    );
    let base = spawn_upstream(upstream).await;

    let gateway = HttpGateway::new(&AppConfig::new(&base)).expect("client");
    let err = gateway.fetch_availability(None).await.unwrap_err();
    assert_eq!(
        err,
        GatewayError::Upstream {
            status: 503,
            message: "Failed to fetch data: Service Unavailable".to_string(),
        }
    );

    let mut terse = AppConfig::new(&base);
    terse.verbose_upstream_errors = false;
    let gateway = HttpGateway::new(&terse).expect("client");
    let err = gateway.fetch_availability(None).await.unwrap_err();
    assert_eq!(err.message(), "Failed to fetch data");
    assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn malformed_json_is_a_transport_failure() {
    let upstream = Router::new().route("/api/open-classrooms", get(|| async { "<html>oops</html>" }));
    let base = spawn_upstream(upstream).await;

    let gateway = HttpGateway::new(&AppConfig::new(&base)).expect("client");
    let err = gateway.fetch_availability(None).await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let gateway = HttpGateway::new(&AppConfig::new(&format!("http://{}", addr))).expect("client");
    let err = gateway.fetch_availability(None).await.unwrap_err();
    assert_eq!(err, GatewayError::Transport("Failed to process request".to_string()));
}

#[tokio::test]
async fn malformed_entries_do_not_lose_valid_buildings() {
    let upstream = Router::new().route(
        "/api/open-classrooms",
        get(|| async {
            Json(json!([
                sample_building(0.0),
                {
                    "building": "Olin Hall",
                    "building_code": "OLIN",
                    "rooms": {
                        "102": {
                            "slots": [{"StartTime": null, "EndTime": "10:00:00", "Status": "available"}],
                            "room_status": "available"
                        },
                        "103": {"slots": null}
                    }
                },
                "garbage"
            ]))
        }),
    );
    let base = spawn_upstream(upstream).await;

    let gateway = HttpGateway::new(&AppConfig::new(&base)).expect("client");
    let buildings = gateway.fetch_availability(None).await.expect("fetch");
    assert_eq!(buildings.len(), 2);
    assert_eq!(buildings[0].code, "VAL");
    assert_eq!(buildings[1].code, "OLIN");
    assert!(buildings[1].rooms["102"].slots[0].start().is_none());
    assert!(buildings[1].rooms["103"].slots.is_empty());
}

use crate::gui_bridge::model::{CountryRequest, HealthPayload, MapPayload, PinPayload, TreePayload};
use crate::workflow::runner::Runner;
use covidcore::map::{MapEvent, INITIAL_VIEW};
use covidcore::view::RefreshOutcome;
use covidcore::{Scope, StatsError, StatsResult};
use log::{info, warn};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection, Reply};

type BridgeReply = Result<WithStatus<Json>, Infallible>;

/// HTTP surface the tree and map views talk to.
pub fn routes(
    runner: Arc<Runner>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let runner_filter = warp::any().map(move || runner.clone());

    let tree = warp::path!("tree" / String)
        .and(warp::get())
        .and(runner_filter.clone())
        .and_then(get_tree);
    let refresh = warp::path!("refresh" / String)
        .and(warp::post())
        .and(runner_filter.clone())
        .and_then(post_refresh);
    let pin = warp::path!("pins")
        .and(warp::post())
        .and(warp::body::json())
        .and(runner_filter.clone())
        .and_then(post_pin);
    let unpin = warp::path!("pins" / String)
        .and(warp::delete())
        .and(runner_filter.clone())
        .and_then(delete_pin);
    let config_changed = warp::path!("config-changed")
        .and(warp::post())
        .and(runner_filter.clone())
        .and_then(post_config_changed);
    let map = warp::path!("map")
        .and(warp::get())
        .and(runner_filter.clone())
        .and_then(get_map);
    let map_events = warp::path!("map" / "events")
        .and(warp::post())
        .and(warp::body::json())
        .and(runner_filter.clone())
        .and_then(post_map_event);
    let health = warp::path!("health")
        .and(warp::get())
        .and(runner_filter)
        .and_then(get_health);

    tree.or(refresh)
        .or(pin)
        .or(unpin)
        .or(config_changed)
        .or(map)
        .or(map_events)
        .or(health)
}

async fn get_tree(scope: String, runner: Arc<Runner>) -> BridgeReply {
    Ok(respond(
        scope.parse::<Scope>().map(|scope| tree_payload(&runner, scope, None)),
    ))
}

async fn post_refresh(scope: String, runner: Arc<Runner>) -> BridgeReply {
    let scope = match scope.parse::<Scope>() {
        Ok(scope) => scope,
        Err(err) => return Ok(error_reply(&err)),
    };
    let result = runner
        .refresh(scope)
        .await
        .map(|outcome| tree_payload(&runner, scope, Some(outcome)));
    Ok(respond(result))
}

async fn post_pin(request: CountryRequest, runner: Arc<Runner>) -> BridgeReply {
    let result = runner
        .pin(&request.country)
        .await
        .map(|changed| pin_payload(&runner, request.country, changed));
    Ok(respond(result))
}

async fn delete_pin(country: String, runner: Arc<Runner>) -> BridgeReply {
    let country = match urlencoding::decode(&country) {
        Ok(decoded) => decoded.into_owned(),
        Err(err) => return Ok(error_reply(&StatsError::NotFound(err.to_string()))),
    };
    let result = runner
        .unpin(&country)
        .await
        .map(|changed| pin_payload(&runner, country, changed));
    Ok(respond(result))
}

async fn post_config_changed(runner: Arc<Runner>) -> BridgeReply {
    let result = runner
        .configuration_changed()
        .await
        .map(|outcome| tree_payload(&runner, Scope::Pinned, Some(outcome)));
    Ok(respond(result))
}

async fn get_map(runner: Arc<Runner>) -> BridgeReply {
    Ok(respond(runner.markers().map(|markers| MapPayload {
        view: INITIAL_VIEW,
        markers,
    })))
}

async fn post_map_event(event: MapEvent, runner: Arc<Runner>) -> BridgeReply {
    match event {
        MapEvent::ShowOnMap { label } => {
            info!("[bridge] show {label} on map");
            Ok(respond(runner.locate(&label)))
        }
        MapEvent::Alert { text } => {
            warn!("[bridge] map alert: {text}");
            Ok(warp::reply::with_status(
                warp::reply::json(&MapEvent::Alert { text }),
                StatusCode::OK,
            ))
        }
    }
}

async fn get_health(runner: Arc<Runner>) -> BridgeReply {
    let scopes = runner
        .metrics()
        .into_iter()
        .map(|(scope, metrics)| (scope.to_string(), metrics))
        .collect();
    Ok(respond(Ok::<_, StatsError>(HealthPayload { scopes })))
}

fn tree_payload(runner: &Runner, scope: Scope, outcome: Option<RefreshOutcome>) -> TreePayload {
    let provider = runner.provider(scope);
    TreePayload {
        scope,
        revision: provider.revision(),
        nodes: provider.root_nodes(),
        outcome,
    }
}

fn pin_payload(runner: &Runner, country: String, changed: bool) -> PinPayload {
    PinPayload {
        country,
        changed,
        pins: runner.pins().as_slice().to_vec(),
    }
}

fn respond<T: Serialize>(result: StatsResult<T>) -> WithStatus<Json> {
    match result {
        Ok(body) => warp::reply::with_status(warp::reply::json(&body), StatusCode::OK),
        Err(err) => error_reply(&err),
    }
}

/// Errors reach the user as an alert, the same shape the map surface sends.
fn error_reply(err: &StatsError) -> WithStatus<Json> {
    let status = match err {
        StatsError::NotFound(_) => StatusCode::NOT_FOUND,
        StatsError::Network(_) | StatsError::Decode(_) => StatusCode::BAD_GATEWAY,
        StatsError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!("[bridge] {err}");
    warp::reply::with_status(
        warp::reply::json(&MapEvent::Alert {
            text: err.to_string(),
        }),
        status,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::runner::tests::snapshot_runner;
    use covidcore::pins::MemoryStore;
    use serde_json::Value;

    fn body<B: AsRef<[u8]>>(response: &warp::http::Response<B>) -> Value {
        serde_json::from_slice(response.body().as_ref()).unwrap()
    }

    #[tokio::test]
    async fn refresh_then_read_tree() {
        let (runner, _snapshot) = snapshot_runner(Box::new(MemoryStore::with_defaults()));
        let api = routes(Arc::new(runner));

        let empty = warp::test::request()
            .method("GET")
            .path("/tree/countries")
            .reply(&api)
            .await;
        assert_eq!(empty.status(), StatusCode::OK);
        assert_eq!(body(&empty)["nodes"], serde_json::json!([]));

        let refreshed = warp::test::request()
            .method("POST")
            .path("/refresh/countries")
            .reply(&api)
            .await;
        assert_eq!(refreshed.status(), StatusCode::OK);
        let json = body(&refreshed);
        assert_eq!(json["outcome"]["status"], "published");
        assert_eq!(json["nodes"][0]["label"], "Italy");
        assert_eq!(json["nodes"][0]["action"], "pin");
        assert_eq!(json["nodes"][0]["children"][0]["label"], "A");
        assert_eq!(json["nodes"][1]["label"], "Spain");
    }

    #[tokio::test]
    async fn unknown_scope_is_not_found() {
        let (runner, _snapshot) = snapshot_runner(Box::new(MemoryStore::with_defaults()));
        let api = routes(Arc::new(runner));
        let response = warp::test::request()
            .method("GET")
            .path("/tree/provinces")
            .reply(&api)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body(&response)["command"], "alert");
    }

    #[tokio::test]
    async fn missing_snapshot_is_bad_gateway() {
        use crate::workflow::runner::Source;
        use covidcore::api::FileSource;

        let dir = tempfile::tempdir().unwrap();
        let source = Source::File(FileSource::new(dir.path().join("absent.json")));
        let runner = Runner::new(source, Box::new(MemoryStore::with_defaults()));
        let api = routes(Arc::new(runner));

        let response = warp::test::request()
            .method("POST")
            .path("/refresh/countries")
            .reply(&api)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body(&response)["command"], "alert");
    }

    #[tokio::test]
    async fn pin_round_trip_updates_pinned_tree() {
        let (runner, _snapshot) = snapshot_runner(Box::new(MemoryStore::with_defaults()));
        let api = routes(Arc::new(runner));

        let pinned = warp::test::request()
            .method("POST")
            .path("/pins")
            .json(&serde_json::json!({"country": "Spain"}))
            .reply(&api)
            .await;
        assert_eq!(pinned.status(), StatusCode::OK);
        assert_eq!(body(&pinned)["pins"], serde_json::json!(["spain"]));

        let tree = warp::test::request()
            .method("GET")
            .path("/tree/pinned")
            .reply(&api)
            .await;
        assert_eq!(body(&tree)["nodes"][0]["label"], "Spain");
        assert_eq!(body(&tree)["nodes"][0]["action"], "unpin");

        let unpinned = warp::test::request()
            .method("DELETE")
            .path("/pins/Spain")
            .reply(&api)
            .await;
        assert_eq!(body(&unpinned)["changed"], true);
        assert_eq!(body(&unpinned)["pins"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn show_on_map_round_trip() {
        let (runner, _snapshot) = snapshot_runner(Box::new(MemoryStore::with_defaults()));
        let runner = Arc::new(runner);
        runner.refresh(Scope::Countries).await.unwrap();
        let api = routes(runner);

        let map = warp::test::request()
            .method("GET")
            .path("/map")
            .reply(&api)
            .await;
        let json = body(&map);
        assert_eq!(json["view"]["zoom"], 3);
        assert_eq!(json["markers"].as_array().unwrap().len(), 3);
        assert_eq!(json["markers"][0]["radius"], 30000);

        let shown = warp::test::request()
            .method("POST")
            .path("/map/events")
            .json(&serde_json::json!({"command": "show-on-map", "label": "Italy"}))
            .reply(&api)
            .await;
        assert_eq!(shown.status(), StatusCode::OK);
        let json = body(&shown);
        assert_eq!(json["command"], "COUNTRY_MAP");
        assert_eq!(json["payload"]["province"], "B");

        let missing = warp::test::request()
            .method("POST")
            .path("/map/events")
            .json(&serde_json::json!({"command": "show-on-map", "label": "Atlantis"}))
            .reply(&api)
            .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn health_reports_each_scope() {
        let (runner, _snapshot) = snapshot_runner(Box::new(MemoryStore::with_defaults()));
        let runner = Arc::new(runner);
        runner.refresh(Scope::World).await.unwrap();
        let api = routes(runner);
        let response = warp::test::request()
            .method("GET")
            .path("/health")
            .reply(&api)
            .await;
        let json = body(&response);
        assert_eq!(json["scopes"]["world"]["published"], 1);
        assert_eq!(json["scopes"]["pinned"]["published"], 0);
    }
}

//! Stand-in satellite-data service speaking the tracking client's HTTP contract.

pub mod catalog;
pub mod config;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use orbview_common::{NoradId, Registration, Visibility};
use serde_json::{json, Value};
use std::sync::Arc;

use catalog::Catalog;
use config::SatelliteFixture;

pub type SharedCatalog = Arc<Catalog>;

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn get_tle(State(catalog): State<SharedCatalog>, Path(id): Path<NoradId>) -> Response {
    tracing::debug!(norad_id = %id, "Fetching TLE");
    match catalog.registered(id).await {
        Some(fixture) => Json(json!({
            "tle": fixture.tle,
            "currentLLA": [fixture.position().to_triple()],
        }))
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Satellite not found!" })),
        )
            .into_response(),
    }
}

async fn fetch_and_save(State(catalog): State<SharedCatalog>, Path(id): Path<NoradId>) -> Response {
    match catalog.register(id).await {
        Some(fixture) => Json(Registration {
            satid: Some(fixture.norad_id),
            satname: Some(fixture.name.clone()),
            tle: Some(fixture.tle.clone()),
        })
        .into_response(),
        None => {
            tracing::warn!(norad_id = %id, "Upstream has no TLE");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch and save satellite",
            )
                .into_response()
        }
    }
}

async fn get_czml(State(catalog): State<SharedCatalog>, Path(id): Path<NoradId>) -> Response {
    match catalog.registered(id).await {
        Some(fixture) => Json(czml_document(fixture)).into_response(),
        None => (StatusCode::NOT_FOUND, format!("TLE not found for: {}", id)).into_response(),
    }
}

async fn visible_check(
    State(catalog): State<SharedCatalog>,
    Path((a, b)): Path<(NoradId, NoradId)>,
) -> Response {
    if catalog.registered(a).await.is_none() || catalog.registered(b).await.is_none() {
        return (StatusCode::NOT_FOUND, "Satellite not found!").into_response();
    }

    let visibility = if catalog.is_visible(a, b) {
        Visibility::Visible
    } else {
        Visibility::NotVisible
    };
    visibility.to_reply().into_response()
}

/// Single-sample CZML: document packet plus one satellite packet
pub fn czml_document(fixture: &SatelliteFixture) -> Value {
    let entity = format!("Satellite {}", fixture.norad_id);
    json!([
        { "id": "document", "name": entity, "version": "1.0" },
        {
            "id": entity,
            "description": format!("{} ({})", entity, fixture.name),
            "position": {
                "cartographicDegrees": [
                    fixture.longitude,
                    fixture.latitude,
                    fixture.altitude * 1000.0
                ]
            },
            "label": {
                "text": format!("Sat {}", fixture.norad_id),
                "font": "14px Helvetica",
                "fillColor": { "rgba": [255, 255, 0, 255] },
                "outlineColor": { "rgba": [0, 0, 0, 255] },
                "outlineWidth": 2,
                "style": "FILL",
                "horizontalOrigin": "LEFT",
                "verticalOrigin": "BOTTOM",
                "pixelOffset": { "cartesian2": [10, -10] }
            },
            "path": { "show": [{ "boolean": true }] },
            "point": { "pixelSize": 10, "color": { "rgba": [255, 255, 0, 255] } }
        }
    ])
}

pub fn router(catalog: SharedCatalog) -> Router {
    let satellite_routes = Router::new()
        .route("/fetch-and-save/{id}", get(fetch_and_save))
        .route("/{id}/tle", get(get_tle))
        .route("/{id}/czml", get(get_czml))
        .route("/{id}/{other}/visible-check", get(visible_check));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/satellite", satellite_routes)
        .with_state(catalog)
}

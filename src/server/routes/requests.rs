//! Batch and single sub-request endpoints
//!
//! `POST /makeRequests` fans a batch out; `POST /makeRequest` runs one
//! descriptor through the same pipeline as a batch of one.

use crate::core::dispatch::SubRequestDescriptor;
use crate::server::middleware::request_id;
use crate::server::routes::envelope::{BatchEnvelope, ResponseEnvelope, decode_envelope};
use crate::server::state::AppState;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::{info, warn};

/// Configure dispatch routes
///
/// Only POST is routed; any other method on these paths gets 405.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/makeRequests").route(web::post().to(make_requests)))
        .service(web::resource("/makeRequest").route(web::post().to(make_request)));
}

/// Execute a batch of sub-requests
pub async fn make_requests(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    let request_id = request_id(&req);
    let envelope: BatchEnvelope = match decode_envelope(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "Rejected batch envelope");
            return Ok(e.response_for_request(Some(request_id)));
        }
    };

    info!(
        request_id = %request_id,
        batch_size = envelope.requests.len(),
        "Batch received"
    );
    Ok(dispatch(&state, envelope.requests).await)
}

/// Execute one sub-request
pub async fn make_request(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    let request_id = request_id(&req);
    let descriptor: SubRequestDescriptor = match decode_envelope(&body) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "Rejected sub-request descriptor");
            return Ok(e.response_for_request(Some(request_id)));
        }
    };

    info!(request_id = %request_id, method = %descriptor.method, url = %descriptor.url, "Single request received");
    Ok(dispatch(&state, vec![descriptor]).await)
}

async fn dispatch(state: &AppState, descriptors: Vec<SubRequestDescriptor>) -> HttpResponse {
    let outcome = state.dispatcher.dispatch(descriptors).await;
    state.record_completed(&outcome);
    HttpResponse::Ok().json(ResponseEnvelope::from(&outcome))
}

//! HTTP server utility methods

use crate::server::server::HttpServer;
use crate::utils::error::GatewayError;
use std::io::ErrorKind;

impl HttpServer {
    /// Turn a bind failure into an actionable error message
    pub(crate) fn format_bind_error(
        error: std::io::Error,
        bind_addr: &str,
        port: u16,
    ) -> GatewayError {
        let text = error.to_string();
        let in_use = error.kind() == ErrorKind::AddrInUse
            || text.contains("os error 48")
            || text.contains("os error 98");
        let denied = error.kind() == ErrorKind::PermissionDenied || text.contains("os error 13");

        if in_use {
            GatewayError::server(format!(
                "Port {} is already in use on {}. Stop the other process (lsof -i:{}) \
                 or pick another port with --port {} or GATEWAY_PORT={}",
                port,
                bind_addr,
                port,
                port.saturating_add(1),
                port.saturating_add(1)
            ))
        } else if denied {
            GatewayError::server(format!(
                "Permission denied for port {}. Use a port >= 1024, e.g. --port 8000",
                port
            ))
        } else {
            GatewayError::server(format!("Failed to bind to {}: {}", bind_addr, error))
        }
    }
}

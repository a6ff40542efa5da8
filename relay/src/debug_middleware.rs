use actix_web::{
    body::MessageBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::LocalBoxFuture;
use gemini_client::API_KEY_HEADER;
use log::debug;
use std::future::{ready, Ready};
use std::time::Instant;

/// Headers whose values never reach the log
const REDACTED_HEADERS: [&str; 3] = ["authorization", "cookie", API_KEY_HEADER];

/// Middleware for logging incoming requests and how they were answered
pub struct RequestDebugger;

impl<S, B> Transform<S, ServiceRequest> for RequestDebugger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestDebuggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestDebuggerMiddleware { service }))
    }
}

pub struct RequestDebuggerMiddleware<S> {
    service: S,
}

fn is_redacted(name: &str) -> bool {
    REDACTED_HEADERS
        .iter()
        .any(|redacted| name.eq_ignore_ascii_case(redacted))
}

impl<S, B> Service<ServiceRequest> for RequestDebuggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let peer_addr = req
            .connection_info()
            .peer_addr()
            .unwrap_or("unknown")
            .to_string();
        let method = req.method().to_string();
        let path = req.path().to_string();

        debug!("=== Incoming Request ===");
        debug!("From: {peer_addr}");
        debug!("Method: {method} {path}");
        debug!("HTTP Version: {:?}", req.version());
        debug!("Headers:");
        for (name, value) in req.headers() {
            if is_redacted(name.as_str()) {
                debug!("  {name}: [REDACTED]");
                continue;
            }
            match value.to_str() {
                Ok(v) => debug!("  {name}: {v}"),
                Err(_) => debug!("  {name}: <non-UTF8 value, {} bytes>", value.len()),
            }
        }
        debug!("========================");

        let started = Instant::now();
        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            debug!(
                "{method} {path} -> {} in {:?}",
                res.status(),
                started.elapsed()
            );
            Ok(res)
        })
    }
}

use std::io;
use std::net::SocketAddr;

use axum::extract::Request;
use axum::http::Method;
use axum::routing;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::endpoint::Endpoint;

/// Registration failure, reported before any server is constructed.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("method {0} is not supported")]
    UnsupportedMethod(Method),
}

/// Owns the fully registered router and the listening lifecycle.
#[derive(Debug)]
pub struct RestService {
    router: Router,
}

impl RestService {
    /// Register every endpoint with the underlying router, in order.
    ///
    /// Fails as a whole if any endpoint names a method outside
    /// GET/POST/PUT/PATCH/DELETE; no partial set of routes is kept. Path
    /// syntax, collisions and duplicate routes are the router's concern.
    pub fn new(endpoints: Vec<Endpoint>) -> Result<Self, RegistrationError> {
        let mut router = Router::new();
        for endpoint in endpoints {
            let Endpoint {
                method,
                path,
                dispatch,
            } = endpoint;
            let handler = move |request: Request| dispatch(request);
            let route = match method.as_str() {
                "GET" => routing::get(handler),
                "POST" => routing::post(handler),
                "PUT" => routing::put(handler),
                "PATCH" => routing::patch(handler),
                "DELETE" => routing::delete(handler),
                _ => return Err(RegistrationError::UnsupportedMethod(method)),
            };
            router = router.route(&path, route);
        }
        Ok(Self { router })
    }

    /// The registered router, for embedding into a larger application or
    /// driving directly in tests.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Bind `addr` and serve until the underlying server stops or fails.
    /// Bind and runtime errors surface to the caller unchanged.
    pub async fn serve(self, addr: SocketAddr) -> io::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router.into_make_service()).await
    }
}

//! Authenticated access to the remote query service.
//!
//! A [`SessionProvider`] logs in once at startup and yields a [`Session`]:
//! an HTTP client holding the login cookies plus the CSRF token every query
//! request must carry. The session is shared read-only for the lifetime of
//! the process and is never renewed; if the service invalidates it, that
//! shows up as per-report fetch failures.

mod axiom;
mod traits;
mod types;

pub use axiom::AxiomSessionProvider;
pub use traits::SessionProvider;
pub use types::{Session, SessionError, CSRF_HEADER};

pub mod gate;
pub mod identity;
pub mod public_routes;

pub use gate::{AuthGate, GateOutcome, GateRejection};
pub use identity::{IdentityResolver, PgIdentityStore};
pub use public_routes::PublicRoutes;

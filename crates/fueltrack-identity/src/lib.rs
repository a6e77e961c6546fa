//! Identity layer for fueltrack
//!
//! This crate defines the interface between the application and whatever
//! vouches for the current user:
//! - `IdentityProvider`, the async session/user lookup
//! - `SupabaseIdentity`, a REST client for Supabase auth
//! - `MockIdentity` for tests
//! - `AuthGate`, which turns a provider's answer into a routing decision

mod gate;
mod mock;
mod session;
mod supabase;
mod traits;

pub use gate::*;
pub use mock::*;
pub use session::*;
pub use supabase::*;
pub use traits::*;

//! # Game State
//!
//! The "Ledger" crate - transactional state for one tabletop role-play
//! session. This crate is the single source of truth for player, world and
//! concept data and contains no AI logic.
//!
//! All mutation is expressed as [`StateChange`] values and flows through a
//! [`StateTransaction`]: changes are buffered, validated against every
//! invariant, and applied atomically at commit. A failed commit or a
//! rollback leaves the state byte-for-byte untouched.

pub mod changes;
pub mod concepts;
pub mod dice;
pub mod error;
pub mod player;
pub mod state;
pub mod transaction;
pub mod world;

pub use changes::*;
pub use concepts::*;
pub use dice::*;
pub use error::*;
pub use player::*;
pub use state::*;
pub use transaction::*;
pub use world::*;

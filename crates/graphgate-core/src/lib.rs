//! graphgate core - the entity mutation and consistency layer
//!
//! Sits between the API surface and the property-graph store:
//! - Classified error taxonomy with stable codes, and the single translator
//!   that maps raw store/validation failures onto it
//! - Collision-resistant identifier generation
//! - Typed graph statements and the session-oriented store client seam,
//!   including the scoped session guard
//! - Pre-write uniqueness checks for unique-declared fields
//! - Payload models, validators and pagination
//! - Configuration and the structured logging facility

pub mod clock;
pub mod config;
pub mod errors;
pub mod graph;
pub mod ids;
pub mod logging_facility;
pub mod model;
pub mod pagination;
pub mod translate;
pub mod uniqueness;
pub mod validation;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{ClassifiedError, EntityKind, ErrorCode, RawError, Result};
pub use graph::{GraphClient, GraphSession, SessionScope, Statement, StoreError};
pub use ids::{IdGenerator, TimestampIdGenerator};
pub use model::{CreatePostInput, CreateUserInput, Post, UpdatePostInput, UpdateUserInput, User};
pub use pagination::Pagination;
pub use translate::ErrorTranslator;
pub use uniqueness::UniquenessGuard;
pub use validation::{ValidationReport, Validator};

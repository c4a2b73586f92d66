//! Typed ID definitions for all domain entities.
//!
//! This module defines type aliases for each domain entity, providing
//! compile-time type safety for ID usage throughout the application.
//!
//! # Example
//!
//! ```rust
//! use server_core::common::{PetId, UserId};
//!
//! // These are incompatible types - compiler prevents mixing them up
//! let user_id: UserId = UserId::new();
//! let pet_id: PetId = PetId::new();
//!
//! // This would be a compile error:
//! // let wrong: PetId = user_id;
//! ```

// Re-export the core Id type and version markers
pub use super::id::{Id, V4, V7};

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for User entities (accounts).
pub struct User;

/// Marker type for Pet entities (adoptable listings).
pub struct Pet;

/// Marker type for AdoptionRequest entities.
pub struct AdoptionRequest;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for User entities.
pub type UserId = Id<User>;

/// Typed ID for Pet entities.
pub type PetId = Id<Pet>;

/// Typed ID for AdoptionRequest entities.
pub type RequestId = Id<AdoptionRequest>;

//! Typed records for the two managed resource kinds.
//!
//! # Responsibility
//! - Define the persisted record shapes and their client-supplied inputs.
//! - Normalize and validate typed inputs before they reach storage.
//!
//! # Invariants
//! - Every record is identified by a stable, server-assigned `ResourceId`.
//! - `id` and `created_at` never change after create.
//! - Deletion is a hard delete; there are no tombstones.

pub mod experience;
pub mod portfolio;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned by the store on create.
pub type ResourceId = Uuid;

/// The closed set of managed resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Portfolio,
    Experience,
}

impl ResourceKind {
    /// Human-facing singular name, e.g. for "Portfolio not found".
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Portfolio => "Portfolio",
            Self::Experience => "Experience",
        }
    }

    /// Lowercase label used in log events and operation names.
    pub fn label(self) -> &'static str {
        match self {
            Self::Portfolio => "portfolio",
            Self::Experience => "experience",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Common surface of persisted records.
pub trait Resource {
    fn id(&self) -> ResourceId;

    fn technologies(&self) -> &[String];
}

//! # Project Data Structures
//!
//! The `Project` struct is the root container for a pool budget.
//! Projects serialize to `.lgn` (Lagoon) files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, id, client info, timestamps)
//! ├── pool: PoolSpecification (geometry and options)
//! └── prices: PriceBook (unit costs and extras)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lagoon_core::project::Project;
//!
//! let project = Project::new("Vila Nova Residence", "A. Carvalho", 4);
//!
//! // Serialize to JSON
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("Vila Nova Residence"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pool::PoolSpecification;
use crate::pricing::PriceBook;

/// Current schema version for .lgn files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
///
/// This is the top-level struct that gets serialized to `.lgn` files.
/// One project holds one pool specification and the price book it is
/// budgeted against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, id, client info)
    pub meta: ProjectMetadata,

    /// The pool being budgeted
    pub pool: PoolSpecification,

    /// Price tables for this budget
    pub prices: PriceBook,
}

impl Project {
    /// Create a new project with a default pool and market prices.
    ///
    /// # Arguments
    ///
    /// * `name` - Project or site name
    /// * `client` - Client name
    /// * `family_size` - Number of people in the household
    ///
    /// # Example
    ///
    /// ```rust
    /// use lagoon_core::project::Project;
    ///
    /// let project = Project::new("Beach House", "R. Lima", 5);
    /// assert_eq!(project.meta.client, "R. Lima");
    /// ```
    pub fn new(name: impl Into<String>, client: impl Into<String>, family_size: u32) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                id: Uuid::new_v4(),
                name: name.into(),
                client: client.into(),
                family_size,
                created: now,
                modified: now,
            },
            pool: PoolSpecification::new(4.0, 8.0, 1.5),
            prices: PriceBook::default(),
        }
    }

    /// Replace the pool specification, refreshing the modified stamp.
    pub fn set_pool(&mut self, pool: PoolSpecification) {
        self.pool = pool;
        self.touch();
    }

    /// Replace the price book, refreshing the modified stamp.
    pub fn set_prices(&mut self, prices: PriceBook) {
        self.prices = prices;
        self.touch();
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", 1)
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Stable project identifier
    pub id: Uuid,

    /// Project or site name
    pub name: String,

    /// Client name
    pub client: String,

    /// Number of people in the household
    pub family_size: u32,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

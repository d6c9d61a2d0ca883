//! `scoot-spatial` — road graph, spatial snapping, and distance queries.
//!
//! This crate is the engine's Road Graph Provider.  The engine only ever
//! asks one question of it: *how many metres is the shortest path between
//! these two nodes?*  Everything else (CSR layout, R-tree, caching) exists to
//! answer that question quickly.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`          |
//! | [`router`]  | `Router` trait, `Weight`, `Route`, `DijkstraRouter`         |
//! | [`cache`]   | `CachedRouter` — LRU memoization over any `Router`          |
//! | [`loader`]  | `load_network_csv`, `load_network_readers`                  |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod cache;
pub mod error;
pub mod loader;
pub mod network;
pub mod router;


pub use cache::CachedRouter;
pub use error::{SpatialError, SpatialResult};
pub use loader::{load_network_csv, load_network_readers};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use router::{DijkstraRouter, Route, Router, Weight};

//! Adjacency-based border autotiling
//!
//! This crate decides which decorations a painted cell carries:
//! - [`BorderResolver`] assigns at most one border sprite per cell from the
//!   materials of its 8 neighbours, with fixed priorities and table-order
//!   tie-breaks. The result depends only on the grid and the rule tables.
//! - [`NoiseSampler`] rolls at most one noise overlay for a freshly painted
//!   cell, using an injectable random source.
//!
//! # Example
//!
//! ```rust,ignore
//! use map_tiler_autotile::{resolve_borders, NoiseSampler};
//!
//! let mut sampler = NoiseSampler::seeded(42);
//! let noise = sampler.sample(&grass, &tables);
//! grid.insert(coord, PaintedCell::new(grass.id.clone()).with_noise(noise));
//! resolve_borders(&mut grid, &tables);
//! ```

pub mod border;
pub mod noise;

pub use border::{
    neighbors, resolve_borders, resolve_borders_around, BorderResolver, Neighborhood,
};
pub use noise::{roll_noise, NoiseSampler};

// Re-export map_tiler_core
pub use map_tiler_core;

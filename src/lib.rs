//! bga-fanout: automatic dogbone fanout for BGA footprints
//!
//! For every connected pad of a ball-grid-array footprint this crate computes
//! a short track and a via placed between the balls, so the signal can leave
//! the pad field on an inner layer. Pitch and grid shape are inferred from
//! the pad coordinates alone.
//!
//! # Architecture
//!
//! - **Fanout core** ([`fanout`]): pure geometry. Takes read-only pad views
//!   and returns escape records; never touches a board.
//! - **Board adapter** ([`board`]): a JSON board document that resolves
//!   nets and net classes into pad views and applies the records as tracks
//!   and vias.
//! - **CLI** (`bga-fanout` binary): loads a board, fans out the selected
//!   footprints, writes the result.
//!
//! # Modules
//!
//! - [`board`] — Board document model and batch fanout
//! - [`config`] — Configuration loading, validation and errors
//! - [`fanout`] — Grid inference, classification and via placement

pub mod board;
pub mod config;
pub mod fanout;

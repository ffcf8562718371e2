//! Position module tests.
//!
//! - `perft.rs` - move generation node counts
//! - `draw.rs` - fifty-move rule and insufficient material
//! - `edge_cases.rs` - FEN handling, special moves, terminal positions
//! - `proptest.rs` - property-based tests over random games

//! Compiles the unit generated from `schemas/monster.json` against the
//! real runtime, so the tests in `tests/` exercise emitted code on actual
//! buffers.

#[allow(clippy::pedantic, clippy::nursery, missing_docs)]
pub mod monster_generated {
    include!(concat!(env!("OUT_DIR"), "/monster_generated.rs"));
}

pub use monster_generated::game;

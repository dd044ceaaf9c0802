//! Developer tooling: world inspector and frame timing.
//!
//! # Invariants
//! - Inspection is read-only; nothing here mutates the world or its meshes.

mod inspector;
mod timing;

pub use inspector::{ChunkInfo, WorldInspector, WorldSummary};
pub use timing::FrameTimer;

pub fn crate_info() -> &'static str {
    "digworld-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}

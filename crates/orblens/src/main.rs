//! Desktop host for the draggable metaball orb and its magnifying lens.
//!
//! Wires the physics (`motion`), interaction model (`gesture`), and GPU layer
//! (`renderer`) into a winit window: a paged content backdrop, the orb
//! resting in its slot, and the lens that expands on an upward pull.

mod cli;
mod content;
mod defaults;
mod haptics;
mod lens;
mod orb;
mod run;

use anyhow::Result;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();
    run::run(cli)
}

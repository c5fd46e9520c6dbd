pub mod bridge;
pub mod context;
pub mod lens;
pub mod metaball;
pub mod program;
pub mod uniforms;

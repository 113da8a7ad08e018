pub mod contexts;
pub mod registries;
pub mod workspace;

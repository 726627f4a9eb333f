pub mod job;
pub mod material;
pub mod profile;

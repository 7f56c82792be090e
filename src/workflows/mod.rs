pub mod ideas;
pub mod intake;
pub mod scoring;

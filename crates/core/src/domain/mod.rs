pub mod features;
pub mod variant;

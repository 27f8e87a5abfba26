pub mod face;
pub mod rules;

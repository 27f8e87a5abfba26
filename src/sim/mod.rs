pub mod controller;
pub mod event;
pub mod sequencer;
pub mod state;
pub mod timer;

//! Transport controller: the playback state machine in front of the media
//! engine, and the poller that keeps the position readout fresh.

mod controller;
mod poller;
mod state;

pub use controller::Transport;
pub use state::{PlayMode, PlaybackState, TransportState};

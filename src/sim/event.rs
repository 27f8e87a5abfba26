/// Events emitted by the controller.
/// The presentation layer consumes these for sound.

use crate::domain::face::Face;
use crate::domain::rules::RollVerdict;

#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(dead_code)]
pub enum GameEvent {
    NumberSelected(Face),
    RollStarted,
    Scored { verdict: RollVerdict, score: u32 },
    Spin(Face),
    Settled(RollVerdict),
    Restarted,
}

/// Die faces and the sources that produce them.
///
/// `Face` is the only way a die value enters the game, so every value
/// downstream is guaranteed to lie in 1..=6.

use std::fmt;

use rand::rngs::ThreadRng;
use rand::Rng;

pub const MIN_FACE: u8 = 1;
pub const MAX_FACE: u8 = 6;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Face(u8);

impl Face {
    pub const ONE: Face = Face(1);

    /// Returns `None` for anything outside 1..=6.
    pub fn new(value: u8) -> Option<Face> {
        if (MIN_FACE..=MAX_FACE).contains(&value) {
            Some(Face(value))
        } else {
            None
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// All six faces in ascending order.
    pub fn all() -> impl Iterator<Item = Face> {
        (MIN_FACE..=MAX_FACE).map(Face)
    }

    /// Next face, wrapping 6 → 1.
    pub fn next(self) -> Face {
        if self.0 == MAX_FACE { Face(MIN_FACE) } else { Face(self.0 + 1) }
    }

    /// Previous face, wrapping 1 → 6.
    pub fn prev(self) -> Face {
        if self.0 == MIN_FACE { Face(MAX_FACE) } else { Face(self.0 - 1) }
    }

    /// Unicode die symbol (⚀..⚅).
    pub fn symbol(self) -> char {
        const SYMBOLS: [char; 6] = ['⚀', '⚁', '⚂', '⚃', '⚄', '⚅'];
        SYMBOLS[(self.0 - 1) as usize]
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Anything that can throw a six-sided die.
pub trait DieSource {
    fn roll(&mut self) -> Face;
}

/// Uniform die backed by the thread-local RNG. No seeding control.
pub struct ThreadDie {
    rng: ThreadRng,
}

impl ThreadDie {
    pub fn new() -> Self {
        ThreadDie { rng: rand::thread_rng() }
    }
}

impl DieSource for ThreadDie {
    fn roll(&mut self) -> Face {
        Face(self.rng.gen_range(MIN_FACE..=MAX_FACE))
    }
}

/// Test die: replays a fixed script of faces, cycling when exhausted.
#[cfg(test)]
pub struct ScriptedDie {
    faces: Vec<Face>,
    pos: usize,
}

#[cfg(test)]
impl ScriptedDie {
    pub fn new(values: &[u8]) -> Self {
        let faces = values.iter().filter_map(|&v| Face::new(v)).collect::<Vec<_>>();
        assert!(!faces.is_empty(), "script needs at least one valid face");
        ScriptedDie { faces, pos: 0 }
    }

    /// Always rolls the same face.
    pub fn fixed(value: u8) -> Self {
        Self::new(&[value])
    }
}

#[cfg(test)]
impl DieSource for ScriptedDie {
    fn roll(&mut self) -> Face {
        let face = self.faces[self.pos % self.faces.len()];
        self.pos += 1;
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_rejects_out_of_range() {
        assert!(Face::new(0).is_none());
        assert!(Face::new(7).is_none());
        assert_eq!(Face::new(1).map(Face::value), Some(1));
        assert_eq!(Face::new(6).map(Face::value), Some(6));
    }

    #[test]
    fn face_cycling_wraps() {
        let six = Face::new(6).unwrap();
        assert_eq!(six.next(), Face::ONE);
        assert_eq!(Face::ONE.prev(), six);
        assert_eq!(Face::new(3).unwrap().next().value(), 4);
    }

    #[test]
    fn thread_die_stays_in_range() {
        let mut die = ThreadDie::new();
        for _ in 0..500 {
            let v = die.roll().value();
            assert!((1..=6).contains(&v));
        }
    }

    #[test]
    fn scripted_die_cycles() {
        let mut die = ScriptedDie::new(&[2, 5]);
        let seq: Vec<u8> = (0..5).map(|_| die.roll().value()).collect();
        assert_eq!(seq, vec![2, 5, 2, 5, 2]);
    }

    #[test]
    fn symbols_match_faces() {
        assert_eq!(Face::ONE.symbol(), '⚀');
        assert_eq!(Face::new(6).unwrap().symbol(), '⚅');
    }
}

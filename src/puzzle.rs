//! Water sort puzzle state model.
//!
//! A puzzle is a row of tubes holding colored liquid tokens. One pour tips
//! the top token of a tube into another tube that is empty, or that shows
//! the same color on top and still has room. The puzzle is solved when every
//! tube is either empty or filled to capacity with a single color.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::search::SearchNode;

/// Most distinct colors a puzzle can hold (`Color` ids are one byte).
pub const MAX_COLORS: usize = 256;

/// One liquid color, identified by a small integer id.
///
/// Ids render as spreadsheet-style letters: 0 is `A`, 25 is `Z`, 26 is `AA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color(pub u8);

impl Color {
    /// Parse a single letter back to a color id (`a`/`A` = 0).
    pub fn from_letter(letter: char) -> Option<Color> {
        let upper = letter.to_ascii_uppercase();
        upper
            .is_ascii_uppercase()
            .then(|| Color(upper as u8 - b'A'))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut id = self.0 as u32;
        let mut letters = SmallVec::<[u8; 2]>::new();
        loop {
            letters.push(b'A' + (id % 26) as u8);
            if id < 26 {
                break;
            }
            id = id / 26 - 1;
        }
        for letter in letters.iter().rev() {
            write!(f, "{}", *letter as char)?;
        }
        Ok(())
    }
}

/// One tube: an ordered stack of color tokens, bottom to top.
///
/// Only filled slots are stored; the owning state carries the shared
/// capacity, so a tube's length is its fill level.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tube {
    tokens: SmallVec<[Color; 8]>,
}

impl Tube {
    pub fn new() -> Tube {
        Tube::default()
    }

    /// Current fill level.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `pos` counted from the bottom; `None` at or above the fill level.
    pub fn get(&self, pos: usize) -> Option<Color> {
        self.tokens.get(pos).copied()
    }

    /// Topmost token.
    pub fn top(&self) -> Option<Color> {
        self.tokens.last().copied()
    }

    /// True when every held token is the same color (vacuously true when empty).
    pub fn is_uniform(&self) -> bool {
        match self.tokens.split_first() {
            Some((first, rest)) => rest.iter().all(|token| token == first),
            None => true,
        }
    }

    /// Tokens bottom to top.
    pub fn tokens(&self) -> &[Color] {
        &self.tokens
    }

    fn push(&mut self, color: Color) {
        self.tokens.push(color);
    }

    fn pop(&mut self) -> Option<Color> {
        self.tokens.pop()
    }
}

impl FromIterator<Color> for Tube {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Tube {
        Tube {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Tube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

/// A single pouring action: tube `from` tips its top token into tube `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pour {
    pub from: usize,
    pub to: usize,
}

impl Pour {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Pour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Errors raised by state construction and pour application.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    #[error("tube index {index} out of range for {count} tubes")]
    TubeOutOfRange { index: usize, count: usize },
    #[error("cannot pour tube {index} into itself")]
    PourOntoSelf { index: usize },
    #[error("cannot pour tube {from} into tube {to}")]
    IncompatiblePour { from: usize, to: usize },
    #[error("a puzzle needs at least two tubes, got {count}")]
    TooFewTubes { count: usize },
    #[error("tube capacity must be at least one slot")]
    ZeroCapacity,
    #[error("tube {index} holds {fill} tokens but capacity is {capacity}")]
    TubeOverflow {
        index: usize,
        fill: usize,
        capacity: usize,
    },
    #[error("{requested} colors requested but at most {max} are supported")]
    TooManyColors { requested: usize, max: usize },
    #[error("unrecognized token {token:?} in tube layout")]
    UnrecognizedToken { token: char },
}

/// Shape of a randomly dealt puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleParams {
    /// Capacity of every tube, and tokens dealt per color.
    pub tube_size: usize,
    /// Tubes added beyond the colored ones; their slots shuffle in as free space.
    pub empty_tubes: usize,
    /// Distinct colors in play.
    pub color_count: usize,
}

impl Default for PuzzleParams {
    fn default() -> Self {
        Self {
            tube_size: 4,
            empty_tubes: 2,
            color_count: 5,
        }
    }
}

/// An immutable puzzle configuration.
///
/// `PuzzleState` is a cheap-to-clone handle: tube contents, the link to the
/// parent state, and a canonical (tube-order-independent) form cached at
/// construction all live behind shared ownership. Two states are equal when
/// they hold the same multiset of tubes; slot order, lineage, and depth
/// never participate in equality or hashing, so one configuration reached
/// along different move sequences dedups to a single visited-set entry.
#[derive(Clone)]
pub struct PuzzleState {
    repr: Rc<StateRepr>,
}

struct StateRepr {
    /// Tubes in slot order, as a driver displays them.
    tubes: Box<[Tube]>,
    /// The same tubes sorted; equality and hashing read only this.
    canon: Box<[Tube]>,
    capacity: usize,
    depth: usize,
    last_pour: Option<Pour>,
    parent: Option<PuzzleState>,
}

impl PuzzleState {
    /// Build a root state from explicit tubes.
    ///
    /// Requires at least two tubes, a nonzero capacity, and no tube filled
    /// past `capacity`.
    pub fn new(tubes: Vec<Tube>, capacity: usize) -> Result<PuzzleState, PuzzleError> {
        if tubes.len() < 2 {
            return Err(PuzzleError::TooFewTubes { count: tubes.len() });
        }
        if capacity == 0 {
            return Err(PuzzleError::ZeroCapacity);
        }
        for (index, tube) in tubes.iter().enumerate() {
            if tube.len() > capacity {
                return Err(PuzzleError::TubeOverflow {
                    index,
                    fill: tube.len(),
                    capacity,
                });
            }
        }
        Ok(PuzzleState::assemble(
            tubes.into_boxed_slice(),
            capacity,
            0,
            None,
            None,
        ))
    }

    /// Deal a fresh random puzzle: every color `tube_size` times plus
    /// `empty_tubes` tubes' worth of free space, shuffled uniformly and cut
    /// into `color_count + empty_tubes` tubes.
    ///
    /// The deal is not guaranteed solvable, and it can even come out already
    /// solved; both are legitimate outcomes.
    pub fn random(params: PuzzleParams, rng: &mut impl Rng) -> Result<PuzzleState, PuzzleError> {
        let PuzzleParams {
            tube_size,
            empty_tubes,
            color_count,
        } = params;
        if color_count > MAX_COLORS {
            return Err(PuzzleError::TooManyColors {
                requested: color_count,
                max: MAX_COLORS,
            });
        }
        if tube_size == 0 {
            return Err(PuzzleError::ZeroCapacity);
        }
        let tube_count = color_count + empty_tubes;
        if tube_count < 2 {
            return Err(PuzzleError::TooFewTubes { count: tube_count });
        }

        // One slot per token, blanks included; tubes keep only filled slots.
        let mut slots: Vec<Option<Color>> = Vec::with_capacity(tube_count * tube_size);
        for id in 0..color_count {
            slots.extend(std::iter::repeat(Some(Color(id as u8))).take(tube_size));
        }
        slots.extend(std::iter::repeat(None).take(empty_tubes * tube_size));
        slots.shuffle(rng);

        let tubes: Vec<Tube> = slots
            .chunks(tube_size)
            .map(|chunk| chunk.iter().flatten().copied().collect())
            .collect();
        PuzzleState::new(tubes, tube_size)
    }

    /// Parse a comma-separated tube layout, letters bottom to top.
    ///
    /// `"ABBA,AB,,"` is four tubes, two of them empty. `.` and `_` mark
    /// blank slots and are skipped; case is ignored. When `capacity` is
    /// `None` the fullest tube sets it.
    pub fn parse_layout(
        text: &str,
        capacity: Option<usize>,
    ) -> Result<PuzzleState, PuzzleError> {
        let mut tubes = Vec::new();
        for part in text.split(',') {
            let mut tube = Tube::new();
            for ch in part.chars() {
                if ch.is_whitespace() || ch == '.' || ch == '_' {
                    continue;
                }
                match Color::from_letter(ch) {
                    Some(color) => tube.push(color),
                    None => return Err(PuzzleError::UnrecognizedToken { token: ch }),
                }
            }
            tubes.push(tube);
        }
        let capacity = capacity.unwrap_or_else(|| tubes.iter().map(Tube::len).max().unwrap_or(0));
        PuzzleState::new(tubes, capacity)
    }

    fn assemble(
        tubes: Box<[Tube]>,
        capacity: usize,
        depth: usize,
        last_pour: Option<Pour>,
        parent: Option<PuzzleState>,
    ) -> PuzzleState {
        let mut canon = tubes.clone();
        canon.sort_unstable();
        PuzzleState {
            repr: Rc::new(StateRepr {
                tubes,
                canon,
                capacity,
                depth,
                last_pour,
                parent,
            }),
        }
    }

    /// Number of tubes.
    pub fn tube_count(&self) -> usize {
        self.repr.tubes.len()
    }

    /// Per-tube capacity, fixed at construction.
    pub fn tube_size(&self) -> usize {
        self.repr.capacity
    }

    /// Token at `pos` (from the bottom) in tube `tube`; `None` at or above
    /// the fill level. Panics if `tube` is not below `tube_count()`, like
    /// slice indexing.
    pub fn get(&self, tube: usize, pos: usize) -> Option<Color> {
        self.repr.tubes[tube].get(pos)
    }

    /// Tubes in slot order.
    pub fn tubes(&self) -> &[Tube] {
        &self.repr.tubes
    }

    /// Pours taken from the root to reach this state.
    pub fn depth(&self) -> usize {
        self.repr.depth
    }

    /// The pour that produced this state, `None` for a root.
    pub fn last_pour(&self) -> Option<Pour> {
        self.repr.last_pour
    }

    /// Apply one pour, producing the successor state.
    ///
    /// A pour is legal when `from` and `to` are distinct in-range tubes, the
    /// source is non-empty, and the destination either is empty or shows the
    /// same color on top while holding fewer than `tube_size()` tokens. The
    /// successor keeps `self` as its parent and records the pour.
    pub fn pour(&self, from: usize, to: usize) -> Result<PuzzleState, PuzzleError> {
        let count = self.tube_count();
        if from >= count {
            return Err(PuzzleError::TubeOutOfRange { index: from, count });
        }
        if to >= count {
            return Err(PuzzleError::TubeOutOfRange { index: to, count });
        }
        if from == to {
            return Err(PuzzleError::PourOntoSelf { index: from });
        }
        if !self.pour_fits(from, to) {
            return Err(PuzzleError::IncompatiblePour { from, to });
        }

        let mut tubes = self.repr.tubes.clone();
        if let Some(token) = tubes[from].pop() {
            tubes[to].push(token);
        }
        Ok(PuzzleState::assemble(
            tubes,
            self.repr.capacity,
            self.repr.depth + 1,
            Some(Pour::new(from, to)),
            Some(self.clone()),
        ))
    }

    /// Legality check behind `pour` and the child enumeration; indices are
    /// assumed distinct and in range.
    fn pour_fits(&self, from: usize, to: usize) -> bool {
        let source = &self.repr.tubes[from];
        let dest = &self.repr.tubes[to];
        match (source.top(), dest.top()) {
            (None, _) => false,
            // Constructors reject zero capacity, so an empty tube has room.
            (Some(_), None) => true,
            (Some(a), Some(b)) => a == b && dest.len() < self.repr.capacity,
        }
    }

    /// All legal pours, in discovery-priority order: pours into an empty
    /// tube first, then pours onto a matching top color with room left.
    fn ranked_pours(&self) -> SmallVec<[Pour; 16]> {
        let tubes = &self.repr.tubes;
        let mut pours = SmallVec::new();
        for (from, source) in tubes.iter().enumerate() {
            if source.is_empty() {
                continue;
            }
            for (to, dest) in tubes.iter().enumerate() {
                if from != to && dest.is_empty() {
                    pours.push(Pour::new(from, to));
                }
            }
        }
        for (from, source) in tubes.iter().enumerate() {
            let top = match source.top() {
                Some(color) => color,
                None => continue,
            };
            for (to, dest) in tubes.iter().enumerate() {
                if from == to {
                    continue;
                }
                if dest.top() == Some(top) && dest.len() < self.repr.capacity {
                    pours.push(Pour::new(from, to));
                }
            }
        }
        pours
    }
}

impl SearchNode for PuzzleState {
    fn is_goal(&self) -> bool {
        self.repr
            .tubes
            .iter()
            .all(|tube| tube.is_empty() || (tube.len() == self.repr.capacity && tube.is_uniform()))
    }

    fn children(&self) -> impl Iterator<Item = PuzzleState> {
        let parent = self.clone();
        self.ranked_pours()
            .into_iter()
            .filter_map(move |pour| parent.pour(pour.from, pour.to).ok())
    }

    fn parent(&self) -> Option<PuzzleState> {
        self.repr.parent.clone()
    }
}

impl PartialEq for PuzzleState {
    fn eq(&self, other: &PuzzleState) -> bool {
        Rc::ptr_eq(&self.repr, &other.repr) || self.repr.canon == other.repr.canon
    }
}

impl Eq for PuzzleState {}

impl Hash for PuzzleState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.repr.canon.hash(state);
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (index, tube) in self.repr.tubes.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", tube)?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PuzzleState({}, depth {})", self, self.repr.depth)
    }
}

impl Drop for StateRepr {
    fn drop(&mut self) {
        // Unwind the parent chain iteratively; letting it drop recursively
        // overflows the stack on deep solution paths.
        let mut parent = self.parent.take();
        while let Some(state) = parent {
            parent = match Rc::try_unwrap(state.repr) {
                Ok(mut repr) => repr.parent.take(),
                Err(_) => None,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashMap;

    fn create_state(layout: &str, capacity: usize) -> PuzzleState {
        PuzzleState::parse_layout(layout, Some(capacity)).unwrap()
    }

    fn hash_of(state: &PuzzleState) -> u64 {
        let mut hasher = DefaultHasher::new();
        state.hash(&mut hasher);
        hasher.finish()
    }

    fn color_counts(state: &PuzzleState) -> HashMap<Color, usize> {
        let mut counts = HashMap::new();
        for tube in state.tubes() {
            for &color in tube.tokens() {
                *counts.entry(color).or_insert(0) += 1;
            }
        }
        counts
    }

    #[test]
    fn test_color_letters() {
        assert_eq!(Color(0).to_string(), "A");
        assert_eq!(Color(25).to_string(), "Z");
        assert_eq!(Color(26).to_string(), "AA");
        assert_eq!(Color(27).to_string(), "AB");
        assert_eq!(Color::from_letter('a'), Some(Color(0)));
        assert_eq!(Color::from_letter('H'), Some(Color(7)));
        assert_eq!(Color::from_letter('3'), None);
    }

    #[test]
    fn test_tube_is_uniform() {
        assert!(Tube::new().is_uniform());
        let solid: Tube = [Color(2), Color(2)].into_iter().collect();
        assert!(solid.is_uniform());
        let mixed: Tube = [Color(1), Color(2)].into_iter().collect();
        assert!(!mixed.is_uniform());
    }

    #[test]
    fn test_parse_layout_and_display() {
        let state = create_state("ABBA,ab..,,", 4);
        assert_eq!(state.tube_count(), 4);
        assert_eq!(state.tube_size(), 4);
        assert_eq!(state.get(0, 0), Some(Color(0)));
        assert_eq!(state.get(0, 3), Some(Color(0)));
        assert_eq!(state.get(1, 1), Some(Color(1)));
        assert_eq!(state.get(1, 2), None);
        assert_eq!(state.to_string(), "(ABBA, AB, , )");
    }

    #[test]
    fn test_parse_layout_rejects_unknown_token() {
        let err = PuzzleState::parse_layout("AB,3C", Some(4)).unwrap_err();
        assert_eq!(err, PuzzleError::UnrecognizedToken { token: '3' });
    }

    #[test]
    fn test_parse_layout_infers_capacity() {
        let state = PuzzleState::parse_layout("AAB,BB,", None).unwrap();
        assert_eq!(state.tube_size(), 3);
    }

    #[test]
    fn test_new_validates() {
        assert_eq!(
            PuzzleState::new(vec![Tube::new()], 4).unwrap_err(),
            PuzzleError::TooFewTubes { count: 1 }
        );
        assert_eq!(
            PuzzleState::new(vec![Tube::new(), Tube::new()], 0).unwrap_err(),
            PuzzleError::ZeroCapacity
        );
        assert_eq!(
            PuzzleState::parse_layout("AAA,B", Some(2)).unwrap_err(),
            PuzzleError::TubeOverflow {
                index: 0,
                fill: 3,
                capacity: 2
            }
        );
    }

    #[test]
    #[should_panic]
    fn test_get_panics_on_bad_tube_index() {
        let state = create_state("AA,", 2);
        let _ = state.get(2, 0);
    }

    #[test]
    fn test_goal_requires_full_uniform_tubes() {
        assert!(create_state("AA,", 2).is_goal());
        assert!(create_state(",", 2).is_goal());
        assert!(!create_state("AB,", 2).is_goal());
        // A lone token is not enough: the tube must be filled to capacity.
        assert!(!create_state("A,B", 2).is_goal());
        assert!(create_state("AA,BB", 2).is_goal());
    }

    #[test]
    fn test_pour_moves_one_token() {
        let state = create_state("AB,,", 2);
        let next = state.pour(0, 1).unwrap();
        assert_eq!(next.to_string(), "(A, B, )");
        assert_eq!(next.depth(), 1);
        assert_eq!(next.last_pour(), Some(Pour::new(0, 1)));
        assert_eq!(next.parent(), Some(state.clone()));
        // The parent is untouched.
        assert_eq!(state.to_string(), "(AB, , )");
        assert_eq!(state.depth(), 0);
    }

    #[test]
    fn test_pour_rejects_bad_arguments() {
        let state = create_state("AB,BA", 2);
        assert_eq!(
            state.pour(0, 0).unwrap_err(),
            PuzzleError::PourOntoSelf { index: 0 }
        );
        assert_eq!(
            state.pour(0, 5).unwrap_err(),
            PuzzleError::TubeOutOfRange { index: 5, count: 2 }
        );
        assert_eq!(
            state.pour(7, 0).unwrap_err(),
            PuzzleError::TubeOutOfRange { index: 7, count: 2 }
        );
    }

    #[test]
    fn test_pour_rejects_illegal_pours() {
        // Mismatched tops.
        let state = create_state("AB,BA", 2);
        assert_eq!(
            state.pour(0, 1).unwrap_err(),
            PuzzleError::IncompatiblePour { from: 0, to: 1 }
        );
        // Full destination, even with a matching top.
        let state = create_state("AB,CB,", 2);
        assert_eq!(
            state.pour(0, 1).unwrap_err(),
            PuzzleError::IncompatiblePour { from: 0, to: 1 }
        );
        // Empty source.
        let state = create_state(",AB", 2);
        assert_eq!(
            state.pour(0, 1).unwrap_err(),
            PuzzleError::IncompatiblePour { from: 0, to: 1 }
        );
    }

    #[test]
    fn test_pour_conserves_tokens() {
        let state = create_state("ABBA,BA,,", 4);
        let before = color_counts(&state);
        let next = state.pour(0, 2).unwrap();
        assert_eq!(color_counts(&next), before);
        let again = next.pour(1, 2).unwrap();
        assert_eq!(color_counts(&again), before);
    }

    #[test]
    fn test_depth_increments_along_chain() {
        let mut current = create_state("AB,BA,,", 2);
        for expected in 1..=3 {
            let next = current.children().next().expect("state has children");
            assert_eq!(next.depth(), expected);
            assert_eq!(next.parent().unwrap().depth(), expected - 1);
            current = next;
        }
    }

    #[test]
    fn test_children_prefer_empty_then_matching() {
        let state = create_state("AB,BB,A,,", 3);
        let pours: Vec<Pour> = state
            .children()
            .map(|child| child.last_pour().unwrap())
            .collect();
        assert_eq!(
            pours,
            vec![
                Pour::new(0, 3),
                Pour::new(1, 3),
                Pour::new(2, 3),
                Pour::new(0, 1),
                Pour::new(1, 0),
            ]
        );
    }

    #[test]
    fn test_children_are_restartable() {
        let state = create_state("AB,BA,,", 2);
        let first: Vec<PuzzleState> = state.children().collect();
        let second: Vec<PuzzleState> = state.children().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unmixing_stalls_without_spare_capacity() {
        // Two colors stacked in one tube, a single empty tube beside it.
        let start = create_state("AB,", 2);
        let next = start.pour(0, 1).unwrap();
        assert_eq!(next.to_string(), "(A, B)");
        assert!(!next.is_goal());
        // Mismatched tops and no empty tube: the follow-up state is stuck.
        assert_eq!(
            next.pour(0, 1).unwrap_err(),
            PuzzleError::IncompatiblePour { from: 0, to: 1 }
        );
        assert_eq!(next.children().count(), 0);
    }

    #[test]
    fn test_equality_ignores_tube_order() {
        let a = create_state("ABBA,BA,C,", 4);
        let b = create_state(",C,ABBA,BA", 4);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        let c = create_state("ABBA,AB,C,", 4);
        assert_ne!(a, c);
    }

    #[test]
    fn test_equality_ignores_lineage() {
        // The same tubes reached along different move orders dedup.
        let state = create_state("AB,BA,,", 2);
        let via_left = state.pour(0, 2).unwrap().pour(1, 3).unwrap();
        let via_right = state.pour(1, 3).unwrap().pour(0, 2).unwrap();
        assert_eq!(via_left, via_right);
        assert_eq!(hash_of(&via_left), hash_of(&via_right));
        assert_ne!(via_left.last_pour(), via_right.last_pour());
    }

    #[test]
    fn test_random_deal_invariants() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let params = PuzzleParams {
                tube_size: 4,
                empty_tubes: 2,
                color_count: 6,
            };
            let state = PuzzleState::random(params, &mut rng).unwrap();
            assert_eq!(state.tube_count(), 8);
            assert_eq!(state.tube_size(), 4);
            assert_eq!(state.depth(), 0);
            assert!(state.parent().is_none());
            assert!(state.tubes().iter().all(|tube| tube.len() <= 4));
            let counts = color_counts(&state);
            assert_eq!(counts.len(), 6);
            for id in 0..6u8 {
                assert_eq!(counts[&Color(id)], 4);
            }
        }
    }

    #[test]
    fn test_random_deal_may_be_already_solved() {
        // One color in one slot plus one spare tube: every deal is a goal.
        let mut rng = StdRng::seed_from_u64(1);
        let params = PuzzleParams {
            tube_size: 1,
            empty_tubes: 1,
            color_count: 1,
        };
        let state = PuzzleState::random(params, &mut rng).unwrap();
        assert!(state.is_goal());
    }

    #[test]
    fn test_random_deal_validates_params() {
        let mut rng = StdRng::seed_from_u64(0);
        let flat = PuzzleParams {
            tube_size: 0,
            empty_tubes: 2,
            color_count: 5,
        };
        assert_eq!(
            PuzzleState::random(flat, &mut rng).unwrap_err(),
            PuzzleError::ZeroCapacity
        );
        let lonely = PuzzleParams {
            tube_size: 4,
            empty_tubes: 0,
            color_count: 1,
        };
        assert_eq!(
            PuzzleState::random(lonely, &mut rng).unwrap_err(),
            PuzzleError::TooFewTubes { count: 1 }
        );
        let garish = PuzzleParams {
            tube_size: 2,
            empty_tubes: 1,
            color_count: 300,
        };
        assert_eq!(
            PuzzleState::random(garish, &mut rng).unwrap_err(),
            PuzzleError::TooManyColors {
                requested: 300,
                max: MAX_COLORS
            }
        );
    }

    #[test]
    fn test_deep_chains_drop_without_overflow() {
        // Hand-build a long lineage; dropping it must not recurse per link.
        let mut state = create_state("AB,BA,,", 2);
        for _ in 0..100_000 {
            let next = state.children().next().expect("state has children");
            state = next;
        }
        drop(state);
    }
}

//! Named groups of probability-ranged text entries.

use std::collections::HashSet;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// An inclusive, 1-based interval matched against a roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRange {
    /// First matching value.
    pub start: u32,
    /// Last matching value.
    pub end: u32,
}

impl MatchRange {
    /// Whether `n` falls inside this range.
    pub fn contains(self, n: u32) -> bool {
        self.start <= n && n <= self.end
    }

    /// Number of values this range covers.
    pub fn width(self) -> u32 {
        if self.end >= self.start {
            self.end - self.start + 1
        } else {
            0
        }
    }
}

/// How a group's item ranges are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKind {
    /// Ranges are author-specified directly (`:Group` declarations).
    Absolute,
    /// Items declare only a weight; ranges accumulate (`;Group`).
    Relative,
}

/// One (range, template text) entry within a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// The rolls this item matches.
    pub range: MatchRange,
    /// Raw, unexpanded template text.
    pub text: String,
}

/// A named, weighted set of text alternatives within a table.
///
/// The item list is fixed once the group is closed; only the use-once
/// seen-state mutates during rolling. Seen entries are tracked by item
/// index so duplicate texts count separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Unique name within the owning table.
    pub name: String,
    /// Range-assignment mode.
    pub kind: GroupKind,
    /// Each entry is returned at most once until [`Group::reset`].
    pub use_once: bool,
    /// Declared with `~`. Only meaningful to interactive front ends;
    /// parsed and carried, never consulted here.
    pub reroll: bool,
    /// Text placed before every selected entry.
    pub prefix: String,
    /// Text placed after every selected entry.
    pub suffix: String,
    items: Vec<Item>,
    max_roll: u32,
    #[serde(skip)]
    seen: HashSet<usize>,
}

impl Group {
    /// Create an empty group.
    pub fn new(name: impl Into<String>, kind: GroupKind) -> Self {
        Self {
            name: name.into(),
            kind,
            use_once: false,
            reroll: false,
            prefix: String::new(),
            suffix: String::new(),
            items: Vec::new(),
            max_roll: 0,
            seen: HashSet::new(),
        }
    }

    /// Append an item with an author-specified range.
    pub fn add_item(&mut self, range: MatchRange, text: impl Into<String>) {
        self.items.push(Item {
            range,
            text: text.into(),
        });
    }

    /// Append an item by weight; its range continues where the previous
    /// item's range ended.
    pub fn add_weighted(&mut self, weight: u32, text: impl Into<String>) {
        let last_end = self
            .items
            .last()
            .map(|item| item.range.end.max(item.range.start.saturating_sub(1)))
            .unwrap_or(0);
        self.add_item(
            MatchRange {
                start: last_end + 1,
                end: last_end + weight,
            },
            text,
        );
    }

    /// Append `extra` to the last item's text. Returns false when the
    /// group has no items yet.
    pub fn append_last(&mut self, extra: &str) -> bool {
        match self.items.last_mut() {
            Some(item) => {
                item.text.push_str(extra);
                true
            }
            None => false,
        }
    }

    /// Finalize the sampling domain. Called once all items are added;
    /// rolling before this always returns an empty string.
    pub fn close(&mut self) {
        self.max_roll = self
            .items
            .iter()
            .filter(|item| item.range.end >= item.range.start)
            .map(|item| item.range.end)
            .max()
            .unwrap_or(0);
    }

    /// Upper bound of the sampling domain `[1, max_roll]`.
    pub fn max_roll(&self) -> u32 {
        self.max_roll
    }

    /// The item list in declaration order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the group has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Randomly select an entry and wrap it with prefix and suffix.
    ///
    /// A use-once group redraws until it finds an unseen entry and
    /// returns an empty string once every entry has been returned.
    pub fn roll(&mut self, rng: &mut StdRng) -> String {
        if self.items.is_empty() || self.max_roll == 0 {
            return String::new();
        }
        if self.use_once && self.seen.len() >= self.selectable() {
            return String::new();
        }
        loop {
            let r = rng.random_range(1..=self.max_roll);
            let Some(idx) = self.find(r) else {
                // Gap in the authored ranges; redraw.
                continue;
            };
            if self.use_once {
                if self.seen.contains(&idx) {
                    continue;
                }
                self.seen.insert(idx);
            }
            return format!("{}{}{}", self.prefix, self.items[idx].text, self.suffix);
        }
    }

    /// Deterministically select the entry whose range contains `n`.
    /// Does not consult or record use-once state. An unmatched index
    /// selects empty text.
    pub fn select(&self, n: u32) -> String {
        let text = self
            .find(n)
            .map(|idx| self.items[idx].text.as_str())
            .unwrap_or_default();
        format!("{}{}{}", self.prefix, text, self.suffix)
    }

    /// Forget which entries a use-once group has already returned.
    pub fn reset(&mut self) {
        self.seen.clear();
    }

    /// First item in declaration order whose range contains `r`.
    fn find(&self, r: u32) -> Option<usize> {
        self.items.iter().position(|item| item.range.contains(r))
    }

    /// Items that can actually be drawn. Zero-width ranges (a weight of
    /// 0) never match, so they must not count toward exhaustion.
    fn selectable(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.range.width() > 0)
            .count()
    }
}

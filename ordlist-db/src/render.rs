//! Fixed-width console rendering of tree keys.

use std::fmt::Display;
use std::io::Write;

use ordlist_trees::tree::bst::{LEVEL_SNAPSHOT_DEPTH, LEVEL_SNAPSHOT_SLOTS};
use ordlist_trees::{LevelSlot, Tree};

/// Width of every rendered cell.
pub const CELL_WIDTH: usize = 5;

const MISSING_CELL: &str = "  #  ";
const UNREACHABLE_CELL: &str = "     ";
const OVERFLOW_CELL: &str = "#### ";

/// Formats a key centered in a [`CELL_WIDTH`] wide cell, leaning left.
/// Keys wider than four characters are shown as `"#### "`.
pub fn key_cell(key: &impl Display) -> String {
    let text = key.to_string();
    let len = text.chars().count();
    if len >= CELL_WIDTH {
        return String::from(OVERFLOW_CELL);
    }
    let left = (CELL_WIDTH - len) / 2;
    let right = CELL_WIDTH - len - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Writes every key in ascending order, one cell each.
pub fn write_sorted<K: Display, V, W: Write>(tree: &Tree<K, V>, mut out: W) -> anyhow::Result<()> {
    tree.in_order(|key, _| {
        out.write_all(key_cell(key).as_bytes())?;
        Ok(())
    })?;
    out.flush()?;
    Ok(())
}

/// Writes every key in descending order, one cell each.
pub fn write_reverse<K: Display, V, W: Write>(tree: &Tree<K, V>, mut out: W) -> anyhow::Result<()> {
    tree.reverse_in_order(|key, _| {
        out.write_all(key_cell(key).as_bytes())?;
        Ok(())
    })?;
    out.flush()?;
    Ok(())
}

// Spaces before each cell, per level: the first cell of a level, then the rest.
const LEVEL_INDENTS: [(usize, usize); LEVEL_SNAPSHOT_DEPTH] =
    [(38, 38), (18, 35), (8, 15), (3, 5), (0, 0)];

/// Draws the top levels of `tree` as five rows of cells, each level under its
/// parents. Absent children are drawn as `#`, and positions below them are blank.
pub fn render_levels<K: Display, V, W: Write>(tree: &Tree<K, V>, mut out: W) -> anyhow::Result<()> {
    let snapshot = tree.level_snapshot()?;
    debug_assert_eq!(snapshot.len(), LEVEL_SNAPSHOT_SLOTS);
    for (level, (first_indent, indent)) in LEVEL_INDENTS.iter().enumerate() {
        let start = (1 << level) - 1;
        let end = (1 << (level + 1)) - 1;
        let mut row = String::new();
        for (slot, cell) in snapshot[start..end].iter().enumerate() {
            row.push_str(&" ".repeat(if slot == 0 { *first_indent } else { *indent }));
            match cell {
                LevelSlot::Item(key, _) => row.push_str(&key_cell(key)),
                LevelSlot::Missing => row.push_str(MISSING_CELL),
                LevelSlot::Unreachable => row.push_str(UNREACHABLE_CELL),
            }
        }
        writeln!(out, "{}", row)?;
    }
    out.flush()?;
    Ok(())
}

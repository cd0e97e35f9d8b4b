//! Flat persistence and console rendering for [`ordlist_trees::Tree`].
//!
//! Keys are dumped in pre-order so that replaying them through find and
//! insert rebuilds the exact same shape. Values are not persisted.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(coverage_nightly, feature(no_coverage))]

pub mod dump;
pub mod render;

pub use crate::dump::{dump_keys, load_file, load_keys, load_keys_into, save_file, DumpOptions};
pub use crate::render::{key_cell, render_levels, write_reverse, write_sorted};

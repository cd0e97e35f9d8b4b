//! Pre-order key dumps and their replay.

use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use ordlist_trees::{Tree, TreeConfig};
use tracing::debug;

/// Formatting of a key dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpOptions {
    /// Written after every key. Must contain whitespace for the dump to load back.
    pub separator: String,
    /// Whether to end the dump with a newline.
    pub trailing_newline: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        DumpOptions {
            separator: String::from(" "),
            trailing_newline: false,
        }
    }
}

/// Writes every key of `tree` in pre-order, each followed by the separator.
/// Returns the number of keys written.
///
/// Fails before writing anything if a key prints as empty or with
/// whitespace, since it would not load back as the same key.
pub fn dump_keys<K: Display, V, W: Write>(
    tree: &Tree<K, V>,
    mut out: W,
    options: &DumpOptions,
) -> anyhow::Result<usize> {
    if !options.separator.contains(char::is_whitespace) {
        return Err(anyhow!("separator {:?} does not contain whitespace", options.separator));
    }
    tree.pre_order(|key, _| {
        let text = key.to_string();
        if text.is_empty() || text.contains(char::is_whitespace) {
            return Err(anyhow!("key {:?} cannot be dumped as a single token", text));
        }
        Ok(())
    })?;

    let mut written = 0;
    tree.pre_order(|key, _| {
        write!(out, "{}{}", key, options.separator)?;
        written += 1;
        Ok(())
    })?;
    if options.trailing_newline {
        writeln!(out)?;
    }
    out.flush()?;
    debug!(keys = written, "dumped keys");
    Ok(written)
}

/// Replays whitespace separated keys from `input` into `tree` through find
/// and insert. Keys already present are skipped. Returns the number inserted.
pub fn load_keys_into<K, V, R>(tree: &mut Tree<K, V>, mut input: R) -> anyhow::Result<usize>
where
    K: FromStr + Ord,
    K::Err: std::error::Error + Send + Sync + 'static,
    V: Default,
    R: Read,
{
    let mut text = String::new();
    input.read_to_string(&mut text).context("unable to read key dump")?;

    let mut inserted = 0;
    for token in text.split_whitespace() {
        let key: K = token.parse().with_context(|| format!("invalid key {:?}", token))?;
        if !tree.find(&key)? {
            tree.insert(key, V::default())
                .with_context(|| format!("unable to insert key {:?}", token))?;
            inserted += 1;
        }
    }
    debug!(keys = inserted, "loaded keys");
    Ok(inserted)
}

/// Builds a new tree with `config` from a key dump.
pub fn load_keys<K, V, R>(input: R, config: TreeConfig) -> anyhow::Result<Tree<K, V>>
where
    K: FromStr + Ord,
    K::Err: std::error::Error + Send + Sync + 'static,
    V: Default,
    R: Read,
{
    let mut tree = Tree::with_config(config);
    load_keys_into(&mut tree, input)?;
    Ok(tree)
}

/// Dumps the keys of `tree` to `path`, replacing any existing file.
pub fn save_file<K: Display, V>(
    tree: &Tree<K, V>,
    path: impl AsRef<Path>,
    options: &DumpOptions,
) -> anyhow::Result<usize> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("unable to open {}", path.display()))?;
    dump_keys(tree, BufWriter::new(file), options)
        .with_context(|| format!("unable to write {}", path.display()))
}

/// Loads a tree with `config` from a key dump at `path`.
pub fn load_file<K, V>(path: impl AsRef<Path>, config: TreeConfig) -> anyhow::Result<Tree<K, V>>
where
    K: FromStr + Ord,
    K::Err: std::error::Error + Send + Sync + 'static,
    V: Default,
{
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("unable to open {}", path.display()))?;
    load_keys(BufReader::new(file), config)
        .with_context(|| format!("unable to load {}", path.display()))
}

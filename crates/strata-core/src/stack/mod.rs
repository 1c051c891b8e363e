//! The layered stack and its merged-view memo.
//!
//! Layer 0 is the top of the stack and wins every key collision. Appending a
//! layer puts it at the bottom, below everything already present. Reads of
//! the whole view are memoized; every mutator drops the memo before touching
//! a layer, and the next read rebuilds it by folding layers bottom to top.
//!
//! The memo lives in a [`OnceCell`], so a stack is not `Sync`. Callers that
//! share one across threads must serialize access themselves.


use crate::digest::digest_view;
use crate::loader::{load_layer_from_path, load_layer_from_str};
use crate::table::render_table;
use crate::{KeyPolicy, StackError, StackOptions};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::cell::OnceCell;
use std::io::{self, Write};
use std::path::Path;

/// One mapping in the stack; iteration follows insertion order.
pub type Layer = Map<String, Value>;

/// Ordered layers queried as one merged mapping.
#[derive(Debug, Clone)]
pub struct LayeredStack {
    options: StackOptions,
    policy: KeyPolicy,
    layers: Vec<Layer>,
    cache: OnceCell<Layer>,
}

impl Default for LayeredStack {
    fn default() -> Self {
        Self::new(StackOptions::default())
    }
}

impl LayeredStack {
    /// Create a stack holding `options.layers` empty layers.
    pub fn new(options: StackOptions) -> Self {
        let mut stack = Self {
            options,
            policy: options.key_policy(),
            layers: Vec::new(),
            cache: OnceCell::new(),
        };
        stack.reset();
        stack
    }

    /// Drop every layer and recreate the configured number of empty ones.
    pub fn reset(&mut self) -> &mut Self {
        self.layers.clear();
        self.invalidate();
        self.policy = self.options.key_policy();
        self.layers
            .extend((0..self.options.layers).map(|_| Layer::new()));
        debug!(
            "stack reset (layers={}, policy={:?})",
            self.layers.len(),
            self.policy
        );
        self
    }

    /// Append a layer below all existing ones, returning it as stored.
    ///
    /// Keys are normalized on the way in; when two keys fold to the same
    /// one, the later entry wins.
    pub fn add_layer<I, K, V>(&mut self, entries: I) -> &Layer
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.invalidate();
        let layer = self.normalize_entries(entries);
        let index = self.layers.len();
        debug!("layer appended (index={index}, keys={})", layer.len());
        self.layers.push(layer);
        &self.layers[index]
    }

    /// Append an empty layer below all existing ones.
    pub fn add_empty_layer(&mut self) -> &Layer {
        self.add_layer(Layer::new())
    }

    /// Append a layer parsed from JSON5 contents.
    pub fn add_layer_from_str(&mut self, contents: &str) -> Result<&Layer, StackError> {
        let layer = load_layer_from_str(contents)?;
        Ok(self.add_layer(layer))
    }

    /// Append a layer read from a JSON5 file.
    pub fn add_layer_from_path(&mut self, path: impl AsRef<Path>) -> Result<&Layer, StackError> {
        let layer = load_layer_from_path(path)?;
        Ok(self.add_layer(layer))
    }

    /// Replace the whole layer at `index` with freshly normalized entries.
    pub fn set_layer<I, K, V>(&mut self, entries: I, index: usize) -> Result<&mut Self, StackError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.check_index(index)?;
        self.invalidate();
        let layer = self.normalize_entries(entries);
        debug!("layer replaced (index={index}, keys={})", layer.len());
        self.layers[index] = layer;
        Ok(self)
    }

    /// Store `value` under `key` in the top layer.
    pub fn set(
        &mut self,
        key: impl AsRef<str>,
        value: impl Into<Value>,
    ) -> Result<&mut Self, StackError> {
        self.set_in(0, key, value)
    }

    /// Alias of [`LayeredStack::set`].
    pub fn add(
        &mut self,
        key: impl AsRef<str>,
        value: impl Into<Value>,
    ) -> Result<&mut Self, StackError> {
        self.set_in(0, key, value)
    }

    /// Store `value` under `key` in the layer at `index`.
    ///
    /// An out-of-range index fails without touching the stack or its memo.
    pub fn set_in(
        &mut self,
        index: usize,
        key: impl AsRef<str>,
        value: impl Into<Value>,
    ) -> Result<&mut Self, StackError> {
        self.check_index(index)?;
        self.invalidate();
        let key = self.policy.normalize(key.as_ref()).into_owned();
        self.layers[index].insert(key, value.into());
        Ok(self)
    }

    /// Look up a single key, `None` when no layer holds it.
    ///
    /// Uses the memo when one is built; otherwise returns the value from the
    /// first layer, top down, that contains the key at all.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&Value> {
        let key = self.policy.normalize(key.as_ref());
        if let Some(view) = self.cache.get() {
            return view.get(&*key);
        }
        self.layers.iter().find_map(|layer| layer.get(&*key))
    }

    /// The merged view of all layers, built on first use.
    pub fn view(&self) -> &Layer {
        self.cache.get_or_init(|| self.fold())
    }

    /// Whether any layer holds `key`, whatever its value.
    pub fn has(&self, key: impl AsRef<str>) -> bool {
        let key = self.policy.normalize(key.as_ref());
        match self.cache.get() {
            Some(view) => view.contains_key(&*key),
            None => self.layers.iter().any(|layer| layer.contains_key(&*key)),
        }
    }

    /// Fingerprint of the merged view; equal views give equal digests.
    pub fn hash(&self) -> String {
        digest_view(self.view())
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// True when the stack holds no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of distinct keys in the merged view.
    pub fn count(&self) -> usize {
        self.view().len()
    }

    /// Tab-separated table of every layer's raw contents.
    pub fn to_table(&self) -> String {
        render_table(&self.layers)
    }

    /// Write [`LayeredStack::to_table`] to `sink` in a single write.
    pub fn dump<W: Write + ?Sized>(&self, sink: &mut W) -> Result<&Self, StackError> {
        sink.write_all(self.to_table().as_bytes())
            .map_err(StackError::WriteFailed)?;
        Ok(self)
    }

    /// Write the table to standard output.
    pub fn dump_stdout(&self) -> Result<&Self, StackError> {
        let mut stdout = io::stdout().lock();
        self.dump(&mut stdout)
    }

    /// Layer at `index`, if present.
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// All layers, top first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn options(&self) -> &StackOptions {
        &self.options
    }

    pub fn policy(&self) -> KeyPolicy {
        self.policy
    }

    /// Normalize a key under this stack's policy.
    pub fn normalize(&self, key: &str) -> String {
        self.policy.normalize(key).into_owned()
    }

    /// Whether a merged view is currently memoized.
    pub fn is_cached(&self) -> bool {
        self.cache.get().is_some()
    }

    fn invalidate(&mut self) {
        if self.cache.take().is_some() {
            debug!("merged view invalidated");
        }
    }

    fn check_index(&self, index: usize) -> Result<(), StackError> {
        if index >= self.layers.len() {
            warn!(
                "rejected layer index {index} (layers={})",
                self.layers.len()
            );
            return Err(StackError::InvalidLayer {
                index,
                len: self.layers.len(),
            });
        }
        Ok(())
    }

    fn normalize_entries<I, K, V>(&self, entries: I) -> Layer
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut layer = Layer::new();
        for (key, value) in entries {
            layer.insert(self.policy.normalize(key.as_ref()).into_owned(), value.into());
        }
        layer
    }

    /// Fold layers bottom to top so lower indexes overwrite higher ones.
    fn fold(&self) -> Layer {
        let mut merged = Layer::new();
        for layer in self.layers.iter().rev() {
            for (key, value) in layer {
                merged.insert(self.policy.normalize(key).into_owned(), value.clone());
            }
        }
        debug!(
            "merged view rebuilt (layers={}, keys={})",
            self.layers.len(),
            merged.len()
        );
        merged
    }
}

/// Limits applied to one transcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
  pub max_depth: usize,
}

impl CodecConfig {
  /// Nesting both directions handle on a 2 MiB thread stack in debug builds. Raising
  /// `max_depth` past it needs a larger stack on the calling thread.
  pub const DEFAULT_MAX_DEPTH: usize = 128;

  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_max_depth(mut self, max_depth: usize) -> Self {
    self.max_depth = max_depth;
    self
  }
}

impl Default for CodecConfig {
  fn default() -> Self {
    Self {
      max_depth: Self::DEFAULT_MAX_DEPTH,
    }
  }
}

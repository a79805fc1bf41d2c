/// Run-wide settings for checking a rule set against its tests.
///
/// `max_hops` and `error_untested` are independent: the first turns long
/// redirect chains into findings, the second decides whether untested
/// rules count as failures or are only listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckConfig {
    /// Longest permitted redirect chain. `0` means unlimited.
    pub max_hops: usize,
    /// Count untested rules as failures.
    pub error_untested: bool,
    /// Leave untested rules out of the rendered report.
    pub quiet: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            max_hops: 0,
            error_untested: true,
            quiet: false,
        }
    }
}

impl CheckConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    #[must_use]
    pub fn error_untested(mut self, error_untested: bool) -> Self {
        self.error_untested = error_untested;
        self
    }

    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Whether a chain of `hops` matches is longer than allowed.
    #[must_use]
    pub fn exceeds_hop_limit(&self, hops: usize) -> bool {
        self.max_hops > 0 && hops > self.max_hops
    }
}

/// Read access to the shared short-code namespace.
///
/// Both the code generator and the alias validator check candidate keys
/// against this view. A key counts as taken whether its mapping is active or
/// not, so soft-deleted and expired codes are never handed out again.
pub trait KeySpace {
    /// Returns `true` if `code` is bound to any mapping, generated or alias.
    fn contains(&self, code: &str) -> bool;
}

impl KeySpace for std::collections::HashSet<String> {
    fn contains(&self, code: &str) -> bool {
        std::collections::HashSet::contains(self, code)
    }
}
